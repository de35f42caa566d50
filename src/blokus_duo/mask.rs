use crate::utils::prelude::*;

use super::coords::Coord;

/// A bitboard over the cells of a board, one bit per cell at `row * width + col`.
///
/// Backed by a `U256`, which caps supported boards at 256 cells; `Board::new`
/// enforces the cap so every mask in a live game is total over the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mask(pub U256);

impl Mask {
    /// The empty mask.
    pub fn empty() -> Mask {
        Mask(U256::zero())
    }

    /// The mask with exactly one bit set.
    pub fn bit(index: usize) -> Mask {
        Mask(U256::one() << index)
    }

    /// Whether the given bit is set.
    pub fn contains(&self, index: usize) -> bool {
        self.0.bit(index)
    }

    /// Sets the given bit.
    pub fn insert(&mut self, index: usize) -> &mut Self {
        self.0 = self.0 | (U256::one() << index);
        self
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_zero()
    }

    /// The number of set bits.
    pub fn len(&self) -> usize {
        self.0.0.iter().map(|limb| limb.count_ones() as usize).sum()
    }

    /// Whether the two masks share any bit.
    pub fn intersects(&self, other: &Mask) -> bool {
        !(self.0 & other.0).is_zero()
    }

    /// Iterates the set bit indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let limbs = self.0.0;
        (0..4).flat_map(move |i| {
            let mut limb = limbs[i];
            std::iter::from_fn(move || {
                if limb == 0 {
                    return None;
                }
                let bit = limb.trailing_zeros() as usize;
                limb &= limb - 1;
                Some(i * 64 + bit)
            })
        })
    }
}

impl std::ops::BitAnd for Mask {
    type Output = Mask;
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl std::ops::BitOr for Mask {
    type Output = Mask;
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl std::ops::Not for Mask {
    type Output = Mask;
    fn not(self) -> Mask {
        Mask(!self.0)
    }
}

impl FromIterator<usize> for Mask {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut mask = Mask::empty();
        for index in iter {
            mask.insert(index);
        }
        mask
    }
}

/// Shift geometry for a fixed board size: the column guards that stop a
/// left/right shift from wrapping across row boundaries.
#[derive(Clone, Copy, Debug)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
    full: Mask,
    left_col: Mask,
    right_col: Mask,
}

impl Geometry {
    /// Builds the geometry for a board; the area must fit in 256 bits.
    pub fn new(width: usize, height: usize) -> Result<Geometry> {
        let area = width * height;
        if width == 0 || height == 0 || area > 256 {
            return Err(anyhow!("unsupported board size {width}x{height}; need 1..=256 cells"));
        }
        let full = if area == 256 {
            Mask(U256::MAX)
        } else {
            Mask((U256::one() << area) - U256::one())
        };
        let left_col = (0..height).map(|r| r * width).collect();
        let right_col = (0..height).map(|r| r * width + width - 1).collect();
        Ok(Geometry { width, height, full, left_col, right_col })
    }

    /// The mask covering every cell of the board.
    pub fn full(&self) -> Mask {
        self.full
    }

    /// The linear index of a coordinate.
    pub fn index(&self, coord: &Coord) -> usize {
        coord.row * self.width + coord.col
    }

    /// The coordinate of a linear index.
    pub fn coord(&self, index: usize) -> Coord {
        Coord::new(index / self.width, index % self.width)
    }

    /// All cells orthogonally adjacent to a set cell (the set itself not excluded).
    pub fn ortho_spread(&self, mask: Mask) -> Mask {
        let up = mask.0 >> self.width;
        let down = mask.0 << self.width;
        let left = (mask.0 & !self.left_col.0) >> 1;
        let right = (mask.0 & !self.right_col.0) << 1;
        Mask(up | down | left | right) & self.full
    }

    /// All cells diagonally adjacent to a set cell (the set itself not excluded).
    pub fn diag_spread(&self, mask: Mask) -> Mask {
        let not_left = mask.0 & !self.left_col.0;
        let not_right = mask.0 & !self.right_col.0;
        let up_left = not_left >> (self.width + 1);
        let up_right = not_right >> (self.width - 1);
        let down_left = not_left << (self.width - 1);
        let down_right = not_right << (self.width + 1);
        Mask(up_left | up_right | down_left | down_right) & self.full
    }
}
