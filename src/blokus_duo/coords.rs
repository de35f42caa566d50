use crate::utils::prelude::*;

/// Simple board coordinate; bounds are a property of the board, not the coord.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl std::str::FromStr for Coord {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.len() != 4 {
            return Err(anyhow!("expected (0-padded) 4 digit pair for Coord; received {s}"));
        }
        let row = s[0..2].parse::<usize>()?;
        let col = s[2..4].parse::<usize>()?;
        Ok(Coord { row, col })
    }
}

impl Coord {
    /// Constructs a new coord.
    pub fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    /// Determines whether or not the coord is in bounds for the given dimensions.
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.row < height && self.col < width
    }

    /// The taxicab distance between two coords.
    pub fn manhattan(&self, other: &Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The canonical notation of the coord: zero-padded row then column.
    pub fn notate(&self) -> String {
        format!("{:02}{:02}", self.row, self.col)
    }
}

/// Simple offset pair that can be used to calculate neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetCoord {
    pub rows: isize,
    pub cols: isize,
}

/// Offsets that turn a coordinate into one of its orthogonal neighbours.
pub static ORTHOGONAL_OFFSETS: [OffsetCoord; 4] = [
    OffsetCoord { rows: -1, cols: 0 },
    OffsetCoord { rows: 0, cols: -1 },
    OffsetCoord { rows: 0, cols: 1 },
    OffsetCoord { rows: 1, cols: 0 },
];

/// Offsets that turn a coordinate into one of its diagonal neighbours, in
/// quadrant order: top-left, top-right, bottom-left, bottom-right.
pub static DIAGONAL_OFFSETS: [OffsetCoord; 4] = [
    OffsetCoord { rows: -1, cols: -1 },
    OffsetCoord { rows: -1, cols: 1 },
    OffsetCoord { rows: 1, cols: -1 },
    OffsetCoord { rows: 1, cols: 1 },
];

impl OffsetCoord {
    /// Constructs a new offset coord.
    pub fn new(rows: isize, cols: isize) -> OffsetCoord {
        OffsetCoord { rows, cols }
    }

    /// Coerces the offset into a coordinate unchecked.
    pub fn coerce(&self) -> Coord {
        Coord {
            row: self.rows as usize,
            col: self.cols as usize,
        }
    }

    /// Determines whether or not the offset names a real cell for the given dimensions.
    pub fn in_bounds_signed(&self, width: usize, height: usize) -> bool {
        0 <= self.rows && self.rows < height as isize && 0 <= self.cols && self.cols < width as isize
    }
}

// C -> OC

impl From<Coord> for OffsetCoord {
    fn from(value: Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

impl From<&Coord> for OffsetCoord {
    fn from(value: &Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

// OC + OC

impl Add<&OffsetCoord> for &OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        OffsetCoord {
            rows: self.rows + rhs.rows,
            cols: self.cols + rhs.cols,
        }
    }
}

impl Add<OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        &self + &rhs
    }
}

// C + OC

impl Add<&OffsetCoord> for &Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: &OffsetCoord) -> Self::Output {
        &OffsetCoord::from(self) + rhs
    }
}

impl Add<OffsetCoord> for Coord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        &self + &rhs
    }
}

// C - C

impl Sub<&Coord> for &Coord {
    type Output = OffsetCoord;
    fn sub(self, rhs: &Coord) -> Self::Output {
        OffsetCoord {
            rows: self.row as isize - rhs.row as isize,
            cols: self.col as isize - rhs.col as isize,
        }
    }
}

impl Sub<Coord> for Coord {
    type Output = OffsetCoord;
    fn sub(self, rhs: Coord) -> Self::Output {
        &self - &rhs
    }
}
