use crate::utils::prelude::*;

use super::consts::INVENTORY_SIZE;
use super::coords::OffsetCoord;

/// A polyomino piece: a stable inventory id plus a rectangular occupancy
/// matrix. The id survives every transform, so callers can always re-derive
/// an orientation from scratch via the inventory's canonical original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    id: u8,
    shape: Vec<Vec<bool>>,
}

impl Piece {
    /// Builds a piece, rejecting malformed shapes: every row must have the
    /// same (nonzero) length, and at least one cell must be occupied.
    pub fn new(id: u8, shape: Vec<Vec<bool>>) -> Result<Piece> {
        let Some(first) = shape.first() else {
            return Err(anyhow!("piece {id} has an empty shape"));
        };
        if first.is_empty() || shape.iter().any(|row| row.len() != first.len()) {
            return Err(anyhow!("piece {id} has a non-rectangular shape"));
        }
        if !shape.iter().flatten().any(|&cell| cell) {
            return Err(anyhow!("piece {id} covers no cells"));
        }
        Ok(Piece { id, shape })
    }

    /// The stable inventory id.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The number of cells the piece covers.
    pub fn size(&self) -> usize {
        self.shape.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Shape height in rows.
    pub fn rows(&self) -> usize {
        self.shape.len()
    }

    /// Shape width in columns.
    pub fn cols(&self) -> usize {
        self.shape[0].len()
    }

    /// The occupied cells of the shape as offsets from its top-left corner.
    pub fn cells(&self) -> impl Iterator<Item = OffsetCoord> + '_ {
        self.shape.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, &cell)| {
                cell.then(|| OffsetCoord::new(r as isize, c as isize))
            })
        })
    }

    /// Rotates the shape 90 degrees clockwise in place: `new[c][rows-1-r] = old[r][c]`.
    pub fn rotate(&mut self) {
        let (rows, cols) = (self.rows(), self.cols());
        let mut rotated = vec![vec![false; rows]; cols];
        for (r, row) in self.shape.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                rotated[c][rows - 1 - r] = cell;
            }
        }
        self.shape = rotated;
    }

    /// Mirrors the shape horizontally in place.
    pub fn flip(&mut self) {
        for row in &mut self.shape {
            row.reverse();
        }
    }

    /// A fresh copy of this piece in the given orientation: `rotations`
    /// clockwise quarter-turns applied after an optional horizontal flip.
    pub fn oriented(&self, rotations: u8, flipped: bool) -> Piece {
        let mut piece = self.clone();
        if flipped {
            piece.flip();
        }
        for _ in 0..rotations % 4 {
            piece.rotate();
        }
        piece
    }
}

/// Produces the canonical duo inventory: the 21 polyominoes from the monomino
/// through the twelve pentominoes, ids 1..=21 in fixed order.
pub fn standard_set() -> Vec<Piece> {
    let t = true;
    let f = false;
    let shapes: [Vec<Vec<bool>>; INVENTORY_SIZE] = [
        vec![vec![t]],                                      //  1: monomino
        vec![vec![t, t]],                                   //  2: domino
        vec![vec![t, t, t]],                                //  3: tromino I
        vec![vec![t, f], vec![t, t]],                       //  4: tromino V
        vec![vec![t, t, t, t]],                             //  5: tetromino I
        vec![vec![t, t], vec![t, t]],                       //  6: tetromino O
        vec![vec![t, t, t], vec![f, t, f]],                 //  7: tetromino T
        vec![vec![t, f], vec![t, f], vec![t, t]],           //  8: tetromino L
        vec![vec![f, t, t], vec![t, t, f]],                 //  9: tetromino S
        vec![vec![f, t, t], vec![t, t, f], vec![f, t, f]],  // 10: pentomino F
        vec![vec![t, t, t, t, t]],                          // 11: pentomino I
        vec![vec![t, f], vec![t, f], vec![t, f], vec![t, t]], // 12: pentomino L
        vec![vec![f, t], vec![f, t], vec![t, t], vec![t, f]], // 13: pentomino N
        vec![vec![t, t], vec![t, t], vec![t, f]],           // 14: pentomino P
        vec![vec![t, t, t], vec![f, t, f], vec![f, t, f]],  // 15: pentomino T
        vec![vec![t, f, t], vec![t, t, t]],                 // 16: pentomino U
        vec![vec![t, f, f], vec![t, f, f], vec![t, t, t]],  // 17: pentomino V
        vec![vec![t, f, f], vec![t, t, f], vec![f, t, t]],  // 18: pentomino W
        vec![vec![f, t, f], vec![t, t, t], vec![f, t, f]],  // 19: pentomino X
        vec![vec![f, t], vec![t, t], vec![f, t], vec![f, t]], // 20: pentomino Y
        vec![vec![t, t, f], vec![f, t, f], vec![f, t, t]],  // 21: pentomino Z
    ];

    shapes
        .into_iter()
        .enumerate()
        .map(|(i, shape)| Piece::new((i + 1) as u8, shape).expect("canonical shapes are well-formed"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_has_the_canonical_inventory() {
        let set = standard_set();
        assert_eq!(set.len(), 21);
        assert_eq!(set.iter().map(Piece::size).sum::<usize>(), 89);
        assert_eq!(set.iter().map(|p| p.id()).collect::<Vec<_>>(), (1..=21).collect::<Vec<_>>());

        // 1 monomino, 1 domino, 2 trominoes, 5 tetrominoes, 12 pentominoes.
        for (size, count) in [(1, 1), (2, 1), (3, 2), (4, 5), (5, 12)] {
            assert_eq!(set.iter().filter(|p| p.size() == size).count(), count);
        }
    }

    #[test]
    fn four_rotations_are_the_identity() {
        for piece in standard_set() {
            let mut rotated = piece.clone();
            for _ in 0..4 {
                rotated.rotate();
            }
            assert_eq!(rotated, piece, "piece {} did not survive 4 rotations", piece.id());
        }
    }

    #[test]
    fn two_flips_are_the_identity() {
        for piece in standard_set() {
            let mut flipped = piece.clone();
            flipped.flip();
            flipped.flip();
            assert_eq!(flipped, piece, "piece {} did not survive 2 flips", piece.id());
        }
    }

    #[test]
    fn rotation_maps_cells_clockwise() {
        // The L tromino: (0,0), (1,0), (1,1) rotates to (0,0), (0,1), (1,0).
        let mut piece = Piece::new(1, vec![vec![true, false], vec![true, true]]).unwrap();
        piece.rotate();
        let cells: Vec<(isize, isize)> = piece.cells().map(|o| (o.rows, o.cols)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn orientation_preserves_id_and_size() {
        let piece = &standard_set()[9];
        for flipped in [false, true] {
            for rotations in 0..4 {
                let oriented = piece.oriented(rotations, flipped);
                assert_eq!(oriented.id(), piece.id());
                assert_eq!(oriented.size(), piece.size());
            }
        }
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        assert!(Piece::new(1, vec![]).is_err());
        assert!(Piece::new(1, vec![vec![]]).is_err());
        assert!(Piece::new(1, vec![vec![true], vec![true, true]]).is_err());
        assert!(Piece::new(1, vec![vec![false, false]]).is_err());
    }
}
