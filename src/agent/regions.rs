use crate::blokus_duo::prelude::*;

use super::weights::Weights;

/// A maximal empty rectangle found by the greedy row-major scan, plus its
/// expansion potential. Recomputed every AI turn; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub anchor: Coord,
    pub width: usize,
    pub height: usize,
    pub area: usize,
    pub potential: f64,
}

impl Region {
    /// Whether a piece's bounding box fits inside the rectangle.
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.rows() <= self.height && piece.cols() <= self.width
    }

    /// Whether the rectangle's center column lies in the board's left half.
    pub fn in_left_half(&self, board_width: usize) -> bool {
        self.anchor.col + self.width / 2 < board_width / 2
    }

    /// The sort key: area plus weighted potential plus a stepped large-area bonus.
    fn sort_key(&self, weights: &Weights) -> f64 {
        let step = match self.area {
            area if area >= 25 => weights.region_area_steps[2],
            area if area >= 16 => weights.region_area_steps[1],
            area if area >= 9 => weights.region_area_steps[0],
            _ => 0.0,
        };
        self.area as f64 + weights.region_potential_weight * self.potential + step
    }
}

/// Partitions the empty space into non-overlapping rectangles with a single
/// greedy row-major pass: grow a maximal width first, then a maximal height,
/// mark everything covered as visited. Isolated single empty cells are
/// dropped; no piece larger than the monomino can use them.
///
/// The result is deterministic and sorted in the order the search visits
/// regions: best sort key first.
pub fn find_empty_regions(board: &Board, weights: &Weights) -> Vec<Region> {
    let (width, height) = (board.width(), board.height());
    let mut visited = Mask::empty();
    let mut regions = vec![];

    for row in 0..height {
        for col in 0..width {
            let index = board.index(&Coord::new(row, col));
            if visited.contains(index) || board.owner(index).is_some() {
                continue;
            }

            // Maximal width: scan right while the cells are empty and unclaimed.
            let mut region_width = 0;
            while col + region_width < width {
                let i = board.index(&Coord::new(row, col + region_width));
                if visited.contains(i) || board.owner(i).is_some() {
                    break;
                }
                region_width += 1;
            }

            // Maximal height: scan down while the full width-row stays empty.
            let mut region_height = 1;
            'rows: while row + region_height < height {
                for c in col..col + region_width {
                    let i = board.index(&Coord::new(row + region_height, c));
                    if visited.contains(i) || board.owner(i).is_some() {
                        break 'rows;
                    }
                }
                region_height += 1;
            }

            for r in row..row + region_height {
                for c in col..col + region_width {
                    visited.insert(board.index(&Coord::new(r, c)));
                }
            }

            let area = region_width * region_height;
            if area < 2 {
                continue;
            }
            let mut region = Region {
                anchor: Coord::new(row, col),
                width: region_width,
                height: region_height,
                area,
                potential: 0.0,
            };
            region.potential = expansion_potential(board, &region, weights);
            regions.push(region);
        }
    }

    regions.sort_by(|a, b| {
        b.sort_key(weights)
            .partial_cmp(&a.sort_key(weights))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    regions
}

/// How much room the rectangle has to grow: for each cardinal direction, the
/// run of empty cells beyond the edge summed across the edge's cells, plus a
/// flat bonus for interior rectangles (at least 2 cells off every board
/// edge), plus an area-proportional bonus for left-half regions.
pub fn expansion_potential(board: &Board, region: &Region, weights: &Weights) -> f64 {
    let (width, height) = (board.width(), board.height());
    let Coord { row, col } = region.anchor;
    let is_empty = |r: usize, c: usize| board.owner(board.index(&Coord::new(r, c))).is_none();

    let mut reach = 0usize;

    // Up and down: one run per column of the rectangle.
    for c in col..col + region.width {
        let mut r = row;
        while r > 0 && is_empty(r - 1, c) {
            reach += 1;
            r -= 1;
        }
        let mut r = row + region.height;
        while r < height && is_empty(r, c) {
            reach += 1;
            r += 1;
        }
    }

    // Left and right: one run per row of the rectangle.
    for r in row..row + region.height {
        let mut c = col;
        while c > 0 && is_empty(r, c - 1) {
            reach += 1;
            c -= 1;
        }
        let mut c = col + region.width;
        while c < width && is_empty(r, c) {
            reach += 1;
            c += 1;
        }
    }

    let mut potential = reach as f64;
    let interior = row >= 2
        && col >= 2
        && row + region.height + 2 <= height
        && col + region.width + 2 <= width;
    if interior {
        potential += weights.region_interior_bonus;
    }
    if region.in_left_half(width) {
        potential += weights.region_left_area_factor * region.area as f64;
    }
    potential
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blokus_duo::piece::standard_set;

    fn weights() -> Weights {
        Weights::default()
    }

    #[test]
    fn an_empty_board_is_one_region() {
        let board = Board::duo();
        let regions = find_empty_regions(&board, &weights());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].anchor, Coord::new(0, 0));
        assert_eq!(regions[0].area, 14 * 14);
    }

    #[test]
    fn regions_partition_the_empty_space() {
        let mut board = Board::duo();
        let set = standard_set();
        assert!(board.place_piece(&set[10], &Coord::new(4, 4), Player::X)); // I pentomino across row 4

        let regions = find_empty_regions(&board, &weights());
        let mut covered = Mask::empty();
        let mut total = 0;
        for region in &regions {
            for r in region.anchor.row..region.anchor.row + region.height {
                for c in region.anchor.col..region.anchor.col + region.width {
                    let index = board.index(&Coord::new(r, c));
                    assert!(!covered.contains(index), "regions overlap at ({r},{c})");
                    assert!(board.owner(index).is_none(), "region covers an owned cell");
                    covered.insert(index);
                    total += 1;
                }
            }
            assert!(region.area >= 2);
        }
        // The I pentomino cannot strand single cells on an open board, so the
        // rectangles cover the empty space exactly.
        assert_eq!(total, board.empty_count());
    }

    #[test]
    fn the_scan_is_idempotent() {
        let mut board = Board::duo();
        let set = standard_set();
        assert!(board.place_piece(&set[16], &Coord::new(4, 4), Player::X));

        let first = find_empty_regions(&board, &weights());
        let second = find_empty_regions(&board, &weights());
        assert_eq!(first, second);
    }

    #[test]
    fn single_cell_holes_are_dropped() {
        // Wall off (0,0) with owned cells at (0,1) and (1,0)..(1,3) etc. by
        // building a small board by hand.
        let mut board = Board::new(4, 4, [Coord::new(0, 1), Coord::new(3, 3)]).unwrap();
        let set = standard_set();
        // Tromino I across (0,1)..(0,3) covers X's start.
        assert!(board.place_piece(&set[2], &Coord::new(0, 1), Player::X));
        // Vertical tromino I down (1,0)..(3,0): corner contact at (0,1), no edge contact.
        assert!(board.place_piece(&set[2].oriented(1, false), &Coord::new(1, 0), Player::X));

        // (0,0) is now isolated: no region may contain it.
        let regions = find_empty_regions(&board, &weights());
        for region in &regions {
            assert!(
                !(region.anchor == Coord::new(0, 0)),
                "isolated cell leaked into {region:?}"
            );
        }
    }
}
