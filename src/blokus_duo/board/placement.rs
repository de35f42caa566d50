use crate::blokus_duo::prelude::*;

impl Board {
    /// The mask of cells a piece would occupy anchored at `anchor` (its
    /// top-left corner), or `None` if any occupied cell falls out of bounds.
    pub fn footprint(&self, piece: &Piece, anchor: &Coord) -> Option<Mask> {
        let mut mask = Mask::empty();
        for offset in piece.cells() {
            let row = anchor.row + offset.rows as usize;
            let col = anchor.col + offset.cols as usize;
            if row >= self.height() || col >= self.width() {
                return None;
            }
            mask.insert(self.index(&Coord::new(row, col)));
        }
        Some(mask)
    }

    /// Checks placement legality, in order: bounds, occupancy, the
    /// no-edge-adjacency rule, and the corner-contact rule.
    ///
    /// A player's very first placement replaces the last two rules with a
    /// single one: the piece must cover that player's starting cell.
    ///
    /// Illegal placements are routine during search, so this never errors.
    pub fn is_valid_placement(&self, piece: &Piece, anchor: &Coord, player: Player) -> bool {
        let Some(footprint) = self.footprint(piece, anchor) else {
            return false;
        };
        if footprint.intersects(&self.occupied()) {
            return false;
        }

        let own = self.occupancy(player);
        if own.is_empty() {
            let start = self.starting_cell(player);
            return footprint.contains(self.index(&start));
        }

        if footprint.intersects(&self.geometry().ortho_spread(own)) {
            return false; // edge-adjacent to our own colour
        }
        footprint.intersects(&self.geometry().diag_spread(own))
    }

    /// Re-validates and then commits a placement, writing the player into
    /// every covered cell. Returns whether it succeeded; a failed placement
    /// leaves the board untouched.
    pub fn place_piece(&mut self, piece: &Piece, anchor: &Coord, player: Player) -> bool {
        if !self.is_valid_placement(piece, anchor, player) {
            return false;
        }
        let footprint = self
            .footprint(piece, anchor)
            .expect("validated placements are in bounds");
        for index in footprint.iter() {
            self.cells[index] = Some(player);
        }
        self.masks[player.index()] = self.masks[player.index()] | footprint;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::blokus_duo::prelude::*;
    use crate::blokus_duo::piece::standard_set;

    fn monomino() -> Piece {
        standard_set().into_iter().next().unwrap()
    }

    fn domino() -> Piece {
        standard_set().into_iter().nth(1).unwrap()
    }

    #[test]
    fn first_move_must_cover_the_starting_cell() {
        let board = Board::duo();
        let piece = domino();

        // Scenario A: every anchor that misses (4,4) is invalid for X.
        for row in 0..board.height() {
            for col in 0..board.width() {
                let anchor = Coord::new(row, col);
                let covers_start = (row == 4 && col == 4) || (row == 4 && col == 3);
                assert_eq!(
                    board.is_valid_placement(&piece, &anchor, Player::X),
                    covers_start,
                    "anchor ({row},{col})"
                );
            }
        }
    }

    #[test]
    fn corner_contact_is_required_and_edge_contact_forbidden() {
        // Scenario B: a lone X cell at (5,5).
        let mut board = Board::new(14, 14, [Coord::new(5, 5), Coord::new(9, 9)]).unwrap();
        assert!(board.place_piece(&monomino(), &Coord::new(5, 5), Player::X));

        // Edge-adjacent at (5,6): forbidden.
        assert!(!board.is_valid_placement(&monomino(), &Coord::new(5, 6), Player::X));
        // Diagonal at (6,6): legal.
        assert!(board.is_valid_placement(&monomino(), &Coord::new(6, 6), Player::X));
        // Detached at (8,8): no corner contact, illegal.
        assert!(!board.is_valid_placement(&monomino(), &Coord::new(8, 8), Player::X));
    }

    #[test]
    fn occupied_cells_reject_placement_and_stay_unchanged() {
        // Scenario C.
        let mut board = Board::duo();
        assert!(board.place_piece(&monomino(), &Coord::new(4, 4), Player::X));
        let before = board.grid().to_vec();

        assert!(!board.place_piece(&monomino(), &Coord::new(4, 4), Player::O));
        assert_eq!(board.grid(), &before[..]);
    }

    #[test]
    fn opponent_adjacency_is_allowed() {
        let mut board = Board::new(14, 14, [Coord::new(5, 5), Coord::new(9, 9)]).unwrap();
        assert!(board.place_piece(&monomino(), &Coord::new(5, 5), Player::X));
        assert!(board.place_piece(&monomino(), &Coord::new(9, 9), Player::O));

        assert!(board.place_piece(&monomino(), &Coord::new(8, 8), Player::O));
        assert!(board.place_piece(&monomino(), &Coord::new(7, 7), Player::O));

        // The domino at (6,6)-(6,7) touches O(7,7) by edge: the adjacency
        // rule only restricts a player's own colour, so this is legal for X.
        assert!(board.is_valid_placement(&domino(), &Coord::new(6, 6), Player::X));
        // The same domino is illegal for O, which owns (7,7).
        assert!(!board.is_valid_placement(&domino(), &Coord::new(6, 6), Player::O));
    }

    #[test]
    fn out_of_bounds_pieces_are_rejected() {
        let board = Board::duo();
        let piece = domino(); // 1x2, cannot anchor at the last column
        assert!(!board.is_valid_placement(&piece, &Coord::new(4, 13), Player::X));
        assert!(!board.is_valid_placement(&piece, &Coord::new(14, 0), Player::X));
    }

    #[test]
    fn placement_writes_every_covered_cell() {
        let mut board = Board::new(14, 14, [Coord::new(4, 4), Coord::new(9, 9)]).unwrap();
        let piece = domino();
        assert!(board.place_piece(&piece, &Coord::new(4, 4), Player::X));
        assert_eq!(board.cell(&Coord::new(4, 4)).unwrap(), Some(Player::X));
        assert_eq!(board.cell(&Coord::new(4, 5)).unwrap(), Some(Player::X));
        assert_eq!(board.occupancy(Player::X).len(), 2);
        assert_eq!(board.empty_count(), 14 * 14 - 2);
    }
}
