use crate::blokus_duo::prelude::*;

use super::analysis::BoardAnalyzer;
use super::weights::Weights;

/// Counts the diagonal quadrants (top-left, top-right, bottom-left,
/// bottom-right) that still offer this placement a future corner anchor: a
/// quadrant is open if some occupied cell has a diagonal step into it landing
/// on an empty, in-bounds cell that is not edge-adjacent to the placement.
pub fn quadrant_diversity(board: &Board, footprint: &Mask) -> usize {
    let (width, height) = (board.width(), board.height());
    let blocked = board.geometry().ortho_spread(*footprint);

    DIAGONAL_OFFSETS
        .iter()
        .filter(|offset| {
            footprint.iter().any(|index| {
                let target = &board.coord(index) + *offset;
                if !target.in_bounds_signed(width, height) {
                    return false;
                }
                let target_index = board.index(&target.coerce());
                board.owner(target_index).is_none()
                    && !footprint.contains(target_index)
                    && !blocked.contains(target_index)
            })
        })
        .count()
}

/// Scores the very first placement of a side: sit near the center, spend a
/// big piece, and keep as many expansion quadrants open as possible.
pub fn evaluate_first_move(
    board: &Board,
    weights: &Weights,
    footprint: &Mask,
    piece_size: usize,
) -> f64 {
    let center = Coord::new(board.height() / 2, board.width() / 2);
    let closest = footprint
        .iter()
        .map(|index| board.coord(index).manhattan(&center))
        .min()
        .unwrap_or(0);
    let center_bonus = (weights.first_center_max - 2.0 * closest as f64).max(0.0);

    center_bonus
        + piece_size as f64 * weights.first_size_factor
        + quadrant_diversity(board, footprint) as f64 * weights.first_diversity_factor
}

/// Scores candidate placements against the per-turn analysis bundle.
pub struct MoveEvaluator<'a> {
    board: &'a Board,
    analyzer: &'a BoardAnalyzer<'a>,
    weights: &'a Weights,
    progress: f64,
    heat: Vec<f64>,
}

impl<'a> MoveEvaluator<'a> {
    pub fn new(
        board: &'a Board,
        analyzer: &'a BoardAnalyzer<'a>,
        weights: &'a Weights,
    ) -> MoveEvaluator<'a> {
        MoveEvaluator {
            board,
            analyzer,
            weights,
            progress: board.progress(),
            heat: analyzer.heat_map(),
        }
    }

    /// Whether the placement occupies at least one opponent connection point.
    pub fn can_block_opponent_connections(&self, footprint: &Mask) -> bool {
        footprint.intersects(&self.analyzer.connection_mask())
    }

    /// Defensive score: heavily reward occupied connection points, plus the
    /// heat of every covered cell.
    pub fn evaluate_defensive_move(&self, footprint: &Mask) -> f64 {
        let blocked = (*footprint & self.analyzer.connection_mask()).len();
        let heat: f64 = footprint.iter().map(|index| self.heat[index]).sum();
        self.weights.defensive_block_factor * blocked as f64 + heat
    }

    /// The main positional score for a placement, shifting emphasis from
    /// contesting the frontier early towards raw material late.
    pub fn evaluate_move(&self, footprint: &Mask, piece_size: usize) -> f64 {
        let w = self.weights;
        let cells: Vec<usize> = footprint.iter().collect();
        let mut score = piece_size as f64 * w.size_factor;

        let competition: Vec<f64> = cells
            .iter()
            .map(|&index| self.analyzer.competition_at(index))
            .collect();
        let average = competition.iter().sum::<f64>() / competition.len() as f64;
        let competition_weight = match self.progress {
            p if p < 0.4 => w.competition_weights[0],
            p if p < 0.7 => w.competition_weights[1],
            _ => w.competition_weights[2],
        };
        score += average * competition_weight;

        let contested = competition.iter().filter(|&&c| c >= 8.0).count();
        if contested as f64 > 0.6 * cells.len() as f64 {
            score += w.contested_bonus;
        }

        // Don't squander the monomino on dead cells; do spend it on hot ones.
        if piece_size == 1 {
            if average < 5.0 {
                score -= w.mono_low_penalty;
            } else if average >= 8.0 {
                score += w.mono_high_bonus;
            }
        }

        let diversity_weight = if self.progress < 0.5 {
            w.diversity_weights[0]
        } else {
            w.diversity_weights[1]
        };
        score += quadrant_diversity(self.board, footprint) as f64 * diversity_weight;

        if self.progress < 0.3 {
            score -= self.edge_penalty(&cells);
        }

        let blocked = (*footprint & self.analyzer.connection_mask()).len();
        score += w.block_bonus * blocked as f64;

        score
    }

    /// Up to `edge_penalty_max` for hugging the border: full penalty on the
    /// border itself, half one cell off, nothing further in.
    fn edge_penalty(&self, cells: &[usize]) -> f64 {
        let (width, height) = (self.board.width(), self.board.height());
        let edge_distance = cells
            .iter()
            .map(|&index| {
                let Coord { row, col } = self.board.coord(index);
                row.min(col).min(height - 1 - row).min(width - 1 - col)
            })
            .min()
            .unwrap_or(usize::MAX);
        match edge_distance {
            0 => self.weights.edge_penalty_max,
            1 => self.weights.edge_penalty_max / 2.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blokus_duo::piece::standard_set;

    fn monomino() -> Piece {
        standard_set().into_iter().next().unwrap()
    }

    fn footprint_at(board: &Board, piece: &Piece, anchor: Coord) -> Mask {
        board.footprint(piece, &anchor).unwrap()
    }

    #[test]
    fn a_lone_interior_cell_opens_all_four_quadrants() {
        let board = Board::duo();
        let footprint = footprint_at(&board, &monomino(), Coord::new(7, 7));
        assert_eq!(quadrant_diversity(&board, &footprint), 4);
    }

    #[test]
    fn corners_and_occupied_quadrants_close_diversity() {
        let mut board = Board::duo();
        // A corner cell has one quadrant at most.
        let corner = footprint_at(&board, &monomino(), Coord::new(0, 0));
        assert_eq!(quadrant_diversity(&board, &corner), 1);

        // Fill the bottom-right diagonal of (7,7) and that quadrant closes.
        assert!(board.place_piece(&monomino(), &Coord::new(9, 9), Player::O));
        assert!(board.place_piece(&monomino(), &Coord::new(8, 8), Player::O));
        let footprint = footprint_at(&board, &monomino(), Coord::new(7, 7));
        assert_eq!(quadrant_diversity(&board, &footprint), 3);
    }

    #[test]
    fn first_moves_prefer_the_center_and_big_pieces() {
        let board = Board::duo();
        let weights = Weights::default();
        let set = standard_set();

        let central = footprint_at(&board, &set[10], Coord::new(7, 4));
        let remote = footprint_at(&board, &set[10], Coord::new(0, 4));
        assert!(
            evaluate_first_move(&board, &weights, &central, 5)
                > evaluate_first_move(&board, &weights, &remote, 5)
        );

        let small = footprint_at(&board, &set[0], Coord::new(7, 7));
        let big = footprint_at(&board, &set[18], Coord::new(6, 6));
        assert!(
            evaluate_first_move(&board, &weights, &big, 5)
                > evaluate_first_move(&board, &weights, &small, 1)
        );
    }

    #[test]
    fn defensive_scores_count_blocked_connection_points() {
        let mut board = Board::new(14, 14, [Coord::new(4, 4), Coord::new(9, 9)]).unwrap();
        assert!(board.place_piece(&monomino(), &Coord::new(9, 9), Player::O));

        let analyzer = BoardAnalyzer::new(&board, Player::X);
        let weights = Weights::default();
        let evaluator = MoveEvaluator::new(&board, &analyzer, &weights);

        let blocking = footprint_at(&board, &monomino(), Coord::new(8, 8));
        let idle = footprint_at(&board, &monomino(), Coord::new(0, 0));
        assert!(evaluator.can_block_opponent_connections(&blocking));
        assert!(!evaluator.can_block_opponent_connections(&idle));

        let diff = evaluator.evaluate_defensive_move(&blocking)
            - evaluator.evaluate_defensive_move(&idle);
        assert!(diff >= weights.defensive_block_factor);
    }

    #[test]
    fn blocking_placements_outscore_idle_ones() {
        let mut board = Board::new(14, 14, [Coord::new(4, 4), Coord::new(9, 9)]).unwrap();
        let set = standard_set();
        assert!(board.place_piece(&set[0], &Coord::new(4, 4), Player::X));
        assert!(board.place_piece(&set[0], &Coord::new(9, 9), Player::O));

        let analyzer = BoardAnalyzer::new(&board, Player::X);
        let weights = Weights::default();
        let evaluator = MoveEvaluator::new(&board, &analyzer, &weights);

        // Same piece, one placement covering O's connection point at (8,8).
        let blocking = footprint_at(&board, &set[1], Coord::new(8, 7));
        let idle = footprint_at(&board, &set[1], Coord::new(2, 2));
        assert!(
            evaluator.evaluate_move(&blocking, 2) > evaluator.evaluate_move(&idle, 2)
        );
    }

    #[test]
    fn the_edge_penalty_only_applies_early() {
        let mut board = Board::new(14, 14, [Coord::new(4, 4), Coord::new(9, 9)]).unwrap();
        let set = standard_set();
        assert!(board.place_piece(&set[0], &Coord::new(4, 4), Player::X));

        let analyzer = BoardAnalyzer::new(&board, Player::X);
        let weights = Weights::default();
        let evaluator = MoveEvaluator::new(&board, &analyzer, &weights);

        let hugging = footprint_at(&board, &set[2], Coord::new(0, 5));
        let interior = footprint_at(&board, &set[2], Coord::new(6, 5));
        let edge = evaluator.edge_penalty(&hugging.iter().collect::<Vec<_>>());
        let inner = evaluator.edge_penalty(&interior.iter().collect::<Vec<_>>());
        assert_eq!(edge, weights.edge_penalty_max);
        assert_eq!(inner, 0.0);
    }
}
