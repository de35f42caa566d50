mod analysis;
mod evaluator;
mod regions;
mod weights;

use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::blokus_duo::prelude::*;

pub use analysis::{competition_score, connection_mask, distance_map, BoardAnalyzer, DistanceMap};
pub use evaluator::{evaluate_first_move, quadrant_diversity, MoveEvaluator};
pub use regions::{expansion_potential, find_empty_regions, Region};
pub use weights::Weights;

/// A scored candidate placement. Ephemeral: lives only inside a single
/// `choose_move` call and the return value.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub placement: Placement,
    pub score: f64,
}

/// How a seat picks its move: a human seat awaits external coordinates, an
/// AI seat runs the heuristic pipeline.
pub enum Decision {
    Human,
    Heuristic(HeuristicAgent),
}

impl Decision {
    /// Whether this seat decides for itself.
    pub fn is_ai(&self) -> bool {
        matches!(self, Decision::Heuristic(_))
    }

    /// Asks the seat for a move; `Ok(None)` means the seat must pass. Human
    /// seats cannot be asked, their moves arrive from outside.
    pub fn decide_move(&mut self, board: &Board, rack: &Rack, player: Player) -> Result<Option<Move>> {
        match self {
            Decision::Human => Err(anyhow!("seat {} is human; play a move instead", player.notate())),
            Decision::Heuristic(agent) => Ok(agent.choose_move(board, rack, player)),
        }
    }
}

/// The greedy one-ply move chooser. Each turn walks a staged pipeline —
/// opening move, defensive check, region-guided search, full-board scan,
/// minimal fallback — and returns the first stage that produces a move.
///
/// The only nondeterminism is deliberate tie-break sampling among the top few
/// scored candidates, drawn from an injected seedable RNG so games replay.
pub struct HeuristicAgent {
    weights: Weights,
    rng: Pcg64Mcg,
}

/// A region-search candidate before final scoring.
struct RegionCandidate {
    placement: Placement,
    footprint: Mask,
    piece_size: usize,
    region: Region,
    size_match: f64,
}

impl HeuristicAgent {
    /// An agent with default weights and the given tie-break seed.
    pub fn new(seed: u64) -> HeuristicAgent {
        HeuristicAgent::with_weights(Weights::default(), seed)
    }

    pub fn with_weights(weights: Weights, seed: u64) -> HeuristicAgent {
        HeuristicAgent { weights, rng: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Chooses a placement for `player`, or `None` if the turn must be passed.
    pub fn choose_move(&mut self, board: &Board, rack: &Rack, player: Player) -> Option<Move> {
        if !rack.can_place() {
            return None;
        }
        if !board.has_played(player) {
            let mv = self.opening_move(board, rack, player);
            log::debug!("{}: opening -> {:?}", player.notate(), mv.map(|m| m.placement.notate()));
            return mv;
        }

        let analyzer = BoardAnalyzer::new(board, player);
        let weights = self.weights;
        let evaluator = MoveEvaluator::new(board, &analyzer, &weights);
        let progress = board.progress();

        if let Some(mv) = self.defensive_move(board, rack, player, &analyzer, &evaluator, progress) {
            log::debug!("{}: defensive block -> {}", player.notate(), mv.placement.notate());
            return Some(mv);
        }
        if let Some(mv) = self.region_search(board, rack, player, &evaluator, progress) {
            log::debug!("{}: region search -> {}", player.notate(), mv.placement.notate());
            return Some(mv);
        }
        if let Some(mv) = self.full_scan(board, rack, player, &evaluator, progress) {
            log::debug!("{}: full scan -> {}", player.notate(), mv.placement.notate());
            return Some(mv);
        }
        let mv = self.fallback(board, rack, player);
        match &mv {
            Some(m) => log::debug!("{}: fallback -> {}", player.notate(), m.placement.notate()),
            None => log::debug!("{}: no legal move, passing", player.notate()),
        }
        mv
    }

    /// The 8 orientations of a piece, derived fresh from the inventory shape.
    fn orientations(piece: &Piece) -> Vec<(u8, bool, Piece)> {
        let mut all = Vec::with_capacity(8);
        for flipped in [false, true] {
            for rotations in 0..4 {
                all.push((rotations, flipped, piece.oriented(rotations, flipped)));
            }
        }
        all
    }

    /// Every anchor that drops some occupied cell of `oriented` onto `target`.
    fn anchors_covering(oriented: &Piece, target: &Coord) -> Vec<Coord> {
        oriented
            .cells()
            .filter_map(|offset| {
                let row = target.row.checked_sub(offset.rows as usize)?;
                let col = target.col.checked_sub(offset.cols as usize)?;
                Some(Coord::new(row, col))
            })
            .collect()
    }

    /// Sorts descending by score and samples uniformly among the top `k`.
    fn sample_top(&mut self, mut candidates: Vec<Move>, k: usize) -> Option<Move> {
        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let k = k.min(candidates.len());
        let pick = self.rng.random_range(0..k);
        Some(candidates[pick])
    }

    /// First placement of a side: prefer the pentominoes (sampling up to 3 of
    /// them for variety), fall back to the whole inventory by descending
    /// size, and require the starting cell to be covered.
    fn opening_move(&mut self, board: &Board, rack: &Rack, player: Player) -> Option<Move> {
        let start = board.starting_cell(player);

        let pentominoes: Vec<&Piece> = rack
            .available_pieces()
            .iter()
            .filter(|p| p.size() == 5)
            .collect();
        let sampled: Vec<&Piece> = if pentominoes.len() > 3 {
            pentominoes.iter().copied().choose_multiple(&mut self.rng, 3)
        } else {
            pentominoes
        };

        let mut candidates = self.opening_candidates(board, player, &start, &sampled);
        if candidates.is_empty() {
            let mut widened: Vec<&Piece> = rack.available_pieces().iter().collect();
            widened.sort_by(|a, b| b.size().cmp(&a.size()));
            candidates = self.opening_candidates(board, player, &start, &widened);
        }

        self.sample_top(candidates, 3)
    }

    fn opening_candidates(
        &mut self,
        board: &Board,
        player: Player,
        start: &Coord,
        pool: &[&Piece],
    ) -> Vec<Move> {
        let mut candidates = vec![];
        for piece in pool {
            for (rotations, flipped, oriented) in Self::orientations(piece) {
                for anchor in Self::anchors_covering(&oriented, start) {
                    if !board.is_valid_placement(&oriented, &anchor, player) {
                        continue;
                    }
                    let footprint = board
                        .footprint(&oriented, &anchor)
                        .expect("valid placements are in bounds");
                    let score =
                        evaluate_first_move(board, &self.weights, &footprint, oriented.size());
                    candidates.push(Move {
                        placement: Placement { piece_id: piece.id(), rotations, flipped, anchor },
                        score,
                    });
                }
            }
        }
        candidates
    }

    /// Looks for a placement that smothers the opponent's expansion anchors.
    /// Adopted only over a score threshold, and monominoes must clear a
    /// higher bar early so the smallest piece is not squandered.
    fn defensive_move(
        &mut self,
        board: &Board,
        rack: &Rack,
        player: Player,
        analyzer: &BoardAnalyzer,
        evaluator: &MoveEvaluator,
        progress: f64,
    ) -> Option<Move> {
        let connection_points = analyzer.connection_points();
        if connection_points.is_empty() {
            return None;
        }

        let mut best: Option<(Move, usize)> = None;
        let mut seen: HashSet<(u8, u8, bool, Coord)> = HashSet::new();

        for piece in rack.available_pieces() {
            for (rotations, flipped, oriented) in Self::orientations(piece) {
                for target in &connection_points {
                    for anchor in Self::anchors_covering(&oriented, target) {
                        if !seen.insert((piece.id(), rotations, flipped, anchor)) {
                            continue;
                        }
                        if !board.is_valid_placement(&oriented, &anchor, player) {
                            continue;
                        }
                        let footprint = board
                            .footprint(&oriented, &anchor)
                            .expect("valid placements are in bounds");
                        let score = evaluator.evaluate_defensive_move(&footprint);
                        if best.as_ref().is_none_or(|(b, _)| score > b.score) {
                            let placement =
                                Placement { piece_id: piece.id(), rotations, flipped, anchor };
                            best = Some((Move { placement, score }, oriented.size()));
                        }
                    }
                }
            }
        }

        let (mv, piece_size) = best?;
        if mv.score <= self.weights.defensive_threshold {
            return None;
        }
        if piece_size == 1 && progress < 0.5 && mv.score < self.weights.defensive_mono_threshold {
            return None; // keep the monomino for later
        }
        Some(mv)
    }

    /// Region-guided search: try pieces against the best empty rectangles,
    /// keep the 10 most promising fits, then score those fully.
    fn region_search(
        &mut self,
        board: &Board,
        rack: &Rack,
        player: Player,
        evaluator: &MoveEvaluator,
        progress: f64,
    ) -> Option<Move> {
        let regions = find_empty_regions(board, &self.weights);
        if regions.is_empty() {
            return None;
        }

        let mut pieces: Vec<&Piece> = rack.available_pieces().iter().collect();
        pieces.sort_by(|a, b| b.size().cmp(&a.size()));

        let mut candidates: Vec<RegionCandidate> = vec![];
        for region in &regions {
            for piece in &pieces {
                if self.skip_monomino(piece, region.area, progress) {
                    continue;
                }
                for (rotations, flipped, oriented) in Self::orientations(piece) {
                    if !region.fits(&oriented) {
                        continue;
                    }
                    if !board.is_valid_placement(&oriented, &region.anchor, player) {
                        continue;
                    }
                    let footprint = board
                        .footprint(&oriented, &region.anchor)
                        .expect("valid placements are in bounds");
                    candidates.push(RegionCandidate {
                        placement: Placement {
                            piece_id: piece.id(),
                            rotations,
                            flipped,
                            anchor: region.anchor,
                        },
                        footprint,
                        piece_size: oriented.size(),
                        region: *region,
                        size_match: oriented.size() as f64 / region.area as f64,
                    });
                }
            }
        }
        if candidates.is_empty() {
            return None;
        }

        // Tight fits matter most in small regions; raw size everywhere else.
        candidates.sort_by(|a, b| {
            let key = |c: &RegionCandidate| {
                if c.region.area <= 2 {
                    10.0 * c.size_match
                } else {
                    c.piece_size as f64
                }
            };
            key(b).partial_cmp(&key(a)).unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(10);

        let left_heavy = self.left_half_is_emptier(board);
        let scored: Vec<Move> = candidates
            .into_iter()
            .map(|c| {
                let mut score = evaluator.evaluate_move(&c.footprint, c.piece_size);
                score += (2.0 * c.region.potential).min(self.weights.search_expansion_cap)
                    + self.weights.search_expansion_flat;
                score += (c.piece_size as f64).log2() * self.weights.search_size_log_factor;
                if left_heavy && c.region.in_left_half(board.width()) {
                    score += self.weights.search_left_bonus;
                }
                score += self.fit_bonus(&c);
                if c.piece_size == 1 && progress < 0.7 {
                    score -= if c.region.area == 1 {
                        self.weights.search_mono_single_penalty
                    } else {
                        self.weights.search_mono_penalty
                    };
                }
                Move { placement: c.placement, score }
            })
            .collect();

        self.sample_top(scored, 2)
    }

    /// Near-perfect fits in small regions earn a large flat bonus; bigger
    /// regions earn a smaller bonus that scales with the fit ratio.
    fn fit_bonus(&self, candidate: &RegionCandidate) -> f64 {
        if candidate.region.area <= 6 {
            if candidate.size_match >= 0.9 {
                self.weights.search_fit_bonus
            } else {
                0.6 * self.weights.search_fit_bonus * candidate.size_match
            }
        } else {
            0.4 * self.weights.search_fit_bonus * candidate.size_match
        }
    }

    /// Monominoes are held back from regions they would waste until the late
    /// game, with a small random chance to try them anyway for variety.
    fn skip_monomino(&mut self, piece: &Piece, region_area: usize, progress: f64) -> bool {
        piece.size() == 1
            && region_area > 1
            && progress < 0.7
            && !self.rng.random_bool(self.weights.search_mono_retry_chance)
    }

    /// Whether the board's left half has markedly more empty cells than the right.
    fn left_half_is_emptier(&self, board: &Board) -> bool {
        let mid = board.width() / 2;
        let mut left = 0usize;
        let mut right = 0usize;
        for index in board.empties().iter() {
            if board.coord(index).col < mid {
                left += 1;
            } else {
                right += 1;
            }
        }
        right > 0 && left as f64 / right as f64 > self.weights.search_left_ratio
    }

    /// Exhaustive scan, entered only when the region search finds nothing:
    /// every piece, orientation, and anchor, scored like the region search
    /// minus the region-specific bonuses.
    fn full_scan(
        &mut self,
        board: &Board,
        rack: &Rack,
        player: Player,
        evaluator: &MoveEvaluator,
        progress: f64,
    ) -> Option<Move> {
        let mut pieces: Vec<&Piece> = rack.available_pieces().iter().collect();
        pieces.sort_by(|a, b| b.size().cmp(&a.size()));

        let left_heavy = self.left_half_is_emptier(board);
        let mid = board.width() / 2;
        let mut candidates = vec![];

        for piece in &pieces {
            if self.skip_monomino(piece, usize::MAX, progress) {
                continue;
            }
            for (rotations, flipped, oriented) in Self::orientations(piece) {
                for row in 0..board.height() {
                    for col in 0..board.width() {
                        let anchor = Coord::new(row, col);
                        if !board.is_valid_placement(&oriented, &anchor, player) {
                            continue;
                        }
                        let footprint = board
                            .footprint(&oriented, &anchor)
                            .expect("valid placements are in bounds");
                        let mut score = evaluator.evaluate_move(&footprint, oriented.size());
                        score += (oriented.size() as f64).log2()
                            * self.weights.search_size_log_factor;
                        if left_heavy && col < mid {
                            score += self.weights.search_left_bonus;
                        }
                        if oriented.size() == 1 && progress < 0.7 {
                            score -= self.weights.search_mono_penalty;
                        }
                        candidates.push(Move {
                            placement: Placement {
                                piece_id: piece.id(),
                                rotations,
                                flipped,
                                anchor,
                            },
                            score,
                        });
                    }
                }
            }
        }

        self.sample_top(candidates, 2)
    }

    /// Last resort: smallest piece first, first legal placement found, no
    /// scoring. This stage catching nothing means the turn is a pass.
    fn fallback(&mut self, board: &Board, rack: &Rack, player: Player) -> Option<Move> {
        let mut pieces: Vec<&Piece> = rack.available_pieces().iter().collect();
        pieces.sort_by_key(|p| p.size());

        for piece in pieces {
            for (rotations, flipped, oriented) in Self::orientations(piece) {
                for row in 0..board.height() {
                    for col in 0..board.width() {
                        let anchor = Coord::new(row, col);
                        if board.is_valid_placement(&oriented, &anchor, player) {
                            return Some(Move {
                                placement: Placement {
                                    piece_id: piece.id(),
                                    rotations,
                                    flipped,
                                    anchor,
                                },
                                score: 0.0,
                            });
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays the chosen move onto the board through the rack, like the game
    /// loop does.
    fn apply(board: &mut Board, rack: &mut Rack, player: Player, mv: &Move) {
        let piece = rack.take(mv.placement.piece_id).expect("chosen pieces are in hand");
        let oriented = piece.oriented(mv.placement.rotations, mv.placement.flipped);
        assert!(
            board.place_piece(&oriented, &mv.placement.anchor, player),
            "agent chose an illegal move {}",
            mv.placement.notate()
        );
    }

    #[test]
    fn the_opening_move_is_a_pentomino_on_the_starting_cell() {
        let board = Board::duo();
        let rack = Rack::new();
        let mut agent = HeuristicAgent::new(7);

        let mv = agent.choose_move(&board, &rack, Player::X).expect("an opening move exists");
        let piece = rack.piece(mv.placement.piece_id).unwrap();
        assert_eq!(piece.size(), 5);

        let oriented = piece.oriented(mv.placement.rotations, mv.placement.flipped);
        let footprint = board.footprint(&oriented, &mv.placement.anchor).unwrap();
        assert!(footprint.contains(board.index(&board.starting_cell(Player::X))));
    }

    #[test]
    fn a_fixed_seed_makes_the_choice_deterministic() {
        let mut board = Board::duo();
        let mut racks = [Rack::new(), Rack::new()];

        // Advance a few plies so the non-opening stages run too.
        let mut driver = HeuristicAgent::new(99);
        for (player, seat) in [(Player::X, 0), (Player::O, 1), (Player::X, 0), (Player::O, 1)] {
            let mv = driver.choose_move(&board, &racks[seat], player).unwrap();
            apply(&mut board, &mut racks[seat], player, &mv);
        }

        let mv_a = HeuristicAgent::new(42).choose_move(&board, &racks[0], Player::X).unwrap();
        let mv_b = HeuristicAgent::new(42).choose_move(&board, &racks[0], Player::X).unwrap();
        assert_eq!(mv_a.placement, mv_b.placement);
    }

    #[test]
    fn chosen_moves_are_always_legal_over_a_full_game() {
        let mut board = Board::duo();
        let mut racks = [Rack::new(), Rack::new()];
        let mut agents = [HeuristicAgent::new(1), HeuristicAgent::new(2)];

        let mut passes = 0;
        let mut turn = Player::X;
        let mut plies = 0;
        while passes < 2 && plies < 100 {
            let seat = turn.index();
            match agents[seat].choose_move(&board, &racks[seat], turn) {
                Some(mv) => {
                    passes = 0;
                    apply(&mut board, &mut racks[seat], turn, &mv);
                }
                None => passes += 1,
            }
            turn = -turn;
            plies += 1;
        }

        // Two consecutive passes end the game (the terminal rule); both
        // sides must have placed real material before that happened.
        assert_eq!(passes, 2);
        assert!(board.occupancy(Player::X).len() >= 5);
        assert!(board.occupancy(Player::O).len() >= 5);
    }

    #[test]
    fn an_empty_rack_passes() {
        let board = Board::duo();
        let mut rack = Rack::new();
        let ids: Vec<u8> = rack.available_pieces().iter().map(|p| p.id()).collect();
        for id in ids {
            rack.take(id);
        }

        let mut agent = HeuristicAgent::new(5);
        assert!(agent.choose_move(&board, &rack, Player::X).is_none());
    }

    #[test]
    fn the_defensive_stage_respects_the_monomino_guard() {
        // A rack holding only the monomino early in the game: even when a
        // block exists, a sub-threshold defensive score must not spend it.
        let mut board = Board::duo();
        let set = crate::blokus_duo::piece::standard_set();
        assert!(board.place_piece(&set[0], &Coord::new(4, 4), Player::X));
        assert!(board.place_piece(&set[0], &Coord::new(9, 9), Player::O));

        let mut rack = Rack::new();
        let ids: Vec<u8> = rack
            .available_pieces()
            .iter()
            .filter(|p| p.size() > 1)
            .map(|p| p.id())
            .collect();
        for id in ids {
            rack.take(id);
        }
        assert_eq!(rack.available_pieces().len(), 1);

        let analyzer = BoardAnalyzer::new(&board, Player::X);
        let weights = Weights::default();
        let evaluator = MoveEvaluator::new(&board, &analyzer, &weights);
        let mut agent = HeuristicAgent::new(3);
        let defensive =
            agent.defensive_move(&board, &rack, Player::X, &analyzer, &evaluator, board.progress());

        // A monomino covers at most one connection point: 25 plus heat stays
        // below both the 50 threshold and the early-game monomino bar.
        assert!(defensive.is_none());
    }

    #[test]
    fn human_seats_refuse_to_decide() {
        let board = Board::duo();
        let rack = Rack::new();
        let mut decision = Decision::Human;
        assert!(!decision.is_ai());
        assert!(decision.decide_move(&board, &rack, Player::X).is_err());

        let mut ai = Decision::Heuristic(HeuristicAgent::new(11));
        assert!(ai.is_ai());
        assert!(ai.decide_move(&board, &rack, Player::X).unwrap().is_some());
    }
}
