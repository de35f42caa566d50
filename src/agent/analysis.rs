use std::collections::VecDeque;

use crate::blokus_duo::prelude::*;

/// Per-cell BFS hop distances from one player's material, travelling through
/// empty cells only. `None` means unreachable through empty space.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    cells: Vec<Option<u32>>,
}

impl DistanceMap {
    /// The distance at a linear cell index.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.cells[index]
    }
}

/// Multi-source BFS seeded from every cell the player owns: distance 0 at
/// owned cells, expanding 4-directionally through empty cells. An explicit
/// queue and a flat distance buffer keep the stack flat on larger boards.
pub fn distance_map(board: &Board, player: Player) -> DistanceMap {
    let mut cells: Vec<Option<u32>> = vec![None; board.area()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for index in board.occupancy(player).iter() {
        cells[index] = Some(0);
        queue.push_back(index);
    }

    while let Some(index) = queue.pop_front() {
        let here = cells[index].expect("queued cells have distances");
        let coord = board.coord(index);
        for offset in ORTHOGONAL_OFFSETS.iter() {
            let next = &coord + offset;
            if !next.in_bounds_signed(board.width(), board.height()) {
                continue;
            }
            let next_index = board.index(&next.coerce());
            if board.owner(next_index).is_some() || cells[next_index].is_some() {
                continue;
            }
            cells[next_index] = Some(here + 1);
            queue.push_back(next_index);
        }
    }

    DistanceMap { cells }
}

/// Scores how contested a cell is between the two players' distance maps.
/// Cells neither side can reach are worthless; cells only one side can reach
/// are nearly so; the reward peaks where the two distances are close.
pub fn competition_score(d_self: Option<u32>, d_opp: Option<u32>) -> f64 {
    match (d_self, d_opp) {
        (None, None) => 0.0,
        (None, Some(_)) | (Some(_), None) => 3.0,
        (Some(a), Some(b)) => match a.abs_diff(b) {
            0..=1 => 10.0,
            2..=3 => 8.0,
            4..=5 => 5.0,
            _ => 3.0,
        },
    }
}

/// The opponent's next legal anchor cells, approximated without placement
/// search: empty cells diagonally adjacent to opponent material that are not
/// edge-adjacent to any opponent cell. Mirrors the corner rule exactly.
pub fn connection_mask(board: &Board, opponent: Player) -> Mask {
    let opp = board.occupancy(opponent);
    let geometry = board.geometry();
    geometry.diag_spread(opp) & board.empties() & !geometry.ortho_spread(opp)
}

/// Per-turn analysis bundle for one side: both distance maps, the opponent's
/// connection points, and the defensive heat map.
pub struct BoardAnalyzer<'a> {
    board: &'a Board,
    d_self: DistanceMap,
    d_opp: DistanceMap,
    connections: Mask,
}

impl<'a> BoardAnalyzer<'a> {
    /// Analyzes the board from `player`'s perspective.
    pub fn new(board: &'a Board, player: Player) -> BoardAnalyzer<'a> {
        BoardAnalyzer {
            board,
            d_self: distance_map(board, player),
            d_opp: distance_map(board, -player),
            connections: connection_mask(board, -player),
        }
    }

    /// The competition score at a linear cell index.
    pub fn competition_at(&self, index: usize) -> f64 {
        competition_score(self.d_self.get(index), self.d_opp.get(index))
    }

    /// The mask of opponent connection points.
    pub fn connection_mask(&self) -> Mask {
        self.connections
    }

    /// The opponent connection points as coordinates.
    pub fn connection_points(&self) -> Vec<Coord> {
        self.connections.iter().map(|i| self.board.coord(i)).collect()
    }

    /// The defensive heat map over empty cells: connection points glow, the
    /// center glows, and locally open cells glow a little.
    pub fn heat_map(&self) -> Vec<f64> {
        let board = self.board;
        let (width, height) = (board.width(), board.height());
        let center = Coord::new(height / 2, width / 2);
        let half_span = (width.max(height) / 2) as f64;

        let mut heat = vec![0.0; board.area()];
        for index in board.empties().iter() {
            let coord = board.coord(index);
            let mut value = 0.0;
            if self.connections.contains(index) {
                value += 5.0;
            }
            let center_bonus = (half_span - coord.manhattan(&center) as f64) / 2.0;
            value += center_bonus.max(0.0);

            let open_neighbours = ORTHOGONAL_OFFSETS
                .iter()
                .chain(DIAGONAL_OFFSETS.iter())
                .filter(|offset| {
                    let next = &coord + *offset;
                    next.in_bounds_signed(width, height)
                        && board.owner(board.index(&next.coerce())).is_none()
                })
                .count();
            value += open_neighbours as f64 / 4.0;

            heat[index] = value;
        }
        heat
    }
}
