pub(crate) mod placement;
pub(crate) mod pretty;

use crate::blokus_duo::prelude::*;

/// A duo board: a rectangular grid of cell owners, one occupancy mask per
/// player, and the two fixed starting cells.
///
/// Cells never change owner once set; the only mutation is `place_piece`.
#[derive(Clone, Debug)]
pub struct Board {
    geometry: Geometry,
    cells: Vec<Option<Player>>,
    masks: [Mask; 2],
    starting: [Coord; 2],
}

impl Board {
    /// Returns a new empty board. The area must fit the mask backing (256
    /// cells) and both starting cells must be distinct, in-bounds cells.
    pub fn new(width: usize, height: usize, starting: [Coord; 2]) -> Result<Board> {
        let geometry = Geometry::new(width, height)?;
        for start in &starting {
            if !start.in_bounds(width, height) {
                return Err(anyhow!("starting cell {} is out of bounds for {width}x{height}", start.notate()));
            }
        }
        if starting[0] == starting[1] {
            return Err(anyhow!("starting cells must be distinct"));
        }
        Ok(Board {
            geometry,
            cells: vec![None; width * height],
            masks: [Mask::empty(); 2],
            starting,
        })
    }

    /// The standard duo setup: 14x14, starts at (4,4) and (9,9).
    pub fn duo() -> Board {
        let starting = DEFAULT_STARTS.map(|(row, col)| Coord::new(row, col));
        Board::new(DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE, starting)
            .expect("the default duo setup is valid")
    }

    /// The number of cells on the board.
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Determines the owner of the cell at the given coordinate, if any.
    pub fn cell(&self, coord: &Coord) -> Result<Option<Player>> {
        if coord.in_bounds(self.width(), self.height()) {
            Ok(self.cells[self.index(coord)])
        } else {
            Err(anyhow!("invalid coordinate ({:02}, {:02})", coord.row, coord.col))
        }
    }

    /// The coordinate of a linear cell index.
    pub fn coord(&self, index: usize) -> Coord {
        self.geometry.coord(index)
    }

    /// The number of empty cells remaining.
    pub fn empty_count(&self) -> usize {
        self.area() - self.occupied().len()
    }

    /// The mask of empty cells.
    pub fn empties(&self) -> Mask {
        !self.occupied() & self.geometry.full()
    }

    /// The shift geometry of this board, shared with the analyzers.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// A read-only view of the grid of cell owners, row-major.
    pub fn grid(&self) -> &[Option<Player>] {
        &self.cells
    }

    /// Whether the given player owns any cell yet.
    pub fn has_played(&self, player: Player) -> bool {
        !self.masks[player.index()].is_empty()
    }

    /// Board height in rows.
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    /// The linear index of a coordinate.
    pub fn index(&self, coord: &Coord) -> usize {
        self.geometry.index(coord)
    }

    /// The mask of cells owned by the given player.
    pub fn occupancy(&self, player: Player) -> Mask {
        self.masks[player.index()]
    }

    /// The mask of all owned cells.
    pub fn occupied(&self) -> Mask {
        self.masks[0] | self.masks[1]
    }

    /// The owner of the cell at a linear index.
    pub fn owner(&self, index: usize) -> Option<Player> {
        self.cells[index]
    }

    /// The fraction of the board already filled, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.occupied().len() as f64 / self.area() as f64
    }

    /// The designated first-move cell for the given player.
    pub fn starting_cell(&self, player: Player) -> Coord {
        self.starting[player.index()]
    }

    /// Board width in columns.
    pub fn width(&self) -> usize {
        self.geometry.width
    }
}
