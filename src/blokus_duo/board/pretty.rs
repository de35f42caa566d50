use itertools::Itertools;

use crate::blokus_duo::prelude::*;

impl Board {
    /// The row-major snapshot string: one character per cell, `.` for empty.
    pub fn notate(&self) -> String {
        self.grid()
            .iter()
            .map(|cell| cell.map_or(".".into(), |p| p.notate()))
            .join("")
    }

    /// A human-readable rendering, one board row per line.
    pub fn pretty(&self) -> String {
        let flat = self.notate();
        (0..self.height())
            .map(|r| &flat[r * self.width()..(r + 1) * self.width()])
            .join("\n")
    }
}
