/*
 *  The Blokus-duo game domain: pieces, racks, the board, and its legality rules.
 */

pub mod board;
pub mod consts;
pub mod coords;
pub mod mask;
pub mod notation;
pub mod piece;
pub mod player;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::Board,
        consts::*,
        coords::{self, *},
        mask::{Geometry, Mask},
        notation::{MoveString, Placement},
        piece::{standard_set, Piece},
        player::Rack,
    };
}
