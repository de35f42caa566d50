use std::ops::Neg;
use crate::utils::prelude::*;

/// Default board for a duo game.
pub const DEFAULT_BOARD_SIZE: usize = 14;

/// Default starting cells for a 14x14 duo game, (row, col).
pub const DEFAULT_STARTS: [(usize, usize); 2] = [(4, 4), (9, 9)];

/// The number of pieces in one player's inventory.
pub const INVENTORY_SIZE: usize = 21;

// A cell typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    X = 0,
    O = 1,
}

impl Player {
    /// Gets both players in seat order.
    pub fn all() -> [Player; 2] {
        [Player::X, Player::O]
    }

    /// The player's slot in per-player arrays (masks, starting cells).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Notates the player.
    pub fn notate(&self) -> String {
        match self {
            Player::X => "X",
            Player::O => "O"
        }.into()
    }

    /// Parses into a player.
    pub fn parse(s: &str) -> Result<Option<Player>> {
        match s {
            "x" | "X" => Ok(Some(Player::X)),
            "o" | "O" => Ok(Some(Player::O)),
            "_" | "-" | "." => Ok(None),
            _               => Err(anyhow!("invalid notation {s} for player"))
        }
    }
}

impl Neg for Player {
    type Output = Player;
    fn neg(self) -> Self::Output {
        match self {
            Player::X => Player::O,
            Player::O => Player::X
        }
    }
}

impl From<u8> for Player {
    fn from(value: u8) -> Self {
        match value {
            0 => Player::X,
            1 => Player::O,
            _ => panic!("expected player index of 0-1, received {value}"),
        }
    }
}
