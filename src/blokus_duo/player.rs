use super::piece::{standard_set, Piece};

/// One player's piece inventory: the pieces still in hand and the pieces
/// already on the board. Their union is always the full 21-piece set, and a
/// piece moves from `available` to `placed` exactly once, never back.
#[derive(Clone, Debug)]
pub struct Rack {
    available: Vec<Piece>,
    placed: Vec<Piece>,
}

impl Default for Rack {
    fn default() -> Self {
        Rack::new()
    }
}

impl Rack {
    /// A fresh rack holding the full canonical inventory.
    pub fn new() -> Rack {
        Rack { available: standard_set(), placed: vec![] }
    }

    /// The pieces still in hand, in inventory order.
    pub fn available_pieces(&self) -> &[Piece] {
        &self.available
    }

    /// Whether any piece remains to place.
    pub fn can_place(&self) -> bool {
        !self.available.is_empty()
    }

    /// Mutates the stored piece's orientation in place; `None` if the piece
    /// is not in hand.
    pub fn flip_piece(&mut self, id: u8) -> Option<&Piece> {
        let piece = self.available.iter_mut().find(|p| p.id() == id)?;
        piece.flip();
        Some(piece)
    }

    /// Looks up an in-hand piece by id.
    pub fn piece(&self, id: u8) -> Option<&Piece> {
        self.available.iter().find(|p| p.id() == id)
    }

    /// The pieces already on the board, in placement order.
    pub fn placed_pieces(&self) -> &[Piece] {
        &self.placed
    }

    /// Mutates the stored piece's orientation in place; `None` if the piece
    /// is not in hand.
    pub fn rotate_piece(&mut self, id: u8) -> Option<&Piece> {
        let piece = self.available.iter_mut().find(|p| p.id() == id)?;
        piece.rotate();
        Some(piece)
    }

    /// Standard duo scoring: the sum of sizes of the pieces still in hand.
    /// Lower is better.
    pub fn score(&self) -> usize {
        self.available.iter().map(Piece::size).sum()
    }

    /// Moves a piece from hand to placed, returning a copy of it; `None` if
    /// the piece is not in hand (never existed, or already placed).
    pub fn take(&mut self, id: u8) -> Option<Piece> {
        let at = self.available.iter().position(|p| p.id() == id)?;
        let piece = self.available.remove(at);
        self.placed.push(piece.clone());
        Some(piece)
    }
}
