use regex::Regex;

use crate::utils::prelude::*;

use super::coords::Coord;

/// A fully specified placement: which inventory piece, in which orientation,
/// anchored where. The orientation is applied to the canonical shape as a
/// horizontal flip (if any) followed by clockwise quarter-turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub piece_id: u8,
    pub rotations: u8,
    pub flipped: bool,
    pub anchor: Coord,
}

impl Placement {
    /// The canonical notation, e.g. `P07R2F1@0409`.
    pub fn notate(&self) -> String {
        format!(
            "P{:02}R{}F{}@{}",
            self.piece_id,
            self.rotations,
            self.flipped as u8,
            self.anchor.notate()
        )
    }
}

/// A segment of the protocol stream that represents a move. If the move is a
/// pass, it contains no placement.
#[derive(Clone, Debug)]
pub struct MoveString {
    pub repr: String,
    pub placement: Option<Placement>,
}

impl std::str::FromStr for MoveString {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "pass" {
            return Ok(MoveString { repr: s.to_owned(), placement: None });
        }

        let pattern = Regex::new(
            "^[Pp](?<id>[0-9]{2})[Rr](?<rot>[0-3])[Ff](?<flip>[01])@(?<coord>[0-9]{4})$",
        )?;
        let Some(matches) = pattern.captures(s) else {
            return Err(anyhow!("could not parse movestring {s}"));
        };

        let piece_id = matches.name("id").unwrap().as_str().parse::<u8>()?;
        if !(1..=21).contains(&piece_id) {
            return Err(anyhow!("piece id {piece_id} is out of the inventory range 1..=21"));
        }
        let rotations = matches.name("rot").unwrap().as_str().parse::<u8>()?;
        let flipped = matches.name("flip").unwrap().as_str() == "1";
        let anchor = matches.name("coord").unwrap().as_str().parse::<Coord>()?;

        Ok(MoveString {
            repr: s.to_owned(),
            placement: Some(Placement { piece_id, rotations, flipped, anchor }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placements_survive_a_notation_round_trip() {
        let placement = Placement {
            piece_id: 7,
            rotations: 2,
            flipped: true,
            anchor: Coord::new(4, 9),
        };
        let repr = placement.notate();
        assert_eq!(repr, "P07R2F1@0409");

        let parsed = repr.parse::<MoveString>().unwrap();
        assert_eq!(parsed.placement, Some(placement));
    }

    #[test]
    fn pass_parses_to_no_placement() {
        let parsed = "pass".parse::<MoveString>().unwrap();
        assert!(parsed.placement.is_none());
    }

    #[test]
    fn malformed_movestrings_are_rejected() {
        for bad in ["", "P7R2F1@0409", "P07R4F1@0409", "P07R2F2@0409", "P22R0F0@0000", "P07R2F1@040"] {
            assert!(bad.parse::<MoveString>().is_err(), "{bad:?} should not parse");
        }
    }
}
