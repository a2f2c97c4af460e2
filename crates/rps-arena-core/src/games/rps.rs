//! Rock-Paper-Scissors moves and judging.

use crate::error::ArenaError;
use crate::protocol::GameResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A played move. "Unset" exists only on the wire (`0`) and never decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Wire encoding, also the byte hashed into a commitment
    pub fn to_byte(self) -> u8 {
        match self {
            Move::Rock => 1,
            Move::Paper => 2,
            Move::Scissors => 3,
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Scissors, Move::Paper)
                | (Move::Paper, Move::Rock)
        )
    }
}

impl TryFrom<u8> for Move {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            // 0 is Unset, anything else is unrecognized
            _ => Err(ArenaError::InvalidMove),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "rock"),
            Move::Paper => write!(f, "paper"),
            Move::Scissors => write!(f, "scissors"),
        }
    }
}

/// Judge a revealed creator move against the opponent's visible move
pub fn judge(creator: Move, opponent: Move) -> GameResult {
    if creator == opponent {
        GameResult::Draw
    } else if creator.beats(&opponent) {
        GameResult::CreatorWins
    } else {
        GameResult::OpponentWins
    }
}
