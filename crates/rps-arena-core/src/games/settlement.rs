//! Pot apportioning for a revealed game.

use super::rps::{judge, Move};
use crate::error::ArenaError;
use crate::protocol::{Amount, GameResult};

/// Amounts credited to each side of a settled game.
///
/// `creator_amount + opponent_amount` is always exactly twice the bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub result: GameResult,
    pub creator_amount: Amount,
    pub opponent_amount: Amount,
}

impl Settlement {
    /// Split the pot of a game where both sides staked `bet`
    pub fn compute(bet: Amount, creator: Move, opponent: Move) -> Result<Self, ArenaError> {
        let pot = pot_for(bet)?;
        let result = judge(creator, opponent);

        let (creator_amount, opponent_amount) = match result {
            GameResult::Draw => (bet, bet),
            GameResult::CreatorWins => (pot, 0),
            GameResult::OpponentWins => (0, pot),
        };

        Ok(Self {
            result,
            creator_amount,
            opponent_amount,
        })
    }

    pub fn total(&self) -> Amount {
        // Cannot overflow: both halves come from a checked pot.
        self.creator_amount + self.opponent_amount
    }
}

/// Both stakes together
pub fn pot_for(bet: Amount) -> Result<Amount, ArenaError> {
    bet.checked_mul(2).ok_or(ArenaError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_win_takes_pot() {
        let s = Settlement::compute(1, Move::Rock, Move::Scissors).unwrap();
        assert_eq!(s.result, GameResult::CreatorWins);
        assert_eq!((s.creator_amount, s.opponent_amount), (2, 0));
    }

    #[test]
    fn test_opponent_win_takes_pot() {
        let s = Settlement::compute(5, Move::Rock, Move::Paper).unwrap();
        assert_eq!(s.result, GameResult::OpponentWins);
        assert_eq!((s.creator_amount, s.opponent_amount), (0, 10));
    }

    #[test]
    fn test_draw_returns_stakes() {
        let s = Settlement::compute(3, Move::Paper, Move::Paper).unwrap();
        assert_eq!(s.result, GameResult::Draw);
        assert_eq!((s.creator_amount, s.opponent_amount), (3, 3));
    }

    #[test]
    fn test_value_is_conserved_for_every_pair() {
        for a in Move::ALL {
            for b in Move::ALL {
                let s = Settlement::compute(21, a, b).unwrap();
                assert_eq!(s.total(), 42);
            }
        }
    }

    #[test]
    fn test_pot_overflow_is_rejected() {
        let err = Settlement::compute(u64::MAX, Move::Rock, Move::Rock).unwrap_err();
        assert!(matches!(err, ArenaError::ArithmeticOverflow));
        assert_eq!(pot_for(u64::MAX / 2).unwrap(), u64::MAX - 1);
    }
}
