//! Deadlines and expiration claims.

use crate::error::ArenaError;
use crate::games::pot_for;
use crate::ledger::Game;
use crate::protocol::{ActorId, Amount, Role, Timestamp};

const DAY_SECS: u64 = 24 * 60 * 60;

/// Upper bound on the window a creator may give an opponent
pub const MAX_WINDOW_SECS: u64 = 7 * DAY_SECS;

/// Deadline extension applied when the opponent moves. It gives the
/// creator a predictable reveal window however late the opponent joined.
pub const GRACE_WINDOW_SECS: u64 = 60 * 60;

/// Deadline of a new game
pub fn creation_deadline(now: Timestamp, window_secs: u64) -> Result<Timestamp, ArenaError> {
    if window_secs == 0 || window_secs > MAX_WINDOW_SECS {
        return Err(ArenaError::InvalidWindow {
            got: window_secs,
            max: MAX_WINDOW_SECS,
        });
    }
    now.checked_add(window_secs)
        .ok_or(ArenaError::ArithmeticOverflow)
}

/// Deadline once the opponent has moved
pub fn extended_deadline(now: Timestamp) -> Result<Timestamp, ArenaError> {
    now.checked_add(GRACE_WINDOW_SECS)
        .ok_or(ArenaError::ArithmeticOverflow)
}

/// Outcome of a valid claim after expiration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    pub claimant: ActorId,
    pub role: Role,
    pub amount: Amount,
}

/// Decide whether `caller` may claim `game` at `now`, and for how much.
///
/// - The creator gets the stake back, but only if the opponent never moved.
/// - The opponent gets the whole pot, but only if they moved (and so staked)
///   and the creator never revealed.
pub fn adjudicate(game: &Game, caller: &ActorId, now: Timestamp) -> Result<Claim, ArenaError> {
    let role = game.role_of(caller).ok_or(ArenaError::NotAParticipant)?;
    if !game.is_live() {
        return Err(ArenaError::AlreadyClaimed);
    }
    if !game.is_expired(now) {
        return Err(ArenaError::NotYetExpired);
    }

    let amount = match role {
        Role::Creator => {
            if game.opponent_move.is_some() {
                return Err(ArenaError::MoveAlreadySet);
            }
            game.bet
        }
        Role::Opponent => {
            if game.opponent_move.is_none() {
                return Err(ArenaError::OpponentHasNotMoved);
            }
            pot_for(game.bet)?
        }
    };

    Ok(Claim {
        claimant: *caller,
        role,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::Move;

    fn game(opponent_move: Option<Move>) -> Game {
        Game {
            creator: ActorId::new(),
            opponent: ActorId::new(),
            bet: 10,
            expiration: 1_000,
            opponent_move,
        }
    }

    #[test]
    fn test_window_bounds() {
        assert!(matches!(
            creation_deadline(0, 0),
            Err(ArenaError::InvalidWindow { .. })
        ));
        assert!(matches!(
            creation_deadline(0, MAX_WINDOW_SECS + 1),
            Err(ArenaError::InvalidWindow { .. })
        ));
        assert_eq!(creation_deadline(5, 1).unwrap(), 6);
        assert_eq!(
            creation_deadline(5, MAX_WINDOW_SECS).unwrap(),
            5 + MAX_WINDOW_SECS
        );
    }

    #[test]
    fn test_grace_window_shorter_than_max() {
        assert!(GRACE_WINDOW_SECS < MAX_WINDOW_SECS);
        assert_eq!(extended_deadline(100).unwrap(), 100 + GRACE_WINDOW_SECS);
        assert!(extended_deadline(u64::MAX).is_err());
    }

    #[test]
    fn test_creator_reclaims_stake_when_opponent_absent() {
        let g = game(None);
        let claim = adjudicate(&g, &g.creator, 1_001).unwrap();
        assert_eq!(claim.role, Role::Creator);
        assert_eq!(claim.amount, 10);
    }

    #[test]
    fn test_creator_cannot_claim_after_opponent_moved() {
        let g = game(Some(Move::Rock));
        assert!(matches!(
            adjudicate(&g, &g.creator, 1_001),
            Err(ArenaError::MoveAlreadySet)
        ));
    }

    #[test]
    fn test_opponent_claims_pot() {
        let g = game(Some(Move::Paper));
        let claim = adjudicate(&g, &g.opponent, 1_001).unwrap();
        assert_eq!(claim.role, Role::Opponent);
        assert_eq!(claim.amount, 20);
    }

    #[test]
    fn test_absent_opponent_cannot_claim() {
        let g = game(None);
        assert!(matches!(
            adjudicate(&g, &g.opponent, 1_001),
            Err(ArenaError::OpponentHasNotMoved)
        ));
    }

    #[test]
    fn test_claim_requires_expiry_and_participation() {
        let g = game(None);
        // Deadline itself is still inside the window
        assert!(matches!(
            adjudicate(&g, &g.creator, 1_000),
            Err(ArenaError::NotYetExpired)
        ));
        assert!(matches!(
            adjudicate(&g, &ActorId::new(), 5_000),
            Err(ArenaError::NotAParticipant)
        ));

        let mut closed = game(None);
        closed.bet = 0;
        assert!(matches!(
            adjudicate(&closed, &closed.creator, 5_000),
            Err(ArenaError::AlreadyClaimed)
        ));
    }
}
