//! Arena events.
//!
//! Events are append-only. Off-system observers read them to follow
//! the lifecycle of every game and every movement of value.

use crate::crypto::Commitment;
use crate::games::Move;
use crate::protocol::{ActorId, Amount, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    GameCreated {
        commitment: Commitment,
        creator: ActorId,
        opponent: ActorId,
        bet: Amount,
        expiration: Timestamp,
    },
    OpponentMoved {
        commitment: Commitment,
        #[serde(rename = "move")]
        mv: Move,
        new_expiration: Timestamp,
    },
    Settled {
        commitment: Commitment,
        creator: ActorId,
        opponent: ActorId,
        creator_amount: Amount,
        opponent_amount: Amount,
    },
    Withdrawn {
        actor: ActorId,
        amount: Amount,
    },
    ClaimedAfterExpiration {
        commitment: Commitment,
        claimant: ActorId,
        amount: Amount,
    },
    /// The external payout for an already-debited amount did not complete.
    /// The amount is no longer tracked by either ledger.
    PayoutFailed {
        actor: ActorId,
        amount: Amount,
    },
    Paused {
        actor: ActorId,
    },
    Unpaused {
        actor: ActorId,
    },
    Killed {
        actor: ActorId,
    },
}

impl Event {
    /// Short name, used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::GameCreated { .. } => "game_created",
            Event::OpponentMoved { .. } => "opponent_moved",
            Event::Settled { .. } => "settled",
            Event::Withdrawn { .. } => "withdrawn",
            Event::ClaimedAfterExpiration { .. } => "claimed_after_expiration",
            Event::PayoutFailed { .. } => "payout_failed",
            Event::Paused { .. } => "paused",
            Event::Unpaused { .. } => "unpaused",
            Event::Killed { .. } => "killed",
        }
    }
}
