//! Arena error taxonomy.

use crate::transfer::TransferError;
use thiserror::Error;

/// Errors from arena operations.
///
/// Every error except `PayoutFailed` is raised before any state is touched.
#[derive(Debug, Error)]
pub enum ArenaError {
    // Validation
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Window must be between 1 and {max} seconds, got {got}")]
    InvalidWindow { got: u64, max: u64 },

    #[error("Bet must be positive")]
    NoStake,

    #[error("Move is unset or unrecognized")]
    InvalidMove,

    // State consistency
    #[error("Commitment already used by a live game")]
    AlreadyUsed,

    #[error("Game not found")]
    GameNotFound,

    #[error("Caller is not the named opponent")]
    WrongOpponent,

    #[error("Game already claimed")]
    AlreadyClaimed,

    #[error("Stake must equal the bet of {expected}, got {got}")]
    WrongStake { expected: u64, got: u64 },

    #[error("Game expired")]
    Expired,

    #[error("Opponent move already set")]
    MoveAlreadySet,

    #[error("Opponent has not moved")]
    OpponentHasNotMoved,

    #[error("Caller is not a participant of this game")]
    NotAParticipant,

    #[error("Game has not expired yet")]
    NotYetExpired,

    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    // Authentication
    #[error("Authentication failed")]
    AuthenticationFailed,

    // Availability
    #[error("Arena is paused")]
    Paused,

    #[error("Arena is not paused")]
    NotPaused,

    #[error("Arena has been killed")]
    Killed,

    #[error("Caller is not the owner")]
    NotOwner,

    // Arithmetic
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    // Transfers
    #[error("Stake transfer failed: {0}")]
    StakeTransferFailed(TransferError),

    #[error("Payout failed: {0}")]
    PayoutFailed(TransferError),
}

/// Coarse classification of an error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
    Authentication,
    Availability,
    Arithmetic,
    Payout,
}

impl ArenaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArenaError::InvalidArgument(_)
            | ArenaError::InvalidWindow { .. }
            | ArenaError::NoStake
            | ArenaError::InvalidMove => ErrorKind::Validation,
            ArenaError::AlreadyUsed
            | ArenaError::GameNotFound
            | ArenaError::WrongOpponent
            | ArenaError::AlreadyClaimed
            | ArenaError::WrongStake { .. }
            | ArenaError::Expired
            | ArenaError::MoveAlreadySet
            | ArenaError::OpponentHasNotMoved
            | ArenaError::NotAParticipant
            | ArenaError::NotYetExpired
            | ArenaError::NothingToWithdraw
            | ArenaError::StakeTransferFailed(_) => ErrorKind::State,
            ArenaError::AuthenticationFailed => ErrorKind::Authentication,
            ArenaError::Paused | ArenaError::NotPaused | ArenaError::Killed | ArenaError::NotOwner => {
                ErrorKind::Availability
            }
            ArenaError::ArithmeticOverflow => ErrorKind::Arithmetic,
            ArenaError::PayoutFailed(_) => ErrorKind::Payout,
        }
    }

    /// Fatal errors abort the operation after local bookkeeping may
    /// already have changed; callers must not retry them blindly.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Arithmetic | ErrorKind::Payout)
    }
}
