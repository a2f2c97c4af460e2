//! Value transfer trait definition.

use crate::protocol::{ActorId, Amount};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from value transfer operations
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Insufficient funds: {actor} has {available}, needs {requested}")]
    InsufficientFunds {
        actor: ActorId,
        available: Amount,
        requested: Amount,
    },

    #[error("Recipient cannot receive funds: {0}")]
    RecipientRejected(ActorId),

    #[error("Custody balance too low to pay {0}")]
    CustodyShortfall(Amount),

    #[error("Transfer failed: {0}")]
    Failed(String),
}

/// Transfer identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferId(Uuid);

impl TransferId {
    /// Create a new random transfer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

/// The external currency ledger the arena settles through.
///
/// Each call either fully succeeds or fully fails. Implementations can be:
/// - MockTransfer for testing and the demo service
/// - A real ledger client in production
///
/// Calls are synchronous: arena operations run to completion and never
/// suspend between a bookkeeping update and its transfer.
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` from the actor's account into arena custody
    fn collect(&self, from: &ActorId, amount: Amount) -> Result<TransferId, TransferError>;

    /// Pay `amount` out of arena custody to the actor
    fn pay_out(&self, to: &ActorId, amount: Amount) -> Result<TransferId, TransferError>;
}
