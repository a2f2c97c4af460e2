//! External value transfer abstraction.

mod mock;
mod traits;

pub use mock::MockTransfer;
pub use traits::{TransferError, TransferId, ValueTransfer};
