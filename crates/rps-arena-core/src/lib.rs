//! RPS Arena Core Library
//!
//! A two-party rock-paper-scissors wager settled by commit-reveal: the
//! creator commits to a hidden move, the opponent answers in the clear,
//! and the creator reveals to settle. Deadlines guarantee either party can
//! recover funds if the other walks away.

pub mod arena;
pub mod crypto;
pub mod error;
pub mod games;
pub mod gate;
pub mod ledger;
pub mod policy;
pub mod protocol;
pub mod transfer;

pub use arena::{Arena, ArenaConfig, Context, MoveCode};
pub use crypto::{Commitment, Password};
pub use error::{ArenaError, ErrorKind};
pub use games::{Move, Settlement};
pub use gate::AvailabilityGate;
pub use ledger::Game;
pub use policy::{Claim, GRACE_WINDOW_SECS, MAX_WINDOW_SECS};
pub use protocol::{ActorId, Amount, Event, GameResult, InstanceId, Role, Timestamp};
pub use transfer::{MockTransfer, TransferError, TransferId, ValueTransfer};
