//! Protocol types and events.

mod events;
mod types;

pub use events::Event;
pub use types::{ActorId, Amount, GameResult, InstanceId, Role, Timestamp};
