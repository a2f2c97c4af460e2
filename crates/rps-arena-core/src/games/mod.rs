//! Game definitions and settlement.

mod rps;
mod settlement;

pub use rps::{judge, Move};
pub use settlement::{pot_for, Settlement};
