//! Game and balance ledgers.

mod balances;
mod games;

pub use balances::BalanceLedger;
pub use games::{Game, GameLedger};
