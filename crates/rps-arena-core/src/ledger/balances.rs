//! Balance ledger: withdrawable credit per actor.

use crate::error::ArenaError;
use crate::protocol::{ActorId, Amount};
use std::collections::HashMap;

#[derive(Default)]
pub struct BalanceLedger {
    balances: HashMap<ActorId, Amount>,
    total_credited: Amount,
    total_debited: Amount,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, actor: &ActorId) -> Amount {
        self.balances.get(actor).copied().unwrap_or(0)
    }

    /// Fails exactly when `credit` would, without touching any balance
    pub(crate) fn check_credit(&self, credits: &[(ActorId, Amount)]) -> Result<(), ArenaError> {
        self.stage(credits).map(|_| ())
    }

    /// Credit several actors at once. Either every credit applies or none does.
    pub(crate) fn credit(&mut self, credits: &[(ActorId, Amount)]) -> Result<(), ArenaError> {
        let (staged, total) = self.stage(credits)?;
        self.balances.extend(staged);
        self.total_credited = total;
        Ok(())
    }

    fn stage(
        &self,
        credits: &[(ActorId, Amount)],
    ) -> Result<(HashMap<ActorId, Amount>, Amount), ArenaError> {
        let mut staged: HashMap<ActorId, Amount> = HashMap::new();
        let mut total = self.total_credited;

        for (actor, amount) in credits {
            let current = match staged.get(actor) {
                Some(v) => *v,
                None => self.balance_of(actor),
            };
            let next = current
                .checked_add(*amount)
                .ok_or(ArenaError::ArithmeticOverflow)?;
            staged.insert(*actor, next);
            total = total
                .checked_add(*amount)
                .ok_or(ArenaError::ArithmeticOverflow)?;
        }
        Ok((staged, total))
    }

    /// Zero the actor's balance and return what it held
    pub(crate) fn take(&mut self, actor: &ActorId) -> Result<Amount, ArenaError> {
        let amount = self.balances.remove(actor).unwrap_or(0);
        if amount == 0 {
            return Err(ArenaError::NothingToWithdraw);
        }
        // Debits never exceed credits, so this cannot overflow.
        self.total_debited += amount;
        Ok(amount)
    }

    pub fn total_credited(&self) -> Amount {
        self.total_credited
    }

    pub fn total_debited(&self) -> Amount {
        self.total_debited
    }
}
