//! Mock value transfer for testing.

use super::traits::{TransferError, TransferId, ValueTransfer};
use crate::protocol::{ActorId, Amount};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Book {
    /// Map of actor -> spendable wallet balance
    wallets: HashMap<ActorId, Amount>,
    /// Value currently held by the arena
    custody: Amount,
    /// Actors whose wallets refuse incoming payouts
    rejecting: HashSet<ActorId>,
    /// Fail every payout regardless of recipient
    fail_payouts: bool,
}

/// In-memory wallet book standing in for the external ledger
#[derive(Clone, Default)]
pub struct MockTransfer {
    book: Arc<Mutex<Book>>,
}

impl MockTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    fn book(&self) -> MutexGuard<'_, Book> {
        // A poisoned book only means a test panicked mid-update; the data is still usable.
        self.book.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add spendable funds to an actor's wallet
    pub fn fund(&self, actor: &ActorId, amount: Amount) -> Amount {
        let mut book = self.book();
        let wallet = book.wallets.entry(*actor).or_insert(0);
        *wallet = wallet.saturating_add(amount);
        *wallet
    }

    pub fn wallet_balance(&self, actor: &ActorId) -> Amount {
        self.book().wallets.get(actor).copied().unwrap_or(0)
    }

    pub fn custody_balance(&self) -> Amount {
        self.book().custody
    }

    /// Make every payout fail until switched back
    pub fn fail_payouts(&self, fail: bool) {
        self.book().fail_payouts = fail;
    }

    /// Make payouts to one actor fail, like a recipient that cannot accept value
    pub fn reject_payouts_to(&self, actor: &ActorId) {
        self.book().rejecting.insert(*actor);
    }
}

impl ValueTransfer for MockTransfer {
    fn collect(&self, from: &ActorId, amount: Amount) -> Result<TransferId, TransferError> {
        let mut book = self.book();
        let available = book.wallets.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                actor: *from,
                available,
                requested: amount,
            });
        }
        let custody = book
            .custody
            .checked_add(amount)
            .ok_or_else(|| TransferError::Failed("custody overflow".to_string()))?;

        book.wallets.insert(*from, available - amount);
        book.custody = custody;
        Ok(TransferId::new())
    }

    fn pay_out(&self, to: &ActorId, amount: Amount) -> Result<TransferId, TransferError> {
        let mut book = self.book();
        if book.fail_payouts {
            return Err(TransferError::Failed("payouts disabled".to_string()));
        }
        if book.rejecting.contains(to) {
            return Err(TransferError::RecipientRejected(*to));
        }
        if book.custody < amount {
            return Err(TransferError::CustodyShortfall(amount));
        }

        book.custody -= amount;
        let wallet = book.wallets.entry(*to).or_insert(0);
        *wallet = wallet.saturating_add(amount);
        Ok(TransferId::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_moves_funds_into_custody() {
        let transfer = MockTransfer::new();
        let alice = ActorId::new();
        transfer.fund(&alice, 100);

        transfer.collect(&alice, 40).unwrap();

        assert_eq!(transfer.wallet_balance(&alice), 60);
        assert_eq!(transfer.custody_balance(), 40);
    }

    #[test]
    fn test_insufficient_funds() {
        let transfer = MockTransfer::new();
        let alice = ActorId::new();
        transfer.fund(&alice, 5);

        let result = transfer.collect(&alice, 10);
        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds {
                available: 5,
                requested: 10,
                ..
            })
        ));
        assert_eq!(transfer.wallet_balance(&alice), 5);
        assert_eq!(transfer.custody_balance(), 0);
    }

    #[test]
    fn test_pay_out_from_custody() {
        let transfer = MockTransfer::new();
        let alice = ActorId::new();
        let bob = ActorId::new();
        transfer.fund(&alice, 10);
        transfer.collect(&alice, 10).unwrap();

        transfer.pay_out(&bob, 10).unwrap();

        assert_eq!(transfer.wallet_balance(&bob), 10);
        assert_eq!(transfer.custody_balance(), 0);
        assert!(matches!(
            transfer.pay_out(&bob, 1),
            Err(TransferError::CustodyShortfall(1))
        ));
    }

    #[test]
    fn test_failing_payouts_leave_book_untouched() {
        let transfer = MockTransfer::new();
        let alice = ActorId::new();
        transfer.fund(&alice, 10);
        transfer.collect(&alice, 10).unwrap();

        transfer.reject_payouts_to(&alice);
        assert!(matches!(
            transfer.pay_out(&alice, 10),
            Err(TransferError::RecipientRejected(_))
        ));

        transfer.fail_payouts(true);
        assert!(transfer.pay_out(&ActorId::new(), 10).is_err());
        assert_eq!(transfer.custody_balance(), 10);
    }
}
