//! Application state management.

use chrono::{DateTime, Utc};
use rps_arena_core::{
    ActorId, Arena, ArenaConfig, ArenaError, AvailabilityGate, Context, Event, MockTransfer,
    Timestamp,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppStateInner>>,
    /// Stand-in for the external currency ledger
    transfer: MockTransfer,
}

struct AppStateInner {
    arena: Arena,
    gate: AvailabilityGate,
    /// Simulated current time (for expiration testing)
    current_time: Option<DateTime<Utc>>,
}

impl AppStateInner {
    fn now(&self) -> DateTime<Utc> {
        self.current_time.unwrap_or_else(Utc::now)
    }
}

/// Owner-only gate operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateAction {
    Pause,
    Unpause,
    Kill,
}

impl AppState {
    pub fn new(config: ArenaConfig, owner: ActorId) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppStateInner {
                arena: Arena::new(config),
                gate: AvailabilityGate::new(owner),
                current_time: None,
            })),
            transfer: MockTransfer::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppStateInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn transfer(&self) -> &MockTransfer {
        &self.transfer
    }

    /// Advance simulated time by seconds.
    ///
    /// The clock never moves backwards; `None` if `seconds` is negative or
    /// the result is out of range.
    pub fn advance_time(&self, seconds: i64) -> Option<DateTime<Utc>> {
        if seconds < 0 {
            return None;
        }
        let mut inner = self.lock();
        let step = chrono::Duration::try_seconds(seconds)?;
        let next = inner.now().checked_add_signed(step)?;
        inner.current_time = Some(next);
        Some(next)
    }

    /// Run an arena operation on behalf of `caller` at the current time
    pub fn call<T>(
        &self,
        caller: ActorId,
        op: impl FnOnce(&mut Arena, &Context<'_>) -> Result<T, ArenaError>,
    ) -> Result<T, ArenaError> {
        let mut inner = self.lock();
        let now = to_timestamp(inner.now());
        let AppStateInner { arena, gate, .. } = &mut *inner;
        let ctx = Context {
            caller,
            now,
            gate: &*gate,
            transfer: &self.transfer,
        };
        op(arena, &ctx)
    }

    /// Read-only access to the arena
    pub fn read<T>(&self, f: impl FnOnce(&Arena) -> T) -> T {
        f(&self.lock().arena)
    }

    pub fn gate(&self, caller: ActorId, action: GateAction) -> Result<Event, ArenaError> {
        let mut inner = self.lock();
        let event = match action {
            GateAction::Pause => inner.gate.pause(&caller)?,
            GateAction::Unpause => inner.gate.unpause(&caller)?,
            GateAction::Kill => inner.gate.kill(&caller)?,
        };
        inner.arena.record(event.clone());
        Ok(event)
    }

    /// (paused, killed)
    pub fn gate_status(&self) -> (bool, bool) {
        let inner = self.lock();
        (inner.gate.is_paused(), inner.gate.is_killed())
    }
}

pub fn to_timestamp(time: DateTime<Utc>) -> Timestamp {
    u64::try_from(time.timestamp()).unwrap_or(0)
}

pub fn from_timestamp(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::try_from(ts).ok()?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_time_advances() {
        let state = AppState::new(ArenaConfig::default(), ActorId::new());
        let before = Utc::now();
        let after = state.advance_time(3600).unwrap();
        assert!(after >= before + chrono::Duration::seconds(3600));
        assert_eq!(state.advance_time(0), Some(after));
    }

    #[test]
    fn test_out_of_range_ticks_leave_clock_alone() {
        let state = AppState::new(ArenaConfig::default(), ActorId::new());
        let now = state.advance_time(0).unwrap();

        assert_eq!(state.advance_time(-1), None);
        assert_eq!(state.advance_time(i64::MAX), None);
        assert_eq!(state.advance_time(0), Some(now));
    }

    #[test]
    fn test_gate_actions_are_recorded() {
        let owner = ActorId::new();
        let state = AppState::new(ArenaConfig::default(), owner);

        state.gate(owner, GateAction::Pause).unwrap();
        assert_eq!(state.gate_status(), (true, false));
        assert!(matches!(
            state.gate(ActorId::new(), GateAction::Unpause),
            Err(ArenaError::NotOwner)
        ));
        state.gate(owner, GateAction::Kill).unwrap();
        assert_eq!(state.gate_status(), (true, true));

        let names: Vec<_> = state.read(|a| a.events().iter().map(|e| e.name()).collect());
        assert_eq!(names, ["paused", "killed"]);
    }

    #[test]
    fn test_timestamp_conversion() {
        let ts = 1_700_000_000;
        assert_eq!(to_timestamp(from_timestamp(ts).unwrap()), ts);
    }
}
