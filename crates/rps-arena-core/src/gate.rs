//! Availability gate: pause, unpause and kill switch.

use crate::error::ArenaError;
use crate::protocol::{ActorId, Event};
use serde::{Deserialize, Serialize};

/// Process-wide availability state. `killed` implies `paused` and is final.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityGate {
    owner: ActorId,
    paused: bool,
    killed: bool,
}

impl AvailabilityGate {
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            paused: false,
            killed: false,
        }
    }

    pub fn owner(&self) -> &ActorId {
        &self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// First check of every mutating arena operation
    pub fn ensure_running(&self) -> Result<(), ArenaError> {
        if self.paused {
            return Err(ArenaError::Paused);
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: &ActorId) -> Result<(), ArenaError> {
        if *caller != self.owner {
            return Err(ArenaError::NotOwner);
        }
        Ok(())
    }

    pub fn pause(&mut self, caller: &ActorId) -> Result<Event, ArenaError> {
        self.ensure_owner(caller)?;
        self.ensure_running()?;
        self.paused = true;
        Ok(Event::Paused { actor: *caller })
    }

    pub fn unpause(&mut self, caller: &ActorId) -> Result<Event, ArenaError> {
        self.ensure_owner(caller)?;
        if self.killed {
            return Err(ArenaError::Killed);
        }
        if !self.paused {
            return Err(ArenaError::NotPaused);
        }
        self.paused = false;
        Ok(Event::Unpaused { actor: *caller })
    }

    pub fn kill(&mut self, caller: &ActorId) -> Result<Event, ArenaError> {
        self.ensure_owner(caller)?;
        if self.killed {
            return Err(ArenaError::Killed);
        }
        self.paused = true;
        self.killed = true;
        Ok(Event::Killed { actor: *caller })
    }
}
