//! Commitment and Password for the commit-reveal scheme.

use crate::error::ArenaError;
use crate::games::Move;
use crate::protocol::{ActorId, InstanceId};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const DOMAIN_TAG: &[u8] = b"rps-arena/commitment/v1";

/// Secret that keeps the creator's move hidden until reveal
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Password([u8; 32]);

impl Password {
    /// Create a new random password
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Right-pad a short phrase (1..=32 bytes) with zeros
    pub fn from_phrase(phrase: &str) -> Result<Self, ArenaError> {
        let raw = phrase.as_bytes();
        if raw.is_empty() {
            return Err(ArenaError::InvalidArgument("password is empty"));
        }
        if raw.len() > 32 {
            return Err(ArenaError::InvalidArgument("password longer than 32 bytes"));
        }
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(..)")
    }
}

/// Commitment = H(tag || instance || creator || opponent || move || password)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Derive the commitment of `creator` to `mv` against `opponent`.
    ///
    /// Pure: the same inputs in the same instance always give the same
    /// commitment, and a different instance gives a different one.
    pub fn generate(
        instance: &InstanceId,
        creator: &ActorId,
        opponent: &ActorId,
        mv: Move,
        password: &Password,
    ) -> Result<Self, ArenaError> {
        if creator.is_null() {
            return Err(ArenaError::InvalidArgument("creator is the null identity"));
        }
        if opponent.is_null() {
            return Err(ArenaError::InvalidArgument("opponent is the null identity"));
        }
        if password.is_zero() {
            return Err(ArenaError::InvalidArgument("password is zero"));
        }

        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        hasher.update(instance.as_bytes());
        hasher.update(creator.as_bytes());
        hasher.update(opponent.as_bytes());
        hasher.update([mv.to_byte()]);
        hasher.update(password.as_bytes());
        Ok(Self(hasher.finalize().into()))
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl FromStr for Commitment {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
