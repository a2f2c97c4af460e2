//! Service configuration from the environment.

use rps_arena_core::{ActorId, ArenaConfig, InstanceId};
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub port: u16,
    /// Only actor allowed to pause, unpause and kill the arena
    pub owner: ActorId,
    pub instance_id: Option<InstanceId>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_or_warn::<u16>("PORT", lookup("PORT")).unwrap_or(DEFAULT_PORT);

        let owner = match parse_or_warn::<Uuid>("ARENA_OWNER", lookup("ARENA_OWNER")) {
            Some(uuid) => ActorId::from_uuid(uuid),
            None => {
                let owner = ActorId::new();
                info!("ARENA_OWNER not set, generated owner {}", owner);
                owner
            }
        };

        let instance_id = parse_or_warn::<Uuid>("ARENA_INSTANCE_ID", lookup("ARENA_INSTANCE_ID"))
            .map(InstanceId::from_uuid);

        Self {
            port,
            owner,
            instance_id,
        }
    }

    pub fn arena_config(&self) -> ArenaConfig {
        match self.instance_id {
            Some(instance_id) => ArenaConfig { instance_id },
            None => ArenaConfig::default(),
        }
    }
}

fn parse_or_warn<T: FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, value);
            None
        }
    }
}
