//! Request and response types for the arena API.

use rps_arena_core::{
    ActorId, Amount, ArenaError, Claim, Commitment, Game, GameResult, Move, Password, Role,
    Settlement, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::state::from_timestamp;

/// Accepts either a phrase of 1..=32 bytes or `0x` followed by 64 hex digits
pub fn parse_password(input: &str) -> Result<Password, ArenaError> {
    match input.strip_prefix("0x") {
        Some(digits) if digits.len() == 64 => {
            let mut bytes = [0u8; 32];
            hex::decode_to_slice(digits, &mut bytes)
                .map_err(|_| ArenaError::InvalidArgument("password is not valid hex"))?;
            Ok(Password::from_bytes(bytes))
        }
        _ => Password::from_phrase(input),
    }
}

fn rfc3339(ts: Timestamp) -> Option<String> {
    from_timestamp(ts).map(|t| t.to_rfc3339())
}

// ============ Commitments ============

#[derive(Deserialize)]
pub struct GenerateCommitmentRequest {
    pub opponent: ActorId,
    #[serde(rename = "move")]
    pub mv: u8,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct CommitmentResponse {
    pub commitment: Commitment,
}

// ============ Games ============

#[derive(Deserialize)]
pub struct CreateGameRequest {
    pub commitment: Commitment,
    pub opponent: ActorId,
    pub window_secs: u64,
    pub bet: Amount,
}

#[derive(Deserialize)]
pub struct JoinGameRequest {
    #[serde(rename = "move")]
    pub mv: u8,
    pub stake: Amount,
}

#[derive(Serialize)]
pub struct DeadlineResponse {
    pub commitment: Commitment,
    pub expiration: Timestamp,
    pub expires_at: Option<String>,
}

impl DeadlineResponse {
    pub fn new(commitment: Commitment, expiration: Timestamp) -> Self {
        Self {
            commitment,
            expiration,
            expires_at: rfc3339(expiration),
        }
    }
}

#[derive(Serialize)]
pub struct GameResponse {
    pub commitment: Commitment,
    pub creator: ActorId,
    pub opponent: ActorId,
    pub bet: Amount,
    pub expiration: Timestamp,
    pub expires_at: Option<String>,
    pub opponent_move: Option<Move>,
    pub live: bool,
}

impl GameResponse {
    pub fn new(commitment: Commitment, game: &Game) -> Self {
        Self {
            commitment,
            creator: game.creator,
            opponent: game.opponent,
            bet: game.bet,
            expiration: game.expiration,
            expires_at: rfc3339(game.expiration),
            opponent_move: game.opponent_move,
            live: game.is_live(),
        }
    }
}

#[derive(Deserialize)]
pub struct RevealRequest {
    pub opponent: ActorId,
    #[serde(rename = "move")]
    pub mv: u8,
    pub password: String,
}

#[derive(Serialize)]
pub struct SettlementResponse {
    pub result: GameResult,
    pub creator_amount: Amount,
    pub opponent_amount: Amount,
}

impl From<Settlement> for SettlementResponse {
    fn from(s: Settlement) -> Self {
        Self {
            result: s.result,
            creator_amount: s.creator_amount,
            opponent_amount: s.opponent_amount,
        }
    }
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub claimant: ActorId,
    pub role: Role,
    pub amount: Amount,
}

impl From<Claim> for ClaimResponse {
    fn from(c: Claim) -> Self {
        Self {
            claimant: c.claimant,
            role: c.role,
            amount: c.amount,
        }
    }
}

// ============ Balances & wallets ============

#[derive(Serialize)]
pub struct BalanceResponse {
    pub actor: ActorId,
    pub balance: Amount,
}

#[derive(Serialize)]
pub struct WithdrawResponse {
    pub amount: Amount,
}

#[derive(Deserialize)]
pub struct FundRequest {
    pub actor: ActorId,
    pub amount: Amount,
}

// ============ Policy, admin & system ============

#[derive(Serialize)]
pub struct PolicyResponse {
    pub instance_id: String,
    pub max_window_secs: u64,
    pub grace_window_secs: u64,
    pub paused: bool,
    pub killed: bool,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: i64,
}

#[derive(Serialize)]
pub struct TickResponse {
    pub now: String,
    pub timestamp: Timestamp,
}
