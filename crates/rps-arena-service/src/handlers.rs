//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rps_arena_core::{ActorId, ArenaError, Commitment, ErrorKind, Event};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::models::*;
use crate::state::{to_timestamp, AppState, GateAction};

// ============ Errors ============

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ArenaError> for AppError {
    fn from(err: ArenaError) -> Self {
        let status = match err {
            ArenaError::GameNotFound => StatusCode::NOT_FOUND,
            ArenaError::WrongOpponent | ArenaError::NotAParticipant | ArenaError::NotOwner => {
                StatusCode::FORBIDDEN
            }
            ArenaError::NotPaused => StatusCode::CONFLICT,
            _ => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::State => StatusCode::CONFLICT,
                ErrorKind::Authentication => StatusCode::FORBIDDEN,
                ErrorKind::Availability => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Arithmetic => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Payout => StatusCode::BAD_GATEWAY,
            },
        };
        if err.is_fatal() {
            warn!("Arena operation aborted: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, AppError>;

// ============ Helpers ============

fn caller_from(headers: &HeaderMap) -> Result<ActorId, AppError> {
    headers
        .get("X-Actor-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "Missing or invalid X-Actor-Id"))
}

fn parse_commitment(raw: &str) -> Result<Commitment, AppError> {
    raw.parse()
        .map_err(|_| AppError::new(StatusCode::BAD_REQUEST, "Invalid commitment"))
}

// ============ Router ============

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Commitments
        .route("/api/commitments", post(generate_commitment))
        // Games
        .route("/api/games", post(create_game).get(list_my_games))
        .route("/api/games/:commitment", get(get_game))
        .route("/api/games/:commitment/join", post(join_game))
        .route("/api/games/:commitment/claim", post(claim_game))
        .route("/api/reveal", post(reveal))
        // Balances
        .route("/api/balances/:actor", get(get_balance))
        .route("/api/withdraw", post(withdraw))
        // Policy & admin
        .route("/api/policy", get(get_policy))
        .route("/api/admin/pause", post(pause))
        .route("/api/admin/unpause", post(unpause))
        .route("/api/admin/kill", post(kill))
        .route("/api/events", get(list_events))
        // Simulated currency ledger
        .route("/api/wallets/fund", post(fund_wallet))
        .route("/api/wallets/:actor", get(get_wallet))
        // System
        .route("/api/system/tick", post(tick))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Commitment handlers ============

pub async fn generate_commitment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateCommitmentRequest>,
) -> ApiResult<CommitmentResponse> {
    let caller = caller_from(&headers)?;
    let password = parse_password(&req.password)?;
    let commitment =
        state.read(|arena| arena.generate_commitment(&caller, &req.opponent, req.mv, &password))?;
    Ok(Json(CommitmentResponse { commitment }))
}

// ============ Game handlers ============

pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateGameRequest>,
) -> ApiResult<DeadlineResponse> {
    let caller = caller_from(&headers)?;
    let expiration = state.call(caller, |arena, ctx| {
        arena.create(ctx, req.commitment, req.opponent, req.window_secs, req.bet)
    })?;
    Ok(Json(DeadlineResponse::new(req.commitment, expiration)))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(commitment): Path<String>,
) -> ApiResult<GameResponse> {
    let commitment = parse_commitment(&commitment)?;
    let game = state
        .read(|arena| arena.lookup(&commitment).cloned())
        .ok_or(ArenaError::GameNotFound)?;
    Ok(Json(GameResponse::new(commitment, &game)))
}

pub async fn list_my_games(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<GameResponse>> {
    let caller = caller_from(&headers)?;
    let games: Vec<GameResponse> = state.read(|arena| {
        arena
            .games_for(&caller)
            .iter()
            .map(|(commitment, game)| GameResponse::new(*commitment, game))
            .collect()
    });
    Ok(Json(games))
}

pub async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(commitment): Path<String>,
    Json(req): Json<JoinGameRequest>,
) -> ApiResult<DeadlineResponse> {
    let caller = caller_from(&headers)?;
    let commitment = parse_commitment(&commitment)?;
    let expiration = state.call(caller, |arena, ctx| {
        arena.join_with_move(ctx, &commitment, req.mv, req.stake)
    })?;
    Ok(Json(DeadlineResponse::new(commitment, expiration)))
}

pub async fn reveal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RevealRequest>,
) -> ApiResult<SettlementResponse> {
    let caller = caller_from(&headers)?;
    let password = parse_password(&req.password)?;
    let settlement = state.call(caller, |arena, ctx| {
        arena.reveal(ctx, &req.opponent, req.mv, &password)
    })?;
    Ok(Json(settlement.into()))
}

pub async fn claim_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(commitment): Path<String>,
) -> ApiResult<ClaimResponse> {
    let caller = caller_from(&headers)?;
    let commitment = parse_commitment(&commitment)?;
    let claim = state.call(caller, |arena, ctx| {
        arena.claim_after_expiration(ctx, &commitment)
    })?;
    Ok(Json(claim.into()))
}

// ============ Balance handlers ============

pub async fn get_balance(
    State(state): State<AppState>,
    Path(actor): Path<String>,
) -> ApiResult<BalanceResponse> {
    let actor: ActorId = actor
        .parse()
        .map_err(|_| AppError::new(StatusCode::BAD_REQUEST, "Invalid actor id"))?;
    let balance = state.read(|arena| arena.balance_of(&actor));
    Ok(Json(BalanceResponse { actor, balance }))
}

pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<WithdrawResponse> {
    let caller = caller_from(&headers)?;
    let amount = state.call(caller, |arena, ctx| arena.withdraw(ctx))?;
    Ok(Json(WithdrawResponse { amount }))
}

// ============ Policy & admin handlers ============

pub async fn get_policy(State(state): State<AppState>) -> Json<PolicyResponse> {
    let (paused, killed) = state.gate_status();
    let response = state.read(|arena| PolicyResponse {
        instance_id: arena.instance_id().to_string(),
        max_window_secs: arena.max_window_secs(),
        grace_window_secs: arena.grace_window_secs(),
        paused,
        killed,
    });
    Json(response)
}

async fn admin(state: AppState, headers: HeaderMap, action: GateAction) -> ApiResult<Event> {
    let caller = caller_from(&headers)?;
    let event = state.gate(caller, action)?;
    tracing::info!("Gate {:?} by {}", action, caller);
    Ok(Json(event))
}

pub async fn pause(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Event> {
    admin(state, headers, GateAction::Pause).await
}

pub async fn unpause(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Event> {
    admin(state, headers, GateAction::Unpause).await
}

pub async fn kill(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Event> {
    admin(state, headers, GateAction::Kill).await
}

pub async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.read(|arena| arena.events().to_vec()))
}

// ============ Wallet handlers ============

pub async fn fund_wallet(
    State(state): State<AppState>,
    Json(req): Json<FundRequest>,
) -> Json<BalanceResponse> {
    let balance = state.transfer().fund(&req.actor, req.amount);
    Json(BalanceResponse {
        actor: req.actor,
        balance,
    })
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(actor): Path<String>,
) -> ApiResult<BalanceResponse> {
    let actor: ActorId = actor
        .parse()
        .map_err(|_| AppError::new(StatusCode::BAD_REQUEST, "Invalid actor id"))?;
    let balance = state.transfer().wallet_balance(&actor);
    Ok(Json(BalanceResponse { actor, balance }))
}

// ============ System handlers ============

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> ApiResult<TickResponse> {
    let now = state.advance_time(req.seconds).ok_or_else(|| {
        AppError::new(
            StatusCode::BAD_REQUEST,
            "Tick must be non-negative and keep the clock in range",
        )
    })?;
    tracing::info!("Simulated clock advanced by {}s to {}", req.seconds, now);
    Ok(Json(TickResponse {
        now: now.to_rfc3339(),
        timestamp: to_timestamp(now),
    }))
}

pub async fn health() -> &'static str {
    "ok"
}
