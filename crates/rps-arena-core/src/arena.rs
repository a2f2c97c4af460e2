//! The arena state machine: create -> join -> reveal, with expiration claims.
//!
//! Every mutating operation takes a [`Context`] carrying the caller, the
//! current time and the injected capabilities (availability gate and value
//! transfer). Operations run to completion; all checks happen before any
//! state changes, and ledger updates always happen before a payout leaves
//! the arena.

use crate::crypto::{Commitment, Password};
use crate::error::ArenaError;
use crate::games::{pot_for, Move, Settlement};
use crate::gate::AvailabilityGate;
use crate::ledger::{BalanceLedger, Game, GameLedger};
use crate::policy::{self, Claim};
use crate::protocol::{ActorId, Amount, Event, InstanceId, Timestamp};
use crate::transfer::ValueTransfer;
use tracing::{debug, info, warn};

/// Per-call environment
pub struct Context<'a> {
    pub caller: ActorId,
    pub now: Timestamp,
    pub gate: &'a AvailabilityGate,
    pub transfer: &'a dyn ValueTransfer,
}

/// A move as it arrives on the wire: `0` is Unset, `1..=3` are moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveCode(pub u8);

impl MoveCode {
    pub fn decode(self) -> Result<Move, ArenaError> {
        Move::try_from(self.0)
    }
}

impl From<Move> for MoveCode {
    fn from(mv: Move) -> Self {
        Self(mv.to_byte())
    }
}

impl From<u8> for MoveCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArenaConfig {
    pub instance_id: InstanceId,
}

pub struct Arena {
    instance: InstanceId,
    games: GameLedger,
    balances: BalanceLedger,
    events: Vec<Event>,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            instance: config.instance_id,
            games: GameLedger::new(),
            balances: BalanceLedger::new(),
            events: Vec::new(),
        }
    }

    pub fn instance_id(&self) -> &InstanceId {
        &self.instance
    }

    pub fn max_window_secs(&self) -> u64 {
        policy::MAX_WINDOW_SECS
    }

    pub fn grace_window_secs(&self) -> u64 {
        policy::GRACE_WINDOW_SECS
    }

    /// Commitment of `caller` (as creator) to `mv` against `opponent`
    pub fn generate_commitment(
        &self,
        caller: &ActorId,
        opponent: &ActorId,
        mv: impl Into<MoveCode>,
        password: &Password,
    ) -> Result<Commitment, ArenaError> {
        let mv = mv
            .into()
            .decode()
            .map_err(|_| ArenaError::InvalidArgument("move is unset or unrecognized"))?;
        Commitment::generate(&self.instance, caller, opponent, mv, password)
    }

    /// Register a game under `commitment`, collecting the creator's stake
    pub fn create(
        &mut self,
        ctx: &Context<'_>,
        commitment: Commitment,
        opponent: ActorId,
        window_secs: u64,
        bet: Amount,
    ) -> Result<Timestamp, ArenaError> {
        ctx.gate.ensure_running()?;
        if commitment.is_zero() {
            return Err(ArenaError::InvalidArgument("commitment is zero"));
        }
        if opponent.is_null() {
            return Err(ArenaError::InvalidArgument("opponent is the null identity"));
        }
        let expiration = policy::creation_deadline(ctx.now, window_secs)?;
        if bet == 0 {
            return Err(ArenaError::NoStake);
        }
        // Every later payout is at most the pot; reject bets it cannot hold.
        pot_for(bet)?;
        self.games.ensure_available(&commitment)?;

        ctx.transfer
            .collect(&ctx.caller, bet)
            .map_err(ArenaError::StakeTransferFailed)?;

        self.games.insert(
            commitment,
            Game {
                creator: ctx.caller,
                opponent,
                bet,
                expiration,
                opponent_move: None,
            },
        )?;
        debug!(%commitment, creator = %ctx.caller, %opponent, bet, expiration, "game created");
        self.emit(Event::GameCreated {
            commitment,
            creator: ctx.caller,
            opponent,
            bet,
            expiration,
        });
        Ok(expiration)
    }

    /// The named opponent matches the bet and plays in the clear
    pub fn join_with_move(
        &mut self,
        ctx: &Context<'_>,
        commitment: &Commitment,
        mv: impl Into<MoveCode>,
        stake: Amount,
    ) -> Result<Timestamp, ArenaError> {
        ctx.gate.ensure_running()?;
        let mv = mv.into().decode()?;

        let game = self
            .games
            .lookup(commitment)
            .ok_or(ArenaError::GameNotFound)?;
        if ctx.caller != game.opponent {
            return Err(ArenaError::WrongOpponent);
        }
        if !game.is_live() {
            return Err(ArenaError::AlreadyClaimed);
        }
        if stake != game.bet {
            return Err(ArenaError::WrongStake {
                expected: game.bet,
                got: stake,
            });
        }
        if game.is_expired(ctx.now) {
            return Err(ArenaError::Expired);
        }
        if game.opponent_move.is_some() {
            return Err(ArenaError::MoveAlreadySet);
        }
        let new_expiration = policy::extended_deadline(ctx.now)?;

        ctx.transfer
            .collect(&ctx.caller, stake)
            .map_err(ArenaError::StakeTransferFailed)?;

        self.games.record_move(commitment, mv, new_expiration)?;
        debug!(%commitment, %mv, new_expiration, "opponent moved");
        self.emit(Event::OpponentMoved {
            commitment: *commitment,
            mv,
            new_expiration,
        });
        Ok(new_expiration)
    }

    /// The creator opens the commitment and settles the game.
    ///
    /// Authentication is the commitment itself: only the caller who can
    /// reproduce it finds the game.
    pub fn reveal(
        &mut self,
        ctx: &Context<'_>,
        opponent: &ActorId,
        mv: impl Into<MoveCode>,
        password: &Password,
    ) -> Result<Settlement, ArenaError> {
        ctx.gate.ensure_running()?;
        let mv = mv
            .into()
            .decode()
            .map_err(|_| ArenaError::InvalidArgument("move is unset or unrecognized"))?;
        let commitment = Commitment::generate(&self.instance, &ctx.caller, opponent, mv, password)?;

        let game = match self.games.lookup(&commitment) {
            Some(g) if g.creator == ctx.caller && g.opponent == *opponent => g,
            _ => return Err(ArenaError::AuthenticationFailed),
        };
        if game.is_expired(ctx.now) {
            return Err(ArenaError::Expired);
        }
        if !game.is_live() {
            return Err(ArenaError::AlreadyClaimed);
        }
        let opponent_move = game.opponent_move.ok_or(ArenaError::OpponentHasNotMoved)?;
        let settlement = Settlement::compute(game.bet, mv, opponent_move)?;

        let credits = [
            (ctx.caller, settlement.creator_amount),
            (*opponent, settlement.opponent_amount),
        ];
        // Both credits are validated together, before the bet is zeroed.
        self.balances.check_credit(&credits)?;
        self.games.zero(&commitment)?;
        self.balances.credit(&credits)?;

        info!(
            %commitment,
            result = %settlement.result,
            creator_amount = settlement.creator_amount,
            opponent_amount = settlement.opponent_amount,
            "game settled"
        );
        self.emit(Event::Settled {
            commitment,
            creator: ctx.caller,
            opponent: *opponent,
            creator_amount: settlement.creator_amount,
            opponent_amount: settlement.opponent_amount,
        });
        Ok(settlement)
    }

    /// Fallback settlement once the deadline has passed
    pub fn claim_after_expiration(
        &mut self,
        ctx: &Context<'_>,
        commitment: &Commitment,
    ) -> Result<Claim, ArenaError> {
        ctx.gate.ensure_running()?;
        let game = self
            .games
            .lookup(commitment)
            .ok_or(ArenaError::GameNotFound)?;
        let claim = policy::adjudicate(game, &ctx.caller, ctx.now)?;

        self.games.zero(commitment)?;
        info!(%commitment, claimant = %claim.claimant, role = %claim.role, amount = claim.amount, "claimed after expiration");
        self.emit(Event::ClaimedAfterExpiration {
            commitment: *commitment,
            claimant: claim.claimant,
            amount: claim.amount,
        });

        self.pay_out(ctx, claim.amount)?;
        Ok(claim)
    }

    /// Pay the caller's whole balance out of the arena
    pub fn withdraw(&mut self, ctx: &Context<'_>) -> Result<Amount, ArenaError> {
        ctx.gate.ensure_running()?;
        // Zeroed before the payout runs; a failing payout does not restore it.
        let amount = self.balances.take(&ctx.caller)?;

        self.pay_out(ctx, amount)?;
        info!(actor = %ctx.caller, amount, "withdrawn");
        self.emit(Event::Withdrawn {
            actor: ctx.caller,
            amount,
        });
        Ok(amount)
    }

    fn pay_out(&mut self, ctx: &Context<'_>, amount: Amount) -> Result<(), ArenaError> {
        if let Err(e) = ctx.transfer.pay_out(&ctx.caller, amount) {
            warn!(actor = %ctx.caller, amount, error = %e, "payout failed, amount is no longer tracked");
            self.emit(Event::PayoutFailed {
                actor: ctx.caller,
                amount,
            });
            return Err(ArenaError::PayoutFailed(e));
        }
        Ok(())
    }

    /// Append an event produced outside the arena (e.g. by the gate)
    pub fn record(&mut self, event: Event) {
        self.emit(event);
    }

    fn emit(&mut self, event: Event) {
        debug!(event = event.name(), "event emitted");
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn lookup(&self, commitment: &Commitment) -> Option<&Game> {
        self.games.lookup(commitment)
    }

    pub fn balance_of(&self, actor: &ActorId) -> Amount {
        self.balances.balance_of(actor)
    }

    /// Live games where the actor is creator or opponent
    pub fn games_for(&self, actor: &ActorId) -> Vec<(Commitment, Game)> {
        self.games.live_for(actor)
    }

    pub fn total_credited(&self) -> Amount {
        self.balances.total_credited()
    }

    pub fn total_withdrawn(&self) -> Amount {
        self.balances.total_debited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::MockTransfer;

    struct Harness {
        arena: Arena,
        gate: AvailabilityGate,
        transfer: MockTransfer,
        creator: ActorId,
        opponent: ActorId,
    }

    impl Harness {
        fn new() -> Self {
            let transfer = MockTransfer::new();
            let creator = ActorId::new();
            let opponent = ActorId::new();
            transfer.fund(&creator, 100);
            transfer.fund(&opponent, 100);
            Self {
                arena: Arena::new(ArenaConfig::default()),
                gate: AvailabilityGate::new(ActorId::new()),
                transfer,
                creator,
                opponent,
            }
        }
    }

    #[test]
    fn test_create_rejects_bad_input_without_collecting() {
        let mut h = Harness::new();
        let password = Password::random();
        let c = h
            .arena
            .generate_commitment(&h.creator, &h.opponent, Move::Rock, &password)
            .unwrap();
        let ctx = Context {
            caller: h.creator,
            now: 0,
            gate: &h.gate,
            transfer: &h.transfer,
        };

        let zero = h
            .arena
            .create(&ctx, Commitment::from_bytes([0; 32]), h.opponent, 60, 1);
        assert!(matches!(zero, Err(ArenaError::InvalidArgument(_))));
        let null = h.arena.create(&ctx, c, ActorId::null(), 60, 1);
        assert!(matches!(null, Err(ArenaError::InvalidArgument(_))));
        let window = h.arena.create(&ctx, c, h.opponent, 0, 1);
        assert!(matches!(window, Err(ArenaError::InvalidWindow { .. })));
        let stake = h.arena.create(&ctx, c, h.opponent, 60, 0);
        assert!(matches!(stake, Err(ArenaError::NoStake)));

        assert!(h.arena.lookup(&c).is_none());
        assert_eq!(h.transfer.custody_balance(), 0);
        assert!(h.arena.events().is_empty());
    }

    #[test]
    fn test_create_rejects_bet_whose_pot_overflows() {
        let mut h = Harness::new();
        let bet = u64::MAX / 2 + 1;
        h.transfer.fund(&h.creator, bet);
        let c = h
            .arena
            .generate_commitment(&h.creator, &h.opponent, Move::Rock, &Password::random())
            .unwrap();
        let ctx = Context {
            caller: h.creator,
            now: 0,
            gate: &h.gate,
            transfer: &h.transfer,
        };

        let result = h.arena.create(&ctx, c, h.opponent, 60, bet);
        assert!(matches!(result, Err(ArenaError::ArithmeticOverflow)));
        assert!(h.arena.lookup(&c).is_none());
        assert_eq!(h.transfer.custody_balance(), 0);

        // The largest bet whose pot still fits is accepted
        h.arena.create(&ctx, c, h.opponent, 60, u64::MAX / 2).unwrap();
    }

    #[test]
    fn test_create_fails_when_stake_cannot_be_collected() {
        let mut h = Harness::new();
        let poor = ActorId::new();
        let c = h
            .arena
            .generate_commitment(&poor, &h.opponent, Move::Paper, &Password::random())
            .unwrap();
        let ctx = Context {
            caller: poor,
            now: 0,
            gate: &h.gate,
            transfer: &h.transfer,
        };

        let result = h.arena.create(&ctx, c, h.opponent, 60, 5);
        assert!(matches!(result, Err(ArenaError::StakeTransferFailed(_))));
        assert!(h.arena.lookup(&c).is_none());
    }

    #[test]
    fn test_join_checks() {
        let mut h = Harness::new();
        let password = Password::random();
        let c = h
            .arena
            .generate_commitment(&h.creator, &h.opponent, Move::Rock, &password)
            .unwrap();
        let (gate, transfer) = (h.gate.clone(), h.transfer.clone());
        let ctx = |caller, now| Context {
            caller,
            now,
            gate: &gate,
            transfer: &transfer,
        };

        h.arena
            .create(&ctx(h.creator, 0), c, h.opponent, 100, 3)
            .unwrap();

        let stranger = h.arena.join_with_move(&ctx(ActorId::new(), 1), &c, Move::Rock, 3);
        assert!(matches!(stranger, Err(ArenaError::WrongOpponent)));
        let unset = h.arena.join_with_move(&ctx(h.opponent, 1), &c, 0u8, 3);
        assert!(matches!(unset, Err(ArenaError::InvalidMove)));
        let wrong = h.arena.join_with_move(&ctx(h.opponent, 1), &c, Move::Rock, 2);
        assert!(matches!(wrong, Err(ArenaError::WrongStake { expected: 3, got: 2 })));
        let late = h.arena.join_with_move(&ctx(h.opponent, 101), &c, Move::Rock, 3);
        assert!(matches!(late, Err(ArenaError::Expired)));

        let deadline = h
            .arena
            .join_with_move(&ctx(h.opponent, 100), &c, Move::Scissors, 3)
            .unwrap();
        assert_eq!(deadline, 100 + policy::GRACE_WINDOW_SECS);
        assert_eq!(h.arena.lookup(&c).unwrap().expiration, deadline);

        let again = h.arena.join_with_move(&ctx(h.opponent, 101), &c, Move::Rock, 3);
        assert!(matches!(again, Err(ArenaError::MoveAlreadySet)));
        assert_eq!(transfer.custody_balance(), 6);
    }

    #[test]
    fn test_reveal_authentication_failures_are_generic() {
        let mut h = Harness::new();
        let password = Password::from_phrase("bananas").unwrap();
        let c = h
            .arena
            .generate_commitment(&h.creator, &h.opponent, Move::Rock, &password)
            .unwrap();
        let (gate, transfer) = (h.gate.clone(), h.transfer.clone());
        let ctx = |caller, now| Context {
            caller,
            now,
            gate: &gate,
            transfer: &transfer,
        };
        h.arena
            .create(&ctx(h.creator, 0), c, h.opponent, 100, 1)
            .unwrap();
        h.arena
            .join_with_move(&ctx(h.opponent, 1), &c, Move::Paper, 1)
            .unwrap();

        let wrong_password = Password::from_phrase("apples").unwrap();
        let attempts = [
            h.arena.reveal(&ctx(h.creator, 2), &h.opponent, Move::Rock, &wrong_password),
            h.arena.reveal(&ctx(h.creator, 2), &h.opponent, Move::Paper, &password),
            h.arena.reveal(&ctx(h.creator, 2), &ActorId::new(), Move::Rock, &password),
            h.arena.reveal(&ctx(h.opponent, 2), &h.opponent, Move::Rock, &password),
        ];
        for attempt in attempts {
            assert!(matches!(attempt, Err(ArenaError::AuthenticationFailed)));
        }
        assert!(h.arena.lookup(&c).unwrap().is_live());
    }

    #[test]
    fn test_reveal_before_opponent_moves() {
        let mut h = Harness::new();
        let password = Password::random();
        let c = h
            .arena
            .generate_commitment(&h.creator, &h.opponent, Move::Rock, &password)
            .unwrap();
        let (gate, transfer) = (h.gate.clone(), h.transfer.clone());
        let ctx = |caller, now| Context {
            caller,
            now,
            gate: &gate,
            transfer: &transfer,
        };
        h.arena
            .create(&ctx(h.creator, 0), c, h.opponent, 100, 1)
            .unwrap();

        let early = h.arena.reveal(&ctx(h.creator, 1), &h.opponent, Move::Rock, &password);
        assert!(matches!(early, Err(ArenaError::OpponentHasNotMoved)));
    }

    #[test]
    fn test_withdraw_payout_failure_keeps_balance_zeroed() {
        let mut h = Harness::new();
        let password = Password::random();
        let c = h
            .arena
            .generate_commitment(&h.creator, &h.opponent, Move::Rock, &password)
            .unwrap();
        let (gate, transfer) = (h.gate.clone(), h.transfer.clone());
        let ctx = |caller, now| Context {
            caller,
            now,
            gate: &gate,
            transfer: &transfer,
        };
        h.arena
            .create(&ctx(h.creator, 0), c, h.opponent, 100, 4)
            .unwrap();
        h.arena
            .join_with_move(&ctx(h.opponent, 1), &c, Move::Scissors, 4)
            .unwrap();
        h.arena
            .reveal(&ctx(h.creator, 2), &h.opponent, Move::Rock, &password)
            .unwrap();
        assert_eq!(h.arena.balance_of(&h.creator), 8);

        transfer.fail_payouts(true);
        let result = h.arena.withdraw(&ctx(h.creator, 3));
        assert!(matches!(result, Err(ArenaError::PayoutFailed(_))));
        assert_eq!(h.arena.balance_of(&h.creator), 0);
        assert_eq!(
            h.arena.events().last(),
            Some(&Event::PayoutFailed {
                actor: h.creator,
                amount: 8
            })
        );

        transfer.fail_payouts(false);
        assert!(matches!(
            h.arena.withdraw(&ctx(h.creator, 4)),
            Err(ArenaError::NothingToWithdraw)
        ));
    }

    #[test]
    fn test_move_code_conversions() {
        assert_eq!(MoveCode::from(Move::Paper).decode().unwrap(), Move::Paper);
        assert!(MoveCode::from(0u8).decode().is_err());
        assert!(MoveCode(9).decode().is_err());
    }
}
