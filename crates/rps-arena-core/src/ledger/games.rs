//! Game ledger: commitment -> game record.

use crate::crypto::Commitment;
use crate::error::ArenaError;
use crate::games::Move;
use crate::protocol::{ActorId, Amount, Role, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A game registered under a commitment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub creator: ActorId,
    pub opponent: ActorId,
    /// Stake of each side; zero once the game is settled or claimed
    pub bet: Amount,
    pub expiration: Timestamp,
    pub opponent_move: Option<Move>,
}

impl Game {
    /// A live game still holds both (or the creator's) stakes
    pub fn is_live(&self) -> bool {
        self.bet > 0
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expiration
    }

    pub fn role_of(&self, actor: &ActorId) -> Option<Role> {
        if *actor == self.creator {
            Some(Role::Creator)
        } else if *actor == self.opponent {
            Some(Role::Opponent)
        } else {
            None
        }
    }
}

#[derive(Default)]
pub struct GameLedger {
    games: HashMap<Commitment, Game>,
}

impl GameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only lookup
    pub fn lookup(&self, commitment: &Commitment) -> Option<&Game> {
        self.games.get(commitment)
    }

    /// Fails with `AlreadyUsed` while a live game holds the commitment
    pub fn ensure_available(&self, commitment: &Commitment) -> Result<(), ArenaError> {
        match self.games.get(commitment) {
            Some(game) if game.is_live() => Err(ArenaError::AlreadyUsed),
            _ => Ok(()),
        }
    }

    /// Register a new game, replacing a closed record under the same commitment
    pub(crate) fn insert(&mut self, commitment: Commitment, game: Game) -> Result<(), ArenaError> {
        self.ensure_available(&commitment)?;
        self.games.insert(commitment, game);
        Ok(())
    }

    pub(crate) fn record_move(
        &mut self,
        commitment: &Commitment,
        mv: Move,
        new_expiration: Timestamp,
    ) -> Result<(), ArenaError> {
        let game = self
            .games
            .get_mut(commitment)
            .ok_or(ArenaError::GameNotFound)?;
        if game.opponent_move.is_some() {
            return Err(ArenaError::MoveAlreadySet);
        }
        game.opponent_move = Some(mv);
        game.expiration = new_expiration;
        Ok(())
    }

    /// Zero the bet, marking the game claimed. Returns the bet it held.
    pub(crate) fn zero(&mut self, commitment: &Commitment) -> Result<Amount, ArenaError> {
        let game = self
            .games
            .get_mut(commitment)
            .ok_or(ArenaError::GameNotFound)?;
        if !game.is_live() {
            return Err(ArenaError::AlreadyClaimed);
        }
        Ok(std::mem::take(&mut game.bet))
    }

    /// Live games in which the actor takes part
    pub fn live_for(&self, actor: &ActorId) -> Vec<(Commitment, Game)> {
        self.games
            .iter()
            .filter(|(_, g)| g.is_live() && g.role_of(actor).is_some())
            .map(|(c, g)| (*c, g.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(creator: ActorId, opponent: ActorId) -> Game {
        Game {
            creator,
            opponent,
            bet: 10,
            expiration: 100,
            opponent_move: None,
        }
    }

    #[test]
    fn test_lookup_not_found() {
        let ledger = GameLedger::new();
        assert!(ledger.lookup(&Commitment::from_bytes([1; 32])).is_none());
    }

    #[test]
    fn test_live_commitment_cannot_be_reused() {
        let mut ledger = GameLedger::new();
        let c = Commitment::from_bytes([1; 32]);
        ledger.insert(c, game(ActorId::new(), ActorId::new())).unwrap();

        let again = ledger.insert(c, game(ActorId::new(), ActorId::new()));
        assert!(matches!(again, Err(ArenaError::AlreadyUsed)));
    }

    #[test]
    fn test_zero_is_single_use() {
        let mut ledger = GameLedger::new();
        let c = Commitment::from_bytes([2; 32]);
        ledger.insert(c, game(ActorId::new(), ActorId::new())).unwrap();

        assert_eq!(ledger.zero(&c).unwrap(), 10);
        assert!(matches!(ledger.zero(&c), Err(ArenaError::AlreadyClaimed)));
        assert_eq!(ledger.lookup(&c).unwrap().bet, 0);

        // A closed record frees the commitment
        ledger.insert(c, game(ActorId::new(), ActorId::new())).unwrap();
        assert!(ledger.lookup(&c).unwrap().is_live());
    }

    #[test]
    fn test_record_move_once() {
        let mut ledger = GameLedger::new();
        let c = Commitment::from_bytes([3; 32]);
        ledger.insert(c, game(ActorId::new(), ActorId::new())).unwrap();

        ledger.record_move(&c, Move::Rock, 500).unwrap();
        let stored = ledger.lookup(&c).unwrap();
        assert_eq!(stored.opponent_move, Some(Move::Rock));
        assert_eq!(stored.expiration, 500);

        assert!(matches!(
            ledger.record_move(&c, Move::Paper, 600),
            Err(ArenaError::MoveAlreadySet)
        ));
    }

    #[test]
    fn test_roles_and_live_listing() {
        let mut ledger = GameLedger::new();
        let creator = ActorId::new();
        let opponent = ActorId::new();
        let c = Commitment::from_bytes([4; 32]);
        ledger.insert(c, game(creator, opponent)).unwrap();

        let g = ledger.lookup(&c).unwrap();
        assert_eq!(g.role_of(&creator), Some(Role::Creator));
        assert_eq!(g.role_of(&opponent), Some(Role::Opponent));
        assert_eq!(g.role_of(&ActorId::new()), None);

        assert_eq!(ledger.live_for(&opponent).len(), 1);
        ledger.zero(&c).unwrap();
        assert!(ledger.live_for(&opponent).is_empty());
    }
}
