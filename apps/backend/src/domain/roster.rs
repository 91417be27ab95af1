//! Connected-player bookkeeping.

use std::collections::HashMap;

use crate::domain::state::{Player, PlayerId};

/// Why a join request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejected {
    /// The roster is at the configured maximum.
    Full,
    /// A game is already running; joins are lobby-only.
    InProgress,
}

/// Owns every connected player's record. Created with the session and only
/// ever mutated by the session controller.
#[derive(Debug, Default)]
pub struct Roster {
    players: HashMap<PlayerId, Player>,
    /// Join order, used for lobby listings.
    order: Vec<PlayerId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player, refusing once `max_players` records exist.
    ///
    /// A repeated join from the same connection id replaces the record
    /// (the transport guarantees ids are unique per live connection).
    pub fn join(
        &mut self,
        id: PlayerId,
        name: String,
        max_players: usize,
    ) -> Result<(), JoinRejected> {
        if !self.players.contains_key(&id) && self.players.len() >= max_players {
            return Err(JoinRejected::Full);
        }
        self.players.insert(id, Player::new(id, name));
        if !self.order.contains(&id) {
            self.order.push(id);
        }
        Ok(())
    }

    /// Remove a player's record unconditionally.
    pub fn leave(&mut self, id: &PlayerId) -> Option<Player> {
        self.order.retain(|p| p != id);
        self.players.remove(id)
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    /// Display names in join order.
    pub fn names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Connection ids in join order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Clear per-game state for every remaining player.
    pub fn reset_game_state(&mut self) {
        for player in self.players.values_mut() {
            player.reset_game_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn join_respects_capacity() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert!(roster.join(a, "A".into(), 2).is_ok());
        assert!(roster.join(b, "B".into(), 2).is_ok());
        assert_eq!(roster.join(c, "C".into(), 2), Err(JoinRejected::Full));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn names_follow_join_order() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        roster.join(a, "A".into(), 7).unwrap();
        roster.join(b, "B".into(), 7).unwrap();
        assert_eq!(roster.names(), vec!["A".to_string(), "B".to_string()]);

        roster.leave(&a);
        assert_eq!(roster.names(), vec!["B".to_string()]);
        assert!(roster.get(&a).is_none());
    }

    #[test]
    fn reset_clears_game_state_but_keeps_players() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.join(a, "A".into(), 7).unwrap();
        if let Some(p) = roster.get_mut(&a) {
            p.hand.push(serde_json::json!("card"));
            p.selected = Some(serde_json::json!("sel"));
        }
        roster.reset_game_state();
        let p = roster.get(&a).unwrap();
        assert!(p.hand.is_empty());
        assert!(p.selected.is_none());
        assert_eq!(roster.len(), 1);
    }
}
