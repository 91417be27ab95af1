use serde_json::Value;
use uuid::Uuid;

/// Transport-provided connection identifier, doubling as the player identity.
pub type PlayerId = Uuid;

/// Overall session progression phases.
///
/// GameOver is transient: results broadcast, forced disconnect and reset all
/// happen synchronously inside the event that ends the reveal, so the session
/// is never observed in a dedicated game-over state between events.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Accepting joins.
    Lobby,
    /// Draft rounds in progress.
    Drafting(DraftStage),
    /// Players present compositions in `reveal_order`.
    Revealing,
}

/// Stage within the drafting phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DraftStage {
    /// Waiting for every player's initial pack (first round only).
    Submitting,
    /// Waiting for every player's pick for the current round.
    Picking,
}

/// A connected player and their per-game mutable state.
///
/// Card payloads are opaque to the server; they are stored and relayed
/// without inspection.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cards currently held for drafting.
    pub pack: Vec<Value>,
    /// Accumulated picks, append-only during a session.
    pub hand: Vec<Value>,
    /// Pending pick for the current draft round, at most one.
    pub selected: Option<Value>,
    /// Final composition submitted before presenting.
    pub final_composition: Option<Value>,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            pack: Vec::new(),
            hand: Vec::new(),
            selected: None,
            final_composition: None,
        }
    }

    /// Clear all per-game state, keeping identity and name.
    pub fn reset_game_state(&mut self) {
        self.pack.clear();
        self.hand.clear();
        self.selected = None;
        self.final_composition = None;
    }
}
