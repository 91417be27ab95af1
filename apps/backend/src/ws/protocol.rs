//! JSON wire protocol between clients and the session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::history::HistoryEntry;
use crate::domain::state::PlayerId;

/// Messages a client may send. Card and composition payloads are opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Join { name: String },
    RequestHistory,
    StartGame,
    SubmitPack { cards: Vec<Value> },
    PickCard { index: usize },
    ReadyToPresent { composition: Value },
    RevealStep { payload: Value },
    FinishTurn,
}

/// Messages the session produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Non-fatal, informational.
    ErrorMsg { message: String },
    UpdatePlayerList { names: Vec<String> },
    MoveToInput,
    UpdateSubmitStatus { current: usize, total: usize },
    NextDraftTurn {
        pack: Vec<Value>,
        hand: Vec<Value>,
        from_name: String,
    },
    StartRevealPhase,
    UpdateRevealStatus { current_name: String },
    YourRevealTurn { hand: Vec<Value> },
    AnnounceStart { name: String },
    /// Pure relay of an opaque presentation step.
    ShowStep { payload: Value },
    GameOver { results: Vec<HistoryEntry> },
    ReceiveHistory { entries: Vec<HistoryEntry> },
}

/// Transport instruction produced by the session controller. The websocket
/// layer executes these after the triggering event's mutation completes.
#[derive(Debug, Clone)]
pub enum Effect {
    Broadcast(ServerMsg),
    Unicast(PlayerId, ServerMsg),
    /// Sever every live connection (game over), forcing clients back to a
    /// clean lobby state.
    DisconnectAll,
}
