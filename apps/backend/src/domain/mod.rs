//! Domain layer: pure session/game logic, transport-agnostic.

pub mod draft;
pub mod history;
pub mod reveal;
pub mod roster;
pub mod shuffle;
pub mod state;

// Re-exports for ergonomics
pub use history::{HistoryEntry, HistoryLog};
pub use reveal::{RevealState, RevealTurn};
pub use roster::{JoinRejected, Roster};
pub use state::{DraftStage, Phase, Player, PlayerId};
