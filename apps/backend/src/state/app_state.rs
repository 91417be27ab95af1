use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::GameConfig;
use crate::services::game_flow::GameFlow;
use crate::ws::hub::ConnectionRegistry;

/// Application state containing shared resources.
///
/// The single session lives behind a mutex: inbound events lock it, mutate
/// to completion, and release before any outbound dispatch, which gives the
/// one-event-at-a-time processing model the session logic assumes.
pub struct AppState {
    game: Mutex<GameFlow>,
    registry: Arc<ConnectionRegistry>,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            game: Mutex::new(GameFlow::new(config)),
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    pub fn game(&self) -> &Mutex<GameFlow> {
        &self.game
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }
}
