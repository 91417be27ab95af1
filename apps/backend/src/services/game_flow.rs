//! Session controller: the top-level state machine mediating every transport
//! event.
//!
//! Lobby -> Drafting -> Revealing -> (game over, transient) -> Lobby.
//!
//! Handlers mutate the owned session state to completion and return the
//! transport effects to dispatch afterwards; multi-step consequences
//! (barrier release -> rotation -> next-round notification) run synchronously
//! inside the triggering event. Invalid actions from stale or misbehaving
//! clients are deliberate silent no-ops, never surfaced errors.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::domain::draft;
use crate::domain::history::{HistoryEntry, HistoryLog};
use crate::domain::reveal::{RevealState, RevealTurn};
use crate::domain::roster::{JoinRejected, Roster};
use crate::domain::shuffle;
use crate::domain::state::{DraftStage, Phase, PlayerId};
use crate::ws::protocol::{ClientMsg, Effect, ServerMsg};

pub struct GameFlow {
    config: GameConfig,
    rng: StdRng,
    roster: Roster,
    phase: Phase,
    /// Draft-rotation topology, frozen at game start.
    player_order: Vec<PlayerId>,
    reveal: Option<RevealState>,
    history: HistoryLog,
}

impl GameFlow {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    #[cfg(test)]
    pub(crate) fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            rng,
            roster: Roster::new(),
            phase: Phase::Lobby,
            player_order: Vec::new(),
            reveal: None,
            history: HistoryLog::new(config.history_capacity),
            config,
        }
    }

    /// Dispatch one inbound event, to completion.
    pub fn handle(&mut self, conn: PlayerId, msg: ClientMsg) -> Vec<Effect> {
        match msg {
            ClientMsg::Join { name } => self.join(conn, name),
            ClientMsg::RequestHistory => self.request_history(conn),
            ClientMsg::StartGame => self.start_game(),
            ClientMsg::SubmitPack { cards } => self.submit_pack(conn, cards),
            ClientMsg::PickCard { index } => self.pick_card(conn, index),
            ClientMsg::ReadyToPresent { composition } => self.ready_to_present(conn, composition),
            ClientMsg::RevealStep { payload } => self.reveal_step(payload),
            ClientMsg::FinishTurn => self.finish_turn(),
        }
    }

    fn join(&mut self, conn: PlayerId, name: String) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.try_join(conn, name) {
            Ok(()) => {
                effects.push(Effect::Broadcast(ServerMsg::UpdatePlayerList {
                    names: self.roster.names(),
                }));
            }
            Err(JoinRejected::InProgress) => {
                effects.push(Effect::Unicast(
                    conn,
                    ServerMsg::ErrorMsg {
                        message: "A game is currently in progress.".to_string(),
                    },
                ));
            }
            Err(JoinRejected::Full) => {
                effects.push(Effect::Unicast(
                    conn,
                    ServerMsg::ErrorMsg {
                        message: "The session is full.".to_string(),
                    },
                ));
            }
        }
        effects
    }

    fn try_join(&mut self, conn: PlayerId, name: String) -> Result<(), JoinRejected> {
        if self.phase != Phase::Lobby {
            return Err(JoinRejected::InProgress);
        }
        self.roster.join(conn, name, self.config.max_players)?;
        info!(players = self.roster.len(), "player joined");
        Ok(())
    }

    fn request_history(&self, conn: PlayerId) -> Vec<Effect> {
        vec![Effect::Unicast(
            conn,
            ServerMsg::ReceiveHistory {
                entries: self.history.fetch(),
            },
        )]
    }

    fn start_game(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase != Phase::Lobby {
            return effects;
        }
        if self.roster.len() < self.config.min_players {
            effects.push(Effect::Broadcast(ServerMsg::ErrorMsg {
                message: format!(
                    "At least {} players are required to start.",
                    self.config.min_players
                ),
            }));
            return effects;
        }

        self.player_order = shuffle::shuffled(self.roster.ids(), &mut self.rng);
        self.phase = Phase::Drafting(DraftStage::Submitting);
        info!(players = self.player_order.len(), "game started");
        effects.push(Effect::Broadcast(ServerMsg::MoveToInput));
        effects
    }

    fn submit_pack(&mut self, conn: PlayerId, cards: Vec<Value>) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase != Phase::Drafting(DraftStage::Submitting) {
            return effects;
        }
        if !self.player_order.contains(&conn) {
            return effects;
        }
        match self.roster.get_mut(&conn) {
            // Only the initial pack is accepted; a resubmission is ignored.
            Some(player) if player.pack.is_empty() => {
                player.pack = cards;
                debug!(player = %player.name, "pack submitted");
            }
            _ => return effects,
        }

        effects.push(Effect::Broadcast(ServerMsg::UpdateSubmitStatus {
            current: draft::submitted_count(&self.roster, &self.player_order),
            total: self.player_order.len(),
        }));

        if draft::all_submitted(&self.roster, &self.player_order) {
            self.begin_pick_round(&mut effects);
        }
        effects
    }

    fn pick_card(&mut self, conn: PlayerId, index: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase != Phase::Drafting(DraftStage::Picking) {
            return effects;
        }
        let Some(player) = self.roster.get_mut(&conn) else {
            return effects;
        };
        // At most one pick per round; out-of-range indices are ignored.
        if player.selected.is_some() || index >= player.pack.len() {
            return effects;
        }
        let card = player.pack.remove(index);
        player.selected = Some(card);
        debug!(player = %player.name, index, "card picked");

        if draft::all_picked(&self.roster, &self.player_order) {
            draft::apply_picks(&mut self.roster, &self.player_order);
            if draft::lead_pack_exhausted(&self.roster, &self.player_order) {
                self.begin_reveal(&mut effects);
            } else {
                self.begin_pick_round(&mut effects);
            }
        }
        effects
    }

    /// Rotate packs one step and tell each player what they now hold and
    /// whose pack it was.
    fn begin_pick_round(&mut self, effects: &mut Vec<Effect>) {
        draft::rotate_packs(&mut self.roster, &self.player_order);
        self.phase = Phase::Drafting(DraftStage::Picking);

        let n = self.player_order.len();
        if n == 0 {
            return;
        }
        for (idx, id) in self.player_order.iter().enumerate() {
            let Some(player) = self.roster.get(id) else {
                continue;
            };
            let from_name = self
                .player_order
                .get((idx + n - 1) % n)
                .and_then(|pred| self.roster.get(pred))
                .map(|p| p.name.clone())
                .unwrap_or_default();
            effects.push(Effect::Unicast(
                *id,
                ServerMsg::NextDraftTurn {
                    pack: player.pack.clone(),
                    hand: player.hand.clone(),
                    from_name,
                },
            ));
        }
    }

    fn begin_reveal(&mut self, effects: &mut Vec<Effect>) {
        self.phase = Phase::Revealing;
        let order = shuffle::shuffled(self.player_order.clone(), &mut self.rng);
        self.reveal = Some(RevealState::new(order));
        info!("reveal phase started");
        effects.push(Effect::Broadcast(ServerMsg::StartRevealPhase));
        self.announce_reveal_turn(effects);
    }

    fn ready_to_present(&mut self, conn: PlayerId, composition: Value) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase != Phase::Revealing {
            return effects;
        }
        let Some(player) = self.roster.get_mut(&conn) else {
            return effects;
        };
        // Readiness is independent of whose turn it is; presentation order
        // stays fixed by the reveal order regardless.
        player.final_composition = Some(composition);
        let name = player.name.clone();
        info!(player = %name, "ready to present");
        effects.push(Effect::Broadcast(ServerMsg::AnnounceStart { name }));
        effects
    }

    fn reveal_step(&self, payload: Value) -> Vec<Effect> {
        if self.phase != Phase::Revealing {
            return Vec::new();
        }
        vec![Effect::Broadcast(ServerMsg::ShowStep { payload })]
    }

    fn finish_turn(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase != Phase::Revealing {
            return effects;
        }
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.advance();
        }
        self.announce_reveal_turn(&mut effects);
        effects
    }

    /// Announce whoever the cursor lands on, skipping departed players; an
    /// exhausted order ends the game.
    fn announce_reveal_turn(&mut self, effects: &mut Vec<Effect>) {
        let turn = match self.reveal.as_mut() {
            Some(reveal) => reveal.current_turn(&self.roster),
            None => return,
        };
        match turn {
            RevealTurn::Presenter(id) => {
                if let Some(player) = self.roster.get(&id) {
                    effects.push(Effect::Broadcast(ServerMsg::UpdateRevealStatus {
                        current_name: player.name.clone(),
                    }));
                    // Only the presenter needs their own hand at this point.
                    effects.push(Effect::Unicast(
                        id,
                        ServerMsg::YourRevealTurn {
                            hand: player.hand.clone(),
                        },
                    ));
                }
            }
            RevealTurn::Finished => self.finish_game(effects),
        }
    }

    fn finish_game(&mut self, effects: &mut Vec<Effect>) {
        let results: Vec<HistoryEntry> = self
            .reveal
            .as_ref()
            .map(|reveal| {
                reveal
                    .order()
                    .iter()
                    .filter_map(|id| {
                        let player = self.roster.get(id)?;
                        let composition = player.final_composition.clone()?;
                        Some(HistoryEntry {
                            name: player.name.clone(),
                            composition,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        info!(results = results.len(), "game over");
        effects.push(Effect::Broadcast(ServerMsg::GameOver {
            results: results.clone(),
        }));
        self.history.record(results);
        effects.push(Effect::DisconnectAll);
        self.reset();
    }

    /// Remove the player; an emptied roster forces a full reset regardless
    /// of phase.
    pub fn handle_disconnect(&mut self, conn: PlayerId) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(player) = self.roster.leave(&conn) {
            info!(player = %player.name, "player disconnected");
            if self.phase == Phase::Lobby {
                effects.push(Effect::Broadcast(ServerMsg::UpdatePlayerList {
                    names: self.roster.names(),
                }));
            }
        }
        if self.roster.is_empty() {
            self.reset();
        }
        effects
    }

    /// Restore a clean lobby. The history log is process-wide and survives.
    pub fn reset(&mut self) {
        self.phase = Phase::Lobby;
        self.player_order.clear();
        self.reveal = None;
        self.roster.reset_game_state();
        info!("session reset to lobby");
    }
}
