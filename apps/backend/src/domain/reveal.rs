//! Reveal-phase turn sequencing.

use crate::domain::roster::Roster;
use crate::domain::state::PlayerId;

/// Outcome of locating the current reveal turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTurn {
    /// A live player is up to present.
    Presenter(PlayerId),
    /// The order is exhausted; the reveal phase is over.
    Finished,
}

/// Randomized presentation order plus the current-turn cursor.
///
/// The order is a permutation of the draft order taken at the moment drafting
/// ends. Players who disconnect afterwards keep their slot; their turn is
/// skipped when the cursor reaches it.
#[derive(Debug, Clone)]
pub struct RevealState {
    order: Vec<PlayerId>,
    cursor: usize,
}

impl RevealState {
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self { order, cursor: 0 }
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move to the next slot in the order.
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Resolve the current turn, skipping past players no longer in the
    /// roster. Bounded by the order length, so it always lands on a live
    /// player or reports `Finished`.
    pub fn current_turn(&mut self, roster: &Roster) -> RevealTurn {
        while let Some(id) = self.order.get(self.cursor) {
            if roster.contains(id) {
                return RevealTurn::Presenter(*id);
            }
            self.cursor += 1;
        }
        RevealTurn::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn roster_of(ids: &[PlayerId]) -> Roster {
        let mut roster = Roster::new();
        for (i, id) in ids.iter().enumerate() {
            roster.join(*id, format!("P{i}"), 16).unwrap();
        }
        roster
    }

    #[test]
    fn walks_the_order_in_sequence() {
        let ids: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
        let roster = roster_of(&ids);
        let mut reveal = RevealState::new(ids.clone());

        assert_eq!(reveal.current_turn(&roster), RevealTurn::Presenter(ids[0]));
        reveal.advance();
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Presenter(ids[1]));
        reveal.advance();
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Presenter(ids[2]));
        reveal.advance();
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Finished);
    }

    #[test]
    fn skips_disconnected_players() {
        let ids: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
        let mut roster = roster_of(&ids);
        roster.leave(&ids[1]);

        let mut reveal = RevealState::new(ids.clone());
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Presenter(ids[0]));
        reveal.advance();
        // Slot 1 is skipped without a turn for the departed player.
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Presenter(ids[2]));
        assert_eq!(reveal.cursor(), 2);
    }

    #[test]
    fn finishes_when_nobody_is_left() {
        let ids: Vec<PlayerId> = (0..2).map(|_| Uuid::new_v4()).collect();
        let roster = Roster::new();
        let mut reveal = RevealState::new(ids);
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Finished);
    }

    #[test]
    fn empty_order_is_immediately_finished() {
        let roster = Roster::new();
        let mut reveal = RevealState::new(Vec::new());
        assert_eq!(reveal.current_turn(&roster), RevealTurn::Finished);
    }
}
