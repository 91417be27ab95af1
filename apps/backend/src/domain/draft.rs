//! Draft-round barriers and pack rotation.
//!
//! All helpers are O(players) field scans over the roster, side-effect free
//! until the controller confirms a barrier has released. The draft order is
//! a fixed cycle; packs pass uniformly in one rotational direction, so after
//! each completed round every player holds exactly the pack their predecessor
//! in `order` held before the rotation.

use crate::domain::roster::Roster;
use crate::domain::state::PlayerId;

/// Number of players whose initial pack has arrived.
pub fn submitted_count(roster: &Roster, order: &[PlayerId]) -> usize {
    order
        .iter()
        .filter(|&id| roster.get(id).is_some_and(|p| !p.pack.is_empty()))
        .count()
}

/// Submission barrier: every player in the draft order holds a non-empty pack.
pub fn all_submitted(roster: &Roster, order: &[PlayerId]) -> bool {
    !order.is_empty()
        && order
            .iter()
            .all(|id| roster.get(id).is_some_and(|p| !p.pack.is_empty()))
}

/// Pick barrier: every player in the draft order has a pending selection.
pub fn all_picked(roster: &Roster, order: &[PlayerId]) -> bool {
    !order.is_empty()
        && order
            .iter()
            .all(|id| roster.get(id).is_some_and(|p| p.selected.is_some()))
}

/// Move each pending selection to the end of its owner's hand.
///
/// Hands grow in lock-step: the controller only calls this once the pick
/// barrier has released, so every player gains exactly one card.
pub fn apply_picks(roster: &mut Roster, order: &[PlayerId]) {
    for id in order {
        if let Some(player) = roster.get_mut(id) {
            if let Some(card) = player.selected.take() {
                player.hand.push(card);
            }
        }
    }
}

/// Packs are exhausted simultaneously, so checking the first player's pack
/// is enough to detect the end of the draft.
pub fn lead_pack_exhausted(roster: &Roster, order: &[PlayerId]) -> bool {
    order
        .first()
        .and_then(|id| roster.get(id))
        .is_some_and(|p| p.pack.is_empty())
}

/// Single-step rotation around the draft cycle: player `i` receives the pack
/// held by player `i - 1` (mod length). No-op with fewer than two players.
pub fn rotate_packs(roster: &mut Roster, order: &[PlayerId]) {
    if order.len() < 2 {
        return;
    }
    let mut packs: Vec<_> = order
        .iter()
        .map(|id| {
            roster
                .get_mut(id)
                .map(|p| std::mem::take(&mut p.pack))
                .unwrap_or_default()
        })
        .collect();
    packs.rotate_right(1);
    for (id, pack) in order.iter().zip(packs) {
        if let Some(player) = roster.get_mut(id) {
            player.pack = pack;
        }
    }
}
