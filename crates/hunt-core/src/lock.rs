//! Lock predicates, one per [`LockState`].
//!
//! A predicate answers "is this clue still closed to this user?". New
//! strategies are added as a `LockState` variant plus a function in
//! [`predicate_for`]; the unlock engine only ever calls [`is_locked`].

use hunt_types::models::{Clue, LockState};

use crate::store::{Persistence, StoreResult};

pub type LockPredicate = fn(&dyn Persistence, &Clue, &str) -> StoreResult<bool>;

pub fn predicate_for(state: LockState) -> LockPredicate {
    match state {
        LockState::None => never_locked,
        LockState::RequiresPrevious => requires_previous,
    }
}

pub fn is_locked(store: &dyn Persistence, clue: &Clue, user_id: &str) -> StoreResult<bool> {
    predicate_for(clue.lock_state)(store, clue, user_id)
}

fn never_locked(_: &dyn Persistence, _: &Clue, _: &str) -> StoreResult<bool> {
    Ok(false)
}

/// Locked until the user holds every clue ordered strictly before this one.
fn requires_previous(store: &dyn Persistence, clue: &Clue, user_id: &str) -> StoreResult<bool> {
    let predecessors = store
        .find_clues_with_order_index_less_than(clue.order_index)?
        .len() as u64;

    // The first clue of the hunt has nothing to wait for.
    if predecessors == 0 {
        return Ok(false);
    }

    let unlocked = store.count_progress_before(user_id, clue.order_index)?;
    Ok(!predecessors_satisfied(unlocked, predecessors))
}

/// Compares the user's unlocked count below the clue with the registry's
/// count of clues below it. For a zero-based, gap-free registry the latter
/// equals the clue's `order_index`.
pub fn predecessors_satisfied(unlocked_before: u64, clues_before: u64) -> bool {
    unlocked_before >= clues_before
}
