use chrono::Utc;
use tracing::{info, warn};

use hunt_types::models::{Clue, ProgressRecord, UnlockedClue};

use crate::error::{HuntError, HuntResult};
use crate::lock;
use crate::store::{Persistence, StoreError};

/// A successful unlock: what the user now sees, and the record written.
#[derive(Debug, Clone, PartialEq)]
pub struct Unlocked {
    pub clue: UnlockedClue,
    pub record: ProgressRecord,
}

pub struct UnlockEngine<'a> {
    store: &'a dyn Persistence,
}

impl<'a> UnlockEngine<'a> {
    pub fn new(store: &'a dyn Persistence) -> Self {
        Self { store }
    }

    /// Checks run in a fixed order: clue exists, not already unlocked,
    /// password, lock predicate. At most one progress record is written.
    pub fn attempt_unlock(
        &self,
        user_id: &str,
        clue_id: &str,
        password: &str,
    ) -> HuntResult<Unlocked> {
        let clue = self
            .store
            .find_clue_by_id(clue_id)?
            .ok_or_else(|| HuntError::NotFound(format!("No clue found with ID: {}", clue_id)))?;

        if self.store.find_progress(user_id, clue_id)?.is_some() {
            return Err(already_unlocked());
        }

        if !password_matches(password, &clue) {
            warn!(user_id, clue_id, "Incorrect clue password");
            return Err(HuntError::Unauthorized);
        }

        if lock::is_locked(self.store, &clue, user_id)? {
            warn!(user_id, clue_id, lock_state = %clue.lock_state, "Clue is locked");
            return Err(HuntError::Locked);
        }

        // A concurrent unlock may have landed since the check above; the
        // store's uniqueness constraint decides the winner.
        let record = match self.store.insert_progress(user_id, clue_id, Utc::now()) {
            Ok(record) => record,
            Err(StoreError::Duplicate(_)) => return Err(already_unlocked()),
            Err(e) => return Err(e.into()),
        };

        info!(user_id, clue_id, order_index = clue.order_index, "Clue unlocked");

        Ok(Unlocked {
            clue: UnlockedClue::new(&clue, record.unlocked_at),
            record,
        })
    }
}

/// Exact, case-sensitive comparison. An empty password never matches.
pub fn password_matches(supplied: &str, clue: &Clue) -> bool {
    !supplied.is_empty() && supplied == clue.password
}

fn already_unlocked() -> HuntError {
    HuntError::Conflict("You have already unlocked this clue".to_string())
}
