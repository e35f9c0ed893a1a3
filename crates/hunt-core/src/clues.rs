use std::collections::HashMap;

use hunt_types::models::{ClueStatus, ClueSummary, UnlockedClue};

use crate::error::{HuntError, HuntResult};
use crate::store::Persistence;
use crate::unlock::password_matches;

/// Read-side views of the clue registry for a single user.
pub struct ClueService<'a> {
    store: &'a dyn Persistence,
}

impl<'a> ClueService<'a> {
    pub fn new(store: &'a dyn Persistence) -> Self {
        Self { store }
    }

    /// Every clue in hunt order, marked with this user's status.
    pub fn clues_for_user(&self, user_id: &str) -> HuntResult<Vec<ClueSummary>> {
        let unlocked: HashMap<String, _> = self
            .store
            .progress_for_user(user_id)?
            .into_iter()
            .map(|p| (p.clue_id, p.unlocked_at))
            .collect();

        let summaries = self
            .store
            .list_clues()?
            .into_iter()
            .map(|clue| {
                let unlocked_at = unlocked.get(&clue.id).copied();
                ClueSummary {
                    status: if unlocked_at.is_some() {
                        ClueStatus::Unlocked
                    } else {
                        ClueStatus::Locked
                    },
                    unlocked_at,
                    id: clue.id,
                    title: clue.title,
                    order_index: clue.order_index,
                }
            })
            .collect();

        Ok(summaries)
    }

    /// Content of a clue the user has already unlocked.
    pub fn view_clue(&self, user_id: &str, clue_id: &str) -> HuntResult<UnlockedClue> {
        let clue = self
            .store
            .find_clue_by_id(clue_id)?
            .ok_or_else(|| not_found(clue_id))?;

        let progress = self.store.find_progress(user_id, clue_id)?.ok_or_else(|| {
            HuntError::Forbidden("You must unlock this clue to view it".to_string())
        })?;

        Ok(UnlockedClue::new(&clue, progress.unlocked_at))
    }

    /// Checks a password without recording anything.
    pub fn verify_password(&self, clue_id: &str, password: &str) -> HuntResult<bool> {
        let clue = self
            .store
            .find_clue_by_id(clue_id)?
            .ok_or_else(|| not_found(clue_id))?;
        Ok(password_matches(password, &clue))
    }
}

fn not_found(clue_id: &str) -> HuntError {
    HuntError::NotFound(format!("No clue found with ID: {}", clue_id))
}
