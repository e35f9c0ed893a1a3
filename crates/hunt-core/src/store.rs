use chrono::{DateTime, Utc};
use thiserror::Error;

use hunt_types::models::{Clue, ProgressRecord, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (user name, or a second
    /// progress record for the same user and clue).
    #[error("duplicate {0}")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A clue a user holds, reduced to what ordering needs.
///
/// The streak walk matches on `clue_id` against the ordered registry.
/// `order_index` is the held clue's position as stored, returned alongside so
/// callers can order or report a user's progress without another clue lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedIndex {
    pub clue_id: String,
    pub order_index: i64,
}

/// Storage collaborator for the hunt rules.
///
/// Implementations must enforce uniqueness of `(user_id, clue_id)` in
/// [`insert_progress`](Persistence::insert_progress) and of user names in
/// [`create_user`](Persistence::create_user) / [`rename_user`](Persistence::rename_user),
/// reporting violations as [`StoreError::Duplicate`].
pub trait Persistence: Send + Sync {
    // -- Clues --

    fn find_clue_by_id(&self, id: &str) -> StoreResult<Option<Clue>>;

    fn find_clues_with_order_index_less_than(&self, order_index: i64) -> StoreResult<Vec<Clue>>;

    /// The whole registry, ordered by `order_index` then id.
    fn list_clues(&self) -> StoreResult<Vec<Clue>>;

    // -- Progress --

    fn find_progress(&self, user_id: &str, clue_id: &str) -> StoreResult<Option<ProgressRecord>>;

    /// Number of clues with `order_index` strictly below the given one that
    /// the user has unlocked.
    fn count_progress_before(&self, user_id: &str, order_index: i64) -> StoreResult<u64>;

    fn insert_progress(
        &self,
        user_id: &str,
        clue_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> StoreResult<ProgressRecord>;

    fn progress_for_user(&self, user_id: &str) -> StoreResult<Vec<ProgressRecord>>;

    fn all_progress_for_user(&self, user_id: &str) -> StoreResult<Vec<UnlockedIndex>>;

    // -- Users --

    fn all_users(&self) -> StoreResult<Vec<User>>;

    fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>>;

    fn create_user(&self, id: &str, name: &str, created_at: DateTime<Utc>) -> StoreResult<User>;

    /// Returns `None` when no user has that id.
    fn rename_user(&self, id: &str, name: &str) -> StoreResult<Option<User>>;
}
