//! In-memory `Persistence` used by the unit tests of this crate.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::json;

use hunt_types::models::{Clue, LockState, ProgressRecord, User};

use crate::store::{Persistence, StoreError, StoreResult, UnlockedIndex};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    clues: Vec<Clue>,
    progress: Vec<ProgressRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

pub fn clue(id: &str, order_index: i64, lock_state: LockState) -> Clue {
    Clue {
        id: id.to_string(),
        title: format!("Clue {}", id),
        order_index,
        password: format!("tag-{}", id),
        lock_state,
        payload: json!({ "text": format!("Look near {}", id) }),
    }
}

impl MemoryStore {
    pub fn with_clues(clues: Vec<Clue>) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().clues = clues;
        store
    }

    /// Registry `A(0, none)`, `B(1, requires_previous)`, `C(2, requires_previous)`.
    pub fn abc() -> Self {
        Self::with_clues(vec![
            clue("A", 0, LockState::None),
            clue("B", 1, LockState::RequiresPrevious),
            clue("C", 2, LockState::RequiresPrevious),
        ])
    }

    pub fn add_user(&self, id: &str, name: &str) {
        self.create_user(id, name, Utc::now()).unwrap();
    }

    pub fn grant(&self, user_id: &str, clue_id: &str) {
        self.insert_progress(user_id, clue_id, Utc::now()).unwrap();
    }

    pub fn progress_count(&self) -> usize {
        self.inner.lock().unwrap().progress.len()
    }

    fn order_of(inner: &Inner, clue_id: &str) -> Option<i64> {
        inner
            .clues
            .iter()
            .find(|c| c.id == clue_id)
            .map(|c| c.order_index)
    }
}

impl Persistence for MemoryStore {
    fn find_clue_by_id(&self, id: &str) -> StoreResult<Option<Clue>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.clues.iter().find(|c| c.id == id).cloned())
    }

    fn find_clues_with_order_index_less_than(&self, order_index: i64) -> StoreResult<Vec<Clue>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .clues
            .iter()
            .filter(|c| c.order_index < order_index)
            .cloned()
            .collect())
    }

    fn list_clues(&self) -> StoreResult<Vec<Clue>> {
        let mut clues = self.inner.lock().unwrap().clues.clone();
        clues.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        Ok(clues)
    }

    fn find_progress(&self, user_id: &str, clue_id: &str) -> StoreResult<Option<ProgressRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .progress
            .iter()
            .find(|p| p.user_id == user_id && p.clue_id == clue_id)
            .cloned())
    }

    fn count_progress_before(&self, user_id: &str, order_index: i64) -> StoreResult<u64> {
        let inner = self.inner.lock().unwrap();
        let count = inner
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| Self::order_of(&inner, &p.clue_id).is_some_and(|o| o < order_index))
            .count();
        Ok(count as u64)
    }

    fn insert_progress(
        &self,
        user_id: &str,
        clue_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> StoreResult<ProgressRecord> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .progress
            .iter()
            .any(|p| p.user_id == user_id && p.clue_id == clue_id)
        {
            return Err(StoreError::Duplicate(format!("progress {}/{}", user_id, clue_id)));
        }
        let record = ProgressRecord {
            user_id: user_id.to_string(),
            clue_id: clue_id.to_string(),
            unlocked_at,
        };
        inner.progress.push(record.clone());
        Ok(record)
    }

    fn progress_for_user(&self, user_id: &str) -> StoreResult<Vec<ProgressRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    fn all_progress_for_user(&self, user_id: &str) -> StoreResult<Vec<UnlockedIndex>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter_map(|p| {
                Self::order_of(&inner, &p.clue_id).map(|order_index| UnlockedIndex {
                    clue_id: p.clue_id.clone(),
                    order_index,
                })
            })
            .collect())
    }

    fn all_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.lock().unwrap().users.clone())
    }

    fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.name == name).cloned())
    }

    fn create_user(&self, id: &str, name: &str, created_at: DateTime<Utc>) -> StoreResult<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.name == name) {
            return Err(StoreError::Duplicate(format!("user name {}", name)));
        }
        let user = User {
            id: id.to_string(),
            name: name.to_string(),
            created_at,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    fn rename_user(&self, id: &str, name: &str) -> StoreResult<Option<User>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.name == name && u.id != id) {
            return Err(StoreError::Duplicate(format!("user name {}", name)));
        }
        Ok(inner.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.name = name.to_string();
            u.clone()
        }))
    }
}
