use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::ErrorCode;

use hunt_core::store::{Persistence, StoreError, StoreResult, UnlockedIndex};
use hunt_types::models::{Clue, ProgressRecord, User};

use crate::Database;

impl Persistence for Database {
    fn find_clue_by_id(&self, id: &str) -> StoreResult<Option<Clue>> {
        Ok(self.get_clue(id)?.map(Clue::try_from).transpose()?)
    }

    fn find_clues_with_order_index_less_than(&self, order_index: i64) -> StoreResult<Vec<Clue>> {
        collect(self.list_clues_before(order_index)?)
    }

    fn list_clues(&self) -> StoreResult<Vec<Clue>> {
        collect(Database::list_clues(self)?)
    }

    fn find_progress(&self, user_id: &str, clue_id: &str) -> StoreResult<Option<ProgressRecord>> {
        Ok(self
            .get_progress(user_id, clue_id)?
            .map(ProgressRecord::try_from)
            .transpose()?)
    }

    fn count_progress_before(&self, user_id: &str, order_index: i64) -> StoreResult<u64> {
        Ok(Database::count_progress_before(self, user_id, order_index)?)
    }

    fn insert_progress(
        &self,
        user_id: &str,
        clue_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> StoreResult<ProgressRecord> {
        Database::insert_progress(self, user_id, clue_id, &timestamp(unlocked_at))
            .map_err(|e| classify(e, || format!("progress {}/{}", user_id, clue_id)))?;

        Ok(ProgressRecord {
            user_id: user_id.to_string(),
            clue_id: clue_id.to_string(),
            unlocked_at,
        })
    }

    fn progress_for_user(&self, user_id: &str) -> StoreResult<Vec<ProgressRecord>> {
        collect(self.get_progress_for_user(user_id)?)
    }

    fn all_progress_for_user(&self, user_id: &str) -> StoreResult<Vec<UnlockedIndex>> {
        Ok(self
            .get_unlocked_indices(user_id)?
            .into_iter()
            .map(|(clue_id, order_index)| UnlockedIndex {
                clue_id,
                order_index,
            })
            .collect())
    }

    fn all_users(&self) -> StoreResult<Vec<User>> {
        collect(self.list_users()?)
    }

    fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.get_user_by_id(id)?.map(User::try_from).transpose()?)
    }

    fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        Ok(self.get_user_by_name(name)?.map(User::try_from).transpose()?)
    }

    fn create_user(&self, id: &str, name: &str, created_at: DateTime<Utc>) -> StoreResult<User> {
        Database::create_user(self, id, name, &timestamp(created_at))
            .map_err(|e| classify(e, || format!("user {}", name)))?;

        Ok(User {
            id: id.to_string(),
            name: name.to_string(),
            created_at,
        })
    }

    fn rename_user(&self, id: &str, name: &str) -> StoreResult<Option<User>> {
        let found = Database::rename_user(self, id, name)
            .map_err(|e| classify(e, || format!("user {}", name)))?;
        if !found {
            return Ok(None);
        }
        self.find_user_by_id(id)
    }
}

fn collect<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    Ok(rows
        .into_iter()
        .map(T::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Unique and primary-key violations become `Duplicate`; any other failure,
/// foreign-key violations included, stays a backend error.
fn classify(err: anyhow::Error, what: impl FnOnce() -> String) -> StoreError {
    let unique = err
        .downcast_ref::<rusqlite::Error>()
        .and_then(|e| e.sqlite_error())
        .is_some_and(|e| {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        });

    if unique {
        StoreError::Duplicate(what())
    } else {
        StoreError::Backend(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::ClueSeed;
    use hunt_core::{HuntError, RankEngine, UnlockEngine, UserService};
    use hunt_types::models::LockState;
    use serde_json::json;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        let clues = [
            ("A", 0, LockState::None),
            ("B", 1, LockState::RequiresPrevious),
            ("C", 2, LockState::RequiresPrevious),
        ]
        .into_iter()
        .map(|(id, order_index, lock_state)| ClueSeed {
            id: id.to_string(),
            title: format!("Clue {}", id),
            password: format!("tag-{}", id),
            order_index,
            lock_state,
            data: json!({ "text": id }),
        })
        .collect::<Vec<_>>();
        db.seed_clues(&clues).unwrap();
        db
    }

    #[test]
    fn duplicate_progress_is_reported_as_duplicate() {
        let db = seeded();
        Persistence::create_user(&db, "u1", "alice", Utc::now()).unwrap();

        Persistence::insert_progress(&db, "u1", "A", Utc::now()).unwrap();
        let err = Persistence::insert_progress(&db, "u1", "A", Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn progress_for_unknown_user_is_backend_error() {
        let db = seeded();
        let err = Persistence::insert_progress(&db, "ghost", "A", Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn duplicate_user_name_is_reported_as_duplicate() {
        let db = seeded();
        Persistence::create_user(&db, "u1", "alice", Utc::now()).unwrap();
        let err = Persistence::create_user(&db, "u2", "alice", Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn counts_and_indices_follow_clue_order() {
        let db = seeded();
        Persistence::create_user(&db, "u1", "alice", Utc::now()).unwrap();
        Persistence::insert_progress(&db, "u1", "C", Utc::now()).unwrap();
        Persistence::insert_progress(&db, "u1", "A", Utc::now()).unwrap();

        assert_eq!(Persistence::count_progress_before(&db, "u1", 2).unwrap(), 1);
        assert_eq!(Persistence::count_progress_before(&db, "u1", 3).unwrap(), 2);
        assert_eq!(db.find_clues_with_order_index_less_than(2).unwrap().len(), 2);

        let held: Vec<_> = db
            .all_progress_for_user("u1")
            .unwrap()
            .into_iter()
            .map(|u| (u.clue_id, u.order_index))
            .collect();
        assert_eq!(held, vec![("A".to_string(), 0), ("C".to_string(), 2)]);
    }

    #[test]
    fn timestamps_survive_a_round_trip() {
        let db = seeded();
        let user = Persistence::create_user(&db, "u1", "alice", Utc::now()).unwrap();
        let record = Persistence::insert_progress(&db, "u1", "A", Utc::now()).unwrap();

        assert_eq!(db.find_user_by_id("u1").unwrap().unwrap(), user);
        assert_eq!(db.find_progress("u1", "A").unwrap().unwrap(), record);
    }

    #[test]
    fn rename_unknown_user_returns_none() {
        let db = seeded();
        assert_eq!(Persistence::rename_user(&db, "ghost", "x").unwrap(), None);
    }

    #[test]
    fn full_hunt_against_sqlite() {
        let db = seeded();
        UserService::new(&db).register("u", "U").unwrap();
        let unlock = UnlockEngine::new(&db);

        unlock.attempt_unlock("u", "A", "tag-A").unwrap();
        assert!(matches!(
            unlock.attempt_unlock("u", "C", "tag-C"),
            Err(HuntError::Locked)
        ));
        assert!(matches!(
            unlock.attempt_unlock("u", "B", "wrong"),
            Err(HuntError::Unauthorized)
        ));
        unlock.attempt_unlock("u", "B", "tag-B").unwrap();
        unlock.attempt_unlock("u", "C", "tag-C").unwrap();
        assert!(matches!(
            unlock.attempt_unlock("u", "C", "tag-C"),
            Err(HuntError::Conflict(_))
        ));

        let rank = RankEngine::new(&db).get_user_rank("u").unwrap();
        assert_eq!(rank.consecutive_clues, 3);
        assert_eq!(rank.total_clues, 3);
        assert_eq!(rank.rank, 1);
    }

    #[test]
    fn concurrent_unlocks_of_one_clue_have_one_winner() {
        let db = seeded();
        UserService::new(&db).register("u", "U").unwrap();

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| UnlockEngine::new(&db).attempt_unlock("u", "A", "tag-A")))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let won = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(HuntError::Conflict(_))))
            .count();
        assert_eq!(won, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(db.progress_for_user("u").unwrap().len(), 1);
    }
}
