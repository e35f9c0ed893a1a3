//! Loading the administrator's clue file into the registry.
//!
//! The file is a JSON array:
//!
//! ```json
//! [{ "id": "c1", "title": "The Old Oak", "password": "04:a2:9f", "order_index": 0,
//!    "lock_state": "none", "data": { "text": "...", "image": "oak.png" } }]
//! ```
//!
//! `lock_state` defaults to `requires_previous`, `order_index` to 0 and
//! `data` to `{}`. Seeding upserts by id, so re-running it after editing the
//! file updates clues in place without touching anyone's progress.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{info, warn};

use hunt_types::models::LockState;

use crate::Database;

#[derive(Debug, Clone, Deserialize)]
pub struct ClueSeed {
    pub id: String,
    pub title: String,
    pub password: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub lock_state: LockState,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

pub fn load_clue_file(path: &Path) -> Result<Vec<ClueSeed>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading clue file {}", path.display()))?;
    parse_clues(&raw).with_context(|| format!("parsing clue file {}", path.display()))
}

pub fn parse_clues(raw: &str) -> Result<Vec<ClueSeed>> {
    let clues: Vec<ClueSeed> = serde_json::from_str(raw)?;
    for clue in &clues {
        if clue.id.trim().is_empty() {
            bail!("clue '{}' has an empty id", clue.title);
        }
        if clue.password.is_empty() {
            warn!("Clue {} has an empty password and can never be unlocked", clue.id);
        }
    }
    Ok(clues)
}

impl Database {
    /// Upserts every clue in one transaction. Returns the number written.
    pub fn seed_clues(&self, clues: &[ClueSeed]) -> Result<usize> {
        let written = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO clues (id, title, order_index, password, lock_state, data)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT (id) DO UPDATE
                     SET title = excluded.title,
                         order_index = excluded.order_index,
                         password = excluded.password,
                         lock_state = excluded.lock_state,
                         data = excluded.data",
                )?;
                for clue in clues {
                    stmt.execute(rusqlite::params![
                        clue.id,
                        clue.title,
                        clue.order_index,
                        clue.password,
                        clue.lock_state.as_str(),
                        clue.data.to_string(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(clues.len())
        })?;

        info!("Seeded {} clues", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunt_core::Persistence;

    #[test]
    fn parse_applies_defaults() {
        let clues = parse_clues(r#"[{"id": "c1", "title": "Oak", "password": "04:a2"}]"#).unwrap();
        assert_eq!(clues.len(), 1);
        assert_eq!(clues[0].order_index, 0);
        assert_eq!(clues[0].lock_state, LockState::RequiresPrevious);
        assert_eq!(clues[0].data, serde_json::json!({}));
    }

    #[test]
    fn parse_rejects_blank_id() {
        assert!(parse_clues(r#"[{"id": " ", "title": "Oak", "password": "p"}]"#).is_err());
        assert!(parse_clues(r#"{"id": "c1"}"#).is_err());
    }

    #[test]
    fn reseeding_updates_in_place() {
        let db = Database::open_in_memory().unwrap();
        let mut clues = parse_clues(
            r#"[
                {"id": "c1", "title": "Oak", "password": "p1", "lock_state": "none"},
                {"id": "c2", "title": "Bridge", "password": "p2", "order_index": 1,
                 "data": {"image": "bridge.png"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(db.seed_clues(&clues).unwrap(), 2);

        clues[1].title = "Stone Bridge".to_string();
        db.seed_clues(&clues).unwrap();

        let registry = Persistence::list_clues(&db).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry[0].lock_state, LockState::None);
        assert_eq!(registry[1].title, "Stone Bridge");
        assert_eq!(registry[1].payload["image"], "bridge.png");
    }
}
