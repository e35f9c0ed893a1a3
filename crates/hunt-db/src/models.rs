//! Database row types, mapped one to one onto SQLite rows.
//! Converted into hunt-types models at the store boundary.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

use hunt_types::models::{Clue, ProgressRecord, User};

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

pub struct ClueRow {
    pub id: String,
    pub title: String,
    pub order_index: i64,
    pub password: String,
    pub lock_state: String,
    pub data: String,
}

pub struct ProgressRow {
    pub user_id: String,
    pub clue_id: String,
    pub unlocked_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            created_at: parse_timestamp(&row.created_at)
                .with_context(|| format!("user {}", row.id))?,
            id: row.id,
            name: row.name,
        })
    }
}

impl TryFrom<ClueRow> for Clue {
    type Error = anyhow::Error;

    fn try_from(row: ClueRow) -> Result<Self> {
        let lock_state = row
            .lock_state
            .parse()
            .map_err(|e| anyhow::anyhow!("clue {}: {}", row.id, e))?;
        let payload = serde_json::from_str(&row.data)
            .with_context(|| format!("clue {} has corrupt data", row.id))?;
        Ok(Clue {
            id: row.id,
            title: row.title,
            order_index: row.order_index,
            password: row.password,
            lock_state,
            payload,
        })
    }
}

impl TryFrom<ProgressRow> for ProgressRecord {
    type Error = anyhow::Error;

    fn try_from(row: ProgressRow) -> Result<Self> {
        Ok(ProgressRecord {
            unlocked_at: parse_timestamp(&row.unlocked_at)
                .with_context(|| format!("progress {}/{}", row.user_id, row.clue_id))?,
            user_id: row.user_id,
            clue_id: row.clue_id,
        })
    }
}

/// Accepts RFC 3339 (what this crate writes) and SQLite's own
/// `YYYY-MM-DD HH:MM:SS`, which carries no zone and is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("corrupt timestamp '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_both_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-01T12:30:00+00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-01 12:30:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn rejects_unknown_lock_state() {
        let row = ClueRow {
            id: "c1".into(),
            title: "t".into(),
            order_index: 0,
            password: "p".into(),
            lock_state: "geofence".into(),
            data: "{}".into(),
        };
        assert!(Clue::try_from(row).is_err());
    }
}
