use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Rule deciding whether a clue can be unlocked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    None,
    #[default]
    RequiresPrevious,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::RequiresPrevious => "requires_previous",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "requires_previous" => Ok(Self::RequiresPrevious),
            other => Err(format!("unknown lock state '{}'", other)),
        }
    }
}

/// A clue as seeded by the hunt administrator. The password is the tag id
/// printed on the physical tag and never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Clue {
    pub id: String,
    pub title: String,
    pub order_index: i64,
    pub password: String,
    pub lock_state: LockState,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub clue_id: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Public projection of a clue the user has unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedClue {
    pub id: String,
    pub title: String,
    pub order_index: i64,
    pub data: serde_json::Value,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedClue {
    pub fn new(clue: &Clue, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: clue.id.clone(),
            title: clue.title.clone(),
            order_index: clue.order_index,
            data: clue.payload.clone(),
            unlocked_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueStatus {
    Locked,
    Unlocked,
}

/// One row of a user's hunt map: every clue, with whether this user has it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClueSummary {
    pub id: String,
    pub title: String,
    pub order_index: i64,
    pub status: ClueStatus,
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    pub username: String,
    pub consecutive_clues: u32,
    pub total_clues: u32,
    pub rank: u32,
}
