//! Game rules for the scavenger hunt: who may unlock which clue, and how
//! players are ordered on the leaderboard. Storage is reached only through
//! the [`Persistence`] trait so the rules stay free of I/O concerns.

pub mod clues;
pub mod error;
pub mod lock;
pub mod rank;
pub mod store;
pub mod unlock;
pub mod users;

#[cfg(test)]
mod memory;

pub use clues::ClueService;
pub use error::{HuntError, HuntResult};
pub use rank::RankEngine;
pub use store::{Persistence, StoreError, StoreResult, UnlockedIndex};
pub use unlock::{Unlocked, UnlockEngine};
pub use users::UserService;
