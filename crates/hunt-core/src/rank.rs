use std::cmp::Ordering;
use std::collections::HashSet;

use hunt_types::models::{Clue, RankedUser};

use crate::error::{HuntError, HuntResult};
use crate::store::{Persistence, UnlockedIndex};

/// Leaderboard ordering over everything the store holds.
///
/// Users are ordered by streak, then total clues, then name, and ranked
/// 1..n in that order with no shared ranks. Users who have unlocked nothing
/// are left off the board.
pub struct RankEngine<'a> {
    store: &'a dyn Persistence,
}

struct Standing {
    user_id: String,
    entry: RankedUser,
}

impl<'a> RankEngine<'a> {
    pub fn new(store: &'a dyn Persistence) -> Self {
        Self { store }
    }

    pub fn compute_leaderboard(&self) -> HuntResult<Vec<RankedUser>> {
        Ok(self.standings()?.into_iter().map(|s| s.entry).collect())
    }

    pub fn get_user_rank(&self, user_id: &str) -> HuntResult<RankedUser> {
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| HuntError::NotFound("User not found".to_string()))?;

        let standings = self.standings()?;
        if let Some(found) = standings.iter().find(|s| s.user_id == user.id) {
            return Ok(found.entry.clone());
        }

        Ok(RankedUser {
            username: user.name,
            consecutive_clues: 0,
            total_clues: 0,
            rank: standings.len() as u32 + 1,
        })
    }

    fn standings(&self) -> HuntResult<Vec<Standing>> {
        let registry = self.store.list_clues()?;
        let users = self.store.all_users()?;

        let mut standings = Vec::with_capacity(users.len());
        for user in users {
            let unlocked = self.store.all_progress_for_user(&user.id)?;
            if unlocked.is_empty() {
                continue;
            }
            standings.push(Standing {
                entry: RankedUser {
                    username: user.name,
                    consecutive_clues: consecutive_clues(&registry, &unlocked),
                    total_clues: unlocked.len() as u32,
                    rank: 0,
                },
                user_id: user.id,
            });
        }

        standings.sort_by(compare);
        for (position, standing) in standings.iter_mut().enumerate() {
            standing.entry.rank = position as u32 + 1;
        }
        Ok(standings)
    }
}

fn compare(a: &Standing, b: &Standing) -> Ordering {
    b.entry
        .consecutive_clues
        .cmp(&a.entry.consecutive_clues)
        .then_with(|| b.entry.total_clues.cmp(&a.entry.total_clues))
        .then_with(|| a.entry.username.cmp(&b.entry.username))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Length of the unbroken run of unlocked clues from the start of the hunt.
///
/// `registry` must be in hunt order. The walk follows registry positions, so
/// a registry numbered 0, 10, 20 has no gaps.
pub fn consecutive_clues(registry: &[Clue], unlocked: &[UnlockedIndex]) -> u32 {
    let held: HashSet<&str> = unlocked.iter().map(|u| u.clue_id.as_str()).collect();
    registry
        .iter()
        .take_while(|clue| held.contains(clue.id.as_str()))
        .count() as u32
}
