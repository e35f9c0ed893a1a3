use crate::Database;
use crate::models::{ClueRow, ProgressRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

const CLUE_COLUMNS: &str = "id, title, order_index, password, lock_state, data";

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, name: &str, created_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)",
                (id, name, created_at),
            )?;
            Ok(())
        })
    }

    /// Returns false when no user has that id.
    pub fn rename_user(&self, id: &str, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("UPDATE users SET name = ?2 WHERE id = ?1", (id, name))?;
            Ok(changed > 0)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "name", name))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, created_at FROM users ORDER BY name")?;
            let rows = stmt
                .query_map([], user_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Clues --

    pub fn get_clue(&self, id: &str) -> Result<Option<ClueRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM clues WHERE id = ?1", CLUE_COLUMNS);
            let row = conn.query_row(&sql, [id], clue_row).optional()?;
            Ok(row)
        })
    }

    pub fn list_clues(&self) -> Result<Vec<ClueRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM clues ORDER BY order_index, id", CLUE_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], clue_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_clues_before(&self, order_index: i64) -> Result<Vec<ClueRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM clues WHERE order_index < ?1 ORDER BY order_index, id",
                CLUE_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([order_index], clue_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Progress --

    pub fn insert_progress(&self, user_id: &str, clue_id: &str, unlocked_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_progress (user_id, clue_id, unlocked_at) VALUES (?1, ?2, ?3)",
                (user_id, clue_id, unlocked_at),
            )?;
            Ok(())
        })
    }

    pub fn get_progress(&self, user_id: &str, clue_id: &str) -> Result<Option<ProgressRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT user_id, clue_id, unlocked_at FROM user_progress
                     WHERE user_id = ?1 AND clue_id = ?2",
                    (user_id, clue_id),
                    progress_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_progress_for_user(&self, user_id: &str) -> Result<Vec<ProgressRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, clue_id, unlocked_at FROM user_progress
                 WHERE user_id = ?1
                 ORDER BY unlocked_at",
            )?;
            let rows = stmt
                .query_map([user_id], progress_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// `(clue_id, order_index)` of every clue the user holds, in hunt order.
    pub fn get_unlocked_indices(&self, user_id: &str) -> Result<Vec<(String, i64)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.clue_id, c.order_index
                 FROM user_progress p
                 JOIN clues c ON c.id = p.clue_id
                 WHERE p.user_id = ?1
                 ORDER BY c.order_index, c.id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_progress_before(&self, user_id: &str, order_index: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM user_progress p
                 JOIN clues c ON c.id = p.clue_id
                 WHERE p.user_id = ?1 AND c.order_index < ?2",
                rusqlite::params![user_id, order_index],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, name, created_at FROM users WHERE {} = ?1", column);
    let row = conn.query_row(&sql, [value], user_row).optional()?;
    Ok(row)
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn clue_row(row: &Row<'_>) -> rusqlite::Result<ClueRow> {
    Ok(ClueRow {
        id: row.get(0)?,
        title: row.get(1)?,
        order_index: row.get(2)?,
        password: row.get(3)?,
        lock_state: row.get(4)?,
        data: row.get(5)?,
    })
}

fn progress_row(row: &Row<'_>) -> rusqlite::Result<ProgressRow> {
    Ok(ProgressRow {
        user_id: row.get(0)?,
        clue_id: row.get(1)?,
        unlocked_at: row.get(2)?,
    })
}
