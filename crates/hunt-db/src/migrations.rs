use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE clues (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                order_index INTEGER NOT NULL DEFAULT 0,
                password    TEXT NOT NULL,
                lock_state  TEXT NOT NULL DEFAULT 'requires_previous'
                            CHECK (lock_state IN ('none', 'requires_previous')),
                data        TEXT NOT NULL DEFAULT '{}',
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_clues_order ON clues(order_index);

            CREATE TABLE user_progress (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     TEXT NOT NULL REFERENCES users(id),
                clue_id     TEXT NOT NULL REFERENCES clues(id),
                unlocked_at TEXT NOT NULL,
                UNIQUE(user_id, clue_id)
            );

            CREATE INDEX idx_progress_user ON user_progress(user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
