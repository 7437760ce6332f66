use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Creates the schema if it does not exist yet. Safe to run on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            identity    TEXT NOT NULL,
            nickname    TEXT,
            content     TEXT NOT NULL,
            kind        TEXT NOT NULL CHECK (kind IN ('wall', 'note')),
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_created
            ON messages(created_at DESC);

        CREATE INDEX IF NOT EXISTS idx_messages_identity
            ON messages(identity);
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}
