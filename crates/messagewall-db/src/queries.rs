use crate::Database;
use crate::models::{MessageFilter, MessageRow, NewMessage};
use anyhow::Result;
use rusqlite::Connection;
use rusqlite::types::ToSql;

impl Database {
    /// Inserts a validated message and returns the id SQLite assigned.
    pub fn insert_message(&self, msg: &NewMessage<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (identity, nickname, content, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![msg.identity, msg.nickname, msg.content, msg.kind, msg.created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest first. `id` breaks ties between posts in the same millisecond.
    pub fn list_messages(&self, filter: &MessageFilter) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, filter))
    }
}

fn query_messages(conn: &Connection, filter: &MessageFilter) -> Result<Vec<MessageRow>> {
    let limit = i64::from(filter.limit);
    let offset = i64::try_from(filter.offset)?;

    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if let Some(identity) = &filter.identity {
        clauses.push("identity = ?");
        params.push(identity);
    }
    if let Some(kind) = &filter.kind {
        clauses.push("kind = ?");
        params.push(kind);
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    params.push(&limit);
    params.push(&offset);

    let sql = format!(
        "SELECT id, identity, nickname, content, kind, created_at
         FROM messages
         {}
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
        where_sql
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                identity: row.get(1)?,
                nickname: row.get(2)?,
                content: row.get(3)?,
                kind: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
