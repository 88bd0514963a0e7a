use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::infra::sqlite::schema::open_connection;

pub fn load_grid_state(db_path: &Path, page_path: &str) -> Result<Option<String>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT state_json
         FROM grid_state
         WHERE page_path = ?1",
        [page_path],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .with_context(|| format!("failed to query grid state for {page_path}"))
}

pub fn upsert_grid_state(db_path: &Path, page_path: &str, state_json: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO grid_state(page_path, state_json, saved_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(page_path) DO UPDATE SET
            state_json = excluded.state_json,
            saved_at = excluded.saved_at",
        params![page_path, state_json, Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("failed to store grid state for {page_path}"))?;
    Ok(())
}

pub fn delete_grid_state(db_path: &Path, page_path: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM grid_state WHERE page_path = ?1", [page_path])
        .with_context(|| format!("failed to delete grid state for {page_path}"))?;
    Ok(())
}
