//! Site text blocks
//!
//! Editable copy shown on the landing page (hero title, about text,
//! WhatsApp contact number). Plain key → text rows, no markup handling.

use crate::Result;
use sqlx::{Pool, Sqlite};
use std::collections::BTreeMap;

/// Read one content block.
pub async fn get_content(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM site_content WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|(value,)| value))
}

/// Write one content block, creating or replacing it.
pub async fn set_content(db: &Pool<Sqlite>, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO site_content (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await?;
    Ok(())
}

/// All content blocks, keyed, for the admin editor and the public page.
pub async fn list_content(db: &Pool<Sqlite>) -> Result<BTreeMap<String, String>> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM site_content")
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().collect())
}
