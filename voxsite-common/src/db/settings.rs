//! Settings database operations
//!
//! Generic get/set accessors over the settings key-value table. Values
//! are stored as JSON so callers can persist any serde-compatible
//! shape under a fixed key.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Pool, Sqlite};

/// Read a setting, deserializing its JSON value.
///
/// Returns `None` when the key has never been written.
pub async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match row {
        Some((value,)) => {
            let parsed = serde_json::from_str(&value).map_err(|e| {
                Error::Internal(format!("Corrupt setting '{}': {}", key, e))
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Write a setting, serializing the value as JSON.
pub async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string(&value)
        .map_err(|e| Error::Internal(format!("Cannot serialize setting '{}': {}", key, e)))?;

    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(json)
    .execute(db)
    .await?;

    Ok(())
}
