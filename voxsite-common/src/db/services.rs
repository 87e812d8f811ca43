//! Services table operations
//!
//! The services list is small (tens of rows) and human-curated, so
//! every accessor is a direct row operation. Reordering deliberately
//! issues one independent UPDATE per row with no surrounding
//! transaction; the caller detects partial failure and re-fetches.

use crate::models::Service;
use crate::{Error, Result};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

fn row_to_service(row: (String, String, i64, i64, i64)) -> Result<Service> {
    let id = Uuid::parse_str(&row.0)
        .map_err(|e| Error::Internal(format!("Corrupt service id '{}': {}", row.0, e)))?;
    Ok(Service {
        id,
        title: row.1,
        is_best_seller: row.2 != 0,
        is_recommended: row.3 != 0,
        order_position: row.4,
    })
}

/// List all services ordered for display.
pub async fn list_services(db: &Pool<Sqlite>) -> Result<Vec<Service>> {
    let rows = sqlx::query_as::<_, (String, String, i64, i64, i64)>(
        "SELECT id, title, is_best_seller, is_recommended, order_position
         FROM services ORDER BY order_position ASC, title ASC",
    )
    .fetch_all(db)
    .await?;

    rows.into_iter().map(row_to_service).collect()
}

/// Fetch one service by id.
pub async fn get_service(db: &Pool<Sqlite>, id: Uuid) -> Result<Service> {
    let row = sqlx::query_as::<_, (String, String, i64, i64, i64)>(
        "SELECT id, title, is_best_seller, is_recommended, order_position
         FROM services WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(db)
    .await?;

    match row {
        Some(row) => row_to_service(row),
        None => Err(Error::NotFound(format!("service {}", id))),
    }
}

/// Insert a service row.
pub async fn insert_service(db: &Pool<Sqlite>, service: &Service) -> Result<()> {
    sqlx::query(
        "INSERT INTO services (id, title, is_best_seller, is_recommended, order_position)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(service.id.to_string())
    .bind(&service.title)
    .bind(service.is_best_seller as i64)
    .bind(service.is_recommended as i64)
    .bind(service.order_position)
    .execute(db)
    .await?;

    Ok(())
}

/// Update a service row's editable fields.
pub async fn update_service(db: &Pool<Sqlite>, service: &Service) -> Result<()> {
    let result = sqlx::query(
        "UPDATE services
         SET title = ?, is_best_seller = ?, is_recommended = ?, order_position = ?
         WHERE id = ?",
    )
    .bind(&service.title)
    .bind(service.is_best_seller as i64)
    .bind(service.is_recommended as i64)
    .bind(service.order_position)
    .bind(service.id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("service {}", service.id)));
    }
    Ok(())
}

/// Delete a service row.
pub async fn delete_service(db: &Pool<Sqlite>, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("service {}", id)));
    }
    Ok(())
}

/// Rewrite one row's order_position. Used by the reorder batch, one
/// call per affected row.
pub async fn set_order_position(db: &Pool<Sqlite>, id: Uuid, order_position: i64) -> Result<()> {
    let result = sqlx::query("UPDATE services SET order_position = ? WHERE id = ?")
        .bind(order_position)
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("service {}", id)));
    }
    Ok(())
}

/// Count service rows.
pub async fn count_services(db: &Pool<Sqlite>) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services")
        .fetch_one(db)
        .await?;
    Ok(count)
}
