//! Image record queries.
//!
//! This module provides the create/update path for rows of the `image` table
//! and the read operations used by collaborators.

use imagestore_common::{BoundingBox, Error, ImageId, ImageStatus, Prediction, Result};
use rusqlite::{types::Type, Connection};

use crate::models::ImageRecord;

const IMAGE_COLUMNS: &str = "id, timestamp, path, status, class, xmin, ymin, xmax, ymax";

/// Parse an image record from a database row.
///
/// Expects columns in order: id, timestamp, path, status, class, xmin, ymin, xmax, ymax.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
    let status = row
        .get::<_, String>(3)?
        .parse::<ImageStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;

    let corners: (Option<f64>, Option<f64>, Option<f64>, Option<f64>) =
        (row.get(5)?, row.get(6)?, row.get(7)?, row.get(8)?);
    let bbox = match corners {
        (Some(xmin), Some(ymin), Some(xmax), Some(ymax)) => {
            Some(BoundingBox::new(xmin, ymin, xmax, ymax))
        }
        _ => None,
    };

    Ok(ImageRecord {
        id: ImageId::from(row.get::<_, i64>(0)?),
        timestamp: row.get(1)?,
        path: row.get(2)?,
        status,
        class_confidence: row.get(4)?,
        bbox,
    })
}

fn query_images(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ImageRecord>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let images = stmt
        .query_map(params, parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// Insert a new `pending` record with only its timestamp set.
///
/// The id is allocated by the table's autoincrement column.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `timestamp` - Creation time, formatted `YYYY-MM-DD_HH:MM:SS.mmm`
///
/// # Returns
///
/// * `Ok(ImageId)` - The ID of the inserted record
/// * `Err(Error)` - If a database error occurs
pub fn insert_pending(conn: &Connection, timestamp: &str) -> Result<ImageId> {
    conn.execute(
        "INSERT INTO image (timestamp) VALUES (:timestamp)",
        rusqlite::named_params! { ":timestamp": timestamp },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(ImageId::from(conn.last_insert_rowid()))
}

/// Attach the stored file location to a record.
///
/// # Returns
///
/// * `Ok(true)` - If the record was updated
/// * `Ok(false)` - If no record has that id
/// * `Err(Error)` - If a database error occurs
pub fn set_path(conn: &Connection, id: ImageId, path: &str) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "UPDATE image SET path = :path WHERE id = :id",
            rusqlite::named_params! { ":id": id.get(), ":path": path },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Move a `pending` record to `predicted` and store the detector result.
///
/// Records that are already `predicted` are left unchanged; there is no
/// re-prediction.
///
/// # Returns
///
/// * `Ok(true)` - If the record transitioned
/// * `Ok(false)` - If no pending record has that id
/// * `Err(Error)` - If a database error occurs
pub fn mark_predicted(conn: &Connection, id: ImageId, prediction: &Prediction) -> Result<bool> {
    let bbox = prediction.bbox;
    let rows_affected = conn
        .execute(
            "UPDATE image
             SET status = :status, class = :class,
                 xmin = :xmin, ymin = :ymin, xmax = :xmax, ymax = :ymax
             WHERE id = :id AND status = :pending",
            rusqlite::named_params! {
                ":id": id.get(),
                ":status": ImageStatus::Predicted.to_string(),
                ":pending": ImageStatus::Pending.to_string(),
                ":class": prediction.confidence,
                ":xmin": bbox.map(|b| b.xmin),
                ":ymin": bbox.map(|b| b.ymin),
                ":xmax": bbox.map(|b| b.xmax),
                ":ymax": bbox.map(|b| b.ymax),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Get an image record by ID.
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The record if found
/// * `Ok(None)` - If the record does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<ImageRecord>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM image WHERE id = :id", IMAGE_COLUMNS),
        rusqlite::named_params! { ":id": id.get() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every record in id order.
pub fn list_images(conn: &Connection) -> Result<Vec<ImageRecord>> {
    query_images(
        conn,
        &format!("SELECT {} FROM image ORDER BY id", IMAGE_COLUMNS),
        [],
    )
}

/// List records with the given status in id order.
pub fn list_images_by_status(conn: &Connection, status: ImageStatus) -> Result<Vec<ImageRecord>> {
    query_images(
        conn,
        &format!(
            "SELECT {} FROM image WHERE status = :status ORDER BY id",
            IMAGE_COLUMNS
        ),
        rusqlite::named_params! { ":status": status.to_string() },
    )
}

/// Count all image records.
pub fn count_images(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM image", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(count as u64)
}
