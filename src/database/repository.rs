/*!
 * Repository layer for database operations.
 *
 * This module provides the persistence store consumed by the front end:
 * recording verifications together with their photos, reading them back,
 * and clearing all data. The repository starts unopened; until
 * `initialize` succeeds every operation fails fast with `StoreUnavailable`.
 */

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::connection::{DatabaseConnection, DatabaseStats, StoreLocation};
use super::models::{
    Answer, NewVerification, PhotoRecord, VerificationRecord, VerificationStats,
    VerificationStatus,
};
use crate::errors::StoreError;
use crate::session::models::ProductSession;

const VERIFICATION_COLUMNS: &str = "id, sku, description, stacking_factor, status, created_at, \
     inspector, shift, location, observations, answers, total_photos";

/// Repository for verification and photo records
#[derive(Clone)]
pub struct Repository {
    /// Where the database is (or will be) opened
    location: StoreLocation,
    /// Connection, set once by `initialize`
    db: Arc<OnceCell<DatabaseConnection>>,
}

impl Repository {
    /// Create an unopened repository for the given location
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            db: Arc::new(OnceCell::new()),
        }
    }

    /// Create and initialize a repository
    pub async fn open(location: StoreLocation) -> Result<Self, StoreError> {
        let repo = Self::new(location);
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create a repository with an in-memory database (for testing)
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(StoreLocation::InMemory).await
    }

    /// Open the database, creating tables on first use
    ///
    /// Calling this again after a success is a no-op. After a failure the
    /// repository stays unavailable and the call may be retried.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let location = self.location.clone();

        let result = self
            .db
            .get_or_try_init(|| async move {
                tokio::task::spawn_blocking(move || DatabaseConnection::open(&location))
                    .await
                    .context("Database open task panicked")?
            })
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Failed to open verification store at {}: {:#}", self.location, e);
                Err(StoreError::unavailable(e))
            }
        }
    }

    /// Whether `initialize` has succeeded
    pub fn is_available(&self) -> bool {
        self.db.initialized()
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn connection(&self) -> Result<&DatabaseConnection, StoreError> {
        self.db.get().ok_or_else(|| {
            StoreError::StoreUnavailable(format!("store at {} is not open", self.location))
        })
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Record a finished session as one verification plus its photos
    ///
    /// Both inserts run in a single transaction; on error nothing is written.
    /// Returns the id of the new verification.
    ///
    /// The status comes from the answers the session carries. The store does
    /// not compare them with the checklist, so a session missing items counts
    /// only the ones present. Sessions built by `SessionBoard` always carry the
    /// full checklist.
    pub async fn record_verification(&self, session: &ProductSession) -> Result<i64, StoreError> {
        let db = self.connection()?;

        let status = session.status().final_status().ok_or_else(|| StoreError::InvalidSession {
            sku: session.sku.clone(),
            reason: "checklist is still pending".to_string(),
        })?;

        let verification = NewVerification {
            sku: session.sku.clone(),
            description: session.description.clone(),
            stacking_factor: session.stacking_factor.clone(),
            status,
            created_at: now_timestamp(),
            inspector: session.details.inspector.clone(),
            shift: session.details.shift.clone(),
            location: session.details.location.clone(),
            observations: session.details.notes.clone(),
            answers: session.answers().clone(),
            photos: session.photos().clone(),
        };
        let sku = verification.sku.clone();
        let photo_count = verification.total_photos();

        let id = db
            .transaction_async(move |tx| {
                let answers = serde_json::to_string(&verification.answers)
                    .context("Failed to serialize checklist answers")?;

                tx.execute(
                    r#"
                    INSERT INTO verifications (
                        sku, description, stacking_factor, status, created_at,
                        inspector, shift, location, observations, answers, total_photos
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    "#,
                    params![
                        verification.sku,
                        verification.description,
                        verification.stacking_factor,
                        verification.status.to_string(),
                        verification.created_at,
                        verification.inspector,
                        verification.shift,
                        verification.location,
                        verification.observations,
                        answers,
                        verification.total_photos(),
                    ],
                )?;
                let verification_id = tx.last_insert_rowid();

                for (parameter, payload) in &verification.photos {
                    tx.execute(
                        r#"
                        INSERT INTO photos (verification_id, parameter, payload, created_at)
                        VALUES (?1, ?2, ?3, ?4)
                        "#,
                        params![verification_id, parameter, payload, now_timestamp()],
                    )?;
                }

                Ok(verification_id)
            })
            .await
            .map_err(StoreError::transaction)?;

        info!(
            "Recorded verification {} for SKU {} ({} photo(s))",
            id, sku, photo_count
        );
        Ok(id)
    }

    /// Delete every verification and photo
    ///
    /// Runs in one transaction: on error both tables are left as they were.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        let db = self.connection()?;

        let (photos, verifications) = db
            .transaction_async(|tx| {
                let photos = tx.execute("DELETE FROM photos", [])?;
                let verifications = tx.execute("DELETE FROM verifications", [])?;
                Ok((photos, verifications))
            })
            .await
            .map_err(StoreError::transaction)?;

        info!(
            "Cleared {} verification(s) and {} photo(s)",
            verifications, photos
        );
        Ok(())
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// All verifications, in insertion order
    ///
    /// Callers wanting a display order should use `history`.
    pub async fn list_verifications(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        let db = self.connection()?;

        db.execute_async(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM verifications ORDER BY id",
                VERIFICATION_COLUMNS
            ))?;
            let rows = stmt.query_map([], parse_verification_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
        .map_err(StoreError::query)
    }

    /// Verifications newest first, optionally restricted to one SKU
    pub async fn history(&self, sku: Option<&str>) -> Result<Vec<VerificationRecord>, StoreError> {
        let db = self.connection()?;
        let sku = sku.map(str::to_string);

        db.execute_async(move |conn| {
            let records = match sku {
                Some(sku) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM verifications WHERE sku = ?1 ORDER BY created_at DESC, id DESC",
                        VERIFICATION_COLUMNS
                    ))?;
                    let rows = stmt.query_map([sku], parse_verification_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM verifications ORDER BY created_at DESC, id DESC",
                        VERIFICATION_COLUMNS
                    ))?;
                    let rows = stmt.query_map([], parse_verification_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            };
            Ok(records)
        })
        .await
        .map_err(StoreError::query)
    }

    /// Get a verification by id, `None` if it does not exist
    pub async fn get_verification(&self, id: i64) -> Result<Option<VerificationRecord>, StoreError> {
        let db = self.connection()?;

        let result = db
            .execute_async(move |conn| {
                let record = conn
                    .query_row(
                        &format!("SELECT {} FROM verifications WHERE id = ?1", VERIFICATION_COLUMNS),
                        [id],
                        parse_verification_row,
                    )
                    .optional()?;
                Ok(record)
            })
            .await
            .map_err(StoreError::query)?;

        if result.is_none() {
            debug!("Verification {} not found", id);
        }
        Ok(result)
    }

    /// All photos recorded with the given verification
    pub async fn list_photos_for_verification(
        &self,
        verification_id: i64,
    ) -> Result<Vec<PhotoRecord>, StoreError> {
        let db = self.connection()?;

        db.execute_async(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, verification_id, parameter, payload, created_at
                FROM photos
                WHERE verification_id = ?1
                ORDER BY id
                "#,
            )?;

            let rows = stmt.query_map([verification_id], |row| {
                Ok(PhotoRecord {
                    id: row.get(0)?,
                    verification_id: row.get(1)?,
                    parameter: row.get(2)?,
                    payload: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;

            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
        .map_err(StoreError::query)
    }

    /// Totals for the statistics view
    pub async fn statistics(&self) -> Result<VerificationStats, StoreError> {
        let db = self.connection()?;

        db.execute_async(|conn| {
            let stats = conn.query_row(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(status = 'ok'), 0),
                       COALESCE(SUM(status = 'error'), 0),
                       COALESCE(SUM(total_photos), 0)
                FROM verifications
                "#,
                [],
                |row| {
                    Ok(VerificationStats {
                        total: row.get(0)?,
                        ok: row.get(1)?,
                        error: row.get(2)?,
                        photos: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
        .map_err(StoreError::query)
    }

    /// Record counts and on-disk size of the store
    pub async fn storage_usage(&self) -> Result<DatabaseStats, StoreError> {
        let db = self.connection()?.clone();

        tokio::task::spawn_blocking(move || db.stats())
            .await
            .context("Database task panicked")
            .and_then(|stats| stats)
            .map_err(StoreError::query)
    }
}

/// Current instant as a fixed-width RFC 3339 UTC timestamp
///
/// Fixed width keeps lexicographic order equal to chronological order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_verification_row(row: &Row) -> rusqlite::Result<VerificationRecord> {
    let status: String = row.get(4)?;
    let answers: String = row.get(10)?;

    Ok(VerificationRecord {
        id: row.get(0)?,
        sku: row.get(1)?,
        description: row.get(2)?,
        stacking_factor: row.get(3)?,
        status: status.parse::<VerificationStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?,
        created_at: row.get(5)?,
        inspector: row.get(6)?,
        shift: row.get(7)?,
        location: row.get(8)?,
        observations: row.get(9)?,
        answers: serde_json::from_str::<BTreeMap<String, Answer>>(&answers).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, Box::new(e))
        })?,
        total_photos: row.get(11)?,
    })
}
