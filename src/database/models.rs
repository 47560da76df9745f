/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Answer to a single checklist question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Answer {
    /// Item passed
    #[serde(rename = "si")]
    Si,
    /// Item failed
    #[serde(rename = "no")]
    No,
    /// Not answered yet
    #[default]
    #[serde(rename = "")]
    Unanswered,
}

impl Answer {
    pub fn is_answered(self) -> bool {
        self != Answer::Unanswered
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Si => write!(f, "si"),
            Answer::No => write!(f, "no"),
            Answer::Unanswered => write!(f, ""),
        }
    }
}

impl std::str::FromStr for Answer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "si" | "sí" => Ok(Answer::Si),
            "no" => Ok(Answer::No),
            "" => Ok(Answer::Unanswered),
            _ => Err(anyhow::anyhow!("Invalid answer: {}", s)),
        }
    }
}

/// Final outcome of a recorded verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Every checklist item passed
    Ok,
    /// At least one checklist item failed
    Error,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Ok => write!(f, "ok"),
            VerificationStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(VerificationStatus::Ok),
            "error" => Ok(VerificationStatus::Error),
            _ => Err(anyhow::anyhow!("Invalid verification status: {}", s)),
        }
    }
}

/// Persisted verification of one SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Auto-incremented identifier
    pub id: i64,
    /// Product SKU
    pub sku: String,
    /// Product description at the time of verification
    pub description: String,
    /// Stacking factor at the time of verification
    pub stacking_factor: String,
    /// Final status
    pub status: VerificationStatus,
    /// Creation timestamp (RFC 3339, UTC)
    pub created_at: String,
    /// Inspector name
    pub inspector: String,
    /// Work shift
    pub shift: String,
    /// Warehouse location
    pub location: String,
    /// Free-text observations
    pub observations: String,
    /// Answer per checklist item name
    pub answers: BTreeMap<String, Answer>,
    /// Number of photos recorded with this verification
    pub total_photos: i64,
}

impl VerificationRecord {
    /// Checklist items answered "no"
    pub fn failed_items(&self) -> Vec<&str> {
        self.answers
            .iter()
            .filter(|(_, answer)| **answer == Answer::No)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Verification about to be inserted (no id yet)
#[derive(Debug, Clone)]
pub struct NewVerification {
    pub sku: String,
    pub description: String,
    pub stacking_factor: String,
    pub status: VerificationStatus,
    pub created_at: String,
    pub inspector: String,
    pub shift: String,
    pub location: String,
    pub observations: String,
    pub answers: BTreeMap<String, Answer>,
    /// Photos keyed by checklist item name
    pub photos: BTreeMap<String, String>,
}

impl NewVerification {
    pub fn total_photos(&self) -> i64 {
        self.photos.len() as i64
    }
}

/// Persisted photo attached to a verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Auto-incremented identifier
    pub id: i64,
    /// Owning verification
    pub verification_id: i64,
    /// Checklist item the photo documents
    pub parameter: String,
    /// Self-contained encoded image (data URL)
    pub payload: String,
    /// Creation timestamp (RFC 3339, UTC)
    pub created_at: String,
}

/// Aggregate counts over all recorded verifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStats {
    /// Number of verifications
    pub total: i64,
    /// Verifications with status ok
    pub ok: i64,
    /// Verifications with at least one failed item
    pub error: i64,
    /// Sum of photo counts
    pub photos: i64,
}

impl VerificationStats {
    /// Share of verifications with status ok, in percent
    pub fn ok_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.ok as f64 / self.total as f64) * 100.0
    }
}

impl fmt::Display for VerificationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, OK: {}, With issues: {}, Photos: {} ({:.1}% OK)",
            self.total,
            self.ok,
            self.error,
            self.photos,
            self.ok_percentage()
        )
    }
}
