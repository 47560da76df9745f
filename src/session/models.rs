/*!
 * Session-specific models and DTOs.
 *
 * A `ProductSession` is the in-memory working copy of one SKU's checklist
 * while an inspector fills it in. Nothing here touches the database.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::database::models::{Answer, VerificationStatus};
use crate::errors::SessionError;
use crate::reference::{ChecklistItem, ProductTemplate};

/// Progress of a product checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// At least one item is unanswered
    Pending,
    /// All items answered, none failed
    Ok,
    /// All items answered, at least one failed
    Error,
}

impl SessionStatus {
    /// Status to persist, or `None` while the checklist is incomplete
    pub fn final_status(self) -> Option<VerificationStatus> {
        match self {
            SessionStatus::Pending => None,
            SessionStatus::Ok => Some(VerificationStatus::Ok),
            SessionStatus::Error => Some(VerificationStatus::Error),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Ok => write!(f, "ok"),
            SessionStatus::Error => write!(f, "error"),
        }
    }
}

/// Trazability fields filled in alongside the checklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDetails {
    /// Warehouse location of the pallet
    pub location: String,
    /// Inspector name
    pub inspector: String,
    /// Work shift (e.g. "Mañana")
    pub shift: String,
    /// Free-text observations
    pub notes: String,
}

/// Working checklist state for one SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSession {
    /// Product SKU
    pub sku: String,
    /// Product description from the template
    pub description: String,
    /// Stacking factor from the template
    pub stacking_factor: String,
    /// Trazability fields
    #[serde(default)]
    pub details: SessionDetails,
    /// Photo payload per checklist item name
    #[serde(default)]
    photos: BTreeMap<String, String>,
    /// Answer per checklist item name
    #[serde(default)]
    answers: BTreeMap<String, Answer>,
}

impl ProductSession {
    /// Create a fresh session with every checklist item unanswered
    pub fn from_template(template: &ProductTemplate, checklist: &[ChecklistItem]) -> Self {
        Self {
            sku: template.sku.clone(),
            description: template.description.clone(),
            stacking_factor: template.stacking_factor.clone(),
            details: SessionDetails::default(),
            photos: BTreeMap::new(),
            answers: checklist
                .iter()
                .map(|item| (item.name.clone(), Answer::Unanswered))
                .collect(),
        }
    }

    /// Status derived from the answers
    pub fn status(&self) -> SessionStatus {
        if self.answers.is_empty() || !self.answers.values().all(|a| a.is_answered()) {
            SessionStatus::Pending
        } else if self.answers.values().any(|a| *a == Answer::No) {
            SessionStatus::Error
        } else {
            SessionStatus::Ok
        }
    }

    /// Whether the session can be recorded
    pub fn is_committable(&self) -> bool {
        self.status() != SessionStatus::Pending
    }

    /// Answer for a checklist item, unanswered if unknown
    pub fn answer(&self, item: &str) -> Answer {
        self.answers.get(item).copied().unwrap_or_default()
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    pub fn photos(&self) -> &BTreeMap<String, String> {
        &self.photos
    }

    /// Number of attached photos
    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Number of answered checklist items
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| a.is_answered()).count()
    }

    /// Set the answer for one checklist item
    pub fn set_answer(&mut self, item: &str, answer: Answer) -> Result<(), SessionError> {
        if !self.answers.contains_key(item) {
            return Err(self.unknown_item(item));
        }
        self.answers.insert(item.to_string(), answer);
        Ok(())
    }

    /// Attach (or replace) the photo documenting a checklist item
    pub fn attach_photo(&mut self, item: &str, payload: String) -> Result<(), SessionError> {
        if !self.answers.contains_key(item) {
            return Err(self.unknown_item(item));
        }
        self.photos.insert(item.to_string(), payload);
        Ok(())
    }

    /// Remove the photo for a checklist item, returning it if present
    pub fn remove_photo(&mut self, item: &str) -> Option<String> {
        self.photos.remove(item)
    }

    /// Clear everything except the template fields
    pub fn reset(&mut self) {
        self.details = SessionDetails::default();
        self.photos.clear();
        for answer in self.answers.values_mut() {
            *answer = Answer::Unanswered;
        }
    }

    fn unknown_item(&self, item: &str) -> SessionError {
        SessionError::UnknownChecklistItem {
            sku: self.sku.clone(),
            item: item.to_string(),
        }
    }
}

impl fmt::Display for ProductSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}/{} answered, {} photo(s), {})",
            self.sku,
            self.description,
            self.answered_count(),
            self.answers.len(),
            self.photo_count(),
            self.status()
        )
    }
}
