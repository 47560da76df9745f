/*!
 * Session board for the current working session.
 *
 * This module handles:
 * - Creating one checklist session per product template
 * - Looking up and filtering sessions by SKU or description
 * - Applying answers, photos and trazability details
 * - Committing finished sessions to the verification store
 */

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::database::models::Answer;
use crate::database::repository::Repository;
use crate::errors::{SessionError, StoreError};
use crate::reference::{scanned_sku, ReferenceData};

use super::models::{ProductSession, SessionDetails};

/// Destination for finished sessions
#[async_trait]
pub trait VerificationSink: Send + Sync {
    /// Persist one finished session, returning the new verification id
    async fn record_verification(&self, session: &ProductSession) -> Result<i64, StoreError>;
}

#[async_trait]
impl VerificationSink for Repository {
    async fn record_verification(&self, session: &ProductSession) -> Result<i64, StoreError> {
        Repository::record_verification(self, session).await
    }
}

/// One session written during a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedVerification {
    /// SKU of the committed session
    pub sku: String,
    /// Id assigned by the store
    pub verification_id: i64,
}

/// Outcome of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Verifications written, in board order
    pub committed: Vec<CommittedVerification>,
}

impl CommitSummary {
    pub fn count(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

/// In-memory checklist state for every product in the catalog
pub struct SessionBoard {
    /// Catalog and checklist the sessions were built from
    reference: ReferenceData,
    /// One session per product template, in template order
    sessions: Vec<ProductSession>,
}

impl SessionBoard {
    /// Start a working session with fresh checklists for every product
    pub fn new(reference: ReferenceData) -> Self {
        let sessions = reference
            .products
            .iter()
            .map(|template| ProductSession::from_template(template, &reference.checklist))
            .collect();

        Self { reference, sessions }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn sessions(&self) -> &[ProductSession] {
        &self.sessions
    }

    /// Session for an exact SKU
    pub fn find(&self, sku: &str) -> Option<&ProductSession> {
        self.sessions.iter().find(|s| s.sku == sku)
    }

    /// Session for the SKU printed on a scanned product label
    pub fn find_scanned(&self, decoded: &str) -> Option<&ProductSession> {
        let Some(sku) = scanned_sku(decoded) else {
            debug!("No SKU label in scanned text '{}'", decoded);
            return None;
        };
        self.find(sku)
    }

    /// Sessions whose SKU or description contains the term, ignoring case
    pub fn search(&self, term: &str) -> Vec<&ProductSession> {
        let term = term.to_lowercase();
        self.sessions
            .iter()
            .filter(|s| {
                s.sku.to_lowercase().contains(&term) || s.description.to_lowercase().contains(&term)
            })
            .collect()
    }

    fn session_mut(&mut self, sku: &str) -> Result<&mut ProductSession, SessionError> {
        self.sessions
            .iter_mut()
            .find(|s| s.sku == sku)
            .ok_or_else(|| SessionError::UnknownProduct(sku.to_string()))
    }

    /// Answer one checklist item for a product
    pub fn answer(&mut self, sku: &str, item: &str, answer: Answer) -> Result<(), SessionError> {
        let session = self.session_mut(sku)?;
        session.set_answer(item, answer)?;
        debug!("SKU {}: {} = '{}' ({})", sku, item, answer, session.status());
        Ok(())
    }

    /// Attach a photo to a checklist item of a product
    pub fn attach_photo(&mut self, sku: &str, item: &str, payload: String) -> Result<(), SessionError> {
        let session = self.session_mut(sku)?;
        session.attach_photo(item, payload)?;
        debug!("SKU {}: photo attached for {} ({} total)", sku, item, session.photo_count());
        Ok(())
    }

    /// Remove a photo, returning whether one was attached
    pub fn remove_photo(&mut self, sku: &str, item: &str) -> Result<bool, SessionError> {
        Ok(self.session_mut(sku)?.remove_photo(item).is_some())
    }

    /// Replace the trazability details of a product
    pub fn set_details(&mut self, sku: &str, details: SessionDetails) -> Result<(), SessionError> {
        self.session_mut(sku)?.details = details;
        Ok(())
    }

    /// Replace a product's session with an edited copy
    ///
    /// The copy must belong to a known SKU and only use checklist items the
    /// board knows; template fields are taken from the catalog.
    pub fn save_checklist(&mut self, edited: ProductSession) -> Result<(), SessionError> {
        let mut fresh = {
            let template = self
                .reference
                .product(&edited.sku)
                .ok_or_else(|| SessionError::UnknownProduct(edited.sku.clone()))?;
            ProductSession::from_template(template, &self.reference.checklist)
        };

        for (item, answer) in edited.answers() {
            fresh.set_answer(item, *answer)?;
        }
        for (item, payload) in edited.photos() {
            fresh.attach_photo(item, payload.clone())?;
        }
        fresh.details = edited.details;

        let slot = self.session_mut(&edited.sku)?;
        *slot = fresh;
        Ok(())
    }

    /// Sessions ready to be recorded
    pub fn committable(&self) -> Vec<&ProductSession> {
        self.sessions.iter().filter(|s| s.is_committable()).collect()
    }

    /// Record every finished session and reset the ones recorded
    ///
    /// Sessions are written one transaction each, in board order. If one
    /// fails, the sessions recorded before it stay reset and it and the
    /// remaining ones keep their state.
    pub async fn commit<S>(&mut self, sink: &S) -> Result<CommitSummary, SessionError>
    where
        S: VerificationSink + ?Sized,
    {
        let ready: Vec<usize> = self
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_committable())
            .map(|(i, _)| i)
            .collect();

        let mut summary = CommitSummary::default();
        if ready.is_empty() {
            info!("No completed verifications to commit");
            return Ok(summary);
        }

        for index in ready {
            let session = &self.sessions[index];
            match sink.record_verification(session).await {
                Ok(verification_id) => {
                    summary.committed.push(CommittedVerification {
                        sku: session.sku.clone(),
                        verification_id,
                    });
                    self.sessions[index].reset();
                }
                Err(source) => {
                    let sku = session.sku.clone();
                    warn!(
                        "Commit stopped at SKU {} after {} verification(s): {}",
                        sku,
                        summary.count(),
                        source
                    );
                    return Err(SessionError::CommitFailed {
                        committed: summary.count(),
                        sku,
                        source,
                    });
                }
            }
        }

        info!("Committed {} verification(s)", summary.count());
        Ok(summary)
    }
}
