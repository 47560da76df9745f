/*!
 * Session management module for checklist sessions.
 *
 * This module provides:
 * - Per-SKU checklist state with a status derived from the answers
 * - The session board holding every product of the working session
 * - Commit of finished sessions to the verification store
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::{CommitSummary, CommittedVerification, SessionBoard, VerificationSink};
pub use models::{ProductSession, SessionDetails, SessionStatus};
