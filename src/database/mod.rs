/*!
 * Database module for persistent storage of verifications and photos.
 *
 * This module provides SQLite-based persistence for:
 * - Verification records, one per committed checklist
 * - Photo records owned by a verification
 * - History and statistics queries over both
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats, StoreLocation};
pub use repository::Repository;
