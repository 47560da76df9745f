/*!
 * # skucheck - Quality verification checklists for warehouse SKUs
 *
 * A Rust library for recording quality-verification passes on warehouse
 * products, storing results and photos in a local SQLite database.
 *
 * ## Features
 *
 * - One yes/no checklist per product, with optional photo per item
 * - Status derived from the answers (pending, ok, error)
 * - Atomic recording of a verification together with its photos
 * - History, per-verification photo lookup and statistics
 * - Configurable product catalog and checklist
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `reference`: Product templates and checklist items
 * - `session`: In-memory checklist sessions:
 *   - `session::models`: Per-SKU session state
 *   - `session::manager`: The session board and commit
 * - `database`: SQLite persistence:
 *   - `database::connection`: Connection handling
 *   - `database::schema`: Tables, indexes and schema version
 *   - `database::repository`: The verification store
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod reference;
pub mod session;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::models::{Answer, PhotoRecord, VerificationRecord, VerificationStats, VerificationStatus};
pub use database::{Repository, StoreLocation};
pub use errors::{AppError, SessionError, StoreError};
pub use reference::{ChecklistItem, ProductTemplate, ReferenceData};
pub use session::{ProductSession, SessionBoard, SessionDetails, SessionStatus};
