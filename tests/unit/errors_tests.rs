/*!
 * Tests for error types and conversions
 */

use skucheck::errors::{AppError, SessionError, StoreError};

#[test]
fn test_storeError_unavailable_shouldDisplayCorrectly() {
    let error = StoreError::StoreUnavailable("permission denied".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Store unavailable"));
    assert!(display.contains("permission denied"));
}

#[test]
fn test_storeError_invalidSession_shouldDisplaySku() {
    let error = StoreError::InvalidSession {
        sku: "1001".to_string(),
        reason: "checklist is still pending".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("1001"));
    assert!(display.contains("pending"));
}

#[test]
fn test_storeError_isRetryable_shouldOnlyAllowTransientFailures() {
    assert!(StoreError::TransactionFailed("busy".to_string()).is_retryable());
    assert!(StoreError::QueryFailed("busy".to_string()).is_retryable());
    assert!(!StoreError::StoreUnavailable("gone".to_string()).is_retryable());
    assert!(!StoreError::InvalidSession {
        sku: "1".to_string(),
        reason: "pending".to_string()
    }
    .is_retryable());
}

#[test]
fn test_sessionError_commitFailed_shouldExposeSource() {
    use std::error::Error;

    let error = SessionError::CommitFailed {
        committed: 2,
        sku: "3001".to_string(),
        source: StoreError::TransactionFailed("disk I/O error".to_string()),
    };

    let display = format!("{}", error);
    assert!(display.contains("3001"));
    assert!(display.contains("2 verification"));
    assert!(error.source().is_some());
}

#[test]
fn test_appError_fromStoreError_shouldWrap() {
    let app_error: AppError = StoreError::QueryFailed("bad row".to_string()).into();
    assert!(matches!(app_error, AppError::Store(_)));
    assert!(app_error.to_string().contains("bad row"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
}
