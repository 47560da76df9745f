/*!
 * Integration tests for opening, reopening and clearing the store
 */

use skucheck::{Answer, Repository, SessionBoard, StoreError, StoreLocation};

use crate::common::{answer_all, create_temp_dir, photo_payload, sample_reference};

#[tokio::test]
async fn test_emptyStore_listVerifications_shouldReturnEmpty() {
    let repo = Repository::open_in_memory().await.expect("Failed to open store");

    let verifications = repo.list_verifications().await.expect("Listing should succeed");

    assert!(verifications.is_empty());
}

#[tokio::test]
async fn test_fileStore_shouldSurviveReopen() {
    let dir = create_temp_dir().unwrap();
    let location = StoreLocation::File(dir.path().join("data").join("checks.db"));

    let id = {
        let repo = Repository::open(location.clone()).await.unwrap();
        let mut board = SessionBoard::new(sample_reference());
        answer_all(&mut board, "1001", Answer::Si, Answer::No);
        board.attach_photo("1001", "empaque", photo_payload("reopen")).unwrap();
        let summary = board.commit(&repo).await.unwrap();
        summary.committed[0].verification_id
    };

    let reopened = Repository::open(location).await.expect("Failed to reopen store");

    let record = reopened.get_verification(id).await.unwrap().expect("Verification should persist");
    assert_eq!(record.sku, "1001");
    let photos = reopened.list_photos_for_verification(id).await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].payload, photo_payload("reopen"));
}

#[tokio::test]
async fn test_unreachableLocation_shouldLeaveStoreDegraded() {
    let dir = create_temp_dir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let repo = Repository::new(StoreLocation::File(blocker.join("nested").join("checks.db")));

    let err = repo.initialize().await.unwrap_err();
    assert!(matches!(err, StoreError::StoreUnavailable(_)));
    assert!(!repo.is_available());

    assert!(matches!(
        repo.list_verifications().await,
        Err(StoreError::StoreUnavailable(_))
    ));
    assert!(matches!(
        repo.get_verification(1).await,
        Err(StoreError::StoreUnavailable(_))
    ));
    assert!(matches!(
        repo.list_photos_for_verification(1).await,
        Err(StoreError::StoreUnavailable(_))
    ));
    assert!(matches!(repo.clear_all().await, Err(StoreError::StoreUnavailable(_))));
    assert!(matches!(repo.statistics().await, Err(StoreError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_degradedStore_commit_shouldKeepSessions() {
    let dir = create_temp_dir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let repo = Repository::new(StoreLocation::File(blocker.join("checks.db")));
    assert!(repo.initialize().await.is_err());

    let mut board = SessionBoard::new(sample_reference());
    answer_all(&mut board, "1001", Answer::Si, Answer::Si);

    let err = board.commit(&repo).await.unwrap_err();

    assert!(err.to_string().contains("1001"));
    assert!(board.find("1001").unwrap().is_committable());
}

#[tokio::test]
async fn test_clearAll_thenQueries_shouldReturnEmpty() {
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(sample_reference());
    answer_all(&mut board, "1001", Answer::No, Answer::No);
    answer_all(&mut board, "1002", Answer::Si, Answer::Si);
    board.attach_photo("1001", "altura", photo_payload("1")).unwrap();
    board.attach_photo("1001", "empaque", photo_payload("2")).unwrap();
    let summary = board.commit(&repo).await.unwrap();
    assert_eq!(summary.count(), 2);

    repo.clear_all().await.expect("Clear failed");

    assert!(repo.list_verifications().await.unwrap().is_empty());
    for committed in &summary.committed {
        assert!(repo.get_verification(committed.verification_id).await.unwrap().is_none());
        assert!(repo
            .list_photos_for_verification(committed.verification_id)
            .await
            .unwrap()
            .is_empty());
    }
    let stats = repo.statistics().await.unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.photos, 0);
}

#[tokio::test]
async fn test_clearAll_onEmptyStore_shouldSucceed() {
    let repo = Repository::open_in_memory().await.unwrap();
    repo.clear_all().await.expect("Clearing an empty store should succeed");
    assert!(repo.list_verifications().await.unwrap().is_empty());
}
