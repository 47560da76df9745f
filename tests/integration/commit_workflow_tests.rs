/*!
 * End-to-end tests from checklist answers to stored verifications
 */

use skucheck::{
    Answer, ChecklistItem, ProductTemplate, ReferenceData, Repository, SessionBoard,
    SessionDetails, SessionStatus, VerificationStatus,
};

use crate::common::{answer_all, photo_payload, sample_reference};

#[tokio::test]
async fn test_commit_withFailedItemAndPhoto_shouldStoreErrorVerification() {
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(sample_reference());
    answer_all(&mut board, "1001", Answer::Si, Answer::No);
    board.attach_photo("1001", "empaque", photo_payload("empaque")).unwrap();

    let summary = board.commit(&repo).await.expect("Commit failed");

    assert_eq!(summary.count(), 1);
    let id = summary.committed[0].verification_id;
    let verification = repo.get_verification(id).await.unwrap().unwrap();
    assert_eq!(verification.sku, "1001");
    assert_eq!(verification.description, "Producto X");
    assert_eq!(verification.stacking_factor, "24");
    assert_eq!(verification.status, VerificationStatus::Error);
    assert_eq!(verification.total_photos, 1);

    let photos = repo.list_photos_for_verification(id).await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].parameter, "empaque");
    assert_eq!(photos[0].verification_id, id);
}

#[tokio::test]
async fn test_commit_withAllSi_shouldStoreOkVerification() {
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(sample_reference());
    answer_all(&mut board, "1002", Answer::Si, Answer::Si);

    let summary = board.commit(&repo).await.unwrap();

    let verification = repo
        .get_verification(summary.committed[0].verification_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(verification.status, VerificationStatus::Ok);
    assert_eq!(verification.total_photos, 0);
    assert!(verification.failed_items().is_empty());
}

#[tokio::test]
async fn test_commit_shouldSkipPendingAndResetCommitted() {
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(sample_reference());
    answer_all(&mut board, "1001", Answer::Si, Answer::Si);
    board
        .set_details(
            "1001",
            SessionDetails {
                inspector: "Ana".to_string(),
                shift: "Mañana".to_string(),
                ..SessionDetails::default()
            },
        )
        .unwrap();
    board.answer("1002", "altura", Answer::No).unwrap();

    let summary = board.commit(&repo).await.unwrap();

    assert_eq!(summary.count(), 1);
    let stored = repo.list_verifications().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].sku, "1001");
    assert_eq!(stored[0].inspector, "Ana");

    let reset = board.find("1001").unwrap();
    assert_eq!(reset.status(), SessionStatus::Pending);
    assert_eq!(reset.details, SessionDetails::default());
    assert_eq!(reset.sku, "1001");
    assert_eq!(board.find("1002").unwrap().answer("altura"), Answer::No);

    let again = board.commit(&repo).await.unwrap();
    assert!(again.is_empty());
    assert_eq!(repo.list_verifications().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_commit_withPhotosOnSeveralSessions_shouldLinkEachToItsVerification() {
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(sample_reference());
    answer_all(&mut board, "1001", Answer::No, Answer::No);
    answer_all(&mut board, "3001", Answer::Si, Answer::No);
    board.attach_photo("1001", "altura", photo_payload("a")).unwrap();
    board.attach_photo("1001", "empaque", photo_payload("b")).unwrap();
    board.attach_photo("3001", "empaque", photo_payload("c")).unwrap();

    let summary = board.commit(&repo).await.unwrap();

    for committed in &summary.committed {
        let verification = repo
            .get_verification(committed.verification_id)
            .await
            .unwrap()
            .unwrap();
        let photos = repo
            .list_photos_for_verification(committed.verification_id)
            .await
            .unwrap();
        assert_eq!(photos.len() as i64, verification.total_photos);
        assert!(photos.iter().all(|p| p.verification_id == committed.verification_id));
    }

    let stats = repo.statistics().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.error, 2);
    assert_eq!(stats.photos, 3);
}

#[tokio::test]
async fn test_saveChecklist_thenCommit_shouldUseCatalogFields() {
    let reference = ReferenceData::new(
        vec![ProductTemplate::new("1001", "Producto X", "24")],
        vec![
            ChecklistItem::new(1, "altura", "?", ""),
            ChecklistItem::new(2, "empaque", "?", ""),
        ],
    );
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(reference);

    let session: skucheck::ProductSession = serde_json::from_str(
        r#"{
            "sku": "1001",
            "description": "edited elsewhere",
            "stacking_factor": "99",
            "details": { "inspector": "Ana", "shift": "Tarde" },
            "answers": { "altura": "si", "empaque": "no" },
            "photos": { "empaque": "data:image/jpeg;base64,AAAA" }
        }"#,
    )
    .unwrap();
    board.save_checklist(session).unwrap();

    let summary = board.commit(&repo).await.unwrap();

    let verification = repo
        .get_verification(summary.committed[0].verification_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(verification.description, "Producto X");
    assert_eq!(verification.stacking_factor, "24");
    assert_eq!(verification.shift, "Tarde");
    assert_eq!(verification.status, VerificationStatus::Error);
    assert_eq!(verification.total_photos, 1);
}

#[tokio::test]
async fn test_history_shouldListNewestFirst() {
    let repo = Repository::open_in_memory().await.unwrap();
    let mut board = SessionBoard::new(sample_reference());

    answer_all(&mut board, "1001", Answer::Si, Answer::Si);
    let first = board.commit(&repo).await.unwrap().committed[0].verification_id;
    answer_all(&mut board, "1001", Answer::No, Answer::Si);
    let second = board.commit(&repo).await.unwrap().committed[0].verification_id;

    let history = repo.history(Some("1001")).await.unwrap();
    let ids: Vec<i64> = history.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![second, first]);
}
