//! Integration tests for the session and verification token repositories.

mod common;

use chrono::{Duration, Utc};
use common::{create_user, setup_db};
use eventi_core::auth::generate_session_token;
use eventi_db::{RepositoryError, SessionRepository, VerificationTokenRepository};
use uuid::Uuid;

#[tokio::test]
async fn test_session_create_and_find_with_user() {
    let db = setup_db().await;
    let repo = SessionRepository::new(db.clone());
    let user_id = create_user(&db).await;
    let token = generate_session_token();

    let session = repo
        .create(user_id, &token, Utc::now() + Duration::days(30))
        .await
        .expect("Failed to create session");
    assert_eq!(session.session_token, token);

    let (found, user) = repo
        .find_with_user(&token)
        .await
        .expect("Failed to query")
        .expect("Session should exist");
    assert_eq!(found.user_id, user_id);
    assert_eq!(user.id, user_id);
}

#[tokio::test]
async fn test_expired_session_is_absent() {
    let db = setup_db().await;
    let repo = SessionRepository::new(db.clone());
    let user_id = create_user(&db).await;
    let token = generate_session_token();

    repo.create(user_id, &token, Utc::now() - Duration::hours(1))
        .await
        .expect("Failed to create session");

    assert!(
        repo.find_with_user(&token)
            .await
            .expect("Failed to query")
            .is_none()
    );
    assert_eq!(
        repo.count_active_sessions(user_id)
            .await
            .expect("Failed to count"),
        0
    );

    let removed = repo.cleanup_expired().await.expect("Failed to clean up");
    assert!(removed >= 1);
}

#[tokio::test]
async fn test_session_requires_existing_user() {
    let db = setup_db().await;
    let repo = SessionRepository::new(db.clone());

    let err = repo
        .create(
            Uuid::new_v4(),
            &generate_session_token(),
            Utc::now() + Duration::days(1),
        )
        .await
        .expect_err("Dangling user_id should be rejected");
    assert!(matches!(err, RepositoryError::MissingParent(_)));
}

#[tokio::test]
async fn test_update_expiry_extends_session() {
    let db = setup_db().await;
    let repo = SessionRepository::new(db.clone());
    let user_id = create_user(&db).await;
    let token = generate_session_token();
    let original = Utc::now() + Duration::days(1);
    let extended = Utc::now() + Duration::days(30);

    repo.create(user_id, &token, original)
        .await
        .expect("Failed to create session");
    let updated = repo
        .update_expiry(&token, extended)
        .await
        .expect("Failed to update expiry");

    assert_eq!(updated.expires.timestamp(), extended.timestamp());
    assert_eq!(updated.user_id, user_id);
}

#[tokio::test]
async fn test_delete_sessions() {
    let db = setup_db().await;
    let repo = SessionRepository::new(db.clone());
    let user_id = create_user(&db).await;
    let expires = Utc::now() + Duration::days(1);

    let first = generate_session_token();
    repo.create(user_id, &first, expires)
        .await
        .expect("Failed to create session");
    for _ in 0..2 {
        repo.create(user_id, &generate_session_token(), expires)
            .await
            .expect("Failed to create session");
    }

    assert_eq!(
        repo.get_user_sessions(user_id)
            .await
            .expect("Failed to list")
            .len(),
        3
    );

    assert!(repo.delete(&first).await.expect("Failed to delete"));
    assert!(!repo.delete(&first).await.expect("Failed to delete"));
    assert_eq!(
        repo.delete_for_user(user_id)
            .await
            .expect("Failed to delete"),
        2
    );
    assert_eq!(
        repo.count_active_sessions(user_id)
            .await
            .expect("Failed to count"),
        0
    );
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    let db = setup_db().await;
    let repo = VerificationTokenRepository::new(db.clone());
    let identifier = common::unique_email("verify");

    repo.create(&identifier, "tok-1", Utc::now() + Duration::hours(1))
        .await
        .expect("Failed to create token");

    let used = repo
        .use_token(&identifier, "tok-1")
        .await
        .expect("Failed to use token")
        .expect("Token should be valid");
    assert_eq!(used.identifier, identifier);

    assert!(
        repo.use_token(&identifier, "tok-1")
            .await
            .expect("Failed to use token")
            .is_none()
    );
}

#[tokio::test]
async fn test_verification_token_pair_is_unique() {
    let db = setup_db().await;
    let repo = VerificationTokenRepository::new(db.clone());
    let identifier = common::unique_email("pair");
    let expires = Utc::now() + Duration::hours(1);

    repo.create(&identifier, "same", expires)
        .await
        .expect("Failed to create token");
    let err = repo
        .create(&identifier, "same", expires)
        .await
        .expect_err("Duplicate pair should be rejected");
    assert!(err.is_conflict(), "unexpected error: {err:?}");

    // Same token under another identifier is a different row.
    repo.create(&common::unique_email("other"), "same", expires)
        .await
        .expect("Failed to create token");
}

#[tokio::test]
async fn test_expired_verification_token_is_consumed_but_rejected() {
    let db = setup_db().await;
    let repo = VerificationTokenRepository::new(db.clone());
    let identifier = common::unique_email("stale");

    repo.create(&identifier, "old", Utc::now() - Duration::minutes(5))
        .await
        .expect("Failed to create token");

    assert!(
        repo.use_token(&identifier, "old")
            .await
            .expect("Failed to use token")
            .is_none()
    );
    repo.create(&identifier, "old", Utc::now() + Duration::hours(1))
        .await
        .expect("Consumed pair should be free again");
}
