//! Integration tests for the user and account repositories.

mod common;

use common::{setup_db, unique_email};
use eventi_db::repositories::{NewAccount, NewUser, OAUTH_ACCOUNT_TYPE};
use eventi_db::{AccountRepository, RepositoryError, UserRepository};
use uuid::Uuid;

#[tokio::test]
async fn test_user_create_and_find() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let email = unique_email("create");

    let user = repo
        .create(NewUser {
            email: email.clone(),
            name: Some("Ada".to_string()),
            image: Some("https://avatars.example.com/ada.png".to_string()),
            email_verified: None,
        })
        .await
        .expect("Failed to create user");

    assert_eq!(user.email, email);
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert!(user.email_verified.is_none());

    let by_id = repo
        .find_by_id(user.id)
        .await
        .expect("Failed to find user")
        .expect("User should exist");
    assert_eq!(by_id.id, user.id);

    let by_email = repo
        .find_by_email(&email)
        .await
        .expect("Failed to find user")
        .expect("User should exist");
    assert_eq!(by_email.id, user.id);
    assert!(repo.email_exists(&email).await.expect("Failed to check email"));
}

#[tokio::test]
async fn test_user_find_missing() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());

    assert!(
        repo.find_by_email("nonexistent@example.com")
            .await
            .expect("Failed to query")
            .is_none()
    );
    assert!(
        repo.find_by_id(Uuid::new_v4())
            .await
            .expect("Failed to query")
            .is_none()
    );
    assert!(
        !repo
            .email_exists("nonexistent@example.com")
            .await
            .expect("Failed to query")
    );
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let email = unique_email("dup");

    repo.create(NewUser {
        email: email.clone(),
        ..Default::default()
    })
    .await
    .expect("Failed to create user");

    let err = repo
        .create(NewUser {
            email,
            ..Default::default()
        })
        .await
        .expect_err("Duplicate email should be rejected");

    assert!(err.is_conflict(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_update_profile_and_verify_email() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let user_id = common::create_user(&db).await;

    let updated = repo
        .update_profile(user_id, Some("Grace".to_string()), None)
        .await
        .expect("Failed to update profile");
    assert_eq!(updated.name.as_deref(), Some("Grace"));
    assert!(updated.image.is_none());

    let verified = repo
        .mark_email_verified(user_id)
        .await
        .expect("Failed to verify email");
    assert!(verified.email_verified.is_some());

    let missing = repo.update_profile(Uuid::new_v4(), None, None).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_account_link_and_lookup() {
    let db = setup_db().await;
    let accounts = AccountRepository::new(db.clone());
    let user_id = common::create_user(&db).await;
    let provider_account_id = Uuid::new_v4().to_string();

    let account = accounts
        .link(NewAccount {
            user_id,
            provider: "github".to_string(),
            provider_account_id: provider_account_id.clone(),
            access_token: Some("gho_test".to_string()),
            scope: Some("read:user,user:email".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to link account");

    assert_eq!(account.account_type, OAUTH_ACCOUNT_TYPE);
    assert_eq!(account.user_id, user_id);

    let found = accounts
        .find_by_provider("github", &provider_account_id)
        .await
        .expect("Failed to query")
        .expect("Account should exist");
    assert_eq!(found.user_id, user_id);

    let owner = accounts
        .find_user_by_account("github", &provider_account_id)
        .await
        .expect("Failed to query")
        .expect("Owner should exist");
    assert_eq!(owner.id, user_id);

    assert!(
        accounts
            .find_user_by_account("gitlab", &provider_account_id)
            .await
            .expect("Failed to query")
            .is_none()
    );

    let listed = accounts
        .list_for_user(user_id)
        .await
        .expect("Failed to list accounts");
    assert_eq!(listed.len(), 1);

    assert!(
        accounts
            .unlink("github", &provider_account_id)
            .await
            .expect("Failed to unlink")
    );
    assert!(
        !accounts
            .unlink("github", &provider_account_id)
            .await
            .expect("Failed to unlink")
    );
}

#[tokio::test]
async fn test_account_pair_is_unique() {
    let db = setup_db().await;
    let accounts = AccountRepository::new(db.clone());
    let first = common::create_user(&db).await;
    let second = common::create_user(&db).await;
    let provider_account_id = Uuid::new_v4().to_string();

    accounts
        .link(NewAccount {
            user_id: first,
            provider: "github".to_string(),
            provider_account_id: provider_account_id.clone(),
            ..Default::default()
        })
        .await
        .expect("Failed to link account");

    let err = accounts
        .link(NewAccount {
            user_id: second,
            provider: "github".to_string(),
            provider_account_id,
            ..Default::default()
        })
        .await
        .expect_err("Same provider account cannot link twice");
    assert!(err.is_conflict(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_account_requires_existing_user() {
    let db = setup_db().await;
    let accounts = AccountRepository::new(db.clone());

    let err = accounts
        .link(NewAccount {
            user_id: Uuid::new_v4(),
            provider: "github".to_string(),
            provider_account_id: "42".to_string(),
            ..Default::default()
        })
        .await
        .expect_err("Dangling user_id should be rejected");
    assert!(matches!(err, RepositoryError::MissingParent(_)));
}

#[tokio::test]
async fn test_create_with_account_is_atomic() {
    let db = setup_db().await;
    let users = UserRepository::new(db.clone());
    let accounts = AccountRepository::new(db.clone());
    let email = unique_email("oauth");
    let provider_account_id = Uuid::new_v4().to_string();

    let (user, account) = users
        .create_with_account(
            NewUser {
                email: email.clone(),
                ..Default::default()
            },
            NewAccount {
                provider: "github".to_string(),
                provider_account_id: provider_account_id.clone(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create user with account");
    assert_eq!(account.user_id, user.id);

    // Email already taken: the second account must not be written.
    let orphan_id = Uuid::new_v4().to_string();
    let err = users
        .create_with_account(
            NewUser {
                email,
                ..Default::default()
            },
            NewAccount {
                provider: "github".to_string(),
                provider_account_id: orphan_id.clone(),
                ..Default::default()
            },
        )
        .await
        .expect_err("Duplicate email should roll back");
    assert!(err.is_conflict(), "unexpected error: {err:?}");
    assert!(
        accounts
            .find_by_provider("github", &orphan_id)
            .await
            .expect("Failed to query")
            .is_none()
    );
}
