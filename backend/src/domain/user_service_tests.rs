//! Tests for the user service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockUserRepository, StoredCredentials};
use crate::domain::{AdminIdentity, ErrorCode, UserDraft};

const ADMIN_ID: i64 = 1;

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("user id")
}

fn policy() -> Arc<AccessPolicy> {
    Arc::new(AccessPolicy::new(AdminIdentity::new(Some(user_id(ADMIN_ID)), None)))
}

fn actor(id: i64) -> Actor {
    Actor::new(
        user_id(id),
        EmailAddress::new(format!("user{id}@example.com")).expect("email"),
    )
}

fn stored_user(id: i64, name: &UserName, email: &EmailAddress) -> User {
    let now = Utc::now();
    User::new(UserDraft {
        id: user_id(id),
        name: name.clone(),
        email: email.clone(),
        total_points: 0,
        created_at: now,
        updated_at: now,
    })
}

fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
    UserService::new(Arc::new(repo), policy())
}

fn create_request() -> CreateUserRequest {
    CreateUserRequest {
        name: "  Grace Hopper ".to_owned(),
        email: "Grace@Example.com".to_owned(),
        password: "compiler-1952".to_owned(),
    }
}

#[tokio::test]
async fn admin_creates_user_with_normalised_fields_and_hashed_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(|new_user| {
            new_user.name.as_ref() == "Grace Hopper"
                && new_user.email.as_ref() == "grace@example.com"
                && new_user.password_hash.verify("compiler-1952")
        })
        .returning(|new_user| Ok(stored_user(5, &new_user.name, &new_user.email)));

    let user = service(repo)
        .create_user(&actor(ADMIN_ID), create_request())
        .await
        .expect("create succeeds");

    assert_eq!(user.total_points(), 0);
    assert_eq!(user.email().as_ref(), "grace@example.com");
}

#[tokio::test]
async fn non_admin_cannot_create_users() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(0);

    let error = service(repo)
        .create_user(&actor(2), create_request())
        .await
        .expect_err("denied");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case("", "a@b.co", "longenough", "name")]
#[case("Name", "not-an-email", "longenough", "email")]
#[case("Name", "a@b.co", "short", "password")]
#[tokio::test]
async fn create_rejects_invalid_fields(
    #[case] name: &str,
    #[case] email: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(0);
    let request = CreateUserRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    };

    let error = service(repo)
        .create_user(&actor(ADMIN_ID), request)
        .await
        .expect_err("invalid input");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
        Some(field)
    );
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_email("grace@example.com")));

    let error = service(repo)
        .create_user(&actor(ADMIN_ID), create_request())
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn update_without_password_keeps_existing_hash() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_profile()
        .times(1)
        .withf(|id, update| id.as_i64() == 7 && update.password_hash.is_none())
        .returning(|id, update| Ok(Some(stored_user(id.as_i64(), &update.name, &update.email))));

    let request = UpdateUserRequest {
        name: "Renamed".to_owned(),
        email: "renamed@example.com".to_owned(),
        password: Some(String::new()),
    };
    let user = service(repo)
        .update_user(&actor(ADMIN_ID), user_id(7), request)
        .await
        .expect("update succeeds");

    assert_eq!(user.name().as_ref(), "Renamed");
}

#[tokio::test]
async fn update_of_unknown_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_profile().times(1).return_once(|_, _| Ok(None));

    let request = UpdateUserRequest {
        name: "Ghost".to_owned(),
        email: "ghost@example.com".to_owned(),
        password: None,
    };
    let error = service(repo)
        .update_user(&actor(ADMIN_ID), user_id(70), request)
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn self_deletion_is_refused_before_storage() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(0);

    let error = service(repo)
        .delete_user(&actor(ADMIN_ID), user_id(ADMIN_ID))
        .await
        .expect_err("self deletion");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "You cannot delete your own account.");
}

#[tokio::test]
async fn deleting_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let error = service(repo)
        .delete_user(&actor(ADMIN_ID), user_id(9))
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn login_accepts_matching_password() {
    let password = Password::new("s3cret-pass").expect("password");
    let hash = PasswordHash::hash(&password).expect("hash");
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials()
        .times(1)
        .withf(|email| email.as_ref() == "admin@example.com")
        .return_once(move |_| {
            Ok(Some(StoredCredentials {
                user_id: UserId::new(ADMIN_ID).expect("user id"),
                password_hash: hash,
            }))
        });

    let credentials =
        LoginCredentials::try_from_parts("Admin@Example.com", "s3cret-pass").expect("creds");
    let id = service(repo)
        .authenticate(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(id.as_i64(), ADMIN_ID);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn login_rejects_wrong_password_or_unknown_email(#[case] known: bool) {
    let password = Password::new("s3cret-pass").expect("password");
    let hash = PasswordHash::hash(&password).expect("hash");
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials().times(1).return_once(move |_| {
        Ok(known.then(|| StoredCredentials {
            user_id: UserId::new(ADMIN_ID).expect("user id"),
            password_hash: hash,
        }))
    });

    let credentials =
        LoginCredentials::try_from_parts("admin@example.com", "wrong-pass").expect("creds");
    let error = service(repo)
        .authenticate(&credentials)
        .await
        .expect_err("login fails");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[tokio::test]
async fn ensure_account_keeps_existing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials()
        .times(1)
        .return_once(|_| {
            Ok(Some(StoredCredentials {
                user_id: user_id(ADMIN_ID),
                password_hash: PasswordHash::from_stored("$argon2id$stub"),
            }))
        });
    repo.expect_insert().times(0);

    let id = service(repo)
        .ensure_account(create_request())
        .await
        .expect("bootstrap succeeds");

    assert_eq!(id, user_id(ADMIN_ID));
}

#[tokio::test]
async fn ensure_account_creates_missing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials()
        .times(1)
        .withf(|email| email.as_ref() == "grace@example.com")
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .returning(|new_user| Ok(stored_user(1, &new_user.name, &new_user.email)));

    let id = service(repo)
        .ensure_account(create_request())
        .await
        .expect("bootstrap succeeds");

    assert_eq!(id, user_id(1));
}
