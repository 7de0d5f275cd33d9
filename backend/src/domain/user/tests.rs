//! Regression coverage for user primitives.

use super::*;
use rstest::rstest;

#[rstest]
#[case(0)]
#[case(-4)]
fn user_id_rejects_non_positive(#[case] raw: i64) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::NonPositiveId));
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn user_name_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(raw), Err(expected));
}

#[rstest]
fn user_name_rejects_overlong() {
    let raw = "n".repeat(256);
    assert_eq!(
        UserName::new(raw),
        Err(UserValidationError::NameTooLong { max: 255 })
    );
}

#[rstest]
fn user_name_trims() {
    let name = UserName::new("  Grace Hopper ").expect("valid name");
    assert_eq!(name.as_ref(), "Grace Hopper");
}

#[rstest]
#[case("ab")]
#[case("no-at-sign")]
#[case("@example.com")]
#[case("ada@")]
#[case("a@b@c")]
#[case("ada lovelace@example.com")]
fn email_rejects_malformed(#[case] raw: &str) {
    assert!(EmailAddress::new(raw).is_err(), "{raw} should be rejected");
}

#[rstest]
#[case("test@gmail.com", "test@gmail.com")]
#[case("  MiXeD@Example.ORG ", "mixed@example.org")]
fn email_normalises(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
fn user_serialises_camel_case_without_credentials() {
    let now = Utc::now();
    let user = User::new(UserDraft {
        id: UserId::new(3).expect("id"),
        name: UserName::new("Ada").expect("name"),
        email: EmailAddress::new("ada@example.com").expect("email"),
        total_points: 120,
        created_at: now,
        updated_at: now,
    });
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(value.get("totalPoints"), Some(&serde_json::json!(120)));
    assert!(value.get("password").is_none());
    assert!(value.get("passwordHash").is_none());
}
