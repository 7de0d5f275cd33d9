//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use env_lock::lock_env;
use mockable::{DefaultEnv, MockEnv};
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (
            KEY_FILE_ENV,
            key.path().to_str().expect("UTF-8 temp path").to_owned(),
        ),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_explicit_settings() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let env = mock_env(release_vars(&key));

    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn process_environment_is_read_by_default_env() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let _guard = lock_env(
        release_vars(&key)
            .into_iter()
            .map(|(name, value)| (name, Some(value))),
    );

    let settings = session_settings_from_env(&DefaultEnv::new(), BuildMode::Release)
        .expect("settings from process environment");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(#[case] missing: &'static str) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key);
    vars.remove(missing);

    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("missing toggle rejected");

    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
fn release_rejects_short_key() {
    let key = key_file(SESSION_KEY_MIN_LEN - 1);
    let env = mock_env(release_vars(&key));

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("short key rejected");

    assert!(matches!(err, SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1));
}

#[rstest]
fn release_rejects_insecure_samesite_none() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("insecure None rejected");

    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());

    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("ephemeral rejected");

    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn debug_falls_back_on_malformed_values() {
    let vars = HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/leaderboard-session-key".to_owned()),
        (COOKIE_SECURE_ENV, "maybe".to_owned()),
        (SAMESITE_ENV, "sideways".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("TRUE", Some(true))]
#[case("n", Some(false))]
#[case("2", None)]
fn bool_parsing(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
