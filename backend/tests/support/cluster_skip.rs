//! `SKIP_TEST_CLUSTER` policy for suites that need embedded PostgreSQL.

const SKIP_VAR: &str = "SKIP_TEST_CLUSTER";

/// Whether `SKIP_TEST_CLUSTER` is `1`, `true`, or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var(SKIP_VAR)
        .is_ok_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Report a cluster bootstrap failure.
///
/// Prints a skip marker and returns `None` when skipping is enabled; panics
/// otherwise so CI does not silently lose coverage.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    assert!(
        should_skip_test_cluster(),
        "embedded PostgreSQL failed to start: {reason}. Set {SKIP_VAR}=1 to skip."
    );
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
