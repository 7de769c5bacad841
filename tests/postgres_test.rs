/// `PostgreSQL` integration tests
///
/// These need a running `PostgreSQL` without TLS (see `common::POSTGRES_DSN`),
/// so TLS is disabled explicitly.
///
/// Run tests:
///   cargo test --test `postgres_test` -- --ignored --nocapture
///
/// Environment variables:
///   `PGPROBE_TEST_DSN` - Override the default connection URL
mod common;

use common::*;
use pgprobe::{
    ProbeResult,
    probe::{FailureKind, PgConnector, probe},
    tls::TlsMode,
};
use std::io;

#[tokio::test]
#[ignore = "requires running PostgreSQL container"]
async fn test_postgres_probe_success() {
    if skip_if_no_postgres() {
        return;
    }

    let (result, output) = probe_postgres(&postgres_dsn(), TlsMode::Disable).await;
    assert_eq!(result, ProbeResult::Success { value: 1 }, "{output}");
    assert!(output.contains("Successfully connected to the database."));
    assert!(output.contains("Test query successful. Result: 1"));
}

#[tokio::test]
#[ignore = "requires running PostgreSQL container"]
async fn test_postgres_probe_twice() {
    if skip_if_no_postgres() {
        return;
    }

    let descriptor = descriptor(&postgres_dsn(), TlsMode::Disable);
    for i in 0..2 {
        let result = probe(&PgConnector, &descriptor, None, &mut io::sink()).await;
        assert_eq!(
            result,
            ProbeResult::Success { value: 1 },
            "probe {i} failed"
        );
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL container"]
async fn test_postgres_wrong_password() {
    if skip_if_no_postgres() {
        return;
    }

    let url = with_password(&postgres_dsn(), "definitely-not-the-password");
    let result = probe_quiet(&url, TlsMode::Disable).await;

    match result {
        ProbeResult::Failure(err) => {
            assert_eq!(err.kind, FailureKind::Authentication, "{err}");
            assert!(err.message.contains("password"), "{err}");
        }
        ProbeResult::Success { .. } => panic!("wrong password must not succeed"),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL container"]
async fn test_postgres_unknown_database() {
    if skip_if_no_postgres() {
        return;
    }

    let url = postgres_dsn();
    let (base, _) = url.rsplit_once('/').unwrap();
    let result = probe_quiet(&format!("{base}/pgprobe_missing_db"), TlsMode::Disable).await;

    match result {
        ProbeResult::Failure(err) => assert_eq!(err.kind, FailureKind::Rejected, "{err}"),
        ProbeResult::Success { .. } => panic!("unknown database must not succeed"),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL container"]
async fn test_postgres_require_does_not_downgrade() {
    if skip_if_no_postgres() {
        return;
    }

    // the default container has no TLS, `require` must fail instead of falling back
    let result = probe_quiet(&postgres_dsn(), TlsMode::Require).await;

    match result {
        ProbeResult::Failure(err) => assert_eq!(err.kind, FailureKind::Tls, "{err}"),
        ProbeResult::Success { .. } => panic!("sslmode=require succeeded without TLS"),
    }
}
