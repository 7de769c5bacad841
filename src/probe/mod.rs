//! Connectivity probe
//!
//! One attempt: connect, run `SELECT 1`, close. Progress is written to the
//! given sink as timestamped lines, the outcome is returned as a
//! [`ProbeResult`] and never as a panic or an error.

pub mod connector;
pub mod error;

pub use connector::{Connector, LIVENESS_QUERY, LivenessConnection, PgConnector};
pub use error::{FailureKind, Phase, ProbeError};

use crate::descriptor::ConnectionDescriptor;
use chrono::{SecondsFormat, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::{io::Write, panic::AssertUnwindSafe};

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeResult {
    Success { value: i32 },
    Failure(ProbeError),
}

impl ProbeResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Probe the database described by `descriptor`.
///
/// `label` names the database in the progress lines ("the <label> database").
pub async fn probe<C, W>(
    connector: &C,
    descriptor: &ConnectionDescriptor,
    label: Option<&str>,
    out: &mut W,
) -> ProbeResult
where
    C: Connector,
    W: Write,
{
    let target = label.map_or_else(
        || "the database".to_string(),
        |label| format!("the {label} database"),
    );

    emit(
        out,
        &format!(
            "Probing {} (sslmode={})",
            descriptor.redacted_url(),
            descriptor.tls().mode
        ),
    );

    // Catch panics so nothing escapes; a connection held by the attempt is
    // dropped (and its socket closed) while unwinding
    let outcome = AssertUnwindSafe(attempt(connector, descriptor, &target, out))
        .catch_unwind()
        .await;

    let result = match outcome {
        Ok(Ok(value)) => ProbeResult::Success { value },
        Ok(Err(err)) => ProbeResult::Failure(err),
        Err(payload) => ProbeResult::Failure(ProbeError::from_panic(payload.as_ref())),
    };

    if let ProbeResult::Failure(err) = &result {
        emit(
            out,
            &format!("An error occurred while connecting to {target}: {err}"),
        );
    }

    result
}

async fn attempt<C, W>(
    connector: &C,
    descriptor: &ConnectionDescriptor,
    target: &str,
    out: &mut W,
) -> Result<i32, ProbeError>
where
    C: Connector,
    W: Write,
{
    let mut conn = connector
        .connect(descriptor)
        .await
        .map_err(|e| ProbeError::from_sqlx(&e, Phase::Connect))?;

    emit(out, &format!("Successfully connected to {target}."));

    let value = conn.select_one().await;

    // the query outcome is what matters, a failed goodbye is not a failed probe
    if let Err(e) = conn.close().await {
        emit(out, &format!("Connection close reported: {e}"));
    }

    let value = value.map_err(|e| ProbeError::from_sqlx(&e, Phase::Query))?;

    emit(out, &format!("Test query successful. Result: {value}"));

    Ok(value)
}

/// Write one timestamped line, output errors are ignored
fn emit<W: Write>(out: &mut W, line: &str) {
    let _ = writeln!(
        out,
        "{} - {line}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
}
