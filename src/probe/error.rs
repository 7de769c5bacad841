use serde::Serialize;
use std::{any::Any, fmt};

/// What went wrong, coarse enough for an operator to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The driver refused the connection options before dialing
    Configuration,
    /// DNS, TCP or I/O failure
    Transport,
    /// TLS negotiation or certificate failure
    Tls,
    /// Credentials rejected by the server (SQLSTATE class 28)
    Authentication,
    /// Server refused the session for another reason, e.g. unknown database
    Rejected,
    /// Connected, but the liveness query failed
    Query,
    /// The attempt panicked
    Internal,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::Tls => "tls",
            Self::Authentication => "authentication",
            Self::Rejected => "rejected",
            Self::Query => "query",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed probe. `message` keeps the driver's diagnostic text as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ProbeError {
    pub kind: FailureKind,
    pub message: String,
}

/// Step of the probe an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Query,
}

impl ProbeError {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a driver error raised during `phase`
    #[must_use]
    pub fn from_sqlx(err: &sqlx::Error, phase: Phase) -> Self {
        let message = err.to_string();
        let kind = match err {
            sqlx::Error::Configuration(_) => FailureKind::Configuration,
            sqlx::Error::Tls(_) => FailureKind::Tls,
            sqlx::Error::Database(db_err) => classify_sqlstate(db_err.code().as_deref(), phase),
            _ if is_tls_error(&message) => FailureKind::Tls,
            sqlx::Error::Io(_) => FailureKind::Transport,
            _ => match phase {
                Phase::Connect => FailureKind::Transport,
                Phase::Query => FailureKind::Query,
            },
        };
        Self { kind, message }
    }

    /// Turn a caught panic payload into an `Internal` failure
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::new(FailureKind::Internal, format!("probe panicked: {detail}"))
    }
}

/// Map a SQLSTATE to a failure kind. Class 28 is
/// `invalid_authorization_specification` (28000) and `invalid_password` (28P01).
#[must_use]
pub fn classify_sqlstate(code: Option<&str>, phase: Phase) -> FailureKind {
    match (phase, code) {
        (_, Some(code)) if code.starts_with("28") => FailureKind::Authentication,
        (Phase::Connect, _) => FailureKind::Rejected,
        (Phase::Query, _) => FailureKind::Query,
    }
}

/// Check if an error message is TLS-related
#[inline]
fn is_tls_error(message: &str) -> bool {
    // Check both lowercase and uppercase variants to avoid to_lowercase() allocation
    message.contains("ssl")
        || message.contains("SSL")
        || message.contains("tls")
        || message.contains("TLS")
        || message.contains("certificate")
        || message.contains("Certificate")
}
