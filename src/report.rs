use crate::{descriptor::ConnectionDescriptor, probe::ProbeResult, tls::TlsMode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::{io, str::FromStr};

/// How the outcome is presented on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Timestamped progress lines
    #[default]
    Text,
    /// A single JSON document, no progress lines
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Machine readable summary of one probe
#[derive(Serialize, Debug)]
pub struct Report {
    time: String,
    target: String,
    sslmode: TlsMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(flatten)]
    result: ProbeResult,
    runtime_ms: i64,
}

impl Report {
    #[must_use]
    pub fn new(
        descriptor: &ConnectionDescriptor,
        label: Option<&str>,
        started: DateTime<Utc>,
        result: ProbeResult,
    ) -> Self {
        Self {
            time: started.to_rfc3339_opts(SecondsFormat::Secs, true),
            target: descriptor.redacted_url(),
            sslmode: descriptor.tls().mode,
            label: label.map(ToString::to_string),
            result,
            runtime_ms: (Utc::now() - started).num_milliseconds(),
        }
    }

    #[must_use]
    pub const fn result(&self) -> &ProbeResult {
        &self.result
    }

    /// Write the report as one line of JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails, e.g. a closed pipe
    pub fn write_json<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{json}")
    }
}
