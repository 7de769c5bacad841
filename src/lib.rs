//! Verify that a PostgreSQL database is reachable and answers queries.
//!
//! A probe opens one connection described by a [`ConnectionDescriptor`],
//! runs `SELECT 1` and reports a [`ProbeResult`].

pub mod cli;
pub mod descriptor;
pub mod probe;
pub mod report;
pub mod tls;

pub use descriptor::ConnectionDescriptor;
pub use probe::{ProbeResult, probe};
