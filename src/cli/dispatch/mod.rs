use crate::{
    cli::actions::Action,
    descriptor::ConnectionDescriptor,
    report::Format,
    tls::{TlsConfig, TlsMode},
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use std::{fs, path::PathBuf};

/// Extract TLS configuration from the command line
fn extract_tls_config(matches: &ArgMatches) -> Result<TlsConfig> {
    let mode = matches
        .get_one::<String>("tls-mode")
        .map(|m| m.parse::<TlsMode>().map_err(|e| anyhow!(e)))
        .transpose()?
        .unwrap_or_default();

    let path = |name: &str| matches.get_one::<String>(name).map(PathBuf::from);

    Ok(TlsConfig {
        mode,
        ca: path("tls-ca"),
        cert: path("tls-cert"),
        key: path("tls-key"),
    })
}

/// Read the connection URL, either given directly or from a file
fn extract_url(matches: &ArgMatches) -> Result<String> {
    if let Some(url) = matches.get_one::<String>("dsn") {
        return Ok(url.clone());
    }

    let path = matches
        .get_one::<String>("dsn-file")
        .context("either --dsn or --dsn-file is required")?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read connection URL from {path}"))?;

    contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
        .with_context(|| format!("No connection URL found in {path}"))
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if the connection URL is missing, unreadable or invalid
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let tls = extract_tls_config(matches)?;

    let url = extract_url(matches)?;
    let descriptor =
        ConnectionDescriptor::from_url(&url, &tls).context("Failed to parse connection URL")?;

    let label = matches.get_one::<String>("label").cloned();

    let format = matches
        .get_one::<String>("format")
        .map(|f| f.parse::<Format>().map_err(|e| anyhow!(e)))
        .transpose()?
        .unwrap_or_default();

    let exit_code = matches.get_flag("exit-code");

    Ok(Action::Probe {
        descriptor,
        label,
        format,
        exit_code,
    })
}
