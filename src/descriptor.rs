use crate::tls::TlsConfig;
use dsn::DSN;
use sqlx::postgres::PgConnectOptions;
use std::{borrow::Cow, fmt, net::Ipv6Addr, path::PathBuf};

pub const DEFAULT_PORT: u16 = 5432;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("invalid connection URL: {0}")]
    Parse(String),
    #[error("unsupported scheme '{0}', expected postgres or postgresql")]
    Scheme(String),
    #[error("connection URL has no host")]
    MissingHost,
    #[error("connection URL has no username")]
    MissingUsername,
    #[error("client certificate and client key must be given together")]
    IncompleteClientCert,
}

/// Everything needed for one connection attempt.
///
/// Built once from configuration and never mutated afterwards, the fields are
/// only reachable through accessors.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    scheme: String,
    username: String,
    password: String,
    host: String,
    port: u16,
    database: String,
    tls: TlsConfig,
}

impl ConnectionDescriptor {
    /// Build a descriptor from a connection URL.
    ///
    /// The TLS mode in `tls` always wins over any `sslmode` in the URL.
    /// Certificate paths given in `tls` win over the URL parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL can't be parsed, uses a scheme other than
    /// `postgres`/`postgresql`, or lacks a host or username.
    pub fn from_url(url: &str, tls: &TlsConfig) -> Result<Self, DescriptorError> {
        let normalized = normalize_url(url.trim())?;
        let dsn =
            dsn::parse(&normalized.url).map_err(|e| DescriptorError::Parse(e.to_string()))?;
        let mut descriptor = Self::from_dsn(&dsn, tls)?;
        if let Some(host) = normalized.ipv6_host {
            descriptor.host = host;
        }
        Ok(descriptor)
    }

    fn from_dsn(dsn: &DSN, tls: &TlsConfig) -> Result<Self, DescriptorError> {
        let scheme = dsn.driver.to_lowercase();
        if scheme != "postgres" && scheme != "postgresql" {
            return Err(DescriptorError::Scheme(dsn.driver.clone()));
        }

        let host = dsn
            .host
            .clone()
            .filter(|h| !h.is_empty())
            .ok_or(DescriptorError::MissingHost)?;

        let username = dsn
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or(DescriptorError::MissingUsername)?;

        // PostgreSQL connects to the database named after the user when none is given
        let database = dsn
            .database
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| username.clone());

        let tls = merge_tls(dsn, tls);
        if tls.cert.is_some() != tls.key.is_some() {
            return Err(DescriptorError::IncompleteClientCert);
        }

        Ok(Self {
            scheme,
            username,
            password: dsn.password.clone().unwrap_or_default(),
            host,
            port: dsn.port.unwrap_or(DEFAULT_PORT),
            database,
            tls,
        })
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub const fn tls(&self) -> &TlsConfig {
        &self.tls
    }

    /// URL form of the target with the password masked, safe to print
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!(
            "{}://{}:***@{}:{}/{}",
            self.scheme, self.username, host, self.port, self.database
        )
    }

    /// Driver options for this descriptor.
    ///
    /// Every field is set explicitly and `.pgpass` is not consulted, so the
    /// attempt is fully determined by the descriptor.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .application_name(env!("CARGO_PKG_NAME"))
            .ssl_mode(self.tls.mode.pg_ssl_mode());

        if let Some(ca_path) = &self.tls.ca {
            options = options.ssl_root_cert(ca_path);
        }

        // Apply client certificate if provided
        if let (Some(cert_path), Some(key_path)) = (&self.tls.cert, &self.tls.key) {
            options = options.ssl_client_cert(cert_path).ssl_client_key(key_path);
        }

        options
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("scheme", &self.scheme)
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("tls", &self.tls)
            .finish()
    }
}

/// A URL the DSN parser can read
struct Normalized<'a> {
    url: Cow<'a, str>,
    /// IPv6 literal taken out of the URL, the DSN parser only sees a
    /// placeholder host in its place
    ipv6_host: Option<String>,
}

/// Rewrite `host[:port]` authorities into the `tcp(host:port)` form the DSN
/// parser understands. Inputs already using `tcp(...)` or `unix(...)` are
/// returned untouched.
fn normalize_url(url: &str) -> Result<Normalized<'_>, DescriptorError> {
    let untouched = Normalized {
        url: Cow::Borrowed(url),
        ipv6_host: None,
    };
    let Some((scheme, rest)) = url.split_once("://") else {
        return Ok(untouched);
    };

    // credentials may contain '@', the host starts after the last '@' before
    // the query string
    let before_query = rest.split('?').next().unwrap_or(rest);
    let (credentials, after_at) = before_query
        .rfind('@')
        .map_or(("", rest), |at| rest.split_at(at + 1));
    let (host, tail) = after_at.split_at(after_at.find(['/', '?']).unwrap_or(after_at.len()));

    if host.is_empty() || host.contains('(') {
        return Ok(untouched);
    }

    if let Some(bracketed) = host.strip_prefix('[') {
        let (address, port) = split_bracketed(bracketed)?;
        return Ok(Normalized {
            url: Cow::Owned(format!(
                "{scheme}://{credentials}tcp(localhost:{port}){tail}"
            )),
            ipv6_host: Some(address.to_string()),
        });
    }

    let address = if host.contains(':') {
        Cow::Borrowed(host)
    } else {
        Cow::Owned(format!("{host}:{DEFAULT_PORT}"))
    };

    Ok(Normalized {
        url: Cow::Owned(format!("{scheme}://{credentials}tcp({address}){tail}")),
        ipv6_host: None,
    })
}

/// Split `addr]` or `addr]:port` (the part after `[`) into address and port
fn split_bracketed(bracketed: &str) -> Result<(&str, u16), DescriptorError> {
    let (address, after) = bracketed
        .split_once(']')
        .ok_or_else(|| DescriptorError::Parse("unterminated '[' in host".to_string()))?;

    address
        .parse::<Ipv6Addr>()
        .map_err(|_| DescriptorError::Parse(format!("invalid IPv6 address '{address}'")))?;

    let port = match after {
        "" => DEFAULT_PORT,
        _ => after
            .strip_prefix(':')
            .and_then(|port| port.parse::<u16>().ok())
            .ok_or_else(|| {
                DescriptorError::Parse(format!("invalid port '{after}' after IPv6 host"))
            })?,
    };

    Ok((address, port))
}

/// Certificate paths: explicit configuration first, then the URL parameters.
/// Supports both PostgreSQL-style and MySQL-style parameter names.
fn merge_tls(dsn: &DSN, tls: &TlsConfig) -> TlsConfig {
    let param = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| dsn.params.get(*name))
            .map(PathBuf::from)
    };

    TlsConfig {
        mode: tls.mode,
        ca: tls
            .ca
            .clone()
            .or_else(|| param(&["sslrootcert", "sslca", "ssl-ca"])),
        cert: tls
            .cert
            .clone()
            .or_else(|| param(&["sslcert", "ssl-cert"])),
        key: tls.key.clone().or_else(|| param(&["sslkey", "ssl-key"])),
    }
}
