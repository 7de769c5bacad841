//! TLS configuration for the probed connection
//!
//! - `config` - TLS configuration and modes
//!
//! The handshake itself is done by sqlx over rustls; this module only decides
//! what is required of it and makes sure a crypto provider is installed.

pub mod config;

pub use config::{TlsConfig, TlsMode};

use std::sync::OnceLock;

static CRYPTO_PROVIDER_INIT: OnceLock<()> = OnceLock::new();

/// Ensure the rustls crypto provider is initialized
///
/// Safe to call multiple times, initialization only happens once. An error
/// from `install_default` means another provider is already installed, which
/// is fine for our purposes.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.get_or_init(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
