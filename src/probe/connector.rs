use crate::{descriptor::ConnectionDescriptor, tls::ensure_crypto_provider};
use sqlx::{ConnectOptions, Connection, PgConnection};
use std::future::Future;

/// The only statement a probe ever sends
pub const LIVENESS_QUERY: &str = "SELECT 1";

/// An open connection that can answer the liveness query
pub trait LivenessConnection: Send {
    /// Run `SELECT 1` and return the single column of the single row
    fn select_one(&mut self) -> impl Future<Output = Result<i32, sqlx::Error>> + Send;

    /// Gracefully close the connection
    fn close(self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

/// Opens connections for a descriptor
pub trait Connector {
    type Connection: LivenessConnection;

    fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> impl Future<Output = Result<Self::Connection, sqlx::Error>> + Send;
}

/// Connects to PostgreSQL with sqlx
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl Connector for PgConnector {
    type Connection = PgConnection;

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> Result<PgConnection, sqlx::Error> {
        if descriptor.tls().mode.is_enabled() {
            ensure_crypto_provider();
        }

        let options = descriptor.connect_options();
        options.connect().await
    }
}

impl LivenessConnection for PgConnection {
    async fn select_one(&mut self) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(LIVENESS_QUERY)
            .fetch_one(&mut *self)
            .await
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        Connection::close(self).await
    }
}
