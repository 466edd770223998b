//! Server settings loaded via OrthoConfig and the resolved server
//! configuration handed to [`super::create_server`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use bloodmatch::outbound::persistence::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_SIZE, DbPool, PoolConfig,
};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Settings read from `BLOODMATCH_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOODMATCH")]
pub struct ServerSettings {
    /// Address to bind.
    #[ortho_config(default = DEFAULT_HOST)]
    pub host: IpAddr,
    /// Port to bind.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// PostgreSQL URL. Without one every store is held in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_MAX_SIZE)]
    pub pool_max_size: u32,
    /// Seconds to wait for a pooled connection.
    #[ortho_config(default = DEFAULT_CHECKOUT_TIMEOUT.as_secs())]
    pub pool_checkout_timeout_secs: u64,
}

impl ServerSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Pool configuration, when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size)
                .with_connection_timeout(Duration::from_secs(self.pool_checkout_timeout_secs)),
        )
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that keeps every store in memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
