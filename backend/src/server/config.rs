//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use account_service::inbound::http::token_config::TokenSettings;
use account_service::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token: TokenSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration binding `bind_addr` and signing tokens with
    /// `token`.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr, token: TokenSettings) -> Self {
        Self {
            bind_addr,
            token,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps users in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
