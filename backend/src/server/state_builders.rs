//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use account_service::domain::AccountService;
use account_service::domain::ports::UserRepository;
use account_service::inbound::http::state::HttpState;
use account_service::outbound::persistence::{DbPool, DieselUserRepository, InMemoryUserRepository};
use account_service::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Select the PostgreSQL repository when a pool is configured, otherwise
/// the in-memory store.
fn build_user_repository(pool: Option<&DbPool>) -> Arc<dyn UserRepository> {
    pool.map_or_else(
        || -> Arc<dyn UserRepository> {
            warn!("no database configured; users are kept in memory and lost on exit");
            Arc::new(InMemoryUserRepository::new())
        },
        |db| -> Arc<dyn UserRepository> { Arc::new(DieselUserRepository::new(db.clone())) },
    )
}

/// Build the shared HTTP state from configuration.
///
/// # Errors
/// Fails when the password hasher cannot prepare its dummy digest.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let users = build_user_repository(config.db_pool.as_ref());
    let tokens = JwtTokenService::new(
        &config.token.secret,
        config.token.ttl,
        Arc::new(DefaultClock),
    );
    let hasher = Argon2PasswordHasher::new().map_err(std::io::Error::other)?;
    let service = AccountService::new(users, Arc::new(hasher), Arc::new(tokens));

    Ok(web::Data::new(HttpState::from_service(Arc::new(service))))
}
