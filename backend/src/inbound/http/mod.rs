//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
pub mod token_config;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every account and health route on `cfg`.
///
/// Callers provide `web::Data<HttpState>` and `web::Data<HealthState>`.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use account_service::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::ready)
        .service(health::live)
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::update_current_user);
}
