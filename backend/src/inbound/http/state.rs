//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccountService;
use crate::domain::ports::{LoginService, ProfileCommand, ProfileQuery, RegistrationCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Creates accounts.
    pub registration: Arc<dyn RegistrationCommand>,
    /// Exchanges credentials for a bearer token.
    pub login: Arc<dyn LoginService>,
    /// Resolves the caller's profile.
    pub profile: Arc<dyn ProfileQuery>,
    /// Applies profile edits.
    pub profile_updates: Arc<dyn ProfileCommand>,
}

impl HttpState {
    /// Route every port to the same account service.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use account_service::domain::AccountService;
    /// use account_service::inbound::http::state::HttpState;
    ///
    /// fn wire(service: AccountService) -> HttpState {
    ///     HttpState::from_service(Arc::new(service))
    /// }
    /// ```
    #[must_use]
    pub fn from_service(service: Arc<AccountService>) -> Self {
        Self {
            registration: service.clone(),
            login: service.clone(),
            profile: service.clone(),
            profile_updates: service,
        }
    }
}
