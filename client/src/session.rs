//! Client-side session state shared by every view.

use crate::api::Profile;

/// Which view the shell renders next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Sign-in form.
    #[default]
    Login,
    /// Account creation form.
    Register,
    /// Profile viewer and editor.
    Profile,
}

impl Mode {
    /// Every mode in navigation order.
    pub const ALL: [Self; 3] = [Self::Login, Self::Register, Self::Profile];

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Profile => "Profile",
        }
    }
}

/// Token, cached profile and current mode for one run of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSession {
    mode: Mode,
    token: Option<String>,
    profile: Option<Profile>,
}

impl ClientSession {
    /// Fresh session: login mode, no token, nothing cached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch views.
    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Cached profile, if fetched since signing in.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Store `token`, drop any stale profile and go to the profile view.
    pub fn sign_in(&mut self, token: String) {
        self.token = Some(token);
        self.profile = None;
        self.mode = Mode::Profile;
    }

    /// Replace the cached profile.
    pub fn cache_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    /// Forget the token and profile and return to the login view.
    pub fn log_out(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn profile() -> Profile {
        Profile {
            id: 1,
            name: "Ann".to_owned(),
            email: "ann@x.com".to_owned(),
            age_group: None,
            gender: None,
            language: None,
        }
    }

    #[rstest]
    fn starts_empty_in_login_mode() {
        let session = ClientSession::new();
        assert_eq!(session.mode(), Mode::Login);
        assert!(session.token().is_none());
        assert!(session.profile().is_none());
    }

    #[rstest]
    fn sign_in_switches_to_profile_and_drops_cache() {
        let mut session = ClientSession::new();
        session.cache_profile(profile());

        session.sign_in("token".to_owned());

        assert_eq!(session.mode(), Mode::Profile);
        assert_eq!(session.token(), Some("token"));
        assert!(session.profile().is_none());
    }

    #[rstest]
    fn log_out_resets_everything() {
        let mut session = ClientSession::new();
        session.sign_in("token".to_owned());
        session.cache_profile(profile());

        session.log_out();

        assert_eq!(session, ClientSession::new());
    }
}
