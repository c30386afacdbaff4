#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session lifecycle for the district dashboard.
//!
//! The session is an explicit state machine rather than ambient global
//! state:
//!
//! ```text
//! anonymous -> authenticating -> authenticated
//!     ^              |                 |
//!     +--------------+-----------------+
//!        logout, or profile fetch failure
//! ```
//!
//! A profile fetch failing with a stored token is treated as token
//! invalidity: the session demotes to anonymous silently and clears
//! the persisted tokens. The refresh token is persisted alongside the
//! access token but never exchanged — token rotation is a backend
//! concern.

mod store;

pub use store::{DEFAULT_SESSION_FILE, SESSION_FILE_ENV, TokenStore};

use district_desk_api::{ApiClient, ApiError};
use district_desk_api_models::{OfficerProfile, TokenPair};
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A backend call failed; the message carries the server's error
    /// text unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing the token file failed.
    #[error("Token store error: {0}")]
    Store(#[from] std::io::Error),

    /// The token file could not be encoded.
    #[error("Token encode error: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Observable authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token held.
    Anonymous,
    /// Token held, profile not yet resolved.
    Authenticating,
    /// Token and profile both held.
    Authenticated,
}

/// Holds the token pair and derived officer profile for one process.
///
/// Injected into every network-calling component; the tokens are never
/// read from ambient global state.
pub struct SessionManager {
    store: TokenStore,
    tokens: Option<TokenPair>,
    profile: Option<OfficerProfile>,
}

impl SessionManager {
    /// Creates a session from the token store, restoring any persisted
    /// token pair. With a restored pair the session starts in
    /// [`SessionState::Authenticating`]; the caller is expected to
    /// follow up with [`Self::resolve_profile`].
    #[must_use]
    pub fn restore(store: TokenStore) -> Self {
        let tokens = store.load();
        if tokens.is_some() {
            log::debug!("Restored persisted session tokens");
        }
        Self {
            store,
            tokens,
            profile: None,
        }
    }

    /// Current state, derived from what the session holds.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match (&self.tokens, &self.profile) {
            (None, _) => SessionState::Anonymous,
            (Some(_), None) => SessionState::Authenticating,
            (Some(_), Some(_)) => SessionState::Authenticated,
        }
    }

    /// The access token, if one is held.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access.as_str())
    }

    /// The resolved officer profile, if authenticated.
    #[must_use]
    pub fn profile(&self) -> Option<&OfficerProfile> {
        self.profile.as_ref()
    }

    /// Exchanges credentials for a token pair, persists both tokens,
    /// and advances to [`SessionState::Authenticating`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] with the server's error text
    /// unchanged when credentials are rejected, or a store error if
    /// the tokens cannot be persisted.
    pub async fn login(
        &mut self,
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let tokens = district_desk_api::auth::login(client, username, password).await?;
        self.store.save(&tokens)?;
        self.tokens = Some(tokens);
        self.profile = None;
        Ok(())
    }

    /// Resolves the officer profile for the held token, completing the
    /// transition to [`SessionState::Authenticated`].
    ///
    /// A fetch failure is treated as token invalidity: the session
    /// demotes to anonymous silently (tokens cleared from memory and
    /// disk) and `None` is returned. No error is surfaced.
    pub async fn resolve_profile(&mut self, client: &ApiClient) -> Option<&OfficerProfile> {
        let token = self.tokens.as_ref()?.access.clone();
        match district_desk_api::auth::fetch_profile(client, &token).await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.profile.as_ref()
            }
            Err(e) => {
                log::debug!("Profile fetch failed, demoting session: {e}");
                self.logout();
                None
            }
        }
    }

    /// Drops tokens and profile and clears the persisted token file.
    pub fn logout(&mut self) {
        self.tokens = None;
        self.profile = None;
        self.store.clear();
    }
}
