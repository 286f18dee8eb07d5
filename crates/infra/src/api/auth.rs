//! Session and token management for the clinic API
//!
//! Wraps the token endpoints (obtain, refresh, current user) around the
//! session store. Tokens live under [`ACCESS_TOKEN_KEY`] and
//! [`REFRESH_TOKEN_KEY`]; clearing the session also empties the resource
//! cache so no other account's data survives a logout.

use std::sync::Arc;

use caresync_common::cache::ResourceCache;
use caresync_core::{AccessTokenProvider, SessionStore};
use caresync_domain::constants::{
    ACCESS_TOKEN_KEY, CURRENT_USER_PATH, REFRESH_TOKEN_KEY, TOKEN_PATH, TOKEN_REFRESH_PATH,
};
use caresync_domain::{
    CareSyncError, Credentials, LoginRequest, Result, TokenResponse, UserProfile,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;

/// Access-token view over a session store.
///
/// The API client needs tokens before the auth service exists (the auth
/// service is itself built on top of the client), so this thin reader
/// breaks the cycle: both sides read the same session key.
#[derive(Clone)]
pub struct SessionTokens {
    session: Arc<dyn SessionStore>,
}

impl SessionTokens {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }
}

impl AccessTokenProvider for SessionTokens {
    fn access_token(&self) -> Option<String> {
        self.session.get(ACCESS_TOKEN_KEY)
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the backend rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

/// Login, refresh and logout flows over the token endpoints
pub struct AuthService {
    api: Arc<ApiClient>,
    session: Arc<dyn SessionStore>,
    cache: ResourceCache,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, session: Arc<dyn SessionStore>, cache: ResourceCache) -> Self {
        Self { api, session, cache }
    }

    /// Exchange credentials for a token pair and persist it.
    ///
    /// The token endpoint does not always echo the user profile; when it is
    /// absent a minimal profile is synthesized from the login email so
    /// callers always get one.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: Credentials) -> Result<TokenResponse> {
        let email = credentials.email.clone();
        let request = LoginRequest::from(credentials);

        let mut response: TokenResponse = self.api.post(TOKEN_PATH, &request).await?;

        self.session.put(ACCESS_TOKEN_KEY, &response.access);
        self.session.put(REFRESH_TOKEN_KEY, &response.refresh);

        if response.user.is_none() {
            response.user = Some(UserProfile {
                id: None,
                email,
                first_name: None,
                last_name: None,
                role: None,
            });
        }

        info!("login succeeded");
        Ok(response)
    }

    /// Exchange the stored refresh token for a fresh access token.
    ///
    /// A failed exchange means the session is no longer recoverable, so
    /// both tokens are dropped before the error propagates.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<String> {
        let refresh = self
            .session
            .get(REFRESH_TOKEN_KEY)
            .ok_or_else(|| CareSyncError::Session("no refresh token stored".into()))?;

        let exchanged: Result<RefreshResponse> =
            self.api.post(TOKEN_REFRESH_PATH, &RefreshRequest { refresh: &refresh }).await;

        let response = match exchanged {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "token refresh failed; clearing session tokens");
                self.session.remove(ACCESS_TOKEN_KEY);
                self.session.remove(REFRESH_TOKEN_KEY);
                return Err(err);
            }
        };

        self.session.put(ACCESS_TOKEN_KEY, &response.access);
        if let Some(rotated) = &response.refresh {
            self.session.put(REFRESH_TOKEN_KEY, rotated);
        }

        debug!("access token refreshed");
        Ok(response.access)
    }

    /// Fetch the signed-in user's profile.
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.api.get(CURRENT_USER_PATH).await
    }

    /// Drop the session tokens and every cached resource.
    pub fn logout(&self) {
        self.session.remove(ACCESS_TOKEN_KEY);
        self.session.remove(REFRESH_TOKEN_KEY);
        self.cache.clear();
        info!("session cleared");
    }
}

impl AccessTokenProvider for AuthService {
    fn access_token(&self) -> Option<String> {
        self.session.get(ACCESS_TOKEN_KEY)
    }
}
