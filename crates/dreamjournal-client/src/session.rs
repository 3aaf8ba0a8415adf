use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use dreamjournal_store::Storage;
use dreamjournal_types::User;
use dreamjournal_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::Result;
use crate::gateway::{ApiClient, TOKEN_KEY, USER_KEY};
use crate::{token, validation};

pub const DEFAULT_LANDING: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";

/// Where the UI should go after an auth transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
}

impl Redirect {
    fn to(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// The page the user asked for before signing in, or the landing page.
    fn back_to(from: Option<&str>) -> Self {
        match from {
            Some(path) if !path.is_empty() => Self::to(path),
            _ => Self::to(DEFAULT_LANDING),
        }
    }
}

/// The authenticated identity plus its bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: User,
    #[serde(skip_serializing)]
    pub token: String,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn bearer_token(&self) -> &str {
        &self.token
    }
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Self {
            user: resp.user,
            token: resp.token,
        }
    }
}

/// Owns the session: in memory, in device storage, and as the credential the
/// gateway attaches to requests.
///
/// Handed explicitly to whatever drives the UI; nothing here is global.
pub struct SessionManager {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    state: watch::Sender<Option<Session>>,
}

impl SessionManager {
    pub fn new(api_url: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        let api = ApiClient::new(api_url, storage.clone());
        Self::with_api(api, storage)
    }

    /// `api` must read its token from the same `storage`.
    pub fn with_api(api: ApiClient, storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            api,
            storage,
            state,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Observe session changes (login, logout, silent clearing).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// The current session, unless its token is known to have expired, in
    /// which case the session is cleared.
    pub fn current(&self) -> Option<Session> {
        let session = self.state.borrow().as_ref().cloned()?;
        if token::is_expired(&session.token, Utc::now()) {
            info!("Session token for {} expired, clearing", session.username());
            self.clear();
            return None;
        }
        Some(session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub async fn login(&self, email: &str, password: &str, from: Option<&str>) -> Result<Redirect> {
        validation::validate_login(email, password)?;

        let resp = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .inspect_err(|e| warn!("Login failed: {}", e))?;

        self.establish(resp)?;
        Ok(Redirect::back_to(from))
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        from: Option<&str>,
    ) -> Result<Redirect> {
        validation::validate_registration(username, email, password, password)?;

        let resp = self
            .api
            .register(&RegisterRequest {
                email: email.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .inspect_err(|e| warn!("Registration failed: {}", e))?;

        self.establish(resp)?;
        Ok(Redirect::back_to(from))
    }

    pub fn logout(&self) -> Redirect {
        if let Some(session) = self.state.borrow().as_ref() {
            info!("Logging out {}", session.username());
        }
        self.clear();
        Redirect::to(LOGIN_ROUTE)
    }

    /// Optimistically restores a persisted session without touching the
    /// network. A corrupt user record or a token known to be expired wipes
    /// both keys.
    pub fn restore(&self) -> Option<Session> {
        let (user, token) = match (self.storage.get(USER_KEY), self.storage.get(TOKEN_KEY)) {
            (Ok(Some(user)), Ok(Some(token))) => (user, token),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Could not read stored session: {:#}", e);
                return None;
            }
            _ => return None,
        };

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Error parsing stored user: {}", e);
                self.clear();
                return None;
            }
        };

        if token::is_expired(&token, Utc::now()) {
            info!("Stored token for {} has expired", user.username);
            self.clear();
            return None;
        }

        let session = Session { user, token };
        self.state.send_replace(Some(session.clone()));
        Some(session)
    }

    /// Checks the restored token against `/api/me`.
    ///
    /// Any failure, including an unreachable server, clears the session
    /// without a redirect. On success the stored user record is refreshed.
    pub async fn verify(&self) -> bool {
        let Some(session) = self.current() else {
            return false;
        };

        match self.api.me().await {
            Ok(me) => {
                let refreshed = Session {
                    user: me.user,
                    token: session.token,
                };
                if let Err(e) = self.persist(&refreshed) {
                    warn!("Could not refresh stored user: {}", e);
                }
                self.state.send_replace(Some(refreshed));
                true
            }
            Err(e) => {
                info!("Stored session failed verification, clearing: {}", e);
                self.clear();
                false
            }
        }
    }

    /// Process-start sequence: `restore` then `verify`.
    pub async fn start(&self) -> Option<Session> {
        self.restore()?;
        if self.verify().await {
            self.current()
        } else {
            None
        }
    }

    fn establish(&self, resp: AuthResponse) -> Result<()> {
        let session = Session::from(resp);
        if let Err(e) = self.persist(&session) {
            self.clear();
            return Err(e);
        }

        info!("Signed in as {}", session.username());
        self.state.send_replace(Some(session));
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(USER_KEY, &user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        Ok(())
    }

    fn clear(&self) {
        self.state.send_replace(None);
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove {} from storage: {:#}", key, e);
            }
        }
    }
}
