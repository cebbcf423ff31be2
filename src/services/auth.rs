//! Authentication session manager.
//!
//! Owns the reactive authentication state and the auth endpoints. The
//! state machine: the service starts *initializing* (`is_loading`),
//! [`AuthService::initialize`] resolves it from the session store to
//! authenticated or anonymous without touching the network, and
//! login/register/logout move between the two afterwards. Logout never
//! gets stuck: the server notification is a courtesy and its failure is
//! logged, not surfaced.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::http::HttpClient;
use crate::models::{AuthResponse, LoginRequest, Profile, RegisterRequest};
use crate::session::SessionStore;

/// Reactive authentication state
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<Profile>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    fn initializing() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    fn anonymous() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    fn authenticated(user: Profile) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }
}

/// Response shape of `GET /auth/me`
#[derive(Debug, Deserialize)]
struct MeResponse {
    user: Profile,
}

#[derive(Clone)]
pub struct AuthService {
    http: HttpClient,
    store: Arc<SessionStore>,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthService {
    pub fn new(http: HttpClient, store: Arc<SessionStore>) -> Self {
        let (tx, _) = watch::channel(AuthState::initializing());
        Self {
            http,
            store,
            state: Arc::new(tx),
        }
    }

    /// Resolve the initial state from the session store. No network
    /// round trip: the cached profile makes restarts instant, and the
    /// next `current_user` call refreshes it authoritatively.
    pub fn initialize(&self) -> AuthState {
        let state = match self.store.load() {
            Some(session) => AuthState::authenticated(session.user),
            None => AuthState::anonymous(),
        };
        self.state.send_replace(state.clone());
        state
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// State changes as a `Stream`, for select-loop consumers.
    pub fn watch_stream(&self) -> WatchStream<AuthState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Authenticate and persist the session in the tier chosen by
    /// `remember` (durable when true, process-scoped otherwise).
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> ApiResult<Profile> {
        self.set_loading();

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember,
        };

        match self.login_request(&request).await {
            Ok(user) => {
                self.state.send_replace(AuthState::authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                // Failed login leaves the caller anonymous.
                self.state.send_replace(AuthState::anonymous());
                Err(e)
            }
        }
    }

    async fn login_request(&self, request: &LoginRequest) -> ApiResult<Profile> {
        let response: AuthResponse = self.http.post("/auth/login", request).await?;
        let token = response
            .token
            .ok_or_else(|| ApiError::Parse("login response missing token".to_string()))?;

        self.store.save(&token, &response.user, request.remember);
        Ok(response.user)
    }

    /// Register a new account.
    ///
    /// The request is validated locally first as a fast-fail UX path —
    /// nothing goes over the wire on a shape error; the backend remains
    /// the authority. A token in the response authenticates directly;
    /// without one, a follow-up login with the same credentials runs.
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<Profile> {
        request.validate()?;

        self.set_loading();
        let response: AuthResponse = match self.http.post("/auth/register", &request).await {
            Ok(response) => response,
            Err(e) => {
                self.state.send_replace(AuthState::anonymous());
                return Err(e);
            }
        };

        match response.token {
            Some(token) => {
                self.store.save(&token, &response.user, true);
                self.state
                    .send_replace(AuthState::authenticated(response.user.clone()));
                Ok(response.user)
            }
            // Backend deferred session creation; log in with the same
            // credentials immediately.
            None => self.login(&request.email, &request.password, false).await,
        }
    }

    /// End the session. Always clears local state, whatever the server
    /// notification does.
    pub async fn logout(&self) {
        if let Err(e) = self.http.post_no_content("/auth/logout").await {
            tracing::warn!("Logout notification failed: {}", e);
        }
        self.invalidate();
    }

    /// Local-only forced logout. Used by the error boundary when a
    /// response comes back 401.
    pub fn invalidate(&self) {
        self.store.clear();
        self.state.send_replace(AuthState::anonymous());
    }

    /// Fetch the authoritative profile and refresh the cached copy.
    pub async fn current_user(&self) -> ApiResult<Profile> {
        let response: MeResponse = self.http.get("/auth/me").await?;
        self.store.update_profile(&response.user);
        self.state
            .send_replace(AuthState::authenticated(response.user.clone()));
        Ok(response.user)
    }

    /// Unauthenticated reachability probe against the health endpoint.
    /// Advisory only — it improves error messaging, it never gates
    /// functionality.
    pub async fn test_connection(&self) -> bool {
        self.http.probe("/status").await
    }

    fn set_loading(&self) {
        self.state.send_modify(|state| state.is_loading = true);
    }
}
