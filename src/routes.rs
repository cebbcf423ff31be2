//! Route guarding and error-driven navigation.
//!
//! Navigation decisions live here and nowhere else. The request core
//! returns typed errors and stays pure; [`ErrorBoundary`] is the single
//! place that turns a 401 into a forced logout plus a login redirect and
//! a 403 into a home redirect. [`route_decision`] is the pure path/state
//! guard. Both redirect targets sit on the always-allowed set, so
//! decisions cannot loop.

use crate::error::ApiError;
use crate::services::auth::{AuthService, AuthState};

/// Paths reachable without a session.
const PUBLIC_PATHS: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/terms",
    "/privacy",
];

/// Asset paths, always passed through.
const STATIC_PATHS: &[&str] = &["/static", "/images", "/favicon.ico"];

/// Paths requiring the admin role.
const ADMIN_PREFIX: &str = "/admin";

/// Navigation target of a guard or boundary decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Home,
}

impl Redirect {
    pub fn target(&self) -> &'static str {
        match self {
            Redirect::Login => "/login",
            Redirect::Home => "/",
        }
    }
}

/// Outcome of guarding a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Redirect),
}

/// Pure function of path and authentication state.
pub fn route_decision(path: &str, state: &AuthState) -> RouteDecision {
    if STATIC_PATHS.iter().any(|p| path.starts_with(p)) {
        return RouteDecision::Allow;
    }

    // The landing page is public; everything else public is matched by
    // prefix so nested pages (e.g. /register/confirm) pass too.
    if path == "/" || PUBLIC_PATHS.iter().any(|p| path.starts_with(p)) {
        return RouteDecision::Allow;
    }

    if !state.is_authenticated {
        return RouteDecision::Redirect(Redirect::Login);
    }

    if path.starts_with(ADMIN_PREFIX) {
        let is_admin = state.user.as_ref().map(|u| u.is_admin()).unwrap_or(false);
        if !is_admin {
            return RouteDecision::Redirect(Redirect::Home);
        }
    }

    RouteDecision::Allow
}

/// Single owner of error-driven navigation.
pub struct ErrorBoundary {
    auth: AuthService,
}

impl ErrorBoundary {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    /// React to a request error. Call sites may still surface their own
    /// message first; the returned redirect is the safety net.
    pub fn handle(&self, error: &ApiError) -> Option<Redirect> {
        match error {
            ApiError::Auth(msg) => {
                tracing::warn!("Session rejected by the backend: {}", msg);
                self.auth.invalidate();
                Some(Redirect::Login)
            }
            // Forbidden routes home without touching local state.
            ApiError::Permission(_) => Some(Redirect::Home),
            _ => None,
        }
    }
}
