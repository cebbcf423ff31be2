//! Libradesk Library Management Dashboard Client
//!
//! A typed Rust client for the Libradesk REST backend, covering
//! authentication and session persistence, the book catalog, borrowers,
//! borrow/return transactions and user administration.
//!
//! Everything hangs off [`Client`]: construct it once from
//! [`ClientConfig`] and thread it through the application — there is no
//! ambient global session state in this crate.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use services::auth::AuthState;

use http::HttpClient;
use routes::ErrorBoundary;
use services::Services;
use session::SessionStore;

/// Explicit session context shared across the application
#[derive(Clone)]
pub struct Client {
    pub config: Arc<ClientConfig>,
    pub store: Arc<SessionStore>,
    pub services: Services,
}

impl Client {
    /// Build the client once at process start.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let store = Arc::new(SessionStore::new(config.storage.session_file.clone()));
        let http = HttpClient::new(&config, Arc::clone(&store))?;
        let services = Services::new(http, Arc::clone(&store));

        Ok(Self {
            config: Arc::new(config),
            store,
            services,
        })
    }

    pub fn auth(&self) -> &services::AuthService {
        &self.services.auth
    }

    pub fn books(&self) -> &services::BooksService {
        &self.services.books
    }

    pub fn borrowers(&self) -> &services::BorrowersService {
        &self.services.borrowers
    }

    pub fn transactions(&self) -> &services::TransactionsService {
        &self.services.transactions
    }

    pub fn users(&self) -> &services::UsersService {
        &self.services.users
    }

    /// The top-level error boundary owning navigation decisions.
    pub fn error_boundary(&self) -> ErrorBoundary {
        ErrorBoundary::new(self.services.auth.clone())
    }
}
