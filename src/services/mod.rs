//! Client services: the auth session manager and the resource clients

pub mod auth;
pub mod books;
pub mod borrowers;
pub mod transactions;
pub mod users;

use std::sync::Arc;

use crate::http::HttpClient;
use crate::session::SessionStore;

pub use auth::{AuthService, AuthState};
pub use books::BooksService;
pub use borrowers::BorrowersService;
pub use transactions::TransactionsService;
pub use users::UsersService;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub books: BooksService,
    pub borrowers: BorrowersService,
    pub transactions: TransactionsService,
    pub users: UsersService,
}

impl Services {
    /// Create all services over one request core and session store.
    pub fn new(http: HttpClient, store: Arc<SessionStore>) -> Self {
        Self {
            auth: AuthService::new(http.clone(), store.clone()),
            books: BooksService::new(http.clone()),
            borrowers: BorrowersService::new(http.clone()),
            transactions: TransactionsService::new(http.clone()),
            users: UsersService::new(http, store),
        }
    }
}
