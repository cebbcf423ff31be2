//! Data models for the Libradesk client

pub mod book;
pub mod borrower;
pub mod envelope;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookQuery, CoverImage, CreateBook, SortOrder, UpdateBook};
pub use borrower::{Borrower, BorrowerStatus, CreateBorrower};
pub use envelope::{Envelope, Page, PageMeta};
pub use transaction::{AdminTransaction, Transaction, TransactionStatus, UserSummary};
pub use user::{
    AuthResponse, CreateAdminUser, LoginRequest, Profile, RegisterRequest, Role,
    UpdateAdminUser, UpdateProfile,
};
