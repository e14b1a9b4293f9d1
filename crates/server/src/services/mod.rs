//! Business services for the store backend.
//!
//! Services own the operation semantics; repositories own the SQL. Every
//! admin-only method takes the resolved [`crate::models::CurrentAdmin`]
//! explicitly — identity is never re-derived from ambient state.

pub mod auth;
pub mod catalog;
pub mod contacts;
pub mod media;
pub mod orders;

pub use auth::AuthService;
pub use catalog::{CatalogService, ListFilter};
pub use contacts::ContactService;
pub use media::{MediaStore, UploadTicket};
pub use orders::OrderService;
