//! SQLite backend for the Order Store.
//!
//! [`SqliteDatabase`] implements [`crate::OrderManagement`]. The queries themselves live in [`orders`] as free
//! functions over a `&mut SqliteConnection`.
mod errors;
mod sqlite_impl;

pub mod orders;

pub use errors::SqliteDatabaseError;
pub use sqlite_impl::SqliteDatabase;
