//! SQLite backend for the Swasthya knowledge store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use seed::{Dataset, DiseaseSeed, SeedReport};
pub use store::SqliteStore;
