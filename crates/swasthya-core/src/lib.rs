//! Core types and trait definitions for the Swasthya health assistant.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! knowledge store and the translation service are reached through the
//! [`store::KnowledgeStore`] and [`translate::Translator`] traits; transport
//! adapters drive everything through [`assistant::Assistant`].

pub mod assistant;
pub mod disease;
pub mod error;
pub mod language;
pub mod normalize;
pub mod resolver;
pub mod schedule;
pub mod session;
pub mod store;
pub mod translate;

pub use error::{Error, Result};
