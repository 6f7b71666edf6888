//! Conduit API transport.
//!
//! `traits` defines the synchronous call contract and the typed API built on
//! it, `envelope` validates response shapes, `client` speaks HTTP.

pub mod cache;
pub mod client;
pub mod envelope;
pub mod traits;

pub use client::ConduitClient;
pub use traits::{Conduit, DiffQuery, RevisionQuery};
