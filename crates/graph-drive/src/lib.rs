//! Wire-level surface of the remote drive service.
//!
//! This crate defines the types that cross the boundary between the
//! metadata cache and whatever HTTP stack talks to the service: serde
//! models for item records and delta pages, the [`RemoteAdapter`] trait the
//! cache consumes, and the credential material adapters authenticate with.

pub mod adapter;
pub mod auth;
pub mod error;
pub mod models;

pub use adapter::RemoteAdapter;
pub use auth::Auth;
pub use error::GraphError;
