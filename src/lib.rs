//! In-memory metadata cache for a remote object-storage drive.
//!
//! Sits between a kernel filesystem bridge and a remote HTTP API that
//! addresses items by opaque id. The cache translates POSIX paths to ids,
//! keeps a concurrently mutated tree of items coherent across local
//! operations and server-side deltas, and populates itself lazily from the
//! remote service.
//!
//! The pieces, leaves first:
//!
//! - [`item::DriveItem`]: one node holding identity, name, parent link and
//!   child id list behind a per-item reader/writer lock.
//! - [`registry::Registry`]: the process-wide concurrent id to item map.
//! - [`cache::MetadataCache`]: the tree itself, with id-addressed structural
//!   operations, path resolution, lazy child fetches, and the delta task.
//!
//! Everything remote goes through [`graph_drive::RemoteAdapter`]; the cache
//! never speaks HTTP.

pub mod cache;
pub mod config;
pub mod delta;
pub mod error;
pub mod item;
pub mod registry;
mod resolver;

pub use cache::MetadataCache;
pub use config::SyncConfig;
pub use delta::DeltaOutcome;
pub use error::CacheError;
pub use item::DriveItem;
pub use resolver::ChildMap;
