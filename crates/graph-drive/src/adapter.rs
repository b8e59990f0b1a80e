//! Remote service abstraction consumed by the metadata cache.

use std::future::Future;

use crate::error::GraphError;
use crate::models::{ChildrenPage, DeltaPage, ItemRecord};

/// Trait for remote drive backends.
///
/// Implementations own the HTTP stack, authentication and retry policy; the
/// metadata cache only ever sees decoded records. Uses native `impl Future`
/// in traits (RPITIT), so no `async-trait` macro is required.
pub trait RemoteAdapter: Send + Sync {
    /// Fetch the drive root item.
    fn get_root(&self) -> impl Future<Output = Result<ItemRecord, GraphError>> + Send;

    /// Fetch the children of the item with the given id.
    fn get_children(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ChildrenPage, GraphError>> + Send;

    /// Fetch one page of the delta feed at `cursor`.
    ///
    /// `cursor` is the relative form of a previously returned link (or the
    /// initial `token=latest` cursor).
    fn poll_delta(
        &self,
        cursor: &str,
    ) -> impl Future<Output = Result<DeltaPage, GraphError>> + Send;
}
