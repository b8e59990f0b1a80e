#![allow(dead_code, missing_docs, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use graph_drive::adapter::RemoteAdapter;
use graph_drive::auth::Auth;
use graph_drive::error::GraphError;
use graph_drive::models::{
    ChildrenPage, DeletedFacet, DeltaPage, FolderFacet, ItemRecord, ParentReference,
};

/// Root id served by every [`MockDrive`].
pub const ROOT_ID: &str = "drive-root";

/// Counters for every remote call the mock has served.
#[derive(Debug, Default, Clone)]
pub struct CallCounts {
    pub get_root: usize,
    pub get_children: usize,
    pub poll_delta: usize,
}

struct MockInner {
    root: ItemRecord,
    children: Mutex<HashMap<String, Vec<ItemRecord>>>,
    delta_pages: Mutex<VecDeque<Result<DeltaPage, GraphError>>>,
    counts: Mutex<CallCounts>,
    delta_cursors: Mutex<Vec<String>>,
}

/// In-memory stand-in for the remote drive service.
///
/// Cloning shares the underlying state, so tests can keep a handle after
/// moving the mock into a cache.
#[derive(Clone)]
pub struct MockDrive {
    inner: Arc<MockInner>,
}

impl MockDrive {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockInner {
                root: dir_record(ROOT_ID, "root", ""),
                children: Mutex::new(HashMap::new()),
                delta_pages: Mutex::new(VecDeque::new()),
                counts: Mutex::new(CallCounts::default()),
                delta_cursors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Serve `records` as the children of `id`.
    pub fn set_children(&self, id: &str, records: Vec<ItemRecord>) {
        self.inner
            .children
            .lock()
            .unwrap()
            .insert(id.to_owned(), records);
    }

    /// Queue one delta poll response; responses are served in order.
    pub fn push_delta(&self, page: Result<DeltaPage, GraphError>) {
        self.inner.delta_pages.lock().unwrap().push_back(page);
    }

    pub fn counts(&self) -> CallCounts {
        self.inner.counts.lock().unwrap().clone()
    }

    /// Cursors seen by `poll_delta`, in call order.
    pub fn delta_cursors(&self) -> Vec<String> {
        self.inner.delta_cursors.lock().unwrap().clone()
    }
}

impl RemoteAdapter for MockDrive {
    fn get_root(&self) -> impl Future<Output = Result<ItemRecord, GraphError>> + Send {
        self.inner.counts.lock().unwrap().get_root += 1;
        let result = Ok(self.inner.root.clone());
        async move { result }
    }

    fn get_children(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ChildrenPage, GraphError>> + Send {
        self.inner.counts.lock().unwrap().get_children += 1;
        let result = self
            .inner
            .children
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .map(|value| ChildrenPage { value })
            .ok_or_else(|| GraphError::Status {
                status: 404,
                message: format!("{id} has no listing"),
            });
        async move { result }
    }

    fn poll_delta(
        &self,
        cursor: &str,
    ) -> impl Future<Output = Result<DeltaPage, GraphError>> + Send {
        self.inner.counts.lock().unwrap().poll_delta += 1;
        self.inner
            .delta_cursors
            .lock()
            .unwrap()
            .push(cursor.to_owned());
        let result = self
            .inner
            .delta_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(empty_terminal_page("idle")));
        async move { result }
    }
}

/// Terminal delta page with no records and a `token={token}` resume link.
pub fn empty_terminal_page(token: &str) -> DeltaPage {
    DeltaPage {
        value: Vec::new(),
        next_link: None,
        delta_link: Some(delta_link(token)),
    }
}

/// Absolute delta feed URL for `token`, as the service would return it.
pub fn delta_link(token: &str) -> String {
    format!(
        "{}/drive/root/delta?token={token}",
        graph_drive::models::DRIVE_BASE_URL
    )
}

pub fn dir_record(id: &str, name: &str, parent: &str) -> ItemRecord {
    ItemRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        parent: (!parent.is_empty()).then(|| ParentReference {
            id: parent.to_owned(),
        }),
        folder: Some(FolderFacet::default()),
        deleted: None,
    }
}

pub fn file_record(id: &str, name: &str, parent: &str) -> ItemRecord {
    ItemRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        parent: Some(ParentReference {
            id: parent.to_owned(),
        }),
        folder: None,
        deleted: None,
    }
}

pub fn tombstone_record(id: &str, name: &str, parent: &str) -> ItemRecord {
    ItemRecord {
        deleted: Some(DeletedFacet {
            state: "deleted".to_owned(),
        }),
        ..file_record(id, name, parent)
    }
}

pub fn test_auth() -> Auth {
    Auth::new("test-token")
}
