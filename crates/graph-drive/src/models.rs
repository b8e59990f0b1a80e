//! Item records and delta pages as the service serializes them.

use serde::Deserialize;

/// Base URL of the remote drive API.
///
/// Links returned by the service (`@odata.nextLink`, `@odata.deltaLink`) are
/// absolute; cursors are stored relative to this prefix.
pub const DRIVE_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Strip [`DRIVE_BASE_URL`] from an absolute link, leaving the relative form
/// used as a delta cursor. Links without the prefix pass through unchanged.
#[must_use]
pub fn strip_base_url(link: &str) -> &str {
    link.strip_prefix(DRIVE_BASE_URL).unwrap_or(link)
}

/// Reference to the item containing an [`ItemRecord`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentReference {
    /// Id of the parent item. Empty for the drive root.
    #[serde(default)]
    pub id: String,
}

/// Facet present on records describing directories.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderFacet {
    /// Number of children the service reports for the directory.
    #[serde(default, rename = "childCount")]
    pub child_count: u64,
}

/// Facet present on tombstone records in the delta feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletedFacet {
    /// Deletion state reported by the service, e.g. `"deleted"`.
    #[serde(default)]
    pub state: String,
}

/// One item as returned by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    /// Opaque id assigned by the service.
    pub id: String,
    /// Human-visible basename, case preserved.
    #[serde(default)]
    pub name: String,
    /// Containing item, absent for the drive root.
    #[serde(default, rename = "parentReference")]
    pub parent: Option<ParentReference>,
    /// Present iff the record describes a directory.
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    /// Present iff the record is a tombstone.
    #[serde(default)]
    pub deleted: Option<DeletedFacet>,
}

impl ItemRecord {
    /// Id of the containing item, or `""` for the drive root.
    #[must_use]
    pub fn parent_id(&self) -> &str {
        self.parent.as_ref().map_or("", |p| p.id.as_str())
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.folder.is_some()
    }

    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.deleted.is_some()
    }
}

/// Response body of a children listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenPage {
    /// The child records.
    #[serde(default)]
    pub value: Vec<ItemRecord>,
}

/// One page of the delta feed.
///
/// On success exactly one of `next_link` (more pages follow) or `delta_link`
/// (end of the feed; resume here next cycle) is populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeltaPage {
    /// Change records on this page.
    #[serde(default)]
    pub value: Vec<ItemRecord>,
    /// Absolute URL of the next page, if more pages follow.
    #[serde(default, rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    /// Absolute URL that resumes the feed after this page, terminal.
    #[serde(default, rename = "@odata.deltaLink")]
    pub delta_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_record_decodes_directory() {
        let json = r#"{
            "id": "ABC123",
            "name": "Documents",
            "parentReference": { "id": "ROOT" },
            "folder": { "childCount": 3 }
        }"#;
        let record: ItemRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.id, "ABC123");
        assert_eq!(record.name, "Documents");
        assert_eq!(record.parent_id(), "ROOT");
        assert!(record.is_dir(), "folder facet marks a directory");
        assert!(!record.is_tombstone());
    }

    #[test]
    fn item_record_decodes_tombstone() {
        let json = r#"{
            "id": "GONE",
            "name": "old.txt",
            "parentReference": { "id": "ROOT" },
            "deleted": { "state": "deleted" }
        }"#;
        let record: ItemRecord = serde_json::from_str(json).expect("valid record");
        assert!(record.is_tombstone());
        assert!(!record.is_dir());
    }

    #[test]
    fn delta_page_decodes_odata_links() {
        let json = r#"{
            "value": [{ "id": "X", "name": "x" }],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/drive/root/delta?token=2"
        }"#;
        let page: DeltaPage = serde_json::from_str(json).expect("valid page");
        assert_eq!(page.value.len(), 1);
        assert!(page.delta_link.is_none());
        assert_eq!(
            strip_base_url(page.next_link.as_deref().expect("next link")),
            "/drive/root/delta?token=2"
        );
    }

    #[test]
    fn strip_base_url_passes_foreign_links_through() {
        assert_eq!(strip_base_url("/already/relative"), "/already/relative");
    }
}
