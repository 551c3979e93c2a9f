//! Typed records for Graph API requests and responses.
//!
//! Provider responses are deserialized into explicit records on receipt
//! instead of being passed around as untyped maps. The only deliberately
//! opaque piece is the per-entry metadata overflow on [`FileEntry`], which
//! preserves whatever extra fields the provider returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity-provider token response.
///
/// `access_token` is optional so a missing field can be surfaced as a
/// security error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
}

/// Error object embedded in Graph error payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Response shape shared by the site and drive identity lookups:
/// either an `id` or an `error` object.
#[derive(Debug, Deserialize)]
pub(crate) struct IdentityResponse {
    pub id: Option<String>,
    pub error: Option<ApiError>,
}

/// One item returned by a folder listing.
///
/// `id` and `name` are pulled out as typed fields; everything else the
/// provider sent rides along in `metadata`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    /// Provider-assigned item id.
    pub id: String,
    /// Item name within its parent folder.
    pub name: String,
    /// Remaining provider-supplied metadata, kept opaque.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, Value>,
}

/// One page of a children listing, with the optional continuation link.
#[derive(Debug, Deserialize)]
pub(crate) struct ChildrenPage {
    #[serde(default)]
    pub value: Vec<FileEntry>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Item metadata fetched ahead of a by-path download. Only the time-limited
/// direct-download URL matters here.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemMetadata {
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    pub download_url: Option<String>,
}

/// PATCH payload for a move operation.
#[derive(Debug, Serialize)]
pub(crate) struct MoveRequest {
    #[serde(rename = "parentReference")]
    pub parent_reference: ParentReference,
    pub name: String,
}

/// Parent-folder reference inside a [`MoveRequest`].
#[derive(Debug, Serialize)]
pub(crate) struct ParentReference {
    pub path: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_keeps_unknown_fields_as_metadata() {
        let entry: FileEntry = serde_json::from_value(serde_json::json!({
            "id": "item-1",
            "name": "report.pdf",
            "size": 1024,
            "file": {"mimeType": "application/pdf"}
        }))
        .unwrap();
        assert_eq!(entry.id, "item-1");
        assert_eq!(entry.name, "report.pdf");
        assert_eq!(entry.metadata.get("size"), Some(&serde_json::json!(1024)));
        assert!(entry.metadata.contains_key("file"));
    }

    #[test]
    fn children_page_reads_continuation_link() {
        let page: ChildrenPage = serde_json::from_value(serde_json::json!({
            "value": [{"id": "a", "name": "a.txt"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next"
        }))
        .unwrap();
        assert_eq!(page.value.len(), 1);
        assert_eq!(
            page.next_link.as_deref(),
            Some("https://graph.microsoft.com/v1.0/next")
        );
    }

    #[test]
    fn children_page_without_value_is_empty() {
        let page: ChildrenPage = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn identity_response_reads_error_payload() {
        let response: IdentityResponse = serde_json::from_value(serde_json::json!({
            "error": {"code": "itemNotFound", "message": "The resource could not be found."}
        }))
        .unwrap();
        assert!(response.id.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code.as_deref(), Some("itemNotFound"));
        assert_eq!(error.message, "The resource could not be found.");
    }

    #[test]
    fn item_metadata_reads_well_known_download_url_key() {
        let metadata: ItemMetadata = serde_json::from_value(serde_json::json!({
            "id": "item-1",
            "@microsoft.graph.downloadUrl": "https://tenant.sharepoint.com/download/x"
        }))
        .unwrap();
        assert_eq!(
            metadata.download_url.as_deref(),
            Some("https://tenant.sharepoint.com/download/x")
        );
    }

    #[test]
    fn move_request_serializes_to_exact_payload_shape() {
        let request = MoveRequest {
            parent_reference: ParentReference {
                path: "drives/drive-9/root:/Documents/Folder".to_string(),
            },
            name: "test.txt".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "parentReference": {"path": "drives/drive-9/root:/Documents/Folder"},
                "name": "test.txt"
            })
        );
    }
}
