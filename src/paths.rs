//! Pure path and URL mapping for Graph drive endpoints.
//!
//! Everything in this module is deterministic given the resolved session
//! identifiers: no network access, no state. The item/content/children URL
//! builders all root relative paths at the resolved drive.

use url::Url;

use crate::error::DriveError;

/// Converts a human SharePoint site URL into the compact reference form the
/// Graph API expects in place of a full URL.
///
/// `https://host.tld/sites/name` becomes `host.tld:/sites/name:/`.
///
/// # Errors
///
/// Returns a connection-kind [`DriveError`] if the URL does not start with
/// `https://`, cannot be parsed, or carries no site path.
pub(crate) fn to_site_reference(site_url: &str) -> Result<String, DriveError> {
    if !site_url.starts_with("https://") {
        return Err(DriveError::connection(
            "invalid site URL: must start with 'https://'",
        ));
    }

    let parsed = Url::parse(site_url)
        .map_err(|e| DriveError::connection(format!("invalid site URL {site_url}: {e}")))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| DriveError::connection(format!("invalid site URL {site_url}: no host")))?;

    let path = parsed.path().trim_end_matches('/');
    if path.is_empty() || path == "/" {
        return Err(DriveError::connection(format!(
            "invalid site URL {site_url}: no site path"
        )));
    }

    Ok(format!("{host}:{path}:/"))
}

/// Strips leading and trailing separators from a drive-relative path.
pub(crate) fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Builds the item URL for a drive-relative path, rooted at the site's drive.
///
/// An empty (or all-separator) path addresses the drive root itself.
pub(crate) fn item_url(graph_base: &str, site_id: &str, path: &str) -> String {
    let path = normalize(path);
    if path.is_empty() {
        format!("{graph_base}/sites/{site_id}/drive/root")
    } else {
        format!("{graph_base}/sites/{site_id}/drive/root:/{path}")
    }
}

/// Builds the `content` URL used as the upload/download target for a path.
pub(crate) fn content_url(graph_base: &str, site_id: &str, path: &str) -> String {
    let path = normalize(path);
    format!("{graph_base}/sites/{site_id}/drive/root:/{path}:/content")
}

/// Builds the children-collection URL for a folder path, rooted at the drive.
pub(crate) fn children_url(graph_base: &str, drive_id: &str, folder_path: &str) -> String {
    let folder_path = normalize(folder_path);
    if folder_path.is_empty() {
        format!("{graph_base}/drives/{drive_id}/root/children")
    } else {
        format!("{graph_base}/drives/{drive_id}/root:/{folder_path}:/children")
    }
}

/// Builds the parent-reference path used in move payloads.
pub(crate) fn parent_reference(drive_id: &str, parent_path: &str) -> String {
    format!("drives/{drive_id}/root:/{parent_path}")
}

/// Splits a destination path into its parent directory and final name.
///
/// A destination with no separator lands directly under the drive root, so
/// the parent is empty.
pub(crate) fn split_destination(dest_path: &str) -> (&str, &str) {
    let dest_path = normalize(dest_path);
    match dest_path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", dest_path),
    }
}
