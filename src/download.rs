//! Streaming write helpers for file downloads.
//!
//! The download entry points on the client all end in [`stream_to_file`]:
//! parent directories are created as needed, the response body is copied to
//! disk in chunks through a buffered writer, and a partial file left behind
//! by a mid-stream failure is removed.

use std::path::Path;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;
use url::Url;

use crate::error::DriveError;

/// Streams a response body to a local path, returning bytes written.
///
/// Creates the parent directory chain first. On a mid-stream failure the
/// partial file is removed before the error is returned.
pub(crate) async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    local_path: &Path,
) -> Result<u64, DriveError> {
    if let Some(parent) = local_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DriveError::io(parent.to_path_buf(), e))?;
        }
    }

    let file = File::create(local_path)
        .await
        .map_err(|e| DriveError::io(local_path.to_path_buf(), e))?;

    let result = copy_body(file, response, url, local_path).await;

    if result.is_err() {
        debug!(path = %local_path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(local_path).await;
    }

    result
}

async fn copy_body(
    file: File,
    response: reqwest::Response,
    url: &str,
    local_path: &Path,
) -> Result<u64, DriveError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk =
            chunk_result.map_err(|e| DriveError::transaction_transport("download", url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DriveError::io(local_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DriveError::io(local_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Whether a direct-download URL is well-formed and belongs to the trusted
/// domain suffix.
///
/// The suffix must match on a label boundary: `tenant.sharepoint.com`
/// passes for `sharepoint.com`, `evilsharepoint.com` does not.
pub(crate) fn is_trusted_download_url(url: &str, trusted_domain: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    parsed.host_str().is_some_and(|host| {
        host == trusted_domain
            || host
                .strip_suffix(trusted_domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_url_accepts_domain_and_subdomains() {
        assert!(is_trusted_download_url(
            "https://tenant.sharepoint.com/download/x",
            "sharepoint.com"
        ));
        assert!(is_trusted_download_url(
            "https://sharepoint.com/x",
            "sharepoint.com"
        ));
    }

    #[test]
    fn trusted_url_rejects_other_hosts() {
        assert!(!is_trusted_download_url(
            "https://evil.example/x",
            "sharepoint.com"
        ));
        assert!(!is_trusted_download_url(
            "https://sharepoint.com.evil.example/x",
            "sharepoint.com"
        ));
    }

    #[test]
    fn trusted_url_requires_label_boundary_before_suffix() {
        assert!(!is_trusted_download_url(
            "https://evilsharepoint.com/x",
            "sharepoint.com"
        ));
        assert!(!is_trusted_download_url(
            "https://notsharepoint.com/download/x",
            "sharepoint.com"
        ));
    }

    #[test]
    fn trusted_url_rejects_non_http_schemes_and_garbage() {
        assert!(!is_trusted_download_url(
            "ftp://tenant.sharepoint.com/x",
            "sharepoint.com"
        ));
        assert!(!is_trusted_download_url("not a url", "sharepoint.com"));
    }
}
