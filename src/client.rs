//! The `DriveClient` façade.
//!
//! A client is constructed once per session: the constructor acquires a
//! bearer token, converts the human site URL into the Graph site reference,
//! and resolves the site and drive ids. Those three values are immutable for
//! the client's lifetime and every path-based operation is resolved relative
//! to the drive id. Operations run one at a time; the client holds no other
//! state.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::auth;
use crate::download::{is_trusted_download_url, stream_to_file};
use crate::error::DriveError;
use crate::models::{
    ChildrenPage, FileEntry, IdentityResponse, ItemMetadata, MoveRequest, ParentReference,
};
use crate::paths;
use crate::retry::RetryPolicy;

/// Connect timeout for Graph and identity-provider calls.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout, sized for large file transfers.
const READ_TIMEOUT_SECS: u64 = 300;

/// Constructor parameters for a [`DriveClient`].
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Human SharePoint site URL, e.g. `https://contoso.sharepoint.com/sites/team`.
    pub site_url: String,
    /// Azure AD tenant id.
    pub tenant_id: String,
    /// Application (client) id.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
}

/// Remote endpoints the client talks to.
///
/// Production callers use [`Endpoints::default`]; tests point the bases at a
/// mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Graph API base URL.
    pub graph_base: String,
    /// Identity-provider authority base URL.
    pub authority_base: String,
    /// Domain suffix a direct-download URL must belong to.
    pub trusted_download_domain: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            graph_base: "https://graph.microsoft.com/v1.0".to_string(),
            authority_base: "https://login.microsoftonline.com".to_string(),
            trusted_download_domain: "sharepoint.com".to_string(),
        }
    }
}

/// Client for a single SharePoint document library.
///
/// # Example
///
/// ```no_run
/// use sharepoint_drive::{DriveClient, DriveConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DriveClient::connect(&DriveConfig {
///     site_url: "https://contoso.sharepoint.com/sites/team".to_string(),
///     tenant_id: "tenant-id".to_string(),
///     client_id: "client-id".to_string(),
///     client_secret: "client-secret".to_string(),
/// })
/// .await?;
///
/// for entry in client.list_files("Documents/reports").await? {
///     println!("{} ({})", entry.name, entry.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DriveClient {
    http: Client,
    bearer_token: String,
    site_id: String,
    drive_id: String,
    graph_base: String,
    trusted_download_domain: String,
    retry: RetryPolicy,
}

impl DriveClient {
    /// Connects to the site's document library using the production Graph
    /// and identity-provider endpoints.
    ///
    /// All four resolution steps must succeed; there is no partially
    /// initialized client.
    ///
    /// # Errors
    ///
    /// - [`DriveError::Security`] if token acquisition fails.
    /// - Connection-kind errors if the site URL is not `https://`, or if
    ///   site/drive id resolution returns an error payload or malformed
    ///   response.
    pub async fn connect(config: &DriveConfig) -> Result<Self, DriveError> {
        Self::connect_with_endpoints(config, Endpoints::default()).await
    }

    /// Connects using explicit endpoints.
    ///
    /// # Errors
    ///
    /// Same as [`connect`](Self::connect).
    #[instrument(skip_all, fields(site_url = %config.site_url, tenant_id = %config.tenant_id))]
    pub async fn connect_with_endpoints(
        config: &DriveConfig,
        endpoints: Endpoints,
    ) -> Result<Self, DriveError> {
        let http = build_http_client();

        let bearer_token = auth::acquire_token(
            &http,
            &endpoints.authority_base,
            &config.tenant_id,
            &config.client_id,
            &config.client_secret,
        )
        .await?;

        let site_ref = paths::to_site_reference(&config.site_url)?;

        let site_id = resolve_identity(
            &http,
            &bearer_token,
            &format!("{}/sites/{site_ref}", endpoints.graph_base),
            "site resolution",
        )
        .await?;

        let drive_id = resolve_identity(
            &http,
            &bearer_token,
            &format!("{}/sites/{site_id}/drive/", endpoints.graph_base),
            "drive resolution",
        )
        .await?;

        info!(site_id = %site_id, drive_id = %drive_id, "drive client connected");

        Ok(Self {
            http,
            bearer_token,
            site_id,
            drive_id,
            graph_base: endpoints.graph_base,
            trusted_download_domain: endpoints.trusted_download_domain,
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy used by the by-path download entry points.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolved site id.
    #[must_use]
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Resolved drive id.
    #[must_use]
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    /// Lists the children of a folder (non-recursive), following
    /// continuation links until the provider reports no further pages.
    ///
    /// Entries come back in provider page order, then within-page order.
    ///
    /// # Errors
    ///
    /// A non-2xx response at any page aborts the whole listing with a
    /// connection-kind error, discarding entries accumulated so far.
    #[instrument(skip(self))]
    pub async fn list_files(&self, folder_path: &str) -> Result<Vec<FileEntry>, DriveError> {
        let mut url = paths::children_url(&self.graph_base, &self.drive_id, folder_path);
        let mut entries = Vec::new();

        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .send()
                .await
                .map_err(|e| {
                    DriveError::connection_transport(format!("listing {folder_path}"), e)
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(DriveError::connection(format!(
                    "listing {folder_path}: HTTP {}",
                    status.as_u16()
                )));
            }

            let page: ChildrenPage = response.json().await.map_err(|e| {
                DriveError::connection_transport(format!("listing {folder_path}: malformed page"), e)
            })?;

            entries.extend(page.value);

            match page.next_link {
                Some(next) => {
                    debug!(entries = entries.len(), "following continuation link");
                    url = next;
                }
                None => break,
            }
        }

        debug!(entries = entries.len(), "listing complete");
        Ok(entries)
    }

    /// Uploads a local file to a drive-relative path in a single PUT.
    ///
    /// The whole file is read into memory first; very large files are
    /// limited by available memory.
    ///
    /// # Errors
    ///
    /// Transaction-kind errors: [`DriveError::Io`] if the local file cannot
    /// be read, transport or status errors from the PUT.
    #[instrument(skip(self))]
    pub async fn upload_file(
        &self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), DriveError> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| DriveError::io(local_path.to_path_buf(), e))?;
        let byte_count = bytes.len();

        let url = paths::content_url(&self.graph_base, &self.site_id, remote_path);
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.bearer_token)
            .body(bytes)
            .send()
            .await
            .map_err(|e| DriveError::transaction_transport("upload", remote_path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::transaction_status(
                "upload",
                remote_path,
                status.as_u16(),
            ));
        }

        info!(bytes = byte_count, "upload complete");
        Ok(())
    }

    /// Moves (and/or renames) a file to a new drive-relative destination.
    ///
    /// The destination is split into a new parent folder and a new name;
    /// name collisions surface as whatever status the provider returns.
    ///
    /// # Errors
    ///
    /// Transaction-kind transport or status errors from the PATCH.
    #[instrument(skip(self))]
    pub async fn move_file(
        &self,
        remote_src_path: &str,
        remote_dest_path: &str,
    ) -> Result<(), DriveError> {
        let (parent_path, name) = paths::split_destination(remote_dest_path);
        let payload = MoveRequest {
            parent_reference: ParentReference {
                path: paths::parent_reference(&self.drive_id, parent_path),
            },
            name: name.to_string(),
        };

        let url = paths::item_url(&self.graph_base, &self.site_id, remote_src_path);
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.bearer_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DriveError::transaction_transport("move", remote_src_path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::transaction_status(
                "move",
                remote_src_path,
                status.as_u16(),
            ));
        }

        info!(dest = %remote_dest_path, "move complete");
        Ok(())
    }

    /// Deletes the file at a drive-relative path.
    ///
    /// # Errors
    ///
    /// Transaction-kind transport or status errors from the DELETE.
    #[instrument(skip(self))]
    pub async fn delete_file(&self, remote_path: &str) -> Result<(), DriveError> {
        let url = paths::item_url(&self.graph_base, &self.site_id, remote_path);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| DriveError::transaction_transport("delete", remote_path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::transaction_status(
                "delete",
                remote_path,
                status.as_u16(),
            ));
        }

        info!("delete complete");
        Ok(())
    }

    /// Downloads a file from an absolute URL to a local path, creating
    /// parent directories as needed. Returns the number of bytes written.
    ///
    /// Direct-download URLs are pre-authenticated, so no bearer token is
    /// attached.
    ///
    /// # Errors
    ///
    /// Transaction-kind transport, status, or IO errors.
    #[instrument(skip(self))]
    pub async fn download_file(&self, url: &str, local_path: &Path) -> Result<u64, DriveError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DriveError::transaction_transport("download", url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::transaction_status(
                "download",
                url,
                status.as_u16(),
            ));
        }

        let bytes_written = stream_to_file(response, url, local_path).await?;
        info!(path = %local_path.display(), bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }

    /// Downloads a file addressed by its drive-relative path.
    ///
    /// Fetches the item metadata (with the bounded retry) to obtain the
    /// provider's time-limited direct-download URL, validates the trusted
    /// domain, then streams the body to `local_path`. Returns bytes written.
    ///
    /// # Errors
    ///
    /// - [`DriveError::MissingDownloadUrl`] if the metadata carries no
    ///   download URL (the resource has no retrievable content right now).
    /// - [`DriveError::UntrustedDownloadUrl`] if the URL is outside the
    ///   trusted domain.
    /// - Transaction-kind transport, status, or IO errors otherwise.
    #[instrument(skip(self))]
    pub async fn download_file_by_path(
        &self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<u64, DriveError> {
        let download_url = self.resolve_download_url(remote_path).await?;
        self.download_file(&download_url, local_path).await
    }

    /// Downloads a file addressed by its drive-relative path into memory.
    ///
    /// Same resolution sequence as
    /// [`download_file_by_path`](Self::download_file_by_path), with the body
    /// buffered instead of written to disk.
    ///
    /// # Errors
    ///
    /// Same as [`download_file_by_path`](Self::download_file_by_path), minus
    /// the IO variants.
    #[instrument(skip(self))]
    pub async fn download_bytes(&self, remote_path: &str) -> Result<Vec<u8>, DriveError> {
        let download_url = self.resolve_download_url(remote_path).await?;

        let response = self
            .get_with_retry(&download_url, false, "download", remote_path)
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::transaction_status(
                "download",
                remote_path,
                status.as_u16(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DriveError::transaction_transport("download", remote_path, e))?;
        Ok(bytes.to_vec())
    }

    /// Fetches item metadata and extracts the validated direct-download URL.
    async fn resolve_download_url(&self, remote_path: &str) -> Result<String, DriveError> {
        let url = paths::item_url(&self.graph_base, &self.site_id, remote_path);
        let response = self
            .get_with_retry(&url, true, "download", remote_path)
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::transaction_status(
                "download",
                remote_path,
                status.as_u16(),
            ));
        }

        let metadata: ItemMetadata = response
            .json()
            .await
            .map_err(|e| DriveError::transaction_transport("download", remote_path, e))?;

        let download_url = metadata
            .download_url
            .ok_or_else(|| DriveError::missing_download_url(remote_path))?;

        if !is_trusted_download_url(&download_url, &self.trusted_download_domain) {
            return Err(DriveError::untrusted_download_url(download_url));
        }

        Ok(download_url)
    }

    /// GET with the bounded retry: reattempts only on 5xx statuses, up to
    /// the policy's attempt count, sleeping the fixed delay in between. Any
    /// other status is returned immediately for normal error handling.
    async fn get_with_retry(
        &self,
        url: &str,
        authenticated: bool,
        op: &'static str,
        target: &str,
    ) -> Result<reqwest::Response, DriveError> {
        let mut attempt: u32 = 1;
        loop {
            let mut request = self.http.get(url);
            if authenticated {
                request = request.bearer_auth(&self.bearer_token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| DriveError::transaction_transport(op, target.to_string(), e))?;

            let status = response.status().as_u16();
            if !self.retry.is_retryable(status) || attempt >= self.retry.max_attempts() {
                return Ok(response);
            }

            debug!(status, attempt, "server error, retrying after fixed delay");
            attempt += 1;
            tokio::time::sleep(self.retry.delay()).await;
        }
    }
}

/// Resolves one identity (site or drive id) from a Graph endpoint that
/// returns either `{id}` or `{error:{message}}`.
async fn resolve_identity(
    http: &Client,
    bearer_token: &str,
    url: &str,
    context: &'static str,
) -> Result<String, DriveError> {
    let response = http
        .get(url)
        .bearer_auth(bearer_token)
        .send()
        .await
        .map_err(|e| DriveError::connection_transport(context, e))?;

    let identity: IdentityResponse = response
        .json()
        .await
        .map_err(|e| DriveError::connection_transport(format!("{context}: malformed response"), e))?;

    if let Some(error) = identity.error {
        return Err(DriveError::connection(format!(
            "{context}: {}",
            error.message
        )));
    }

    identity
        .id
        .ok_or_else(|| DriveError::connection(format!("{context}: response carried no id")))
}

/// Builds the HTTP client shared by all of a session's calls.
#[allow(clippy::expect_used)]
fn build_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client with static configuration")
}
