//! Error types for the SharePoint drive client.
//!
//! Every failure the client can surface is a [`DriveError`] variant carrying
//! enough context (operation, target, HTTP status, underlying cause) for
//! callers to act on without string matching. The coarser three-way split the
//! API contract speaks in - security, connection, transaction - is available
//! through [`DriveError::kind`].

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DriveError`].
///
/// - [`ErrorKind::Security`] - credential/token acquisition failed.
/// - [`ErrorKind::Connection`] - identity resolution or listing returned an
///   error payload or malformed response.
/// - [`ErrorKind::Transaction`] - a file-level operation (upload, move,
///   delete, download) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential or token acquisition failure.
    Security,
    /// Identity-resolution or listing failure.
    Connection,
    /// File-level operation failure.
    Transaction,
}

/// Errors that can occur during drive client construction and operations.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Token acquisition failed (missing token field, rejected credentials,
    /// or a transport failure talking to the identity provider).
    #[error("security error: {reason}")]
    Security {
        /// Why the token could not be acquired.
        reason: String,
    },

    /// Identity resolution or listing returned an error payload, a malformed
    /// response, or a non-2xx status.
    #[error("connection error: {context}")]
    Connection {
        /// What the client was doing when the failure occurred.
        context: String,
    },

    /// Identity resolution or listing failed at the transport layer.
    #[error("connection error during {context}: {source}")]
    ConnectionTransport {
        /// What the client was doing when the failure occurred.
        context: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A file-level operation returned a non-2xx status.
    #[error("{op} failed for {target}: HTTP {status}")]
    TransactionStatus {
        /// The operation that failed ("upload", "move", ...).
        op: &'static str,
        /// The remote path or URL the operation targeted.
        target: String,
        /// The HTTP status code returned by the provider.
        status: u16,
    },

    /// A file-level operation failed at the transport layer.
    #[error("{op} failed for {target}: {source}")]
    TransactionTransport {
        /// The operation that failed.
        op: &'static str,
        /// The remote path or URL the operation targeted.
        target: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Local filesystem failure while reading an upload source or writing a
    /// downloaded file.
    #[error("IO error for {path}: {source}")]
    Io {
        /// The local path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The item's metadata carried no direct-download URL, meaning the
    /// resource has no retrievable content at this time.
    #[error("no downloadable content for {path}: download URL missing from item metadata")]
    MissingDownloadUrl {
        /// The remote path whose metadata lacked the download URL.
        path: String,
    },

    /// The provider handed back a direct-download URL outside the trusted
    /// domain; refusing to fetch it.
    #[error("untrusted download URL: {url}")]
    UntrustedDownloadUrl {
        /// The rejected URL.
        url: String,
    },
}

impl DriveError {
    /// Creates a security error.
    pub fn security(reason: impl Into<String>) -> Self {
        Self::Security {
            reason: reason.into(),
        }
    }

    /// Creates a connection error without an underlying cause.
    pub fn connection(context: impl Into<String>) -> Self {
        Self::Connection {
            context: context.into(),
        }
    }

    /// Creates a connection error wrapping a transport failure.
    pub fn connection_transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::ConnectionTransport {
            context: context.into(),
            source,
        }
    }

    /// Creates a transaction error from a non-2xx response status.
    pub fn transaction_status(op: &'static str, target: impl Into<String>, status: u16) -> Self {
        Self::TransactionStatus {
            op,
            target: target.into(),
            status,
        }
    }

    /// Creates a transaction error wrapping a transport failure.
    pub fn transaction_transport(
        op: &'static str,
        target: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::TransactionTransport {
            op,
            target: target.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-download-URL error.
    pub fn missing_download_url(path: impl Into<String>) -> Self {
        Self::MissingDownloadUrl { path: path.into() }
    }

    /// Creates an untrusted-download-URL error.
    pub fn untrusted_download_url(url: impl Into<String>) -> Self {
        Self::UntrustedDownloadUrl { url: url.into() }
    }

    /// Classifies this error into one of the three user-facing kinds.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Security { .. } => ErrorKind::Security,
            Self::Connection { .. } | Self::ConnectionTransport { .. } => ErrorKind::Connection,
            Self::TransactionStatus { .. }
            | Self::TransactionTransport { .. }
            | Self::Io { .. }
            | Self::MissingDownloadUrl { .. }
            | Self::UntrustedDownloadUrl { .. } => ErrorKind::Transaction,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or
// `From<std::io::Error>` because the variants require context (operation,
// target, path) that the source errors don't carry. The helper constructors
// are the correct pattern here as they force callers to provide it.
