//! SharePoint Drive Client Library
//!
//! This library wraps the Microsoft Graph drive endpoints for a single
//! SharePoint document library: listing, upload, move, delete, and download,
//! authenticated via an OAuth2 client-credentials flow.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`client`] - The `DriveClient` façade and its construction sequence
//! - [`error`] - Typed failure taxonomy (security / connection / transaction)
//! - [`models`] - Typed Graph request/response records
//! - [`retry`] - Bounded fixed-delay retry policy for 5xx responses
//!
//! Construction resolves the bearer token, site id, and drive id once; every
//! subsequent operation is a single authenticated REST call (or a bounded
//! sequence of them) against the resolved drive.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod auth;
pub mod client;
mod download;
pub mod error;
pub mod models;
mod paths;
pub mod retry;

// Re-export commonly used types
pub use client::{DriveClient, DriveConfig, Endpoints};
pub use error::{DriveError, ErrorKind};
pub use models::FileEntry;
pub use retry::RetryPolicy;
