use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by image stores / 图片存储错误
///
/// Every failure is logged once where it happens and then forwarded
/// unchanged; no layer in this crate retries or recovers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required configuration field is missing. Raised at adapter
    /// construction, before any filesystem or network I/O.
    #[error("image store is not configured: missing {field}")]
    Config { field: &'static str },

    /// The local upload file could not be read. The backend is never
    /// contacted when this happens.
    #[error("failed to read upload file {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any object-storage failure: auth, network, throttling, permission.
    /// The upload path propagates this verbatim; the serve path collapses
    /// it to a plain 404, so callers there cannot tell a missing object
    /// from an unreachable backend.
    #[error("object storage request failed: {0}")]
    Backend(#[from] s3::error::S3Error),

    /// The backend client rejected the supplied credentials outright.
    #[error("object storage credentials rejected: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    /// The backend answered but the object is not there.
    #[error("object not found: {key}")]
    NotFound { key: String },
}
