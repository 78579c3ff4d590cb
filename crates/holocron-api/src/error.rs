//! Error taxonomy for archive access.
//!
//! Transport-level failures (`Network`, `Status`, `Decode`) come out of the
//! raw fetch path; the typed operations wrap them with the operation context
//! so callers always see which collection or resource could not be fetched.

use crate::models::{Kind, ResourceUrl};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status} from {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Listing failure, e.g. `Cannot fetch characters: Network error: ...`.
    #[error("Cannot fetch {kind}: {message}")]
    Collection { kind: &'static str, message: String },

    /// Lookup failure, e.g. `Cannot fetch character 99: API error 404 ...`.
    #[error("Cannot fetch {kind} {id}: {message}")]
    Resource {
        kind: &'static str,
        id: u64,
        message: String,
    },

    /// Direct reference-token resolution failure.
    #[error("Cannot fetch {url}: {message}")]
    Reference { url: String, message: String },
}

impl ApiError {
    pub(crate) fn in_collection(self, kind: Kind) -> Self {
        ApiError::Collection {
            kind: kind.plural(),
            message: self.to_string(),
        }
    }

    pub(crate) fn for_resource(self, kind: Kind, id: u64) -> Self {
        ApiError::Resource {
            kind: kind.singular(),
            id,
            message: self.to_string(),
        }
    }

    pub(crate) fn for_reference(self, token: &ResourceUrl) -> Self {
        ApiError::Reference {
            url: token.as_str().to_string(),
            message: self.to_string(),
        }
    }
}
