use std::sync::Arc;

use thiserror::Error;

/// Result type used throughout the client.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors returned by client operations.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A listing or read call returned a non-200 status.
    #[error("failed to fetch {resource}")]
    FetchFailed {
        /// Name of the resource being fetched. For environment lookups this
        /// is the environment name, not the collection name.
        resource: String,
    },
    /// The project listing succeeded but contained no project with the
    /// requested id.
    #[error("project {id:?} not found")]
    ProjectNotFound {
        /// The requested project id.
        id: String,
    },
    /// The audience listing succeeded but contained no audience with the
    /// requested name.
    #[error("audience {name:?} not found")]
    AudienceNotFound {
        /// The requested audience name.
        name: String,
    },
    /// A write call returned a non-200 status.
    #[error("failed to update {entity} {id:?}")]
    UpdateFailed {
        /// Kind of entity being updated (`"experiment"` or `"feature"`).
        entity: &'static str,
        /// Id of the entity being updated.
        id: String,
    },
    /// A matched audience carried an id that does not parse as an integer.
    #[error("audience {name:?} has non-integer id {id:?}")]
    InvalidAudienceId {
        /// Name of the matched audience.
        name: String,
        /// The raw id value returned by the server.
        id: String,
    },
    /// Invalid base_url configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),
    /// Failed to deserialize a response body.
    #[error(transparent)]
    // serde_json::Error is not clonable, so we're wrapping it in an Arc.
    Parse(Arc<serde_json::Error>),
    /// Network error.
    #[error(transparent)]
    Network(Arc<reqwest::Error>),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Parse(Arc::new(value))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}
