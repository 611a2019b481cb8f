use thiserror::Error;

/// Error type for entries that cannot be stored in the catalog. Returned
/// before any state changes.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("`{url}` is not an absolute URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Error type for reading and writing the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key `{key}`")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize value for key `{key}`")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Returned by the access gate when the admin view is requested without a
/// privileged session.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("the admin view requires a privileged session")]
pub struct AccessDenied;
