use thiserror::Error;

/// Failures surfaced by a storage backend. Fetch failures are logged and
/// absorbed by the reporting path; everywhere else they bubble up to the
/// command boundary as strings.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected auth payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not signed in")]
    NotSignedIn,

    #[error("email confirmation required before signing in")]
    ConfirmationRequired,

    #[error("storage returned no row for insert into {0}")]
    MissingRow(&'static str),

    #[error("no record with id {0}")]
    NotFound(String),
}
