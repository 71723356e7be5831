//! Error types for the fantasy sync pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("User GUID not provided and {env_var} environment variable not set")]
    MissingGuid { env_var: String },

    #[error("OAuth token not provided and {env_var} environment variable not set")]
    MissingToken { env_var: String },

    #[error("Failed to parse numeric id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Provider fetch failed for {resource}: {message}")]
    ProviderFetch { resource: String, message: String },

    #[error("Credential rejected for user {guid}")]
    Credential { guid: String },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },

    #[error("Pick {order} out of sequence: {prior} prior results")]
    OutOfSequence { order: u32, prior: usize },

    #[error("Not {user_id}'s turn: expected {expected}")]
    TurnViolation { user_id: String, expected: String },

    #[error("Draft order is empty")]
    EmptyDraftOrder,

    #[error("Import queue {topic} is closed")]
    QueueClosed { topic: String },
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::Persistence {
            message: err.to_string(),
        }
    }
}

impl SyncError {
    /// Whether this error indicates an invalid or expired credential.
    ///
    /// Workers use this to decide when to evict a cached client: a
    /// credential failure means the cached entry is poisoned, while a
    /// plain fetch failure does not.
    pub fn is_credential(&self) -> bool {
        match self {
            SyncError::Credential { .. } => true,
            SyncError::Http(err) => matches!(
                err.status(),
                Some(reqwest::StatusCode::UNAUTHORIZED) | Some(reqwest::StatusCode::FORBIDDEN)
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_classification() {
        let err = SyncError::Credential {
            guid: "ABC123".to_string(),
        };
        assert!(err.is_credential());

        let err = SyncError::ProviderFetch {
            resource: "league 390.l.12345".to_string(),
            message: "timed out".to_string(),
        };
        assert!(!err.is_credential());
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::MissingGuid {
            env_var: "YAHOO_FANTASY_GUID".to_string(),
        };
        assert!(err.to_string().contains("YAHOO_FANTASY_GUID"));

        let err = SyncError::OutOfSequence { order: 5, prior: 2 };
        assert_eq!(err.to_string(), "Pick 5 out of sequence: 2 prior results");
    }
}
