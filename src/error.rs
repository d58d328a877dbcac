//! Munin error types

/// Munin error types
#[derive(Debug, thiserror::Error)]
pub enum MuninError {
    // Client errors
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("too many requests")]
    RateLimited,

    // Cache store errors
    #[error("storage error: {0}")]
    Storage(String),

    // Backend errors
    #[error("generation backend unavailable ({status}): {message}", status = .status.map_or_else(|| "no response".to_string(), |s| s.to_string()))]
    GenerationUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// Backend answered but produced no usable text (no choices, or an
    /// empty message). Treated as a server fault, not a backend outage.
    #[error("empty response from backend")]
    EmptyGeneration,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for MuninError {
    fn from(err: sqlx::Error) -> Self {
        MuninError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for MuninError {
    fn from(err: reqwest::Error) -> Self {
        MuninError::GenerationUnavailable {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type alias for Munin operations
pub type Result<T> = std::result::Result<T, MuninError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_unavailable_renders_status() {
        let with_status = MuninError::GenerationUnavailable {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert_eq!(
            with_status.to_string(),
            "generation backend unavailable (502): bad gateway"
        );

        let no_status = MuninError::GenerationUnavailable {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            no_status.to_string(),
            "generation backend unavailable (no response): connection refused"
        );
    }

    #[test]
    fn storage_wraps_sqlx() {
        let err: MuninError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, MuninError::Storage(_)));
    }
}
