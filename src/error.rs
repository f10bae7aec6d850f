use thiserror::Error;

/// Normalized error set for the whole request flow. Every failure from the
/// caption source or a summarization backend collapses into one of these four
/// kinds, which the HTTP layer maps onto status codes.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied input was malformed (bad URL, unknown provider, missing fields).
    #[error("{0}")]
    Validation(String),

    /// The video, its captions, or the requested language does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The selected backend rejected the credential, or none was saved.
    #[error("{0}")]
    Auth(String),

    /// Transport, timeout, or quota failure from either external service.
    #[error("{0}")]
    Upstream(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Upstream(format!("upstream request timed out: {err}"))
        } else {
            Error::Upstream(format!("upstream request failed: {err}"))
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_message() {
        let err = Error::NotFound("no captions for video xyz".to_string());
        assert_eq!(err.to_string(), "no captions for video xyz");
    }

    #[test]
    fn test_validation_display() {
        let err = Error::Validation("invalid YouTube URL".to_string());
        assert_eq!(err.to_string(), "invalid YouTube URL");
    }
}
