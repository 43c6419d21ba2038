use thiserror::Error;

/// Everything that can stop a PR generation attempt.
///
/// A response that parses but lacks `title` or `description` is not an error;
/// the client fills in fallback text instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The active profile is missing its base URL, API key or model.
    #[error("API configuration is incomplete")]
    ConfigInvalid,

    #[error("no commit messages found")]
    NoCommitsFound,

    #[error("API request failed: {status} - {body}")]
    RequestFailed { status: u16, body: String },

    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    #[error("could not reach the API: {0}")]
    Transport(String),

    #[error("could not read commits: {0}")]
    Page(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failure_detail_includes_status_and_body() {
        let err = GenerationError::RequestFailed {
            status: 401,
            body: "invalid api key".into(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("invalid api key"));
    }
}
