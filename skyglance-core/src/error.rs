use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of any step of the weather/icon chain.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error(
        "weather payload has a missing or mistyped `{field}` field. Verify your API key is correct"
    )]
    Validation { field: &'static str },

    #[error("invalid icon identifier '{0}'")]
    InvalidIcon(String),

    #[error("location unavailable: {0}")]
    Location(String),

    #[error("failed to write icon cache entry {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn decode(what: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            what,
            reason: reason.to_string(),
        }
    }

    /// True for failures that happened before or during the HTTP exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("nope"), "nope");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }

    #[test]
    fn validation_message_names_field() {
        let err = FetchError::Validation { field: "main.temp" };
        assert!(err.to_string().contains("`main.temp`"));
        assert!(!err.is_transport());
    }
}
