//! Errors that abort an analyze action.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Every way an analyze (or suggest) action can fail.
///
/// All variants are terminal for the action that raised them and nothing is
/// rendered when one is returned. The `Display` text is the message shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyzeError {
    /// The bulk text is not valid JSON.
    #[error("Invalid JSON: {message}")]
    MalformedInput {
        /// The JSON parser's message.
        message: String,
    },

    /// The bulk text is valid JSON but not an array.
    #[error("Bulk JSON must be an array")]
    Shape,

    /// Bulk and local sources are both empty.
    #[error("No tasks to analyze")]
    NoInput,

    /// The service answered with a non-success status.
    #[error("{body}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Parsed response body, shown verbatim.
        body: Value,
    },

    /// The request never produced a usable response.
    #[error("Network error: {message}")]
    Transport {
        /// The underlying cause.
        message: String,
    },
}

impl AnalyzeError {
    /// Builds a [`AnalyzeError::Transport`] from any displayable cause.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport { message: cause.to_string() }
    }
}
