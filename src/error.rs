//! Error types for try-on generation.

/// Maximum length of an API error message kept in [`TryOnError::Api`].
const MAX_ERROR_MESSAGE_LEN: usize = 300;

/// Errors that can occur while preparing or running a try-on generation.
#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    /// The API credential is missing from the environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response was well-formed but carried no inline image.
    #[error("no image produced{}", finish_reason_suffix(.finish_reason))]
    NoImage {
        /// Finish reason reported by the model, if any.
        finish_reason: Option<String>,
    },

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (reading an input image, saving a result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn finish_reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" (finish reason: {reason})"),
        None => String::new(),
    }
}

/// Result type alias for try-on operations.
pub type Result<T> = std::result::Result<T, TryOnError>;

/// Reduces an API error body to a short human-readable message.
///
/// Google APIs answer with `{"error": {"message": "..."}}`; when that shape is
/// present only the message is kept. Anything else is trimmed and truncated.
pub(crate) fn sanitize_error_message(body: &str) -> String {
    let extracted = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        });

    let message = extracted.unwrap_or_else(|| body.trim().to_string());
    if message.chars().count() <= MAX_ERROR_MESSAGE_LEN {
        return message;
    }
    let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
    format!("{truncated}...")
}
