use thiserror::Error;

/// Everything that can go wrong between pressing Translate and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Please enter some text")]
    Validation,
    #[error("HTTP {0}")]
    Http(u16),
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TranslateError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            TranslateError::Http(status.as_u16())
        } else {
            TranslateError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(e: serde_json::Error) -> Self {
        TranslateError::Parse(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

#[cfg(not(windows))]
impl From<arboard::Error> for ClipboardError {
    fn from(e: arboard::Error) -> Self {
        ClipboardError(e.to_string())
    }
}
