//! Clipboard capability
//!
//! The widget copies the transcript through whatever clipboard the host
//! provides. Denied or absent clipboards surface as a non-fatal error.

use tracing::info;

/// Errors from the host clipboard
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write denied: {0}")]
    Denied(String),
}

/// Writes text to the host clipboard
pub trait ClipboardWriter: Send {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Stand-in clipboard for the host harness: logs instead of writing
#[derive(Default)]
pub struct LoggingClipboard;

impl ClipboardWriter for LoggingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        info!(chars = text.chars().count(), "clipboard write");
        Ok(())
    }
}
