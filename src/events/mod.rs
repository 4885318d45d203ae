//! Events module for widget state transitions
//!
//! Structured event types emitted by the controller as it opens, listens,
//! and handles copy/theme affordances.

use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

/// Events emitted by the widget controller during transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    /// The panel was opened from the collapsed ball
    WidgetOpened,

    /// The panel was collapsed back to the ball
    WidgetCollapsed,

    /// A capture session started listening
    ListeningStarted,

    /// The capture session went idle
    ListeningStopped {
        /// Duration in milliseconds the session was listening
        duration_ms: u64,
    },

    /// The transcript buffer was overwritten by a recognition result
    TranscriptUpdated {
        /// Length of the cumulative transcript, in characters
        chars: usize,
    },

    /// The visual theme was toggled
    ThemeChanged { mode: ThemeMode },

    /// The transcript buffer was cleared by a reset
    BufferCleared,

    /// The transcript was copied and the confirmation window opened
    CopyConfirmed,

    /// The copy confirmation window elapsed
    CopyFeedbackCleared,
}

impl std::fmt::Display for WidgetEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetEvent::WidgetOpened => write!(f, "WIDGET_OPENED"),
            WidgetEvent::WidgetCollapsed => write!(f, "WIDGET_COLLAPSED"),
            WidgetEvent::ListeningStarted => write!(f, "LISTENING_STARTED"),
            WidgetEvent::ListeningStopped { duration_ms } => {
                write!(f, "LISTENING_STOPPED ({}ms)", duration_ms)
            }
            WidgetEvent::TranscriptUpdated { chars } => {
                write!(f, "TRANSCRIPT_UPDATED ({} chars)", chars)
            }
            WidgetEvent::ThemeChanged { mode } => write!(f, "THEME_CHANGED ({})", mode),
            WidgetEvent::BufferCleared => write!(f, "BUFFER_CLEARED"),
            WidgetEvent::CopyConfirmed => write!(f, "COPY_CONFIRMED"),
            WidgetEvent::CopyFeedbackCleared => write!(f, "COPY_FEEDBACK_CLEARED"),
        }
    }
}
