//! Widget controller module
//!
//! The interaction state machine composing visibility, capture, transcript,
//! theme, and copy feedback.

mod controller;

pub use controller::{
    SessionState, WidgetCommand, WidgetController, WidgetSnapshot, WidgetVisibility,
    COPY_FEEDBACK_WINDOW,
};
