//! Speech capture module
//!
//! Bridges an external continuous speech-recognition engine into the
//! widget's event-driven core.

mod engine;
mod session;

pub use engine::{
    CaptureError, EngineEvent, RecognitionAlternative, RecognitionSegment, SimulatedEngine,
    SimulatedEngineHandle, SpeechRecognizer,
};
pub use session::{CaptureSession, CaptureUpdate};
