//! Capture session lifecycle and transcript assembly
//!
//! One session is one run of continuous recognition from start to stop.
//! The session turns the engine's segment lists into cumulative transcript
//! strings, delivered strictly in the order the engine emitted them.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::engine::{CaptureError, EngineEvent, RecognitionSegment, SpeechRecognizer};

/// Updates surfaced to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureUpdate {
    /// Full cumulative transcript for the current session, not a delta
    Transcript(String),
    /// The engine failed internally; the session is effectively over
    Fault(String),
}

/// A continuous speech-capture session over an external engine
pub struct CaptureSession {
    engine: Box<dyn SpeechRecognizer>,
    events: mpsc::Receiver<EngineEvent>,
}

impl CaptureSession {
    /// Wrap an engine and its event channel
    pub fn new(engine: Box<dyn SpeechRecognizer>, events: mpsc::Receiver<EngineEvent>) -> Self {
        Self { engine, events }
    }

    /// Start capturing
    ///
    /// Fails when the engine is unavailable or rejects the start; the
    /// caller reverts to idle on error.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.engine.start()
    }

    /// Stop capturing, best-effort
    ///
    /// Engine failures are logged and swallowed; from the caller's side a
    /// stop always succeeds. Events already in flight may still arrive.
    pub fn stop(&mut self) {
        if let Err(e) = self.engine.stop() {
            warn!(?e, "error stopping speech recognition");
        }
    }

    /// Await the next capture update, in engine delivery order
    ///
    /// Returns `None` once the engine side of the channel is gone.
    pub async fn next_update(&mut self) -> Option<CaptureUpdate> {
        match self.events.recv().await? {
            EngineEvent::Result { segments } => {
                let transcript = assemble(&segments);
                debug!(
                    segments = segments.len(),
                    chars = transcript.chars().count(),
                    "transcript assembled"
                );
                Some(CaptureUpdate::Transcript(transcript))
            }
            EngineEvent::Fault { message } => Some(CaptureUpdate::Fault(message)),
        }
    }
}

/// Concatenate the top alternative of every segment, in engine order
fn assemble(segments: &[RecognitionSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.top_transcript())
        .collect()
}
