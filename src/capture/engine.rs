//! Continuous speech recognition engine contract
//!
//! The engine is an external capability: it owns microphone access and
//! permission prompts, runs in continuous mode with interim results, and
//! pushes recognition events over a channel. The widget never blocks on it.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::warn;

/// Errors from the capture capability
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("speech recognition unavailable or failed to start: {0}")]
    Init(String),

    #[error("speech recognition failed to stop: {0}")]
    Stop(String),
}

/// One ranked hypothesis for a recognized segment
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAlternative {
    /// Recognized text for this hypothesis
    pub transcript: String,
    /// Engine confidence, 0.0 to 1.0
    pub confidence: f32,
}

/// One recognized stretch of speech
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionSegment {
    /// Ranked alternatives, best first; never empty for a well-behaved engine
    pub alternatives: Vec<RecognitionAlternative>,
    /// Final segments are no longer revised by the engine
    pub is_final: bool,
}

impl RecognitionSegment {
    /// Build a single-alternative segment
    pub fn single(transcript: impl Into<String>, is_final: bool) -> Self {
        Self {
            alternatives: vec![RecognitionAlternative {
                transcript: transcript.into(),
                confidence: 1.0,
            }],
            is_final,
        }
    }

    /// The top-ranked transcript, empty when the engine reported none
    pub fn top_transcript(&self) -> &str {
        self.alternatives
            .first()
            .map(|a| a.transcript.as_str())
            .unwrap_or("")
    }
}

/// Events pushed by the recognition engine
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Every segment recognized so far in this session, in engine order
    Result { segments: Vec<RecognitionSegment> },
    /// Internal engine failure; the session will not recover on its own
    Fault { message: String },
}

/// Continuous speech-to-text capability
///
/// Implementations are constructed in continuous + interim-results mode and
/// deliver results through the event channel handed to them at wiring time.
pub trait SpeechRecognizer: Send {
    /// Begin recognizing; acquires the microphone
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Request that recognition stop
    ///
    /// A stop is a request, not a guarantee: events already in flight may
    /// still be delivered afterwards.
    fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Scriptable recognizer for the host harness and tests
///
/// Speech is injected through the detached [`SimulatedEngineHandle`]; the
/// engine replays the accumulated segment list on every injection, the way
/// a continuous engine reports cumulative results.
pub struct SimulatedEngine {
    shared: Arc<Mutex<EngineShared>>,
    available: bool,
}

struct EngineShared {
    segments: Vec<RecognitionSegment>,
    events: mpsc::Sender<EngineEvent>,
}

/// Injection handle for a [`SimulatedEngine`]
///
/// The handle does not check whether the engine was stopped: an event
/// injected after `stop()` models the late-delivery race the controller
/// guards against.
#[derive(Clone)]
pub struct SimulatedEngineHandle {
    shared: Arc<Mutex<EngineShared>>,
}

impl SimulatedEngine {
    /// Create a working engine and its injection handle
    pub fn new(events: mpsc::Sender<EngineEvent>) -> (Self, SimulatedEngineHandle) {
        let shared = Arc::new(Mutex::new(EngineShared {
            segments: Vec::new(),
            events,
        }));
        (
            Self {
                shared: Arc::clone(&shared),
                available: true,
            },
            SimulatedEngineHandle { shared },
        )
    }

    /// Create an engine whose `start()` always fails, as on a host without
    /// speech support
    pub fn unavailable(events: mpsc::Sender<EngineEvent>) -> (Self, SimulatedEngineHandle) {
        let (mut engine, handle) = Self::new(events);
        engine.available = false;
        (engine, handle)
    }
}

impl SpeechRecognizer for SimulatedEngine {
    fn start(&mut self) -> Result<(), CaptureError> {
        if !self.available {
            return Err(CaptureError::Init(
                "speech recognition is not supported in this environment".into(),
            ));
        }

        // Each session starts with a fresh result list.
        self.shared.lock().unwrap().segments.clear();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }
}

impl SimulatedEngineHandle {
    /// Revise the trailing interim segment (creating one if needed) and
    /// replay the cumulative result
    pub fn revise(&self, transcript: &str) {
        self.inject(transcript, false)
    }

    /// Finish the trailing segment as final and replay the cumulative result
    ///
    /// The next revision starts a new segment, as when the speaker pauses.
    pub fn commit(&self, transcript: &str) {
        self.inject(transcript, true)
    }

    /// Report an internal engine failure
    pub fn fail(&self, message: &str) {
        let shared = self.shared.lock().unwrap();
        if shared
            .events
            .try_send(EngineEvent::Fault {
                message: message.to_string(),
            })
            .is_err()
        {
            warn!("engine event channel closed or full, fault dropped");
        }
    }

    fn inject(&self, transcript: &str, is_final: bool) {
        let mut shared = self.shared.lock().unwrap();

        match shared.segments.last_mut() {
            Some(last) if !last.is_final => {
                *last = RecognitionSegment::single(transcript, is_final);
            }
            _ => shared
                .segments
                .push(RecognitionSegment::single(transcript, is_final)),
        }

        let event = EngineEvent::Result {
            segments: shared.segments.clone(),
        };
        if shared.events.try_send(event).is_err() {
            warn!("engine event channel closed or full, result dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_engine_rejects_start() {
        let (tx, _rx) = mpsc::channel(8);
        let (mut engine, _handle) = SimulatedEngine::unavailable(tx);
        assert!(matches!(engine.start(), Err(CaptureError::Init(_))));
    }

    #[test]
    fn test_start_clears_previous_session_segments() {
        let (tx, mut rx) = mpsc::channel(8);
        let (mut engine, handle) = SimulatedEngine::new(tx);

        engine.start().unwrap();
        handle.commit("first session");
        engine.stop().unwrap();
        engine.start().unwrap();
        handle.revise("second");

        // Drain the first session's event, then check the fresh one.
        let _ = rx.try_recv().unwrap();
        match rx.try_recv().unwrap() {
            EngineEvent::Result { segments } => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].top_transcript(), "second");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_revise_replaces_trailing_interim() {
        let (tx, mut rx) = mpsc::channel(8);
        let (mut engine, handle) = SimulatedEngine::new(tx);
        engine.start().unwrap();

        handle.revise("hi");
        handle.revise("hi there");

        let _ = rx.try_recv().unwrap();
        match rx.try_recv().unwrap() {
            EngineEvent::Result { segments } => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].top_transcript(), "hi there");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_commit_starts_new_segment() {
        let (tx, mut rx) = mpsc::channel(8);
        let (mut engine, handle) = SimulatedEngine::new(tx);
        engine.start().unwrap();

        handle.commit("hi there. ");
        handle.revise("how");

        let _ = rx.try_recv().unwrap();
        match rx.try_recv().unwrap() {
            EngineEvent::Result { segments } => {
                assert_eq!(segments.len(), 2);
                assert!(segments[0].is_final);
                assert!(!segments[1].is_final);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_top_transcript_of_empty_segment() {
        let segment = RecognitionSegment {
            alternatives: Vec::new(),
            is_final: false,
        };
        assert_eq!(segment.top_transcript(), "");
    }
}
