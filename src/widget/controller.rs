//! Core widget state machine implementation
//!
//! Composes open/closed visibility, listening state, the transcript
//! buffer, theme, and copy feedback. Every user action and capture update
//! funnels through here; no state is mutated from anywhere else.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::capture::{CaptureSession, CaptureUpdate};
use crate::clipboard::ClipboardWriter;
use crate::events::WidgetEvent;
use crate::theme::{ThemeHost, ThemeMode};

/// How long the copy confirmation stays visible
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_millis(2000);

/// The two possible states of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not capturing, transcript editable
    Idle,
    /// Continuous capture running, transcript read-only
    Listening,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
        }
    }
}

/// Whether the widget shows the collapsed ball or the open panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetVisibility {
    /// Only the draggable ball is shown
    Collapsed,
    /// The chat panel is shown
    Open,
}

impl Default for WidgetVisibility {
    fn default() -> Self {
        Self::Collapsed
    }
}

impl std::fmt::Display for WidgetVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetVisibility::Collapsed => write!(f, "Collapsed"),
            WidgetVisibility::Open => write!(f, "Open"),
        }
    }
}

/// Commands dispatched to the controller
#[derive(Debug, Clone)]
pub enum WidgetCommand {
    /// Toggle the panel open or collapsed
    ToggleOpen,
    /// Toggle light/dark mode
    ToggleTheme,
    /// Clear the transcript, stopping capture if needed
    Reset,
    /// Copy the transcript to the clipboard
    Copy,
    /// Start capturing when idle, stop when listening
    StartOrStop,
    /// Replace the transcript with user-edited text
    EditText(String),
    /// Log a snapshot of the widget state
    Status,
    /// The copy confirmation window elapsed (scheduled internally)
    CopyFeedbackExpired { generation: u64 },
}

/// Point-in-time view of the controller's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub visibility: WidgetVisibility,
    pub session: SessionState,
    pub theme: ThemeMode,
    pub copy_feedback: bool,
    pub buffer_chars: usize,
}

/// The state machine hub mediating all widget interactions
pub struct WidgetController {
    visibility: WidgetVisibility,
    session_state: SessionState,
    buffer: String,
    theme: ThemeMode,
    copy_feedback: bool,
    /// Identifies the copy window a scheduled expiry belongs to
    copy_generation: u64,
    copy_timer: Option<JoinHandle<()>>,
    /// Time the current capture session started listening
    listening_since: Option<Instant>,
    session: CaptureSession,
    clipboard: Box<dyn ClipboardWriter>,
    theme_host: Box<dyn ThemeHost>,
    /// Channel for emitting widget events
    event_tx: broadcast::Sender<WidgetEvent>,
    /// Loops the copy timer expiry back into the command queue
    command_tx: mpsc::Sender<WidgetCommand>,
}

impl WidgetController {
    /// Create a new controller and apply the initial theme to the host
    pub fn new(
        session: CaptureSession,
        clipboard: Box<dyn ClipboardWriter>,
        mut theme_host: Box<dyn ThemeHost>,
        event_tx: broadcast::Sender<WidgetEvent>,
        command_tx: mpsc::Sender<WidgetCommand>,
    ) -> Self {
        let theme = ThemeMode::default();
        theme_host.apply(theme);

        Self {
            visibility: WidgetVisibility::default(),
            session_state: SessionState::default(),
            buffer: String::new(),
            theme,
            copy_feedback: false,
            copy_generation: 0,
            copy_timer: None,
            listening_since: None,
            session,
            clipboard,
            theme_host,
            event_tx,
            command_tx,
        }
    }

    /// Current capture session state
    pub fn state(&self) -> SessionState {
        self.session_state
    }

    /// Current transcript buffer
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Snapshot the full widget state
    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            visibility: self.visibility,
            session: self.session_state,
            theme: self.theme,
            copy_feedback: self.copy_feedback,
            buffer_chars: self.buffer.chars().count(),
        }
    }

    /// Run the controller, processing commands and capture updates
    ///
    /// Commands and updates are applied strictly in delivery order; the
    /// loop ends when both channels close.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<WidgetCommand>) {
        info!("widget controller started");

        loop {
            tokio::select! {
                maybe_command = commands.recv() => {
                    match maybe_command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                maybe_update = self.session.next_update() => {
                    match maybe_update {
                        Some(update) => self.handle_capture_update(update),
                        None => break,
                    }
                }
            }
        }

        info!("widget controller stopped");
    }

    /// Apply a single command
    pub fn handle_command(&mut self, command: WidgetCommand) {
        match command {
            WidgetCommand::ToggleOpen => self.toggle_open(),
            WidgetCommand::ToggleTheme => self.toggle_theme(),
            WidgetCommand::Reset => self.reset(),
            WidgetCommand::Copy => self.copy(),
            WidgetCommand::StartOrStop => self.start_or_stop(),
            WidgetCommand::EditText(new_value) => self.edit_text(new_value),
            WidgetCommand::Status => self.log_snapshot(),
            WidgetCommand::CopyFeedbackExpired { generation } => {
                self.expire_copy_feedback(generation)
            }
        }
    }

    /// Apply a capture update delivered by the session
    pub fn handle_capture_update(&mut self, update: CaptureUpdate) {
        match update {
            CaptureUpdate::Transcript(transcript) => {
                // A stop is only a request; events already in flight land
                // here afterwards and must not repopulate the buffer.
                if self.session_state != SessionState::Listening {
                    debug!("discarding transcript update while idle");
                    return;
                }

                let chars = transcript.chars().count();
                self.buffer = transcript;
                self.emit(WidgetEvent::TranscriptUpdated { chars });
            }
            CaptureUpdate::Fault(message) => {
                warn!(%message, "capture engine fault");
                if self.session_state == SessionState::Listening {
                    self.stop_listening();
                }
            }
        }
    }

    /// Collapsed <-> Open; listening deliberately continues across a collapse
    fn toggle_open(&mut self) {
        self.visibility = match self.visibility {
            WidgetVisibility::Collapsed => WidgetVisibility::Open,
            WidgetVisibility::Open => WidgetVisibility::Collapsed,
        };
        info!(visibility = %self.visibility, "widget visibility toggled");

        self.emit(match self.visibility {
            WidgetVisibility::Open => WidgetEvent::WidgetOpened,
            WidgetVisibility::Collapsed => WidgetEvent::WidgetCollapsed,
        });
    }

    /// Light <-> Dark, applied to the host immediately
    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.theme_host.apply(self.theme);
        self.emit(WidgetEvent::ThemeChanged { mode: self.theme });
    }

    /// Clear the transcript; stops the session first when listening
    fn reset(&mut self) {
        self.buffer.clear();
        if self.session_state == SessionState::Listening {
            self.stop_listening();
        }
        self.emit(WidgetEvent::BufferCleared);
    }

    /// Start a fresh capture session when idle, stop the running one otherwise
    fn start_or_stop(&mut self) {
        match self.session_state {
            SessionState::Idle => {
                // A new session always begins with an empty transcript.
                self.buffer.clear();

                match self.session.start() {
                    Ok(()) => {
                        self.session_state = SessionState::Listening;
                        self.listening_since = Some(Instant::now());
                        self.emit(WidgetEvent::ListeningStarted);
                    }
                    Err(e) => {
                        // Stay idle; the button state reverts silently.
                        error!(?e, "failed to start capture session");
                    }
                }
            }
            SessionState::Listening => self.stop_listening(),
        }
    }

    /// Transition Listening -> Idle
    fn stop_listening(&mut self) {
        self.session.stop();
        self.session_state = SessionState::Idle;

        let duration_ms = self
            .listening_since
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        info!(duration_ms, "capture session stopped");
        self.emit(WidgetEvent::ListeningStopped { duration_ms });
    }

    /// Overwrite the transcript with user input; read-only while listening
    fn edit_text(&mut self, new_value: String) {
        if self.session_state == SessionState::Listening {
            debug!("edit ignored while listening");
            return;
        }
        self.buffer = new_value;
    }

    /// Copy the transcript and open the confirmation window
    fn copy(&mut self) {
        // The copy control is disabled without text; nothing to confirm.
        if self.buffer.is_empty() {
            debug!("copy ignored, buffer empty");
            return;
        }

        match self.clipboard.write_text(&self.buffer) {
            Ok(()) => {
                self.copy_feedback = true;
                self.copy_generation = self.copy_generation.wrapping_add(1);

                // Restart, never stack: at most one window outstanding.
                if let Some(timer) = self.copy_timer.take() {
                    timer.abort();
                }

                let generation = self.copy_generation;
                let command_tx = self.command_tx.clone();
                self.copy_timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(COPY_FEEDBACK_WINDOW).await;
                    let _ = command_tx
                        .send(WidgetCommand::CopyFeedbackExpired { generation })
                        .await;
                }));

                self.emit(WidgetEvent::CopyConfirmed);
            }
            Err(e) => {
                // Feedback unchanged; the copy silently no-ops.
                warn!(?e, "failed to copy transcript");
            }
        }
    }

    /// Clear the copy confirmation once its window elapses
    fn expire_copy_feedback(&mut self, generation: u64) {
        // An expiry from a superseded window may already sit in the queue
        // when its timer is aborted; the generation check drops it.
        if generation != self.copy_generation || !self.copy_feedback {
            debug!(generation, "ignoring stale copy feedback expiry");
            return;
        }

        self.copy_feedback = false;
        self.copy_timer = None;
        self.emit(WidgetEvent::CopyFeedbackCleared);
    }

    /// Log the current state snapshot
    fn log_snapshot(&self) {
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => info!(snapshot = %json, "widget status"),
            Err(e) => warn!(?e, "failed to serialize snapshot"),
        }
    }

    /// Emit a widget event to subscribers
    fn emit(&self, event: WidgetEvent) {
        debug!(?event, "emitting widget event");
        let _ = self.event_tx.send(event);
    }
}
