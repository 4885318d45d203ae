//! mic-chatbox: interaction core for a floating speech-to-text chat widget
//!
//! The widget normally lives inside a host page; this binary wires the
//! core to stand-in capabilities and drives it from stdin:
//! - Explicit state machine for visibility, capture, theme, and copy
//! - Simulated continuous speech recognizer fed by `say` lines
//! - Draggable ball with a persisted position and a damped panel
//!
//! Scope:
//! - All user actions of the widget (open/mic/copy/reset/theme/edit)
//! - Best-effort position persistence under a single storage key
//! - NO rendering, styling, or real audio capture

mod capture;
mod clipboard;
mod config;
mod events;
mod store;
mod surface;
mod theme;
mod widget;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::capture::{CaptureSession, SimulatedEngine, SimulatedEngineHandle};
use crate::clipboard::LoggingClipboard;
use crate::config::Config;
use crate::events::WidgetEvent;
use crate::store::{FileStore, PositionStore};
use crate::surface::{Bounds, DraggableSurface, Position, SmoothingSink, WriteThroughSink};
use crate::theme::LoggingThemeHost;
use crate::widget::{WidgetCommand, WidgetController};

/// Ball position on a first launch
const BALL_DEFAULT: Position = Position { x: 20.0, y: 20.0 };

/// Host viewport the ball is confined to
const HOST_EXTENT: (f64, f64) = (1280.0, 720.0);

/// Panel title-bar region that alone initiates panel drags
const PANEL_HANDLE: (f64, f64) = (440.0, 40.0);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "mic-chatbox starting");

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(?config.store_path, "configuration loaded");

    // Create channels for inter-component communication
    // Input driver / copy timer -> controller
    let (command_tx, command_rx) = mpsc::channel(32);
    // Controller -> subscribers (for broadcasting widget events)
    let (event_tx, _event_rx) = broadcast::channel::<WidgetEvent>(64);
    // Recognition engine -> capture session
    let (engine_tx, engine_rx) = mpsc::channel(64);

    // The simulated engine stands in for the host recognizer; `say` lines
    // feed it utterances.
    let (engine, engine_handle) = SimulatedEngine::new(engine_tx);
    let session = CaptureSession::new(Box::new(engine), engine_rx);

    // The ball remembers where it was left across runs.
    let ball_store = PositionStore::new(
        Box::new(FileStore::new(config.store_path.clone())),
        BALL_DEFAULT,
    );
    let ball_position = ball_store.load();
    info!(position = %ball_position, "ball position restored");

    let ball = DraggableSurface::new(ball_position, WriteThroughSink::new(ball_store))
        .with_bounds(Bounds::from_extent(HOST_EXTENT.0, HOST_EXTENT.1));

    // Panel position is session-only and damped, never persisted.
    let panel = DraggableSurface::new(
        Position::ZERO,
        SmoothingSink::new(Position::ZERO, SmoothingSink::PANEL_FACTOR),
    )
    .with_handle(Bounds::from_extent(PANEL_HANDLE.0, PANEL_HANDLE.1));

    // Create the controller with stand-in host capabilities
    let mut controller = WidgetController::new(
        session,
        Box::new(LoggingClipboard),
        Box::new(LoggingThemeHost),
        event_tx.clone(),
        command_tx.clone(),
    );

    // Subscribe to widget events for narration
    let mut event_rx = event_tx.subscribe();

    info!("widget initialized, entering main loop");

    // Main event loop
    tokio::select! {
        // Run the controller (processes commands and capture updates)
        _ = controller.run(command_rx) => {
            info!("widget controller exited");
        }

        // Drive the widget from stdin
        result = run_input(command_tx, engine_handle, ball, panel) => {
            match result {
                Ok(()) => info!("input closed"),
                Err(e) => error!(?e, "input loop error"),
            }
        }

        // Narrate widget events
        _ = async {
            loop {
                match event_rx.recv().await {
                    Ok(event) => {
                        info!(%event, "widget event");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "widget event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        } => {
            info!("event narrator exited");
        }

        // Wait for shutdown signal
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    info!("mic-chatbox stopped");

    Ok(())
}

/// Read driver lines from stdin and dispatch them
///
/// Widget actions become controller commands; `say` feeds the simulated
/// engine; `drag`/`panel` move the surfaces directly, the way a pointer
/// would.
async fn run_input(
    command_tx: mpsc::Sender<WidgetCommand>,
    engine: SimulatedEngineHandle,
    mut ball: DraggableSurface<WriteThroughSink>,
    mut panel: DraggableSurface<SmoothingSink>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    log_usage();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "open" => Some(WidgetCommand::ToggleOpen),
            "theme" => Some(WidgetCommand::ToggleTheme),
            "mic" => Some(WidgetCommand::StartOrStop),
            "copy" => Some(WidgetCommand::Copy),
            "reset" => Some(WidgetCommand::Reset),
            "status" => Some(WidgetCommand::Status),
            "edit" => Some(WidgetCommand::EditText(rest.to_string())),
            "say" => {
                engine.commit(&format!("{rest} "));
                None
            }
            "drag" => {
                match parse_point(rest) {
                    Some(pointer) => {
                        ball.begin_drag(ball.position());
                        ball.drag_to(pointer);
                        ball.end_drag();
                        info!(position = %ball.position(), "ball moved");
                    }
                    None => warn!("usage: drag <x> <y>"),
                }
                None
            }
            "panel" => {
                match parse_point(rest) {
                    Some(pointer) => {
                        panel.begin_drag(panel.position());
                        panel.drag_to(pointer);
                        panel.end_drag();
                        info!(position = %panel.position(), "panel moved");
                    }
                    None => warn!("usage: panel <x> <y>"),
                }
                None
            }
            "help" => {
                log_usage();
                None
            }
            "quit" | "exit" => return Ok(()),
            other => {
                warn!(command = other, "unknown command");
                None
            }
        };

        if let Some(command) = command {
            if command_tx.send(command).await.is_err() {
                break;
            }
        }
    }

    Ok(())
}

/// Parse an `<x> <y>` coordinate pair
fn parse_point(rest: &str) -> Option<Position> {
    let mut parts = rest.split_whitespace();
    let x: f64 = parts.next()?.parse().ok()?;
    let y: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(x, y))
}

fn log_usage() {
    info!(
        "commands: open | theme | mic | copy | reset | status | edit <text> | say <text> | \
         drag <x> <y> | panel <x> <y> | help | quit"
    );
}
