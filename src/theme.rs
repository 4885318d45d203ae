//! Visual theme capability
//!
//! The theme is a process-wide attribute applied outside this core; the
//! widget only toggles it and hands the result to the host.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Process-wide visual mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// The opposite mode
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        Self::Light
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

/// Applies the visual mode to the host surface
pub trait ThemeHost: Send {
    fn apply(&mut self, mode: ThemeMode);
}

/// Stand-in theme host for the harness: logs the applied mode
#[derive(Default)]
pub struct LoggingThemeHost;

impl ThemeHost for LoggingThemeHost {
    fn apply(&mut self, mode: ThemeMode) {
        info!(%mode, "theme applied");
    }
}
