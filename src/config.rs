//! Configuration loading and management

use std::path::PathBuf;

use anyhow::Result;

/// Widget host configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the key-value store file backing the position slot
    pub store_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let home = std::env::var("HOME")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("mic-chatbox");

        let store_path = data_dir.join("widget-store.json");

        Ok(Self {
            store_path,
            data_dir,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}
