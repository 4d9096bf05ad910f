//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione persistente della libreria.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con binario, prefissi, argomenti e modalità batch
//! - Fornisce validazione dei parametri
//! - Supporta caricamento/salvataggio da/verso file JSON
//! - Fornisce valori di default per tutti i parametri (anche per campi mancanti nel JSON)
//!
//! ## Parametri di configurazione:
//! - `binary`: Path o nome del binario pngcrush (default: "pngcrush")
//! - `prefixes`: Prefissi di input/output (default: "" e "out/")
//! - `arguments`: Flag passati a pngcrush (default: ["-rem", "alla"])
//! - `batch_mode`: "first_error" (default) o "collect_all"
//!
//! ## Esempio:
//! ```rust
//! use pngcrush_batch::Config;
//!
//! let config = Config {
//!     binary: "/usr/local/bin/pngcrush".to_string(),
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use crate::crusher::{
    batch::BatchMode, handle::DEFAULT_BINARY, path_resolver::PathPrefixes, process::ToolArguments,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for crush operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// pngcrush binary, resolved through PATH when not absolute
    pub binary: String,
    /// Input and output prefixes
    pub prefixes: PathPrefixes,
    /// Flags placed before the input and output paths
    pub arguments: Vec<String>,
    /// How batch outcomes are aggregated
    pub batch_mode: BatchMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            prefixes: PathPrefixes::default(),
            arguments: ToolArguments::default().into(),
            batch_mode: BatchMode::default(),
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() {
            return Err(anyhow::anyhow!("pngcrush binary location must not be empty"));
        }

        if let Some(position) = self.arguments.iter().position(|arg| arg.is_empty()) {
            return Err(anyhow::anyhow!("Tool argument #{} is empty", position + 1));
        }

        Ok(())
    }

    /// Load configuration from file, defaults when the file does not exist
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
