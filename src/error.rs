//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore che un'operazione di crush
//! può restituire al chiamante.
//!
//! ## Responsabilità:
//! - Definisce `CrushError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi diagnostici leggibili (path quotati, suggerimenti sul separatore)
//! - Integra con `thiserror` per Display/Error automatici
//!
//! ## Categorie di errori:
//! - `InputNotFound`: il file di input non esiste
//! - `OutputDirNotFound`: la directory che conterrà il file di output non esiste
//! - `BinaryMissing`: pngcrush non è installato o non è nel PATH
//! - `ToolFailure`: pngcrush è terminato con exit code diverso da zero
//! - `Process`: altri errori di I/O durante spawn/attesa del processo
//! - `Task`: un task del batch è stato interrotto
//! - `Multiple`: tutti gli errori di un batch in modalità collect-all
//!
//! ## Esempio:
//! ```rust
//! use pngcrush_batch::CrushError;
//!
//! let error = CrushError::ToolFailure("real problem".to_string());
//! assert_eq!(error.to_string(), "real problem");
//! ```

use std::path::MAIN_SEPARATOR;

/// Text reported instead of the raw OS error when the binary cannot be found.
pub const BINARY_MISSING_MESSAGE: &str =
    "Could not spawn pngcrush process. Check whether pngcrush is installed and available.";

/// Errors reported by a crush operation
#[derive(thiserror::Error, Debug)]
pub enum CrushError {
    #[error("Input file at {} does not exist.{}", quote(.path), separator_hint(.suggest_separator, "in"))]
    InputNotFound {
        path: String,
        suggest_separator: bool,
    },

    #[error("Directory for output file at {} does not exist.{}", quote(.path), separator_hint(.suggest_separator, "out"))]
    OutputDirNotFound {
        path: String,
        suggest_separator: bool,
    },

    #[error("{}", BINARY_MISSING_MESSAGE)]
    BinaryMissing,

    #[error("{0}")]
    ToolFailure(String),

    #[error("Failed to run pngcrush process: {0}")]
    Process(#[source] std::io::Error),

    #[error("Crush task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{} crush operations failed:{}", .0.len(), join_messages(.0))]
    Multiple(Vec<CrushError>),
}

impl CrushError {
    /// Flattens nested `Multiple` errors into a single list
    pub fn into_errors(self) -> Vec<CrushError> {
        match self {
            CrushError::Multiple(errors) => errors
                .into_iter()
                .flat_map(CrushError::into_errors)
                .collect(),
            other => vec![other],
        }
    }
}

/// Prefixes quotes in the input with backslashes, then wraps the input in quotes.
pub fn quote(input: &str) -> String {
    format!("\"{}\"", input.replace('"', "\\\""))
}

fn separator_hint(suggest: &bool, prefix_name: &str) -> String {
    if *suggest {
        format!(
            " Perhaps a trailing {} should be added to the {}-prefix.",
            quote(&MAIN_SEPARATOR.to_string()),
            prefix_name
        )
    } else {
        String::new()
    }
}

fn join_messages(errors: &[CrushError]) -> String {
    errors.iter().map(|e| format!("\n{}", e)).collect()
}
