//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path di input e output a partire dai prefissi
//! configurati. Nessuna normalizzazione: i path sono semplici concatenazioni,
//! così i messaggi di errore mostrano esattamente ciò che l'utente ha chiesto.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Prefixes prepended to every relative path of a crush request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathPrefixes {
    /// Prepended to the relative path to form the input path (default: "")
    pub in_prefix: String,
    /// Prepended to the relative path to form the output path (default: "out/")
    pub out_prefix: String,
}

impl Default for PathPrefixes {
    fn default() -> Self {
        Self {
            in_prefix: String::new(),
            out_prefix: format!("out{}", MAIN_SEPARATOR),
        }
    }
}

impl PathPrefixes {
    pub fn new(in_prefix: impl Into<String>, out_prefix: impl Into<String>) -> Self {
        Self {
            in_prefix: in_prefix.into(),
            out_prefix: out_prefix.into(),
        }
    }

    /// Replaces only the in-prefix, keeping the current out-prefix
    pub fn with_in_prefix(mut self, in_prefix: impl Into<String>) -> Self {
        self.in_prefix = in_prefix.into();
        self
    }

    /// Replaces only the out-prefix, keeping the current in-prefix
    pub fn with_out_prefix(mut self, out_prefix: impl Into<String>) -> Self {
        self.out_prefix = out_prefix.into();
        self
    }
}

/// One resolved input/output pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrushRequest {
    pub in_path: String,
    pub out_path: String,
}

impl CrushRequest {
    /// Directory that must exist before pngcrush can write the output file
    pub fn output_dir(&self) -> PathBuf {
        PathResolver::output_dir(&self.out_path)
    }
}

/// Utility per calcolare i path in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Concatena i prefissi con il path relativo
    pub fn resolve(relative_path: &str, prefixes: &PathPrefixes) -> CrushRequest {
        CrushRequest {
            in_path: format!("{}{}", prefixes.in_prefix, relative_path),
            out_path: format!("{}{}", prefixes.out_prefix, relative_path),
        }
    }

    /// Whether a non-empty prefix ends in something other than the separator.
    ///
    /// Only used to hint at a probably forgotten trailing separator.
    pub fn ends_in_non_separator(prefix: &str) -> bool {
        prefix.chars().last().is_some_and(|c| c != MAIN_SEPARATOR)
    }

    /// Directory component of a path, `"."` for a bare file name
    pub fn output_dir(out_path: &str) -> PathBuf {
        let path = Path::new(out_path);
        match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => parent.to_path_buf(),
            // Root or empty path
            None if path.has_root() => path.to_path_buf(),
            None => PathBuf::from("."),
        }
    }
}
