//! # Existence Validation Module
//!
//! Controlli preliminari eseguiti prima di lanciare pngcrush:
//! - il file di input deve esistere
//! - la directory che conterrà il file di output deve esistere
//!
//! I due controlli girano in parallelo e vengono sempre completati entrambi;
//! se falliscono tutti e due viene riportato l'errore sull'input.

use crate::{
    crusher::path_resolver::{CrushRequest, PathPrefixes, PathResolver},
    error::CrushError,
};
use std::path::Path;
use tracing::debug;

/// Preflight checks for a resolved request
pub struct ExistenceValidator;

impl ExistenceValidator {
    /// Verifica input e directory di output, nell'ordine input → output
    pub async fn validate(request: &CrushRequest, prefixes: &PathPrefixes) -> Result<(), CrushError> {
        let output_dir = request.output_dir();
        let (input_exists, output_dir_exists) = tokio::join!(
            Self::exists(Path::new(&request.in_path)),
            Self::exists(&output_dir)
        );

        debug!(
            "Preflight for {}: input exists = {}, output dir {} exists = {}",
            request.in_path,
            input_exists,
            output_dir.display(),
            output_dir_exists
        );

        if !input_exists {
            return Err(CrushError::InputNotFound {
                path: request.in_path.clone(),
                suggest_separator: PathResolver::ends_in_non_separator(&prefixes.in_prefix),
            });
        }

        if !output_dir_exists {
            return Err(CrushError::OutputDirNotFound {
                path: request.out_path.clone(),
                suggest_separator: PathResolver::ends_in_non_separator(&prefixes.out_prefix),
            });
        }

        Ok(())
    }

    /// Probe that never fails: any I/O error counts as "does not exist"
    pub async fn exists(path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
