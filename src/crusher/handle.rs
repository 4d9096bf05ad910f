//! # Crusher Handle Module
//!
//! Punto di ingresso pubblico della libreria.
//!
//! ## Responsabilità:
//! - Lega una facility di spawn e il path del binario pngcrush
//! - Applica i default (prefissi, argomenti) prima di ogni dispatch
//! - Permette di derivare un nuovo handle con un binario diverso senza
//!   toccare quello originale
//!
//! ## Esempio:
//! ```rust,no_run
//! use pngcrush_batch::{Crusher, PathPrefixes};
//!
//! # async fn demo() -> Result<(), pngcrush_batch::CrushError> {
//! let crusher = Crusher::default();
//! crusher.crush(["a.png", "b.png"]).await?;
//!
//! let local = crusher.with_binary("/opt/pngcrush/bin/pngcrush");
//! local
//!     .crush_with_prefixes("logo.png", PathPrefixes::new("assets/", "dist/"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    config::Config,
    crusher::{
        batch::{BatchContext, BatchCoordinator, BatchMode, CrushTarget},
        path_resolver::PathPrefixes,
        process::{Spawn, TokioSpawner, ToolArguments},
    },
    error::CrushError,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Binary used when no location is configured, looked up through `PATH`
pub const DEFAULT_BINARY: &str = "pngcrush";

/// Optional settings for one crush call; `None` falls back to the default
#[derive(Debug, Clone, Default)]
pub struct CrushOptions {
    pub prefixes: Option<PathPrefixes>,
    pub arguments: Option<ToolArguments>,
    pub mode: Option<BatchMode>,
}

impl CrushOptions {
    pub fn prefixes(mut self, prefixes: PathPrefixes) -> Self {
        self.prefixes = Some(prefixes);
        self
    }

    pub fn arguments(mut self, arguments: ToolArguments) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn mode(mut self, mode: BatchMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Immutable handle exposing the crush operation
#[derive(Clone)]
pub struct Crusher {
    spawner: Arc<dyn Spawn>,
    binary: Arc<str>,
    defaults: CrushOptions,
}

impl Default for Crusher {
    fn default() -> Self {
        Self::new(Arc::new(TokioSpawner), DEFAULT_BINARY)
    }
}

impl std::fmt::Debug for Crusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crusher")
            .field("binary", &self.binary)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Crusher {
    /// Binds a spawning facility to a binary location
    pub fn new(spawner: Arc<dyn Spawn>, binary: impl Into<String>) -> Self {
        let binary: String = binary.into();
        Self {
            spawner,
            binary: Arc::from(binary),
            defaults: CrushOptions::default(),
        }
    }

    /// Builds a handle from a validated configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let mut crusher = Self::new(Arc::new(TokioSpawner), config.binary.clone());
        crusher.defaults = CrushOptions {
            prefixes: Some(config.prefixes.clone()),
            arguments: Some(ToolArguments::from(config.arguments.clone())),
            mode: Some(config.batch_mode),
        };
        Ok(crusher)
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Returns a new handle using another binary; `self` is left as is
    pub fn with_binary(&self, binary: impl Into<String>) -> Self {
        let binary: String = binary.into();
        Self {
            spawner: Arc::clone(&self.spawner),
            binary: Arc::from(binary),
            defaults: self.defaults.clone(),
        }
    }

    pub async fn crush(&self, target: impl Into<CrushTarget>) -> Result<(), CrushError> {
        self.crush_with(target, CrushOptions::default()).await
    }

    pub async fn crush_with_prefixes(
        &self,
        target: impl Into<CrushTarget>,
        prefixes: PathPrefixes,
    ) -> Result<(), CrushError> {
        self.crush_with(target, CrushOptions::default().prefixes(prefixes)).await
    }

    pub async fn crush_with_arguments(
        &self,
        target: impl Into<CrushTarget>,
        arguments: ToolArguments,
    ) -> Result<(), CrushError> {
        self.crush_with(target, CrushOptions::default().arguments(arguments)).await
    }

    /// Crushes a path or a nested collection of paths.
    ///
    /// Prefixes and arguments are fixed for the whole call, including every
    /// nested batch it dispatches.
    pub async fn crush_with(
        &self,
        target: impl Into<CrushTarget>,
        options: CrushOptions,
    ) -> Result<(), CrushError> {
        let target = target.into();
        let context = self.context(options);

        info!(
            "Crushing {} file(s) with {} ({:?})",
            target.path_count(),
            self.binary,
            context.mode
        );
        let start_time = Instant::now();
        let result = BatchCoordinator::run(target, context).await;
        debug!("Crush finished in {:.2}s: ok = {}", start_time.elapsed().as_secs_f64(), result.is_ok());

        result
    }

    fn context(&self, options: CrushOptions) -> BatchContext {
        let prefixes = options
            .prefixes
            .or_else(|| self.defaults.prefixes.clone())
            .unwrap_or_default();
        let arguments = options
            .arguments
            .or_else(|| self.defaults.arguments.clone())
            .unwrap_or_default();
        let mode = options.mode.or(self.defaults.mode).unwrap_or_default();

        BatchContext {
            spawner: Arc::clone(&self.spawner),
            binary: Arc::clone(&self.binary),
            prefixes: Arc::new(prefixes),
            arguments,
            mode,
        }
    }
}
