//! # Process Invocation Module
//!
//! Lancia pngcrush e classifica il risultato.
//!
//! ## Responsabilità:
//! - Compone la lista argomenti: argomenti configurati + input + output
//! - Astrae lo spawn del processo dietro il trait `Spawn` (testabile senza pngcrush)
//! - Raccoglie tutto lo stdout del processo (pngcrush non usa stderr per la diagnostica)
//! - Traduce exit code e errori di spawn in `CrushError`
//!
//! ## Classificazione:
//! | Esito | Risultato |
//! |-------|-----------|
//! | exit code 0 | `Ok(())` |
//! | exit code != 0 o segnale | `ToolFailure` con le righe non-commento dello stdout |
//! | binario non trovato | `BinaryMissing` (messaggio fisso) |
//! | altro errore di I/O | `Process` |

use crate::{crusher::path_resolver::CrushRequest, error::CrushError, utils::to_string_vec};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

/// Lines of pngcrush output starting with this marker are informational.
const COMMENT_MARKER: char = '|';

/// Flags passed to pngcrush before the input and output paths.
///
/// Immutable and cheap to clone; every invocation builds its own extended list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ToolArguments(Arc<[String]>);

impl Default for ToolArguments {
    fn default() -> Self {
        Self::from(crate::args!["-rem", "alla"])
    }
}

impl ToolArguments {
    pub fn new<T, I>(items: I) -> Self
    where
        T: ToString,
        I: IntoIterator<Item = T>,
    {
        Self(to_string_vec(items).into())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Fresh argument list ending with the input and output paths
    pub fn with_paths(&self, request: &CrushRequest) -> Vec<String> {
        let mut args = Vec::with_capacity(self.0.len() + 2);
        args.extend(self.0.iter().cloned());
        args.push(request.in_path.clone());
        args.push(request.out_path.clone());
        args
    }
}

impl From<Vec<String>> for ToolArguments {
    fn from(items: Vec<String>) -> Self {
        Self(items.into())
    }
}

impl From<ToolArguments> for Vec<String> {
    fn from(arguments: ToolArguments) -> Self {
        arguments.0.to_vec()
    }
}

/// What a finished tool process left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Everything written to stdout
    pub stdout: Vec<u8>,
}

/// Process-spawning facility.
///
/// Runs `binary` with `args` to completion and returns its exit code and stdout.
pub trait Spawn: Send + Sync {
    fn run(&self, binary: &str, args: Vec<String>) -> BoxFuture<'static, io::Result<ToolOutput>>;
}

/// Spawns real processes through `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl Spawn for TokioSpawner {
    fn run(&self, binary: &str, args: Vec<String>) -> BoxFuture<'static, io::Result<ToolOutput>> {
        let mut command = Command::new(binary);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        Box::pin(async move {
            let output = command.spawn()?.wait_with_output().await?;
            Ok(ToolOutput {
                code: output.status.code(),
                stdout: output.stdout,
            })
        })
    }
}

/// Runs pngcrush for one request and classifies the outcome
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub async fn invoke(
        spawner: &dyn Spawn,
        binary: &str,
        arguments: &ToolArguments,
        request: &CrushRequest,
    ) -> Result<(), CrushError> {
        let args = arguments.with_paths(request);
        debug!("Running {} {}", binary, args.join(" "));

        let output = spawner.run(binary, args).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                warn!("Binary {} not found: {}", binary, e);
                CrushError::BinaryMissing
            } else {
                CrushError::Process(e)
            }
        })?;

        match output.code {
            Some(0) => {
                debug!("[OK] Crushed {} -> {}", request.in_path, request.out_path);
                Ok(())
            }
            code => {
                debug!("[ERROR] {} exited with {:?} for {}", binary, code, request.in_path);
                let text = String::from_utf8_lossy(&output.stdout);
                Err(CrushError::ToolFailure(Self::non_comment_lines(&text)))
            }
        }
    }

    /// Estrae le righe che non sono commenti, già trimmate
    pub fn non_comment_lines(text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
