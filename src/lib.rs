//! # pngcrush batch
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare della libreria
//! - Espone i tipi e le funzioni principali tramite re-exports
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione persistente (JSON) e validazione
//! - `error`: Tipi di errore con messaggi diagnostici
//! - `crusher`: Pipeline resolve → preflight → pngcrush e coordinamento batch
//! - `logging`: Setup del subscriber `tracing`
//! - `utils`: Helper per costruire liste di argomenti
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use pngcrush_batch::{Crusher, CrushOptions, PathPrefixes};
//!
//! # async fn demo() -> Result<(), pngcrush_batch::CrushError> {
//! let crusher = Crusher::default();
//! crusher
//!     .crush_with(
//!         vec!["icons/a.png", "icons/b.png"],
//!         CrushOptions::default().prefixes(PathPrefixes::new("assets/", "dist/")),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod crusher;
pub mod logging;
pub mod utils;

pub use config::Config;
pub use error::CrushError;
pub use crusher::{
    BatchMode, CrushOptions, CrushTarget, Crusher, PathPrefixes, Spawn, TokioSpawner, ToolArguments,
    ToolOutput,
};
