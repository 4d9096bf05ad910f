//! # Logging Setup
//!
//! Inizializza il subscriber `tracing` per le applicazioni che usano la libreria.
//! `RUST_LOG` ha la precedenza; altrimenti INFO, o DEBUG se `verbose`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber.
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
