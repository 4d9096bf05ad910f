//! # Crusher Module
//!
//! Pipeline di crush divisa in sottomoduli:
//! - `path_resolver`: Calcolo dei path di input/output dai prefissi
//! - `existence`: Controlli preliminari su input e directory di output
//! - `process`: Spawn di pngcrush e classificazione dell'esito
//! - `batch`: Dispatch ricorsivo e parallelo di path e collezioni
//! - `handle`: Handle pubblico immutabile (`Crusher`)

pub mod path_resolver;
pub mod existence;
pub mod process;
pub mod batch;
pub mod handle;

pub use path_resolver::{CrushRequest, PathPrefixes, PathResolver};
pub use existence::ExistenceValidator;
pub use process::{ProcessInvoker, Spawn, TokioSpawner, ToolArguments, ToolOutput};
pub use batch::{BatchMode, BatchCoordinator, CrushTarget};
pub use handle::{CrushOptions, Crusher};
