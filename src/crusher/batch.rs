//! # Batch Coordination Module
//!
//! Smista una richiesta (singolo path o collezione annidata di path) verso
//! operazioni di crush indipendenti che girano in parallelo.
//!
//! ## Strategia:
//! - Singolo path: resolve → preflight → pngcrush
//! - Collezione: ogni elemento diventa un task tokio, senza limite di concorrenza
//! - `BatchMode::FirstError` (default): il primo errore in ordine di completamento
//!   viene riportato subito; i task ancora in corso proseguono in background e il
//!   loro esito viene scartato
//! - `BatchMode::CollectAll`: attende tutti gli elementi e riporta ogni errore

use crate::{
    crusher::{
        existence::ExistenceValidator,
        path_resolver::{PathPrefixes, PathResolver},
        process::{ProcessInvoker, Spawn, ToolArguments},
    },
    error::CrushError,
};
use futures::{future::BoxFuture, stream::FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A single relative path or an arbitrarily nested collection of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrushTarget {
    Path(String),
    Batch(Vec<CrushTarget>),
}

impl CrushTarget {
    /// Number of single paths contained, at any depth
    pub fn path_count(&self) -> usize {
        match self {
            CrushTarget::Path(_) => 1,
            CrushTarget::Batch(items) => items.iter().map(CrushTarget::path_count).sum(),
        }
    }
}

impl From<&str> for CrushTarget {
    fn from(path: &str) -> Self {
        CrushTarget::Path(path.to_string())
    }
}

impl From<String> for CrushTarget {
    fn from(path: String) -> Self {
        CrushTarget::Path(path)
    }
}

impl<T: Into<CrushTarget>> From<Vec<T>> for CrushTarget {
    fn from(items: Vec<T>) -> Self {
        CrushTarget::Batch(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CrushTarget>, const N: usize> From<[T; N]> for CrushTarget {
    fn from(items: [T; N]) -> Self {
        CrushTarget::Batch(items.into_iter().map(Into::into).collect())
    }
}

/// How the outcomes of a batch are aggregated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Report the first error observed; later outcomes are discarded
    #[default]
    FirstError,
    /// Wait for every operation and report all errors together
    CollectAll,
}

/// Everything a crush operation needs, shared read-only across the whole batch
#[derive(Clone)]
pub struct BatchContext {
    pub spawner: Arc<dyn Spawn>,
    pub binary: Arc<str>,
    pub prefixes: Arc<PathPrefixes>,
    pub arguments: ToolArguments,
    pub mode: BatchMode,
}

/// Dispatcher ricorsivo per path singoli e collezioni
pub struct BatchCoordinator;

impl BatchCoordinator {
    pub fn run(target: CrushTarget, context: BatchContext) -> BoxFuture<'static, Result<(), CrushError>> {
        Box::pin(async move {
            match target {
                CrushTarget::Path(path) => Self::crush_one(&path, &context).await,
                CrushTarget::Batch(items) => Self::crush_all(items, context).await,
            }
        })
    }

    async fn crush_one(relative_path: &str, context: &BatchContext) -> Result<(), CrushError> {
        let request = PathResolver::resolve(relative_path, &context.prefixes);
        ExistenceValidator::validate(&request, &context.prefixes).await?;
        ProcessInvoker::invoke(
            context.spawner.as_ref(),
            &context.binary,
            &context.arguments,
            &request,
        )
        .await
    }

    async fn crush_all(items: Vec<CrushTarget>, context: BatchContext) -> Result<(), CrushError> {
        debug!("Dispatching batch of {} items", items.len());

        let mut tasks: FuturesUnordered<_> = items
            .into_iter()
            .map(|item| tokio::spawn(Self::run(item, context.clone())))
            .collect();

        let mut errors = Vec::new();
        while let Some(joined) = tasks.next().await {
            let outcome = joined.map_err(CrushError::from).and_then(|result| result);
            let Err(error) = outcome else {
                continue;
            };

            match context.mode {
                BatchMode::FirstError => {
                    if !tasks.is_empty() {
                        Self::detach(tasks);
                    }
                    return Err(error);
                }
                BatchMode::CollectAll => errors.extend(error.into_errors()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CrushError::Multiple(errors))
        }
    }

    /// Lascia proseguire i task rimasti; i loro esiti vengono solo loggati
    fn detach(
        mut tasks: FuturesUnordered<tokio::task::JoinHandle<Result<(), CrushError>>>,
    ) {
        debug!("Batch outcome reported, {} operations still running", tasks.len());
        tokio::spawn(async move {
            while let Some(joined) = tasks.next().await {
                match joined {
                    Ok(Err(error)) => warn!("Discarding error from batch already reported: {}", error),
                    Err(error) => warn!("Discarding failed task from batch already reported: {}", error),
                    Ok(Ok(())) => {}
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crusher::process::tests::{FakeSpawner, Reply};
    use std::path::MAIN_SEPARATOR;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        temp_dir: TempDir,
        prefixes: PathPrefixes,
    }

    /// `in/` with the given files and an existing `out/` directory
    fn fixture(files: &[&str]) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let in_dir = temp_dir.path().join("in");
        std::fs::create_dir_all(&in_dir).unwrap();
        std::fs::create_dir_all(temp_dir.path().join("out")).unwrap();
        for file in files {
            let path = in_dir.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"png").unwrap();
        }
        let base = temp_dir.path().display().to_string();
        let prefixes = PathPrefixes::new(
            format!("{}{}in{}", base, MAIN_SEPARATOR, MAIN_SEPARATOR),
            format!("{}{}out{}", base, MAIN_SEPARATOR, MAIN_SEPARATOR),
        );
        Fixture { temp_dir, prefixes }
    }

    fn context(spawner: Arc<dyn Spawn>, prefixes: &PathPrefixes, mode: BatchMode) -> BatchContext {
        BatchContext {
            spawner,
            binary: Arc::from("pngcrush"),
            prefixes: Arc::new(prefixes.clone()),
            arguments: ToolArguments::default(),
            mode,
        }
    }

    #[test]
    fn test_target_conversions_and_count() {
        let target = CrushTarget::from(vec![
            CrushTarget::from("a.png"),
            CrushTarget::from(["b.png", "c.png"]),
            CrushTarget::from(Vec::<String>::new()),
        ]);
        assert_eq!(target.path_count(), 3);
        assert_eq!(CrushTarget::from("a.png"), CrushTarget::Path("a.png".to_string()));
    }

    #[tokio::test]
    async fn test_single_path_success() {
        let fx = fixture(&["a.png"]);
        let spawner = Arc::new(FakeSpawner::default());
        let ctx = context(spawner.clone(), &fx.prefixes, BatchMode::FirstError);

        BatchCoordinator::run("a.png".into(), ctx).await.unwrap();

        let calls = spawner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            vec![
                "-rem".to_string(),
                "alla".to_string(),
                format!("{}a.png", fx.prefixes.in_prefix),
                format!("{}a.png", fx.prefixes.out_prefix),
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_all_succeed() {
        let fx = fixture(&["a.png", "b.png"]);
        let spawner = Arc::new(FakeSpawner::default());
        let ctx = context(spawner.clone(), &fx.prefixes, BatchMode::FirstError);

        BatchCoordinator::run(["a.png", "b.png"].into(), ctx).await.unwrap();
        assert_eq!(spawner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_nested_batch_is_flattened() {
        let fx = fixture(&["a.png", "b.png", "deep/c.png"]);
        let spawner = Arc::new(FakeSpawner::default());
        let ctx = context(spawner.clone(), &fx.prefixes, BatchMode::FirstError);

        std::fs::create_dir_all(fx.temp_dir.path().join("out").join("deep")).unwrap();
        let target = CrushTarget::from(vec![
            CrushTarget::from("a.png"),
            CrushTarget::from(vec![CrushTarget::from("b.png"), CrushTarget::from(["deep/c.png"])]),
        ]);
        BatchCoordinator::run(target, ctx).await.unwrap();

        let mut inputs: Vec<String> = spawner
            .calls()
            .into_iter()
            .map(|(_, args)| args[2].clone())
            .collect();
        inputs.sort();
        assert_eq!(inputs.len(), 3);
        assert!(inputs[2].ends_with("deep/c.png"));
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let fx = fixture(&[]);
        let spawner = Arc::new(FakeSpawner::default());
        let ctx = context(spawner.clone(), &fx.prefixes, BatchMode::FirstError);

        BatchCoordinator::run(Vec::<String>::new().into(), ctx).await.unwrap();
        assert!(spawner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_error_reports_one_of_the_failures() {
        // a.png is missing, b.png goes into a missing output directory
        let fx = fixture(&["b/b.png"]);
        let spawner = Arc::new(FakeSpawner::default());
        let ctx = context(spawner.clone(), &fx.prefixes, BatchMode::FirstError);

        let error = BatchCoordinator::run(["a.png", "b/b.png"].into(), ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            CrushError::InputNotFound { .. } | CrushError::OutputDirNotFound { .. }
        ));
        assert!(spawner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_error_from_tool_failure() {
        let fx = fixture(&["a.png", "b.png"]);
        let failing = format!("{}b.png", fx.prefixes.in_prefix);
        let spawner = Arc::new(FakeSpawner::replying(&[(
            failing.as_str(),
            Reply::Exit(2, "| pngcrush 1.8\nnot a PNG file\n"),
        )]));
        let ctx = context(spawner, &fx.prefixes, BatchMode::FirstError);

        let error = BatchCoordinator::run(["a.png", "b.png"].into(), ctx)
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "not a PNG file");
    }

    /// Spawner whose processes for one path never finish
    struct HangingSpawner {
        hanging_suffix: &'static str,
    }

    impl Spawn for HangingSpawner {
        fn run(
            &self,
            _binary: &str,
            args: Vec<String>,
        ) -> BoxFuture<'static, std::io::Result<crate::crusher::process::ToolOutput>> {
            let hang = args[args.len() - 2].ends_with(self.hanging_suffix);
            Box::pin(async move {
                if hang {
                    futures::future::pending::<()>().await;
                }
                Ok(crate::crusher::process::ToolOutput {
                    code: Some(1),
                    stdout: b"broken".to_vec(),
                })
            })
        }
    }

    #[tokio::test]
    async fn test_first_error_does_not_wait_for_hanging_sibling() {
        let fx = fixture(&["a.png", "slow.png"]);
        let spawner = Arc::new(HangingSpawner { hanging_suffix: "slow.png" });
        let ctx = context(spawner, &fx.prefixes, BatchMode::FirstError);

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            BatchCoordinator::run(["slow.png", "a.png"].into(), ctx),
        )
        .await
        .expect("batch should report without waiting for the hanging process");
        assert_eq!(outcome.unwrap_err().to_string(), "broken");
    }

    #[tokio::test]
    async fn test_collect_all_reports_every_failure() {
        let fx = fixture(&["b.png", "c.png"]);
        let failing = format!("{}c.png", fx.prefixes.in_prefix);
        let spawner = Arc::new(FakeSpawner::replying(&[(failing.as_str(), Reply::Exit(1, "bad crc"))]));
        let ctx = context(spawner.clone(), &fx.prefixes, BatchMode::CollectAll);

        let target = CrushTarget::from(vec![
            CrushTarget::from("a.png"),
            CrushTarget::from(["b.png", "c.png"]),
        ]);
        let error = BatchCoordinator::run(target, ctx).await.unwrap_err();
        let errors = match error {
            CrushError::Multiple(errors) => errors,
            other => panic!("expected Multiple, got {:?}", other),
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, CrushError::InputNotFound { .. })));
        assert!(errors.iter().any(|e| e.to_string() == "bad crc"));
        assert_eq!(spawner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_collect_all_success() {
        let fx = fixture(&["a.png"]);
        let ctx = context(Arc::new(FakeSpawner::default()), &fx.prefixes, BatchMode::CollectAll);
        BatchCoordinator::run(["a.png"].into(), ctx).await.unwrap();
    }

    #[test]
    fn test_batch_mode_serde() {
        assert_eq!(serde_json::to_string(&BatchMode::CollectAll).unwrap(), "\"collect_all\"");
        let mode: BatchMode = serde_json::from_str("\"first_error\"").unwrap();
        assert_eq!(mode, BatchMode::FirstError);
    }
}
