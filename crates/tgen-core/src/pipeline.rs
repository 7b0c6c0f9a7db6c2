//! Three-stage generation pipeline
//!
//! ```text
//! paths ─▶ [read ×R] ─▶ [generate ×G] ─▶ [write ×W] ─▶ output_dir
//!              │              │               │
//!              └──────────────┴───────────────┴──▶ events ─▶ RunReport
//! ```
//!
//! Each stage is a [`run_stage`] dispatcher with its own parallelism limit.
//! Queues between stages are bounded by the downstream limit. A failed task
//! emits a [`StageEvent::Failed`] and nothing downstream; siblings carry on.

use crate::config::{CollisionPolicy, GeneratorConfig};
use crate::error::{GeneratorError, GeneratorResult, ReadError, TaskError, WriteError};
use crate::report::{RunReport, SourceId, StageEvent};
use crate::stage::run_stage;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tgen_syntax::{CSharpSyntax, SourceSyntax};
use tgen_synth::{TestFile, TestSynthesizer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

type Events = mpsc::UnboundedSender<StageEvent>;
type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Input path queued for reading
struct SourcePath {
    id: SourceId,
    path: Arc<PathBuf>,
}

/// Source text queued for generation
struct SourceText {
    id: SourceId,
    path: Arc<PathBuf>,
    text: String,
}

/// Rendered test file queued for writing
struct GeneratedFile {
    id: SourceId,
    path: Arc<PathBuf>,
    file: TestFile,
}

/// Test stub generator
///
/// Reads every configured path, generates one test file per declared class
/// and writes it to the output directory. Per-file failures are collected in
/// the returned [`RunReport`]; only configuration and infrastructure problems
/// abort the run.
#[derive(Debug)]
pub struct TestGenerator<S = CSharpSyntax> {
    config: GeneratorConfig,
    synthesizer: Arc<TestSynthesizer<S>>,
}

impl TestGenerator<CSharpSyntax> {
    /// Create generator for C# sources
    #[must_use]
    pub fn csharp(config: GeneratorConfig) -> Self {
        let syntax = CSharpSyntax::new().with_line_ending(config.line_ending);
        Self::new(config, syntax)
    }
}

impl<S: SourceSyntax> TestGenerator<S> {
    /// Create generator over a syntax
    #[must_use]
    pub fn new(config: GeneratorConfig, syntax: S) -> Self {
        let synthesizer = TestSynthesizer::new(syntax).with_framework(config.framework);
        Self {
            config,
            synthesizer: Arc::new(synthesizer),
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the pipeline to completion
    ///
    /// Resolves once every write task has finished.
    ///
    /// # Errors
    /// - `GeneratorError::Config` if the configuration is invalid
    /// - `GeneratorError::OutputDir` if the output directory cannot be created
    /// - `GeneratorError::Stage` if a stage stopped abnormally
    pub async fn generate(&self) -> GeneratorResult<RunReport> {
        let config = &self.config;
        config.validate()?;

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| GeneratorError::OutputDir {
                path: config.output_dir.clone(),
                source,
            })?;

        info!(
            files = config.paths.len(),
            output = %config.output_dir.display(),
            framework = %self.synthesizer.framework(),
            "starting generation"
        );

        let (path_tx, path_rx) = mpsc::channel(config.read_parallelism);
        let (text_tx, text_rx) = mpsc::channel(config.generate_parallelism);
        let (file_tx, file_rx) = mpsc::channel(config.write_parallelism);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let collector = tokio::spawn(collect(RunReport::for_paths(&config.paths), event_rx));

        let read = tokio::spawn(
            run_stage(
                "read",
                path_rx,
                config.read_parallelism,
                read_handler(text_tx, event_tx.clone()),
            )
            .instrument(info_span!("stage", name = "read")),
        );
        let generate = tokio::spawn(
            run_stage(
                "generate",
                text_rx,
                config.generate_parallelism,
                generate_handler(Arc::clone(&self.synthesizer), file_tx, event_tx.clone()),
            )
            .instrument(info_span!("stage", name = "generate")),
        );
        let write = tokio::spawn(
            run_stage(
                "write",
                file_rx,
                config.write_parallelism,
                write_handler(
                    config.output_dir.clone(),
                    self.synthesizer.syntax().extension(),
                    config.collision_policy,
                    event_tx,
                ),
            )
            .instrument(info_span!("stage", name = "write")),
        );

        for (index, path) in config.paths.iter().enumerate() {
            let item = SourcePath {
                id: SourceId(index),
                path: Arc::new(path.clone()),
            };
            if path_tx.send(item).await.is_err() {
                warn!("read stage closed early; remaining paths not queued");
                break;
            }
        }
        drop(path_tx);

        let read = join_stage("read", read).await;
        let generate = join_stage("generate", generate).await;
        let write = join_stage("write", write).await;
        let report = collector
            .await
            .map_err(|e| GeneratorError::stage("report", e.to_string()))?;

        read?;
        generate?;
        write?;

        info!(
            classes = report.class_count(),
            written = report.written_count(),
            failed = report.failure_count(),
            warnings = report.warning_count(),
            "generation finished"
        );

        Ok(report)
    }
}

async fn collect(mut report: RunReport, mut events: mpsc::UnboundedReceiver<StageEvent>) -> RunReport {
    while let Some(event) = events.recv().await {
        report.record(event);
    }
    report
}

async fn join_stage(
    name: &'static str,
    handle: JoinHandle<GeneratorResult<usize>>,
) -> GeneratorResult<usize> {
    handle
        .await
        .map_err(|e| GeneratorError::stage(name, e.to_string()))?
}

fn emit(events: &Events, event: StageEvent) {
    if events.send(event).is_err() {
        warn!("report collector gone; event dropped");
    }
}

fn read_handler(
    next: mpsc::Sender<SourceText>,
    events: Events,
) -> impl FnMut(SourcePath) -> Task + Send {
    move |SourcePath { id, path }| {
        let next = next.clone();
        let events = events.clone();
        Box::pin(async move {
            match tokio::fs::read_to_string(path.as_path()).await {
                Ok(text) => {
                    debug!(path = %path.display(), bytes = text.len(), "read source");
                    if next.send(SourceText { id, path, text }).await.is_err() {
                        warn!("generate stage closed; source dropped");
                    }
                }
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "read failed");
                    let error = ReadError::new(path.as_path(), source).into();
                    emit(&events, StageEvent::Failed { source: id, error });
                }
            }
        })
    }
}

fn generate_handler<S: SourceSyntax>(
    synthesizer: Arc<TestSynthesizer<S>>,
    next: mpsc::Sender<GeneratedFile>,
    events: Events,
) -> impl FnMut(SourceText) -> Task + Send {
    move |SourceText { id, path, text }| {
        let synthesizer = Arc::clone(&synthesizer);
        let next = next.clone();
        let events = events.clone();
        Box::pin(async move {
            let outcome = tokio::task::spawn_blocking(move || synthesizer.generate_all(&text)).await;

            let files = match outcome {
                Ok(Ok(files)) => files,
                Ok(Err(source)) => {
                    warn!(path = %path.display(), error = %source, "parse failed");
                    let error = TaskError::parse(path.as_path(), source);
                    emit(&events, StageEvent::Failed { source: id, error });
                    return;
                }
                Err(e) => {
                    let error = TaskError::Generate {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    };
                    emit(&events, StageEvent::Failed { source: id, error });
                    return;
                }
            };

            debug!(path = %path.display(), classes = files.len(), "generated tests");
            let classes = files.iter().map(|f| f.name.clone()).collect();
            emit(&events, StageEvent::Generated { source: id, classes });

            for file in files {
                let item = GeneratedFile {
                    id,
                    path: Arc::clone(&path),
                    file,
                };
                if next.send(item).await.is_err() {
                    warn!("write stage closed; generated file dropped");
                    break;
                }
            }
        })
    }
}

/// Last claim on an output path, as seen by the write dispatcher
struct Claim {
    path: Arc<PathBuf>,
    done: Option<oneshot::Receiver<()>>,
}

fn write_handler(
    output_dir: PathBuf,
    extension: &'static str,
    policy: CollisionPolicy,
    events: Events,
) -> impl FnMut(GeneratedFile) -> Task + Send {
    let mut claims: HashMap<PathBuf, Claim> = HashMap::new();

    move |GeneratedFile { id, path, file }| {
        let events = events.clone();
        let output = output_dir.join(file.file_name(extension));

        // Dispatcher-side bookkeeping: decided in dispatch order, so the
        // outcome of a collision does not depend on worker scheduling.
        let (finished, finished_rx) = oneshot::channel::<()>();
        let (previous, wait_for) = match claims.entry(output.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Claim {
                    path: Arc::clone(&path),
                    done: Some(finished_rx),
                });
                (None, None)
            }
            Entry::Occupied(mut slot) => {
                let previous = Arc::clone(&slot.get().path);
                match policy {
                    CollisionPolicy::Overwrite => {
                        let claim = slot.insert(Claim {
                            path: Arc::clone(&path),
                            done: Some(finished_rx),
                        });
                        (Some(previous), claim.done)
                    }
                    CollisionPolicy::Skip => (Some(previous), None),
                }
            }
        };

        Box::pin(async move {
            if let Some(previous) = previous {
                let error = TaskError::NameCollision {
                    output: output.clone(),
                    path: path.to_path_buf(),
                    previous: previous.to_path_buf(),
                };
                warn!(%error, "output name collision");
                match policy {
                    CollisionPolicy::Overwrite => {
                        emit(&events, StageEvent::Warning { source: id, error });
                    }
                    CollisionPolicy::Skip => {
                        emit(&events, StageEvent::Failed { source: id, error });
                        return;
                    }
                }
            }

            // Overwrites land in dispatch order
            if let Some(earlier) = wait_for {
                let _ = earlier.await;
            }

            write_file(id, &output, &file.content, &events).await;
            drop(finished);
        })
    }
}

async fn write_file(id: SourceId, output: &Path, content: &str, events: &Events) {
    match tokio::fs::write(output, content.as_bytes()).await {
        Ok(()) => {
            debug!(output = %output.display(), bytes = content.len(), "wrote test file");
            emit(
                events,
                StageEvent::Written {
                    source: id,
                    output: output.to_path_buf(),
                },
            );
        }
        Err(source) => {
            warn!(output = %output.display(), error = %source, "write failed");
            let error = WriteError::new(output, source).into();
            emit(events, StageEvent::Failed { source: id, error });
        }
    }
}
