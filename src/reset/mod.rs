//! Interactive reset of the library: index, cache, sidecars and album files.
//!
//! A reset is a fixed sequence of [`ResetStage`]s. Each stage is confirmed on
//! its own through the [`prompt`] gate and, once confirmed, runs to the end:
//!
//! | Stage | Removes | Failure handling |
//! |-------|---------|------------------|
//! | `Index` | all tables, then re-migrates | fatal |
//! | `Cache` | direct children of the cache root, recursively | per item |
//! | `SidecarJson` | `**/*.json` under the sidecar root | per item |
//! | `SidecarYaml` | `**/*.yml` under the sidecar root | per item |
//! | `AlbumYaml` | `**/*.yml` under the albums root | per item |
//!
//! If a file stage cannot enumerate its paths it is skipped and the next
//! stage is offered. With `index_only` or `assume_yes` the session ends after
//! the index stage.

pub mod paths;
pub mod prompt;
pub mod remove;
pub mod schema;

use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::PixdexConfig;
use prompt::Prompter;
use remove::{FsUnlink, Unlink};
use schema::SchemaRegistry;

/// Flags for one reset session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetRequest {
    pub index_only: bool,
    pub assume_yes: bool,
    pub trace: bool,
}

/// The stages of a reset, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStage {
    Index,
    Cache,
    SidecarJson,
    SidecarYaml,
    AlbumYaml,
}

impl ResetStage {
    pub const ALL: [ResetStage; 5] = [
        Self::Index,
        Self::Cache,
        Self::SidecarJson,
        Self::SidecarYaml,
        Self::AlbumYaml,
    ];

    /// What the stage deletes, as used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Index => "index database",
            Self::Cache => "cache files",
            Self::SidecarJson => "*.json sidecar files",
            Self::SidecarYaml => "*.yml metadata files",
            Self::AlbumYaml => "*.yml album files",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            Self::Index => "Delete and recreate index database?",
            Self::Cache => "Clear cache incl thumbnails?",
            Self::SidecarJson => "Delete all *.json sidecar files?",
            Self::SidecarYaml => "Delete all *.yml metadata files?",
            Self::AlbumYaml => "Delete all *.yml album files?",
        }
    }

    /// Glob suffix and recursion flag for file stages, `None` for the index.
    fn file_pattern(&self) -> Option<(&'static str, bool)> {
        match self {
            Self::Index => None,
            Self::Cache => Some((paths::DIRECT_CHILDREN, true)),
            Self::SidecarJson => Some((paths::JSON_ANY_DEPTH, false)),
            Self::SidecarYaml | Self::AlbumYaml => Some((paths::YAML_ANY_DEPTH, false)),
        }
    }
}

impl fmt::Display for ResetStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters for one executed stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageResult {
    pub attempted: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl StageResult {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}

/// What happened to a stage that was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Declined at the prompt; nothing was touched.
    Kept,
    Completed(StageResult),
    /// Confirmed, but its paths could not be enumerated.
    Skipped(String),
}

/// Outcomes of every stage reached, in order.
#[derive(Debug, Default)]
pub struct ResetReport {
    pub stages: Vec<(ResetStage, StageOutcome)>,
}

impl ResetReport {
    pub fn outcome(&self, stage: ResetStage) -> Option<&StageOutcome> {
        self.stages.iter().find(|(s, _)| *s == stage).map(|(_, o)| o)
    }

    /// Items that could not be removed across all stages.
    pub fn total_failed(&self) -> usize {
        self.stages
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                StageOutcome::Completed(result) => Some(result.failed),
                _ => None,
            })
            .sum()
    }
}

/// Library locations a reset operates on.
#[derive(Debug, Clone)]
pub struct ResetTargets {
    pub cache: PathBuf,
    pub sidecar: PathBuf,
    pub albums: PathBuf,
    pub admin_password: Option<String>,
}

impl ResetTargets {
    pub fn from_config(config: &PixdexConfig) -> Self {
        Self {
            cache: config.cache_path(),
            sidecar: config.sidecar_path(),
            albums: config.albums_path(),
            admin_password: config.admin_password().map(str::to_owned),
        }
    }

    fn root(&self, stage: ResetStage) -> Option<&Path> {
        match stage {
            ResetStage::Index => None,
            ResetStage::Cache => Some(self.cache.as_path()),
            ResetStage::SidecarJson | ResetStage::SidecarYaml => Some(self.sidecar.as_path()),
            ResetStage::AlbumYaml => Some(self.albums.as_path()),
        }
    }
}

/// Runs the reset stages against one library.
pub struct Resetter<'a, P, S> {
    request: ResetRequest,
    targets: &'a ResetTargets,
    prompter: P,
    registry: S,
    unlink: Box<dyn Unlink + 'a>,
    progress: Box<dyn Write + 'a>,
}

impl<'a, P: Prompter, S: SchemaRegistry> Resetter<'a, P, S> {
    /// Resetter that deletes from the real filesystem and prints progress to stdout.
    pub fn new(request: ResetRequest, targets: &'a ResetTargets, prompter: P, registry: S) -> Self {
        Self {
            request,
            targets,
            prompter,
            registry,
            unlink: Box::new(FsUnlink),
            progress: Box::new(std::io::stdout()),
        }
    }

    pub fn with_unlink(mut self, unlink: impl Unlink + 'a) -> Self {
        self.unlink = Box::new(unlink);
        self
    }

    pub fn with_progress(mut self, progress: impl Write + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Run every stage in order. Only a failed index reset is an error.
    pub fn run(mut self) -> Result<ResetReport> {
        let request = self.request;
        let mut report = ResetReport::default();

        if !request.assume_yes {
            tracing::warn!("This will delete and recreate your index database after confirmation");
            if !request.index_only {
                tracing::warn!("You will be asked next if you also want to remove cache and sidecar files");
            }
        }
        if request.trace {
            tracing::info!("reset: enabled trace mode");
        }

        let forced = request.assume_yes.then_some(true);
        let outcome = if self.gate(ResetStage::Index, forced) {
            let password = self.targets.admin_password.as_deref();
            StageOutcome::Completed(schema::reset_schema(&mut self.registry, password)?)
        } else {
            StageOutcome::Kept
        };
        report.stages.push((ResetStage::Index, outcome));

        if request.index_only || request.assume_yes {
            return Ok(report);
        }

        for stage in &ResetStage::ALL[1..] {
            let outcome = if self.gate(*stage, None) {
                self.run_file_stage(*stage)
            } else {
                StageOutcome::Kept
            };
            report.stages.push((*stage, outcome));
        }

        tracing::debug!(failed = report.total_failed(), "reset finished");
        Ok(report)
    }

    fn gate(&mut self, stage: ResetStage, forced: Option<bool>) -> bool {
        prompt::confirm(&mut self.prompter, stage.question(), stage.label(), forced)
    }

    fn run_file_stage(&mut self, stage: ResetStage) -> StageOutcome {
        let (Some(root), Some((suffix, recursive))) = (self.targets.root(stage), stage.file_pattern())
        else {
            return StageOutcome::Skipped(format!("{stage} has no file pattern"));
        };

        let matches = match paths::enumerate(root, suffix) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::error!("reset: {err} (find {stage})");
                return StageOutcome::Skipped(err.to_string());
            }
        };

        if matches.is_empty() {
            tracing::info!("found no {stage}");
            return StageOutcome::Completed(StageResult::default());
        }

        tracing::info!("removing {} {stage}", matches.len());
        let result =
            remove::remove_all(&matches, recursive, self.unlink.as_ref(), self.progress.as_mut());
        tracing::info!(
            "removed {} of {} {stage} [{:?}]",
            result.succeeded(),
            result.attempted,
            result.elapsed
        );
        StageOutcome::Completed(result)
    }
}
