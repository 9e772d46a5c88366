//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_gallery_json, format_gallery_table};
use crate::config::{ConfigLoader, EngineConfig};
use crate::dispatch::Dispatcher;
use crate::error::EngineError;
use crate::frame::{FrameStore, GenerationOutcome};
use crate::pattern::{self, AspectRatio};
use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runtime context for CLI execution, built from the layered configuration.
#[derive(Debug, Clone)]
pub struct RunContext {
    config: EngineConfig,
}

impl RunContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, EngineError> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = config_path {
            loader = loader.with_file(path);
        }
        Ok(Self::from_config(loader.load()?))
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a command and return its printable output.
    pub async fn execute(&self, command: &Commands) -> anyhow::Result<String> {
        match command {
            Commands::Synth {
                seed,
                max_dimension,
                aspect,
                out,
            } => self.synth(seed, *max_dimension, *aspect, out),
            Commands::Gallery { count, json } => self.gallery(*count, *json).await,
            Commands::Config => Ok(self.config.to_toml()?),
        }
    }

    fn synth(
        &self,
        seed: &str,
        max_dimension: u32,
        aspect: Option<AspectRatio>,
        out: &Path,
    ) -> anyhow::Result<String> {
        let image = match aspect {
            Some(aspect) => pattern::synthesize_with_aspect(seed, max_dimension, aspect)?,
            None => pattern::synthesize(seed, max_dimension, &mut StdRng::from_entropy())?,
        };
        std::fs::write(out, &image.png)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!(seed, path = %out.display(), kind = %image.kind, "Image written");

        Ok(format!(
            "Wrote {} ({}x{}, {})",
            out.display(),
            image.width,
            image.height,
            image.kind
        ))
    }

    async fn gallery(&self, count: usize, json: bool) -> anyhow::Result<String> {
        let dispatcher = Dispatcher::new(self.config.dispatcher.clone())
            .context("Failed to start generation dispatcher")?;
        let store = FrameStore::with_config(Arc::new(dispatcher.clone()), &self.config.grid);

        let started = Instant::now();
        let tickets: Vec<_> = (0..count).map(|_| store.add_frame()).collect();
        let outcomes = futures::future::join_all(tickets.into_iter().map(|t| t.wait())).await;
        let failed = outcomes
            .iter()
            .filter(|outcome| !matches!(outcome, GenerationOutcome::Resolved { .. }))
            .count();
        if failed > 0 {
            warn!(failed, "Some frames did not resolve");
        }
        info!(
            count,
            duration_ms = started.elapsed().as_millis() as u64,
            "Gallery populated"
        );

        let peak = dispatcher.peak_in_flight();
        dispatcher.dispose();

        let snapshot = store.snapshot();
        if json {
            Ok(format_gallery_json(&snapshot, peak)?)
        } else {
            Ok(format_gallery_table(&snapshot, peak))
        }
    }
}
