//! `adpanel run`: executes a test brief against the persona panel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use adpanel_application::TestOrchestrator;
use adpanel_core::PanelError;
use adpanel_core::config::{CapabilityMode, EngineConfig};
use adpanel_core::persona::{PanelCache, PanelGenerator};
use adpanel_core::reaction::ReactionEvaluator;
use adpanel_core::run::{ProgressUpdate, RunState};
use adpanel_infrastructure::{AdPanelPaths, ConfigStorage, FilePanelCache, InMemoryPanelCache};
use adpanel_interaction::{SimulatedEvaluator, SimulatedPanelGenerator, WorkerApiClient};

use super::brief::Brief;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Test brief (TOML)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the result bundle here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the seeded offline capabilities
    #[arg(long)]
    pub simulate: bool,

    /// Seed for the offline capabilities
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum reactions in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Engine config file (defaults to ~/.config/adpanel/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Panel cache file (defaults to ~/.config/adpanel/panels.json)
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Keep generated panels in memory only
    #[arg(long)]
    pub no_cache: bool,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;

    let brief = Brief::load(&args.input)?;
    let base_dir = args.input.parent().unwrap_or_else(|| Path::new("."));
    let request = brief.into_request(base_dir)?;

    let orchestrator = build_orchestrator(&config, &args)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("[adpanel] Interrupt received, cancelling run");
            ctrl_c.cancel();
        }
    });

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let progress_task = tokio::spawn(log_progress(progress_rx));

    let result = orchestrator.run(request, cancel, Some(progress_tx)).await;
    let _ = progress_task.await;

    let bundle = match result {
        Ok(bundle) => bundle,
        Err(PanelError::Cancelled) => bail!("Test run cancelled"),
        Err(e) => return Err(e).context("Test run failed"),
    };

    for creative in bundle.ranked_creatives() {
        tracing::info!(
            "[adpanel] Creative {}: score {}, hook {}%, hold {}%, CTR {}% -> {}",
            creative.label,
            creative.metrics.overall_score,
            creative.metrics.hook_rate,
            creative.metrics.hold_rate,
            creative.metrics.ctr,
            creative.recommendation.verdict
        );
    }

    let json = serde_json::to_string_pretty(&bundle).context("Failed to serialize result bundle")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("[adpanel] Result bundle written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn load_config(args: &RunArgs) -> Result<EngineConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => AdPanelPaths::config_file()?,
    };
    let mut config = ConfigStorage::new(path).load_with_env()?;

    if args.simulate {
        config.capability.mode = CapabilityMode::Simulated;
    }
    if let Some(seed) = args.seed {
        config.capability.seed = seed;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    config.validate()?;

    Ok(config)
}

fn build_orchestrator(config: &EngineConfig, args: &RunArgs) -> Result<TestOrchestrator> {
    let cache: Arc<dyn PanelCache> = if args.no_cache {
        Arc::new(InMemoryPanelCache::new())
    } else {
        match &args.cache {
            Some(path) => Arc::new(FilePanelCache::new(path.clone())),
            None => Arc::new(FilePanelCache::default_location()?),
        }
    };

    let generator: Arc<dyn PanelGenerator>;
    let evaluator: Arc<dyn ReactionEvaluator>;
    match config.capability.mode {
        CapabilityMode::Simulated => {
            tracing::info!(
                "[adpanel] Using simulated capabilities (seed {})",
                config.capability.seed
            );
            generator = Arc::new(SimulatedPanelGenerator::new(config.capability.seed));
            evaluator = Arc::new(SimulatedEvaluator::new(config.capability.seed));
        }
        CapabilityMode::Http => {
            let client = Arc::new(WorkerApiClient::from_config(&config.capability)?);
            tracing::info!("[adpanel] Using worker API capabilities");
            generator = client.clone();
            evaluator = client;
        }
    }

    Ok(TestOrchestrator::from_config(cache, generator, evaluator, config))
}

/// Logs state changes and every tenth of collection progress.
async fn log_progress(mut progress: mpsc::UnboundedReceiver<ProgressUpdate>) {
    let mut state = RunState::Idle;
    let mut logged_tenths = 0;

    while let Some(update) = progress.recv().await {
        if update.state != state {
            state = update.state;
            tracing::info!("[adpanel] {:?}", state);
            continue;
        }
        if state == RunState::Collecting {
            let tenths = (update.fraction() * 10.0).floor() as usize;
            if tenths > logged_tenths {
                logged_tenths = tenths;
                tracing::info!(
                    "[adpanel] Collected {}/{} reactions",
                    update.completed,
                    update.total
                );
            }
        }
    }
}
