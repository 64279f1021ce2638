use anyhow::{Context, Result};
use clap::Parser;
use nimons_core::clock::{ManualTimeSource, SystemTimeSource, TimeSource};
use nimons_core::session::GameSession;
use nimons_data::{ProgressStore, load_bundle, load_config, load_menu};
use nimons_headless::{Pacing, Script, run};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play a stage without a window.
#[derive(Debug, Parser)]
#[command(name = "nimons-headless", version)]
struct Args {
    /// Stage grid file. `config.*` and `menu.*` beside it are picked up.
    stage: PathBuf,

    /// Chef script to play. Without one the chefs stand still.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Config file overriding the one beside the stage.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Menu file overriding the one beside the stage.
    #[arg(long)]
    menu: Option<PathBuf>,

    /// Override the order generator seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Sleep between ticks instead of simulating time.
    #[arg(long)]
    realtime: bool,

    /// Record the result into this progress file.
    #[arg(long)]
    progress: Option<PathBuf>,

    /// Mirror every game event into the log.
    #[arg(long)]
    log_events: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let mut bundle = load_bundle(&args.stage)
        .with_context(|| format!("failed to load stage {}", args.stage.display()))?;
    if let Some(path) = &args.config {
        bundle.config = load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
    }
    if let Some(path) = &args.menu {
        bundle.menu = load_menu(path, bundle.config.orders.default_time_limit_ms)
            .with_context(|| format!("failed to load menu {}", path.display()))?;
    }
    if let Some(seed) = args.seed {
        bundle.config.orders.seed = seed;
    }
    let script = match &args.script {
        Some(path) => Script::load(path)
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => Script::default(),
    };

    let (pacing, time): (Pacing, Arc<dyn TimeSource>) = if args.realtime {
        (Pacing::Realtime, Arc::new(SystemTimeSource::new()))
    } else {
        let manual = ManualTimeSource::new();
        (Pacing::Simulated(manual.clone()), Arc::new(manual))
    };

    let mut session = GameSession::new(
        bundle.stage.id.clone(),
        bundle.config,
        bundle.stage.map,
        bundle.menu,
        time,
    )
    .context("failed to set up the session")?;
    if args.log_events {
        session.kitchen().events().log_all();
    }

    info!(stage = %session.stage_id(), commands = script.len(), "starting run");
    let report = run(&mut session, &script, &pacing).context("run failed")?;

    if let Some(path) = &args.progress {
        let mut store = ProgressStore::load(path)
            .with_context(|| format!("failed to read progress {}", path.display()))?;
        store.record(&report);
        store
            .save(path)
            .with_context(|| format!("failed to write progress {}", path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
