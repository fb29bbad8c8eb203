//! Kaleidoscope choreography simulator
//!
//! Runs the full linear → colour → hexagon cycle against simulated arm,
//! gripper and frame devices, or prints the plan of a single stage.
//!
//! Usage:
//!   cargo run -p kaleido_sim -- run --dwell-ms 500 --stages 3
//!   cargo run -p kaleido_sim -- plan hexagon > hexagon.json

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kaleido_execution::{
    ChoreographyConfig, ChoreographyError, CycleController, GridLayout, RunOutcome, SimCell,
    SimFrameRepository, Stage, planner_for,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kaleido_sim")]
#[command(about = "Kaleidoscope tile choreography against simulated devices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the cell and run the cycle until Ctrl-C
    Run {
        /// Engine configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Grid layout (JSON)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Slot frames (JSON map of slot id to pose); generated from the layout if omitted
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Override the dwell before each stage
        #[arg(long)]
        dwell_ms: Option<u64>,

        /// Stop after this many stages
        #[arg(long)]
        stages: Option<usize>,
    },

    /// Print the plan for one stage as JSON
    Plan {
        /// linear, colour or hexagon
        stage: Stage,

        /// Grid layout (JSON)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
}

fn load_layout(path: Option<PathBuf>) -> Result<GridLayout, ChoreographyError> {
    match path {
        Some(path) => GridLayout::load(path),
        None => Ok(GridLayout::default()),
    }
}

type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

fn cmd_plan(stage: Stage, layout: Option<PathBuf>) -> CliResult {
    let layout = load_layout(layout)?;
    let plan = planner_for(stage).plan(&layout);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

async fn cmd_run(
    config: Option<PathBuf>,
    layout: Option<PathBuf>,
    frames: Option<PathBuf>,
    dwell_ms: Option<u64>,
    stages: Option<usize>,
) -> CliResult {
    let mut config = match config {
        Some(path) => ChoreographyConfig::load(path)?,
        None => ChoreographyConfig::default(),
    };
    if let Some(ms) = dwell_ms {
        config = config.with_dwell(Duration::from_millis(ms));
    }
    let layout = load_layout(layout)?;

    let cell = match frames {
        Some(path) => SimCell::with_frames(SimFrameRepository::load(path)?),
        None => SimCell::new(&config, &layout),
    };
    let journal = cell.journal.clone();

    info!("╔════════════════════════════════════════════════════╗");
    info!("║       Kaleidoscope Simulator v0.1.0                ║");
    info!("╠════════════════════════════════════════════════════╣");
    info!("║ tool:     {:<41}║", config.tool);
    info!("║ home:     {:<41}║", config.home_slot.as_str());
    info!("║ offset:   {:<41}║", format!("{} mm", config.lateral_offset_mm));
    info!("║ dwell:    {:<41}║", format!("{:?}", config.dwell()));
    info!("║ slots:    {:<41}║", cell.frames.len());
    info!("╚════════════════════════════════════════════════════╝");

    let mut controller =
        CycleController::new(config, layout, cell.frames, cell.arm, cell.gripper)?;
    let cancel = controller.cancel_token();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after the current pick-and-turn");
            cancel.cancel();
        }
    });

    let engine = tokio::task::spawn_blocking(move || -> Result<_, ChoreographyError> {
        controller.initialize()?;
        let outcome = match stages {
            Some(limit) => controller.run_stages(limit),
            None => controller.run(),
        };
        let status = controller.status().clone();
        outcome.map(|outcome| (outcome, status))
    });

    let (outcome, status) = engine.await??;

    match outcome {
        RunOutcome::Completed { stages_completed } => {
            info!("completed {} stage(s)", stages_completed)
        }
        RunOutcome::Cancelled { stages_completed } => {
            info!("cancelled after {} stage(s)", stages_completed)
        }
    }
    info!(
        "{} full cycle(s), {} device calls recorded",
        status.cycles_completed,
        journal.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            layout,
            frames,
            dwell_ms,
            stages,
        } => cmd_run(config, layout, frames, dwell_ms, stages).await,
        Commands::Plan { stage, layout } => cmd_plan(stage, layout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
