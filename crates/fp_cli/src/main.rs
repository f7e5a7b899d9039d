//! Fishing Draw CLI
//!
//! 명령줄에서 낚시 추첨을 실행하는 도구
//! - draw: 실제 시간으로 1회 추첨
//! - simulate: 가상 시계로 N회 추첨 후 집계
//! - layout: N명 배치 좌표 출력

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fp_core::config::config_from_env;
use fp_core::engine::layout::LayoutTiers;
use fp_core::{
    CommandOutcome, LiveSession, ManualScheduler, SeededSource, SessionConfig, SessionController,
};

#[derive(Parser)]
#[command(name = "fp_cli")]
#[command(about = "Pick a winner with a fishing draw", long_about = None)]
struct Cli {
    /// Session config JSON (overrides FP_SESSION_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RosterArgs {
    /// Names separated by commas or newlines
    #[arg(long, default_value = "")]
    names: String,

    /// File with names separated by commas or newlines
    #[arg(long)]
    names_file: Option<PathBuf>,

    /// Fixed seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one draw against the wall clock
    Draw {
        #[command(flatten)]
        roster: RosterArgs,

        /// Skip the animation dwell (1ms per phase)
        #[arg(long, default_value = "false")]
        instant: bool,

        /// Print the final snapshot as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Run many draws on a virtual clock and tally winners
    Simulate {
        #[command(flatten)]
        roster: RosterArgs,

        /// Number of draws
        #[arg(long, default_value = "100")]
        runs: usize,

        /// Remove each winner before the next draw
        #[arg(long, default_value = "false")]
        remove_winner: bool,
    },

    /// Print placements for a roster of COUNT participants
    Layout {
        #[arg(long)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SessionConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config_from_env().context("Failed to load config from environment")?,
    };

    match cli.command {
        Commands::Draw { roster, instant, json } => {
            let mut config = if instant {
                SessionConfig { timings: SessionConfig::instant().timings, ..config }
            } else {
                config
            };
            if roster.seed.is_some() {
                config.seed = roster.seed;
            }
            run_draw(config, &roster, json)
        }
        Commands::Simulate { roster, runs, remove_winner } => {
            run_simulation(config, &roster, runs, remove_winner)
        }
        Commands::Layout { count } => {
            print_layout(&config.layout, count);
            Ok(())
        }
    }
}

fn roster_text(args: &RosterArgs) -> Result<String> {
    let mut text = args.names.clone();
    if let Some(path) = &args.names_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read names from {}", path.display()))?;
        text.push('\n');
        text.push_str(&content);
    }
    Ok(text)
}

fn run_draw(config: SessionConfig, args: &RosterArgs, json: bool) -> Result<()> {
    let mut session = LiveSession::live(config);
    session.add_bulk(&roster_text(args)?);

    session.subscribe(|snapshot| {
        info!("phase={} participants={}", snapshot.phase.label(), snapshot.participants.len());
    });

    match session.start()? {
        CommandOutcome::Ignored(reason) => {
            bail!("Draw not started: {:?} ({} participants)", reason, session.roster().len())
        }
        _ => info!("casting lines for {} participants", session.roster().len()),
    }

    while !session.state().result_visible {
        if !session.is_running() {
            bail!("Draw ended without a result");
        }
        let wait = session.scheduler().until_next_due_ms().unwrap_or(1).max(1);
        thread::sleep(Duration::from_millis(wait));
        session.pump()?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(session.snapshot())?);
    } else if let Some(outcome) = session.outcome() {
        println!("🎣 {}", outcome.summary());
    }
    Ok(())
}

fn run_simulation(
    config: SessionConfig,
    args: &RosterArgs,
    runs: usize,
    remove_winner: bool,
) -> Result<()> {
    let seed = args.seed.or(config.seed);
    let random = SeededSource::from_optional_seed(seed);
    let mut session = SessionController::new(config, random, ManualScheduler::new());
    session.add_bulk(&roster_text(args)?);

    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    let mut completed = 0;
    for _ in 0..runs {
        if let CommandOutcome::Ignored(reason) = session.start()? {
            warn!("stopping after {} draws: {:?}", completed, reason);
            break;
        }
        session.run_to_completion()?;

        let Some(outcome) = session.outcome().cloned() else {
            warn!("draw finished without a result");
            continue;
        };
        println!("#{:<4} {}", completed + 1, outcome.summary());
        *tally.entry(outcome.winner_name).or_default() += 1;
        completed += 1;

        if remove_winner {
            session.remove_winner();
        }
    }

    println!("\n{} draws", completed);
    for (name, wins) in &tally {
        println!("{:<20} {}", name, wins);
    }
    Ok(())
}

fn print_layout(tiers: &LayoutTiers, count: usize) {
    if count == 0 {
        println!("empty roster");
        return;
    }
    println!("density={:?} radius={}", tiers.density(count), tiers.radius(count));
    for (index, p) in tiers.positions(count).iter().enumerate() {
        println!("{:>4}  x={:>8.2}  y={:>8.2}  angle={:>6.3}", index, p.x, p.y, p.angle);
    }
}
