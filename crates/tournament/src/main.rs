//! Tournament CLI
//!
//! Pair Swiss rounds, open Lichess challenges and keep the leaderboard.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tournament::{
    round_report, ChallengeService, LichessClient, OfflineChallenges, RosterColumn,
    RoundOrchestrator, Table, TableStore, TournamentConfig, WorkbookFile, DEFAULT_CONFIG_PATH,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tournament", version, about = "Swiss tournament pairing and bookkeeping")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Lichess API token used to open challenges
    #[arg(long, env = "LICHESS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and an empty roster sheet
    Init,
    /// Replay the history and rewrite the leaderboard
    Standings,
    /// Show the next round's pairings without creating anything
    Preview {
        /// Player sitting this round out (repeatable)
        #[arg(long = "sit-out")]
        sit_out: Vec<String>,
    },
    /// Pair the next round and open its challenges
    NextRound {
        /// Player sitting this round out (repeatable)
        #[arg(long = "sit-out")]
        sit_out: Vec<String>,
        /// Record the games without creating challenges
        #[arg(long)]
        offline: bool,
        /// Seed for colour assignment
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Fetch finished games, expire overdue ones and update the leaderboard
    FetchResults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Init => init(&cli.config),
        command => run(command, &cli.config, cli.token),
    }
}

fn run(command: Commands, config_path: &Path, token: Option<String>) -> Result<()> {
    let config = TournamentConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let mut book = WorkbookFile::new(&config.workbook);

    match command {
        Commands::Init => init(config_path)?,
        Commands::Standings => {
            let offline = OfflineChallenges;
            let standings = RoundOrchestrator::new(&config, &mut book, &offline).update_standings()?;
            standings.print_leaderboard();
        }
        Commands::Preview { sit_out } => {
            let offline = OfflineChallenges;
            let (round, pairs) = RoundOrchestrator::new(&config, &mut book, &offline).preview_pairings(&sit_out)?;
            println!("=== Round {} (preview) ===", round);
            for pair in &pairs {
                let (first, second) = pair.names();
                println!("{:<24} vs {}", first, second);
            }
        }
        Commands::NextRound {
            sit_out,
            offline,
            seed,
        } => {
            let service = challenge_service(&config, token, offline);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let mut orchestrator = RoundOrchestrator::new(&config, &mut book, service.as_ref());
            let created = orchestrator
                .create_next_round(&sit_out, Utc::now(), &mut rng)
                .context("creating the next round")?;
            let Some(round) = created.first().map(|m| m.round) else {
                bail!("no games were created");
            };
            let snapshot = orchestrator.load()?;
            println!("{}", round_report(round, &snapshot.matches, &snapshot.standings));
        }
        Commands::FetchResults => {
            let service = challenge_service(&config, token, false);
            let mut orchestrator = RoundOrchestrator::new(&config, &mut book, service.as_ref());
            let summary = orchestrator.refresh_results(Utc::now())?;
            info!(
                finished = summary.finished,
                expired = summary.expired,
                failed = summary.failed,
                "results refreshed"
            );
            orchestrator.update_standings()?.print_leaderboard();
        }
    }

    Ok(())
}

fn challenge_service(config: &TournamentConfig, token: Option<String>, offline: bool) -> Box<dyn ChallengeService> {
    if offline {
        return Box::new(OfflineChallenges);
    }
    if token.is_none() {
        warn!("no Lichess token given; challenge creation will likely be rejected");
    }
    Box::new(LichessClient::from_config(&config.challenge, token))
}

fn init(config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        info!(path = %config_path.display(), "config already exists");
        TournamentConfig::load(config_path)?
    } else {
        let config = TournamentConfig::default();
        config.save(config_path)?;
        info!(path = %config_path.display(), "wrote default config");
        config
    };

    let mut book = WorkbookFile::new(&config.workbook);
    if book.read_table(&config.players_sheet).is_ok() {
        info!(sheet = %config.players_sheet, "roster sheet already exists");
        return Ok(());
    }

    let headers: Vec<&str> = RosterColumn::ALL.iter().map(|c| c.header()).collect();
    book.write_table(&config.players_sheet, &Table::new(&headers))
        .with_context(|| format!("writing {}", config.workbook.display()))?;
    println!(
        "Created {} with an empty `{}` sheet. Add players, then run `tournament next-round`.",
        config.workbook.display(),
        config.players_sheet
    );
    Ok(())
}
