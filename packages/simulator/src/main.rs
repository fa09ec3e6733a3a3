//! Bot simulator CLI - plays whole games in memory through the engine's
//! service API and writes one record per game.

mod output;
mod record;

use std::time::Instant;

use blitzquest::ai::{create_ai, AiPlayer};
use blitzquest::domain::lobby::GameConfig;
use blitzquest::domain::state::{GameMode, UserId};
use blitzquest::{AppError, EngineConfig, GameFlowService};
use clap::{Parser, ValueEnum};
use output::OutputWriter;
use record::GameRecord;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// User ids handed to bots; seat `i` is `BOT_USER_BASE + i`.
const BOT_USER_BASE: UserId = 1;

#[derive(Parser)]
#[command(name = "blitz-simulator")]
#[command(about = "Play bot-only games in memory")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Game mode for every game
    #[arg(long, default_value = "finish-line")]
    mode: ModeArg,

    /// Seats per game (Card-Duel always uses 2)
    #[arg(short, long, default_value = "4")]
    players: usize,

    /// Bot kind for every seat
    #[arg(long, default_value = "random")]
    bot: String,

    /// Base seed; game `n` uses `seed + n`. Random when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Board length override
    #[arg(long)]
    board_length: Option<usize>,

    /// Action cap per game before giving up
    #[arg(long, default_value = "20000")]
    max_steps: usize,

    /// Games played at once
    #[arg(long, default_value = "4")]
    parallel: usize,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine-style JSON logs filtered by RUST_LOG instead of plain text
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    FinishLine,
    Survival,
    Draft,
    CardDuel,
}

impl From<ModeArg> for GameMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::FinishLine => GameMode::FinishLine,
            ModeArg::Survival => GameMode::Survival,
            ModeArg::Draft => GameMode::Draft,
            ModeArg::CardDuel => GameMode::CardDuel,
        }
    }
}

#[derive(Debug, Clone)]
struct GameJob {
    number: u32,
    seed: u64,
    players: usize,
    config: GameConfig,
    bot: String,
    max_steps: usize,
}

async fn run_game(service: GameFlowService, job: GameJob) -> Result<GameRecord, AppError> {
    let started_at = Instant::now();
    let users: Vec<UserId> = (0..job.players).map(|i| BOT_USER_BASE + i as UserId).collect();

    let created = service.create_game(users[0], &job.config)?;
    for &user in &users[1..] {
        if let Err(rejection) = service.join(created.game_id, user).await?.outcome {
            return Err(AppError::invalid(rejection.code, rejection.detail));
        }
    }
    if let Err(rejection) = service.start(created.game_id, users[0]).await?.outcome {
        return Err(AppError::invalid(rejection.code, rejection.detail));
    }

    let mut bots: Vec<Box<dyn AiPlayer>> = Vec::with_capacity(users.len());
    for i in 0..users.len() {
        let bot = create_ai(&job.bot, Some(job.seed.wrapping_add(i as u64)))
            .ok_or_else(|| AppError::config(format!("unknown bot kind '{}'", job.bot)))?;
        bots.push(bot);
    }
    let seats: Vec<(UserId, &dyn AiPlayer)> = users
        .iter()
        .zip(bots.iter())
        .map(|(&u, b)| (u, b.as_ref()))
        .collect();

    let summary = service.drive_bots(created.game_id, &seats, job.max_steps).await?;
    let view = service.get_public_state(created.game_id, None).await?;
    let record = GameRecord::build(job.number, job.seed, &view, &summary, started_at.elapsed());

    // Finished games are not needed past this point.
    if let Err(rejection) = service.delete_game(created.game_id, users[0]).await?.outcome {
        warn!(game = job.number, code = %rejection.code, "could not delete simulated game");
    }
    Ok(record)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.json_logs {
        blitzquest::telemetry::init_tracing();
    } else {
        // Silent by default, only show warnings and errors
        let filter = if args.verbose { "debug" } else { "warn" };
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let engine = EngineConfig::from_env()?;
    let service = GameFlowService::new(engine);
    let mut output = OutputWriter::new(&args.output_dir)?;

    let base_seed = args.seed.unwrap_or_else(rand::random);
    let mode = GameMode::from(args.mode);
    info!(games = args.games, ?mode, base_seed, "starting simulation");

    let start = Instant::now();
    let mut pending = JoinSet::new();
    let mut records = Vec::new();
    let mut errors = 0u32;

    for number in 1..=args.games {
        let seed = base_seed.wrapping_add(u64::from(number));
        let config = GameConfig {
            board_length: args.board_length,
            max_players: Some(args.players),
            seed: Some(seed),
            ..GameConfig::new(mode)
        };
        let job = GameJob {
            number,
            seed,
            players: if mode == GameMode::CardDuel { 2 } else { args.players },
            config,
            bot: args.bot.clone(),
            max_steps: args.max_steps,
        };
        pending.spawn(run_game(service.clone(), job));

        if pending.len() >= args.parallel.max(1) {
            collect_one(&mut pending, &mut records, &mut errors).await;
        }
    }
    while !pending.is_empty() {
        collect_one(&mut pending, &mut records, &mut errors).await;
    }

    records.sort_by_key(|r: &GameRecord| r.game);
    for record in &records {
        if let Err(e) = output.write_game(record) {
            warn!("Failed to write record for game {}: {}", record.game, e);
        }
    }
    output.finish()?;

    let elapsed = start.elapsed();
    let finished = records.iter().filter(|r| r.finished).count();
    println!(
        "{} games ({} finished, {} errors) in {:.2}s",
        records.len(),
        finished,
        errors,
        elapsed.as_secs_f64()
    );
    println!("results: {}", output.jsonl_path().display());
    println!("summary: {}", output.csv_path().display());
    Ok(())
}

async fn collect_one(
    pending: &mut JoinSet<Result<GameRecord, AppError>>,
    records: &mut Vec<GameRecord>,
    errors: &mut u32,
) {
    match pending.join_next().await {
        Some(Ok(Ok(record))) => records.push(record),
        Some(Ok(Err(e))) => {
            warn!(code = %e.code(), "game failed: {}", e.detail());
            *errors += 1;
        }
        Some(Err(join_err)) => {
            warn!("game task panicked: {join_err}");
            *errors += 1;
        }
        None => {}
    }
}
