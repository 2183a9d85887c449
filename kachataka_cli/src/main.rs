use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kachataka_core::{
    play_round, theoretical_rtp, time_to_reach, verify_result, Direction, GameConfig, Outcome,
    ServerSeed, Wager,
};
use kachataka_shared::BetRecord;

#[derive(Parser)]
#[command(name = "kachataka-cli", about = "Fairness and payout tooling for Kacha Taka games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Game config JSON; built-in defaults when omitted
    #[arg(long, value_parser, env = "KACHATAKA_CONFIG", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh server seed and the hash to publish
    Commit,
    /// Check a revealed seed against its published hash
    Verify { seed: String, hash: String },
    /// Play one round and print the resulting bet record
    Play {
        #[command(flatten)]
        wager: WagerArgs,
        /// Revealed seed to replay; a fresh one is generated when omitted
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value = "1")]
        round: String,
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
        #[arg(long, default_value = "cli")]
        user: String,
        #[arg(long)]
        demo: bool,
    },
    /// Re-verify a stored bet record (JSON)
    VerifyRecord { path: PathBuf },
    /// Play many rounds under one seed and report the empirical return
    Simulate {
        #[command(flatten)]
        wager: WagerArgs,
        #[arg(long, default_value_t = 10_000)]
        rounds: u64,
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
        /// Export every bet record to this CSV path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GameArg {
    Crash,
    Mines,
    Dice,
    Slots,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Over,
    Under,
}

#[derive(Args)]
struct WagerArgs {
    #[arg(value_enum)]
    game: GameArg,
    /// Crash: automatic cash-out target
    #[arg(long, default_value_t = 2.0)]
    cash_out: f64,
    /// Mines: number of mines on the board
    #[arg(long, default_value_t = 3)]
    mines: usize,
    /// Mines: cells to reveal, in order
    #[arg(long, value_delimiter = ',')]
    picks: Vec<u8>,
    /// Dice: threshold to roll over or under
    #[arg(long, default_value_t = 50.0)]
    threshold: f64,
    #[arg(long, value_enum, default_value = "over")]
    direction: DirectionArg,
}

impl WagerArgs {
    fn to_wager(&self) -> Wager {
        match self.game {
            GameArg::Crash => Wager::Crash {
                cash_out: self.cash_out,
            },
            GameArg::Mines => Wager::Mines {
                mine_count: self.mines,
                picks: self.picks.clone(),
            },
            GameArg::Dice => Wager::Dice {
                threshold: self.threshold,
                direction: match self.direction {
                    DirectionArg::Over => Direction::Over,
                    DirectionArg::Under => Direction::Under,
                },
            },
            GameArg::Slots => Wager::Slots,
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let config: GameConfig = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.validate().context("invalid game config")?;
    Ok(config)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Commit => {
            let seed = ServerSeed::generate(&mut rand::rngs::OsRng);
            println!("seed={}", seed.as_str());
            println!("hash={}", seed.commitment());
        }
        Commands::Verify { seed, hash } => {
            if verify_result(&seed, &hash) {
                println!("fairness check passed");
            } else {
                println!("fairness check failed: seed does not match published hash");
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Play {
            wager,
            seed,
            round,
            bet,
            user,
            demo,
        } => {
            let seed = match seed {
                Some(hex) => ServerSeed::from_hex(hex)?,
                None => ServerSeed::generate(&mut rand::rngs::OsRng),
            };
            let result = play_round(seed.as_str(), &round, &config, &wager.to_wager(), bet)?;
            if let Outcome::Crash { crash_point } = result.outcome {
                let secs = time_to_reach(crash_point, config.crash.growth_rate).as_secs_f64();
                info!(crash_point, secs, "display curve reaches crash point");
            }
            let record = BetRecord::settle(user, round, demo, bet, result, &seed, Utc::now());
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::VerifyRecord { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading record {}", path.display()))?;
            let record: BetRecord = serde_json::from_str(&raw)
                .with_context(|| format!("parsing record {}", path.display()))?;
            let verification = record.verify(&config)?;
            println!("{verification}");
            if !verification.is_verified() {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Simulate {
            wager,
            rounds,
            bet,
            csv,
        } => simulate(&config, &wager.to_wager(), rounds, bet, csv.as_deref())?,
    }

    Ok(ExitCode::SUCCESS)
}

fn simulate(
    config: &GameConfig,
    wager: &Wager,
    rounds: u64,
    bet: f64,
    csv_path: Option<&Path>,
) -> anyhow::Result<()> {
    let seed = ServerSeed::generate(&mut rand::rngs::OsRng);
    let mut wtr = match csv_path {
        Some(path) => Some(
            csv::Writer::from_path(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => None,
    };
    if let Some(wtr) = wtr.as_mut() {
        wtr.write_record([
            "roundId",
            "timestamp",
            "game",
            "betAmount",
            "multiplier",
            "winAmount",
            "seedHash",
            "result",
        ])?;
    }

    let mut total_bet = 0.0;
    let mut total_payout = 0.0;
    let mut wins = 0u64;
    for n in 0..rounds {
        let round_id = n.to_string();
        let result = play_round(seed.as_str(), &round_id, config, wager, bet)?;
        total_bet += bet;
        total_payout += result.win_amount;
        if result.is_win() {
            wins += 1;
        }
        if let Some(wtr) = wtr.as_mut() {
            let record = BetRecord::settle("sim", round_id, true, bet, result, &seed, Utc::now());
            wtr.write_record(&[
                record.round_id.clone(),
                record.timestamp.to_rfc3339(),
                record.game.to_string(),
                record.bet_amount.to_string(),
                record.multiplier.to_string(),
                record.win_amount.to_string(),
                record.seed_hash.to_string(),
                serde_json::to_string(&record.result)?,
            ])?;
        }
    }
    if let Some(mut wtr) = wtr {
        wtr.flush()?;
    }

    if total_bet == 0.0 {
        warn!("no rounds simulated");
        return Ok(());
    }
    let rtp = total_payout / total_bet;
    info!(game = %wager.game(), rounds, "simulation finished");
    println!("rounds={rounds} wins={wins} rtp={rtp:.4}");
    if let Wager::Slots = wager {
        println!("theoretical_rtp={:.4}", theoretical_rtp(&config.slots)?);
    }
    println!("seed={} hash={}", seed.as_str(), seed.commitment());
    Ok(())
}
