//! Random move bot - plays random legal games against itself.
//!
//! Moves are chosen through the board's selection interface only, which
//! makes the bot a simple end-to-end exercise of the rules engine.

mod config;
mod selfplay;

use clap::Parser;
use config::BotConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bot-random")]
#[command(about = "Plays random legal chess games against itself")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value_os_t = BotConfig::config_path())]
    config: PathBuf,

    /// Number of games to play
    #[arg(short, long)]
    games: Option<u32>,

    /// Seed for the move picker
    #[arg(long)]
    seed: Option<u64>,

    /// Abandon a game after this many plies
    #[arg(long)]
    max_plies: Option<u32>,

    /// Start position description
    #[arg(long)]
    fen: Option<String>,

    /// Print game summaries as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Overrides configuration values with the flags given on the command line.
    fn apply(self, mut config: BotConfig) -> BotConfig {
        if let Some(games) = self.games {
            config.games = games;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_plies) = self.max_plies {
            config.max_plies = max_plies;
        }
        if let Some(fen) = self.fen {
            config.start_position = fen;
        }
        config.json |= self.json;
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = match BotConfig::load(&args.config) {
        Ok(config) => args.apply(config),
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "configuration");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for game in 1..=config.games {
        let summary = match selfplay::play_game(
            game,
            &config.start_position,
            config.max_plies,
            &mut rng,
        ) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        };

        if config.json {
            match serde_json::to_string(&summary) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    tracing::error!("Failed to serialize summary: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!(
                "game {}: {} after {} plies",
                summary.game,
                summary.outcome,
                summary.plies.len()
            );
        }
    }

    ExitCode::SUCCESS
}
