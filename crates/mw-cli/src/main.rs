//! CLI frontend for the Mindwar dice-capture engine.

mod commands;

use std::process;

use clap::{Parser, Subcommand};

use commands::GameArgs;

#[derive(Parser)]
#[command(
    name = "mw",
    about = "Mindwar: capture your opponent's dice by strength or by mind",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game at the terminal, hot-seat or against the computer
    Play {
        #[command(flatten)]
        game: GameArgs,

        /// Let the computer play player 2
        #[arg(long)]
        vs_cpu: bool,
    },

    /// Let the built-in policy play both sides and report the results
    Simulate {
        #[command(flatten)]
        game: GameArgs,

        /// Number of games to play (seeds count up from --seed)
        #[arg(short, long, default_value = "1")]
        games: u32,

        /// Seconds that pass before each move
        #[arg(long, default_value = "5")]
        think: u32,

        /// Show every event, not just the summary
        #[arg(short, long)]
        verbose: bool,
    },

    /// Evaluate an arithmetic expression with the game's rules
    Eval {
        /// Expression such as "(2 + 3) * 4"
        expression: String,
    },

    /// Print a summary of the rules
    Rules,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { game, vs_cpu } => {
            commands::load_config(&game).and_then(|config| commands::play::run(config, vs_cpu))
        }
        Commands::Simulate {
            game,
            games,
            think,
            verbose,
        } => commands::load_config(&game)
            .and_then(|config| commands::simulate::run(config, games, think, verbose)),
        Commands::Eval { expression } => commands::eval::run(&expression),
        Commands::Rules => commands::rules::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
