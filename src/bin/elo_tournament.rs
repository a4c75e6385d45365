//! Command line entry point.
//!
//! - `elo-tournament run <roster.toml>` - Play a session with the agents of a roster file
//! - `elo-tournament standings <file.elo>` - Print the ranking stored in a rating file
//!
//! Session settings come from the `ELO_*` environment variables, see
//! [`Configuration::from_env`](elo_tournament::configuration::Configuration::from_env).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use elo_tournament::agent_collector::{collect_roster, print_roster};
use elo_tournament::game_interface::OpeningBook;
use elo_tournament::prelude::*;
use elo_tournament::rating_store;

/// Elo-rated tournament between game-playing agents
#[derive(Parser)]
#[command(name = "elo-tournament")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a tournament session with the agents of a roster file
    Run {
        /// TOML roster file
        roster: PathBuf,
        /// Rating file (default: `<game>.elo`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Games to play, overrides ELO_NUM_GAMES
        #[arg(short, long)]
        games: Option<usize>,
        /// Seed of the matchmaking RNG, overrides ELO_SEED
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the standings stored in a rating file
    Standings {
        file: PathBuf,
        /// Hide agents with fewer games
        #[arg(short, long, default_value_t = 0)]
        min_games: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            roster,
            output,
            games,
            seed,
        } => run(roster, output, games, seed),
        Commands::Standings { file, min_games } => standings(file, min_games),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\x1b[31merror:\x1b[39m {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    roster: PathBuf,
    output: Option<PathBuf>,
    games: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = Configuration::from_env();
    if let Some(games) = games {
        config = config.with_num_games(games);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let roster = collect_roster(&roster)?;
    let Some(referee) = &roster.referee else {
        bail!("roster for '{}' has no [referee] section", roster.game);
    };
    let agents = roster.agents();
    let verbose = config.verbose();
    if verbose {
        print_roster(&roster, &agents);
    }

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.elo", roster.game)));
    let mut executor =
        RefereeProcess::new(referee.command.clone(), referee.args.clone()).with_stderr(verbose);
    let mut openings = roster.openings.clone();

    let evaluator = Evaluator::new(config)?;
    let report = evaluator.evaluate(
        &roster.game,
        &agents,
        &output,
        ClosenessMatchmaker::default(),
        &mut executor,
        openings.as_mut().map(|book| book as &mut dyn OpeningBook),
    )?;

    println!(
        "{} games played, {} aborted, ratings in {output:?}",
        report.games_played, report.games_aborted
    );
    Ok(())
}

fn standings(file: PathBuf, min_games: u32) -> anyhow::Result<()> {
    let state =
        rating_store::load(&file).with_context(|| format!("cannot show standings of {file:?}"))?;
    println!("{}", state.game);
    print!("{}", state.standings_table(min_games));
    Ok(())
}
