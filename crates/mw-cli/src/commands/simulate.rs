use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mw_engine::{GameConfig, Outcome, Player, Session};

use super::{Greedy, print_events};

/// Moves after which an undecided game is abandoned.
const MAX_MOVES: u32 = 1000;

pub fn run(config: GameConfig, games: u32, think: u32, verbose: bool) -> Result<(), String> {
    let mut config = config;
    config.policy_player = None;
    let base_seed = config.seed.unwrap_or(42);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Game", "Seed", "Winner", "Cause", "Moves", "Strength", "Mind", "Combo", "Skips", "Time",
    ]);

    let mut wins = [0_u32; 2];
    let mut unfinished = 0_u32;

    for game in 1..=games {
        let seed = base_seed.wrapping_add(u64::from(game - 1));
        let mut session = Session::new(config.clone().with_seed(seed))
            .map_err(|e| format!("failed to start game: {e}"))?;
        let outcome = play_out(&mut session, think)?;

        if verbose {
            println!("  {} {game} (seed={seed})", "Game".bold());
            for event in session.events() {
                print!("  {}", format!("[move {:>3}]", event.move_number).dimmed());
                print_events(std::slice::from_ref(event));
            }
            println!();
        }

        let (winner, cause) = match outcome {
            Some(outcome) => {
                wins[outcome.winner.index()] += 1;
                (outcome.winner.to_string(), outcome.cause.to_string())
            }
            None => {
                unfinished += 1;
                ("--".to_string(), "unfinished".to_string())
            }
        };
        let tally = session.tally();
        let moves = session.state().map_or(0, |s| s.move_count);
        table.add_row(vec![
            game.to_string(),
            seed.to_string(),
            winner,
            cause,
            moves.to_string(),
            pair(tally.strength_captures),
            pair(tally.mind_captures),
            pair(tally.biggest_combo),
            pair(tally.skips),
            format!("{}:{:02}", tally.elapsed_secs / 60, tally.elapsed_secs % 60),
        ]);
    }

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({games} games, seed={base_seed}, think={think}s)").dimmed()
    );
    println!("{table}");
    println!(
        "  {} won {}, {} won {}, {} unfinished",
        Player::One,
        wins[0],
        Player::Two,
        wins[1],
        unfinished
    );
    Ok(())
}

/// Let the built-in policy play both sides until the game ends.
fn play_out(session: &mut Session, think: u32) -> Result<Option<Outcome>, String> {
    let mut policy = Greedy;
    loop {
        let state = session.state().ok_or("the game was torn down")?;
        if let Some(outcome) = state.outcome {
            return Ok(Some(outcome));
        }
        if state.move_count >= MAX_MOVES {
            return Ok(None);
        }

        let mut interrupted = false;
        for _ in 0..think {
            let report = session.tick().map_err(|e| e.to_string())?;
            if report.game_expired || report.move_expired {
                interrupted = true;
                break;
            }
        }
        if !interrupted {
            session
                .play_policy_turn(&mut policy)
                .map_err(|e| e.to_string())?;
        }
    }
}

fn pair<T: std::fmt::Display>(values: [T; 2]) -> String {
    format!("{} / {}", values[0], values[1])
}
