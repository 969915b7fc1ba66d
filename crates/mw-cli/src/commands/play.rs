use std::io::{self, BufRead, Write};

use colored::Colorize;

use mw_engine::{AttackType, DieId, GameConfig, GameEvent, Op, Paren, Player, Session, Sides};

use super::{Greedy, print_events, render_board};

const HELP: &str = "\
Commands:
  show                 redraw the board
  strength | mind      choose the attack type
  pick <die>           select or deselect one of your dice, e.g. pick d6
  target <die>         aim at an opponent die, e.g. target d4
  op <+|-|*|/>         add an operator to a mind expression
  ( | )                add a parenthesis to a mind expression
  expr <text>          write the whole expression, e.g. expr (d4 + d6) * d8
  back                 remove the last expression token
  clear                drop the selection and return to strength
  legal                list the strength attacks open to you
  attack               commit the attack
  skip                 pass the turn
  undo                 take back the last attack
  tick [n]             let n seconds pass (default 1)
  log [move]           show the event log, or one move's events
  new                  start a new game with the same options
  quit                 leave";

enum Reply {
    Board,
    Text(String),
    Events(Vec<GameEvent>),
}

pub fn run(config: GameConfig, vs_cpu: bool) -> Result<(), String> {
    let config = if vs_cpu {
        config.with_policy_player(Player::Two)
    } else {
        config
    };
    let mut session = Session::new(config).map_err(|e| format!("failed to start game: {e}"))?;
    let mut cpu = vs_cpu.then_some(Greedy);

    println!("  {} Mindwar", "Starting".bold());
    if vs_cpu {
        println!("  You are player 1; the computer plays player 2.");
    }
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    print_events(session.events());
    cpu_moves(&mut session, cpu.as_mut());
    show(&session);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }

        match handle(&mut session, input) {
            Ok(Reply::Board) => show(&session),
            Ok(Reply::Text(text)) => println!("{text}\n"),
            Ok(Reply::Events(events)) => {
                print_events(&events);
                cpu_moves(&mut session, cpu.as_mut());
                show(&session);
            }
            Err(e) => println!("{}\n", e.yellow()),
        }
    }

    Ok(())
}

fn handle(session: &mut Session, input: &str) -> Result<Reply, String> {
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };
    let current = session
        .state()
        .map(|s| s.current_player)
        .ok_or("no game is running")?;

    match command.to_lowercase().as_str() {
        "show" | "board" => Ok(Reply::Board),
        "help" | "?" => Ok(Reply::Text(HELP.to_string())),
        "strength" => {
            session
                .choose_attack_type(AttackType::Strength)
                .map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "mind" => {
            session
                .choose_attack_type(AttackType::Mind)
                .map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "pick" => {
            let id = DieId::new(current, parse_die(rest)?);
            session.toggle_own_die(id).map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "target" => {
            let id = DieId::new(current.opponent(), parse_die(rest)?);
            session.set_target(id).map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "op" => {
            let op = Op::from_symbol(rest)
                .ok_or_else(|| format!("unknown operator '{rest}' (use + - * /)"))?;
            session.add_operator(op).map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "(" | ")" => {
            let paren = if command == "(" {
                Paren::Open
            } else {
                Paren::Close
            };
            session.add_parenthesis(paren).map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "expr" => {
            let in_strength = session
                .state()
                .is_some_and(|s| s.selection.attack_type() == AttackType::Strength);
            if in_strength {
                session
                    .choose_attack_type(AttackType::Mind)
                    .map_err(|e| e.to_string())?;
            }
            session
                .set_expression_notation(rest)
                .map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "back" => {
            session.undo_last_token().map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "clear" => {
            session.clear_selection().map_err(|e| e.to_string())?;
            Ok(Reply::Board)
        }
        "legal" => {
            let moves = session.legal_strength_attacks();
            if moves.is_empty() {
                return Ok(Reply::Text("No strength attack is open.".into()));
            }
            let lines: Vec<String> = moves
                .iter()
                .map(|(attacker, target)| format!("  {} -> {}", attacker.sides, target.sides))
                .collect();
            Ok(Reply::Text(lines.join("\n")))
        }
        "attack" | "a" => session
            .commit_attack()
            .map(Reply::Events)
            .map_err(|e| e.to_string()),
        "skip" => session
            .skip_turn()
            .map(Reply::Events)
            .map_err(|e| e.to_string()),
        "undo" => session
            .undo()
            .map(Reply::Events)
            .map_err(|e| e.to_string()),
        "tick" => {
            let seconds: u32 = if rest.is_empty() {
                1
            } else {
                rest.parse()
                    .map_err(|_| format!("'{rest}' is not a number of seconds"))?
            };
            let mut events = Vec::new();
            for _ in 0..seconds {
                let report = session.tick().map_err(|e| e.to_string())?;
                let turn_ended = report.move_expired || report.game_expired;
                events.extend(report.events);
                if turn_ended {
                    break;
                }
            }
            Ok(Reply::Events(events))
        }
        "log" => {
            let events: Vec<&GameEvent> = if rest.is_empty() {
                session.events().iter().collect()
            } else {
                let move_number: u32 = rest
                    .parse()
                    .map_err(|_| format!("'{rest}' is not a move number"))?;
                session.event_log().events_at_move(move_number)
            };
            if events.is_empty() {
                return Ok(Reply::Text("No events.".into()));
            }
            let lines: Vec<String> = events
                .iter()
                .map(|e| format!("  [move {:>3}] {}", e.move_number, e.description))
                .collect();
            Ok(Reply::Text(lines.join("\n")))
        }
        "new" => {
            let config = session.config().clone();
            session
                .new_game(config)
                .map(Reply::Events)
                .map_err(|e| e.to_string())
        }
        other => Err(format!("unknown command '{other}' (type 'help')")),
    }
}

fn parse_die(s: &str) -> Result<Sides, String> {
    Sides::from_str_tag(s)
        .ok_or_else(|| format!("unknown die '{s}' (use d4, d6, d8, d10, d12 or d20)"))
}

/// Let the computer answer while it is its turn.
fn cpu_moves(session: &mut Session, cpu: Option<&mut Greedy>) {
    let Some(cpu) = cpu else {
        return;
    };
    loop {
        let cpu_turn = session.state().is_some_and(|s| {
            !s.is_over() && session.config().policy_player == Some(s.current_player)
        });
        if !cpu_turn {
            return;
        }
        match session.play_policy_turn(&mut *cpu) {
            Ok(events) => print_events(&events),
            Err(e) => {
                println!("{}\n", format!("computer move failed: {e}").yellow());
                return;
            }
        }
    }
}

fn show(session: &Session) {
    if let Some(state) = session.state() {
        println!("{}", render_board(state));
        if state.is_over() {
            let tally = session.tally();
            for player in Player::BOTH {
                println!(
                    "  {player}: {} captures ({} by strength, {} by mind), {} dice lost, {} skips",
                    tally.captures(player),
                    tally.strength_captures[player.index()],
                    tally.mind_captures[player.index()],
                    state.pool(player).captured_count(),
                    tally.skips[player.index()]
                );
            }
            println!("  Type 'new' for another game or 'quit' to leave.\n");
        }
    }
}
