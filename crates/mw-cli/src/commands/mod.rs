pub mod eval;
pub mod play;
pub mod rules;
pub mod simulate;

use std::fs;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mw_engine::rules as engine_rules;
use mw_engine::{
    AttackType, DiceSort, DieId, ExprToken, GameConfig, GameEvent, GameEventKind, GameState, Op,
    OpponentDecision, OpponentPolicy, Player,
};

/// Game options shared by `play` and `simulate`.
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Load options from a JSON file; flags given on the command line win
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// RNG seed for a reproducible game
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Game length in seconds (0 disables the game clock)
    #[arg(long)]
    pub game_secs: Option<u32>,

    /// Time per move in seconds (0 disables the move clock)
    #[arg(long)]
    pub move_secs: Option<u32>,

    /// Initial pool order: value or sides
    #[arg(long)]
    pub sort: Option<String>,

    /// Player 1 always moves first
    #[arg(long)]
    pub always_first: bool,

    /// Roll bias from -3 to 3; positive favors high faces
    #[arg(long, allow_negative_numbers = true)]
    pub bias: Option<i32>,
}

/// Build a game configuration from a config file and flags.
pub fn load_config(args: &GameArgs) -> Result<GameConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            GameConfig::from_json(&text).map_err(|e| e.to_string())?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(secs) = args.game_secs {
        config = config.with_game_duration(secs);
    }
    if let Some(secs) = args.move_secs {
        config = config.with_move_duration(secs);
    }
    if let Some(sort) = &args.sort {
        config = config.with_dice_sort(parse_sort(sort)?);
    }
    if args.always_first {
        config = config.with_always_first(true);
    }
    if let Some(bias) = args.bias {
        config = config.with_roll_bias(bias);
    }
    Ok(config)
}

fn parse_sort(s: &str) -> Result<DiceSort, String> {
    match s.to_lowercase().as_str() {
        "value" => Ok(DiceSort::Value),
        "sides" => Ok(DiceSort::Sides),
        other => Err(format!("unknown sort '{other}' (expected value or sides)")),
    }
}

/// Captures the biggest die strength allows, otherwise the first two-die
/// expression that hits, otherwise passes.
#[derive(Debug, Default)]
pub struct Greedy;

impl OpponentPolicy for Greedy {
    fn decide(&mut self, view: &GameState) -> OpponentDecision {
        let strongest = engine_rules::legal_strength_attacks(view)
            .into_iter()
            .max_by_key(|(_, target)| view.die(*target).map_or(0, |d| d.value));
        if let Some((attacker, target)) = strongest {
            return OpponentDecision::Strength { attacker, target };
        }
        match two_dice_mind(view) {
            Some((tokens, target)) => OpponentDecision::Mind { tokens, target },
            None => OpponentDecision::Skip,
        }
    }
}

fn two_dice_mind(view: &GameState) -> Option<(Vec<ExprToken>, DieId)> {
    let me = view.current_player;
    let own: Vec<DieId> = view.pool(me).active().map(|d| d.id).collect();
    for target in view.pool(me.opponent()).active() {
        for (i, a) in own.iter().enumerate() {
            for b in &own[i + 1..] {
                for (x, y) in [(*a, *b), (*b, *a)] {
                    for op in [Op::Add, Op::Mul, Op::Sub, Op::Div] {
                        let tokens =
                            vec![ExprToken::Die(x), ExprToken::Op(op), ExprToken::Die(y)];
                        if engine_rules::check_mind(view, &tokens, target.id).is_ok() {
                            return Some((tokens, target.id));
                        }
                    }
                }
            }
        }
    }
    None
}

/// Draw both pools, the clocks, and the attack under construction.
pub fn render_board(state: &GameState) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    for player in Player::BOTH {
        let mut row = vec![player.to_string()];
        for die in state.pool(player).dice() {
            let cell = if die.captured {
                format!("{} x", die.sides())
            } else if state.selection.contains(die.id) {
                format!("{} [{}]", die.sides(), die.value)
            } else if state.selection.target() == Some(die.id) {
                format!("{} <{}>", die.sides(), die.value)
            } else {
                format!("{} {}", die.sides(), die.value)
            };
            row.push(cell);
        }
        table.add_row(row);
    }

    let mut out = format!("{table}\n");
    match state.outcome {
        Some(outcome) => {
            out.push_str(&format!("  {} wins by {}\n", outcome.winner, outcome.cause));
        }
        None => {
            out.push_str(&format!(
                "  {} to move | {} | game {} | move {}\n",
                state.current_player,
                state.selection.attack_type(),
                state.clock.game,
                state.clock.moves
            ));
            if let Some(line) = describe_selection(state) {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }
    out
}

fn describe_selection(state: &GameState) -> Option<String> {
    let selection = &state.selection;
    if selection.is_empty() {
        return None;
    }
    let tokens: Vec<String> = selection
        .tokens()
        .iter()
        .map(|token| match token {
            ExprToken::Die(id) => {
                let value = state.die(*id).map_or(0, |d| d.value);
                match selection.attack_type() {
                    AttackType::Strength => format!("{} ({value})", id.sides),
                    AttackType::Mind => value.to_string(),
                }
            }
            ExprToken::Op(op) => op.to_string(),
            ExprToken::Paren(p) => mw_engine::Symbol::from(*p).to_string(),
        })
        .collect();
    let target = match selection.target() {
        Some(id) => {
            let value = state.die(id).map_or(0, |d| d.value);
            format!("{} ({value})", id.sides)
        }
        None => "?".to_string(),
    };
    Some(format!("{} -> {target}", tokens.join(" ")))
}

/// Print events, one per line, colored by kind.
pub fn print_events(events: &[GameEvent]) {
    for event in events {
        println!("  {}", colorize_event(&event.kind, &event.description));
    }
}

fn colorize_event(kind: &GameEventKind, description: &str) -> colored::ColoredString {
    match kind {
        GameEventKind::GameStarted { .. } => description.bold(),
        GameEventKind::AttackCommitted { .. } => description.cyan(),
        GameEventKind::TurnSkipped { .. } => description.normal(),
        GameEventKind::TurnTimedOut { .. } => description.yellow(),
        GameEventKind::GameOver { .. } => description.green().bold(),
        GameEventKind::UndoPerformed { .. } => description.magenta(),
        GameEventKind::DecisionDiscarded { .. } => description.dimmed(),
    }
}
