//! A live game: the turn state machine plus undo, clocks, and opponent
//! decisions.
//!
//! Every mutator either applies completely or returns an error and leaves
//! the session exactly as it was. Mutators that change the game return the
//! events they produced; the same events are appended to the session's
//! [`EventLog`].

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::dice::{DieId, Player, Pool};
use crate::error::{EngineError, EngineResult};
use crate::event::{EventLog, GameEvent, GameEventKind};
use crate::expression::{self, ExprToken, Op, Paren, notation};
use crate::policy::{DecisionTicket, OpponentDecision, OpponentPolicy, PendingDecision};
use crate::rules;
use crate::selection::{AttackType, Selection};
use crate::state::{GameOverCause, GameState, Outcome};
use crate::tally::GameTally;
use crate::timer::DualTimer;
use crate::undo::UndoSlot;

/// Which clock an external tick source reports as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    /// The game clock: ends the game by tie-break.
    Game,
    /// The move clock of the given turn serial: skips that turn.
    Move {
        /// Turn serial from [`Session::turn`] when the clock was started.
        turn: u64,
    },
}

/// What happened during one [`Session::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The game clock reached zero and the game ended.
    pub game_expired: bool,
    /// The move clock reached zero and the turn was skipped.
    pub move_expired: bool,
    /// A pending opponent decision finished its think delay.
    pub decision_ready: bool,
    /// Events produced by the tick.
    pub events: Vec<GameEvent>,
}

/// A legal attack ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackPlan {
    /// Strength or mind.
    pub attack: AttackType,
    /// The attacking dice, in expression order.
    pub attackers: Vec<DieId>,
    /// The die that would be captured.
    pub target: DieId,
    /// The comparison or expression, e.g. `5 ≥ 3` or `2 + 3 = 5`.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Caller {
    Input,
    Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassReason {
    Skipped,
    TimedOut,
}

/// One game at a time, from setup to teardown.
pub struct Session {
    config: GameConfig,
    state: Option<GameState>,
    undo: UndoSlot,
    pending: Option<PendingDecision>,
    events: EventLog,
    tally: GameTally,
    rng: StdRng,
    generation: u64,
    turn: u64,
}

impl Session {
    /// Create a session and deal a new game from `config`.
    pub fn new(config: GameConfig) -> EngineResult<Self> {
        let mut session = Self::idle(config.clone());
        session.new_game(config)?;
        Ok(session)
    }

    /// Create a session whose first game uses the given pools instead of
    /// rolling them.
    pub fn with_pools(config: GameConfig, pools: [Pool; 2]) -> EngineResult<Self> {
        let mut session = Self::idle(config.clone());
        session.start(config, pools)?;
        Ok(session)
    }

    fn idle(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            events: EventLog::new(config.max_events),
            config,
            state: None,
            undo: UndoSlot::default(),
            pending: None,
            tally: GameTally::default(),
            rng,
            generation: 0,
            turn: 0,
        }
    }

    /// Discard the current game, if any, and deal a new one.
    pub fn new_game(&mut self, config: GameConfig) -> EngineResult<Vec<GameEvent>> {
        let config = config.normalized();
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let pools = [
            Pool::roll(Player::One, config.dice_sort, config.roll_bias, &mut self.rng),
            Pool::roll(Player::Two, config.dice_sort, config.roll_bias, &mut self.rng),
        ];
        self.start(config, pools)
    }

    fn start(&mut self, config: GameConfig, pools: [Pool; 2]) -> EngineResult<Vec<GameEvent>> {
        let config = config.normalized();
        let first = if config.always_first {
            Player::One
        } else {
            rules::first_player(&pools[0], &pools[1])
        };
        let state = GameState::new(pools, first, DualTimer::from_config(&config))?;

        self.generation += 1;
        self.turn += 1;
        self.pending = None;
        self.undo.clear();
        self.tally = GameTally::default();
        self.events = EventLog::new(config.max_events);
        self.config = config;
        self.state = Some(state);

        let event = GameEvent::new(
            0,
            GameEventKind::GameStarted {
                first_player: first,
            },
            format!("game started, {first} moves first"),
        );
        Ok(self.log(vec![event]))
    }

    /// Tear the current game down. Pending decisions become stale.
    pub fn abandon(&mut self) {
        self.state = None;
        self.pending = None;
        self.undo.clear();
        self.generation += 1;
        self.turn += 1;
    }

    // -- Queries --

    /// The configuration of the current game.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the current game, if one is running.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Every event recorded since the game started.
    pub fn events(&self) -> &[GameEvent] {
        self.events.events()
    }

    /// The event log itself, for filtered queries.
    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    /// Statistics for the current game.
    pub fn tally(&self) -> &GameTally {
        &self.tally
    }

    /// Serial of the current turn. Changes on every commit, skip, timeout,
    /// undo, and new game.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Session generation. Changes on every new game and abandon.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The ticket of the decision being waited for, if any.
    pub fn pending_ticket(&self) -> Option<DecisionTicket> {
        self.pending.map(|p| p.ticket)
    }

    /// Seconds of think delay left on the pending decision.
    pub fn think_remaining(&self) -> Option<u32> {
        self.pending.map(|p| p.think_remaining)
    }

    /// Whether [`undo`](Self::undo) would succeed now.
    ///
    /// Only the latest commit is retained, so a snapshot is always from a
    /// commit the other side has not answered with one of its own.
    pub fn can_undo(&self) -> bool {
        match &self.state {
            Some(state) => !self.undo.is_empty() && !state.is_over(),
            None => false,
        }
    }

    /// Whether the acting player could capture `target` with `attacker`.
    pub fn strength_legal(&self, attacker: DieId, target: DieId) -> bool {
        self.current()
            .is_ok_and(|s| !s.is_over() && rules::check_strength(s, attacker, target).is_ok())
    }

    /// Whether the acting player could capture `target` with `tokens`.
    pub fn mind_legal(&self, tokens: &[ExprToken], target: DieId) -> bool {
        self.current()
            .is_ok_and(|s| !s.is_over() && rules::check_mind(s, tokens, target).is_ok())
    }

    /// Every strength attack open to the acting player.
    pub fn legal_strength_attacks(&self) -> Vec<(DieId, DieId)> {
        match self.current() {
            Ok(state) if !state.is_over() => rules::legal_strength_attacks(state),
            _ => Vec::new(),
        }
    }

    /// Describe the current selection if it is a legal attack.
    pub fn ready_attack(&self) -> EngineResult<AttackPlan> {
        plan_attack(self.current()?)
    }

    // -- Selection --

    /// Switch between strength and mind. Switching to the current mode does
    /// nothing.
    pub fn choose_attack_type(&mut self, attack_type: AttackType) -> EngineResult<()> {
        self.guard(Caller::Input)?;
        self.live_mut()?.selection.switch_type(attack_type);
        Ok(())
    }

    /// Select or deselect one of the acting player's dice.
    pub fn toggle_own_die(&mut self, id: DieId) -> EngineResult<()> {
        let state = self.guard(Caller::Input)?;
        rules::own_die(state, id)?;
        self.live_mut()?.selection.toggle(id);
        Ok(())
    }

    /// Aim at an opponent die. Legality is checked on commit.
    pub fn set_target(&mut self, id: DieId) -> EngineResult<()> {
        let state = self.guard(Caller::Input)?;
        rules::target_die(state, id)?;
        self.live_mut()?.selection.set_target(id);
        Ok(())
    }

    /// Append an operator to the mind expression.
    pub fn add_operator(&mut self, op: Op) -> EngineResult<()> {
        self.guard(Caller::Input)?;
        self.live_mut()?.selection.push_operator(op)
    }

    /// Append a parenthesis to the mind expression.
    pub fn add_parenthesis(&mut self, paren: Paren) -> EngineResult<()> {
        self.guard(Caller::Input)?;
        self.live_mut()?.selection.push_paren(paren)
    }

    /// Remove the last token; a removed die is deselected.
    pub fn undo_last_token(&mut self) -> EngineResult<ExprToken> {
        self.guard(Caller::Input)?;
        self.live_mut()?
            .selection
            .pop_token()
            .ok_or_else(|| EngineError::IllegalSelection("nothing to remove".into()))
    }

    /// Drop selection, target, and expression, and return to strength.
    pub fn clear_selection(&mut self) -> EngineResult<()> {
        self.guard(Caller::Input)?;
        self.live_mut()?.selection.clear();
        Ok(())
    }

    /// Replace the mind expression with one written as text, such as
    /// `(d4 + d6) * d8`. The target is kept.
    pub fn set_expression_notation(&mut self, text: &str) -> EngineResult<()> {
        let state = self.guard(Caller::Input)?;
        let tokens = notation::parse_attack(text, state.current_player)?;
        for token in &tokens {
            if let ExprToken::Die(id) = token {
                rules::own_die(state, *id)?;
            }
        }
        let selection = Selection::from_tokens(AttackType::Mind, tokens, state.selection.target())?;
        self.live_mut()?.selection = selection;
        Ok(())
    }

    // -- Turn --

    /// Commit the current selection. Captures the target, re-rolls the
    /// attackers, and either ends the game or passes the turn.
    pub fn commit_attack(&mut self) -> EngineResult<Vec<GameEvent>> {
        self.guard(Caller::Input)?;
        self.commit()
    }

    /// Pass the turn without attacking.
    pub fn skip_turn(&mut self) -> EngineResult<Vec<GameEvent>> {
        self.guard(Caller::Input)?;
        self.pass_turn(PassReason::Skipped)
    }

    /// Restore the state from before the last commit. Cancels any pending
    /// decision.
    pub fn undo(&mut self) -> EngineResult<Vec<GameEvent>> {
        self.current()?;
        if !self.can_undo() {
            return Err(EngineError::NothingToUndo);
        }
        let snapshot = self.undo.take().ok_or(EngineError::NothingToUndo)?;
        let discarded = match (self.pending.take(), &self.state) {
            (Some(_), Some(state)) => Some(state.current_player),
            _ => None,
        };

        let mut restored = snapshot.state;
        restored.selection.clear();
        let move_number = restored.move_count;
        self.state = Some(restored);
        self.tally = snapshot.tally;
        self.turn += 1;

        let mut events = Vec::new();
        if let Some(player) = discarded {
            events.push(GameEvent::new(
                move_number,
                GameEventKind::DecisionDiscarded { player },
                format!("{player}'s pending decision was discarded"),
            ));
        }
        let taker = snapshot.taker;
        events.push(GameEvent::new(
            move_number,
            GameEventKind::UndoPerformed { player: taker },
            format!("{taker}'s attack was taken back"),
        ));
        Ok(self.log(events))
    }

    // -- Time --

    /// Advance one second. The game clock always runs. While a think delay
    /// is still counting down the move clock is held; once the decision is
    /// ready the move clock runs again, and its expiry discards the
    /// unanswered decision and passes the turn.
    pub fn tick(&mut self) -> EngineResult<TickReport> {
        let Some(state) = self.state.as_mut() else {
            return Err(EngineError::NoActiveGame);
        };
        let mut report = TickReport::default();
        if state.is_over() {
            return Ok(report);
        }
        self.tally.elapsed_secs += 1;

        if state.clock.game.advance() {
            report.game_expired = true;
            report.events = self.end_by_clock()?;
            return Ok(report);
        }

        if let Some(pending) = self.pending.as_mut().filter(|p| !p.is_ready()) {
            report.decision_ready = pending.advance();
        } else if state.clock.moves.advance() {
            report.move_expired = true;
            report.events = self.pass_turn(PassReason::TimedOut)?;
        }
        Ok(report)
    }

    /// Declare a clock expired on behalf of an external tick source.
    ///
    /// A timeout for a disabled clock, a move timeout for a turn that has
    /// already ended, or one arriving while the opponent is still thinking
    /// is ignored and produces no events.
    pub fn force_timeout(&mut self, kind: TimeoutKind) -> EngineResult<Vec<GameEvent>> {
        let Some(state) = self.state.as_mut() else {
            return Err(EngineError::NoActiveGame);
        };
        if state.is_over() {
            return Err(EngineError::IllegalTransition("the game is over".into()));
        }
        match kind {
            TimeoutKind::Game => {
                if !state.clock.game.is_enabled() {
                    return Ok(Vec::new());
                }
                state.clock.game.expire();
                self.end_by_clock()
            }
            TimeoutKind::Move { turn } => {
                let thinking = self.pending.is_some_and(|p| !p.is_ready());
                if !state.clock.moves.is_enabled() || turn != self.turn || thinking {
                    return Ok(Vec::new());
                }
                state.clock.moves.expire();
                self.pass_turn(PassReason::TimedOut)
            }
        }
    }

    // -- Opponent policy --

    /// Open a decision for the side to move, to be answered after
    /// `think_secs` ticks. Input for that side is refused meanwhile.
    pub fn begin_opponent_turn(&mut self, think_secs: u32) -> EngineResult<DecisionTicket> {
        let state = self.guard(Caller::Policy)?;
        if self.pending.is_some() {
            return Err(EngineError::IllegalTransition(
                "a decision is already pending".into(),
            ));
        }
        if self
            .config
            .policy_player
            .is_some_and(|p| p != state.current_player)
        {
            return Err(EngineError::IllegalTransition(format!(
                "it is {}'s turn, not the opponent's",
                state.current_player
            )));
        }
        let ticket = DecisionTicket::new(self.generation, self.turn);
        self.pending = Some(PendingDecision {
            ticket,
            think_remaining: think_secs,
        });
        Ok(ticket)
    }

    /// Apply the decision for an open ticket. Stale tickets, early answers,
    /// and illegal moves are refused and the decision stays pending.
    pub fn apply_decision(
        &mut self,
        ticket: DecisionTicket,
        decision: OpponentDecision,
    ) -> EngineResult<Vec<GameEvent>> {
        let state = self.guard(Caller::Policy)?;
        let pending = match self.pending {
            Some(p) if p.ticket == ticket => p,
            _ => {
                return Err(EngineError::IllegalTransition(
                    "stale or unknown decision ticket".into(),
                ));
            }
        };
        if !pending.is_ready() {
            return Err(EngineError::IllegalTransition(format!(
                "the opponent is still thinking ({}s left)",
                pending.think_remaining
            )));
        }

        let selection = match decision {
            OpponentDecision::Skip => {
                self.pending = None;
                return self.pass_turn(PassReason::Skipped);
            }
            OpponentDecision::Strength { attacker, target } => Selection::from_tokens(
                AttackType::Strength,
                vec![ExprToken::Die(attacker)],
                Some(target),
            )?,
            OpponentDecision::Mind { tokens, target } => {
                Selection::from_tokens(AttackType::Mind, tokens, Some(target))?
            }
        };
        rules::check_selection(state, &selection)?;

        self.pending = None;
        self.live_mut()?.selection = selection;
        self.commit()
    }

    /// Run one full policy turn with no think delay.
    pub fn play_policy_turn<P>(&mut self, policy: &mut P) -> EngineResult<Vec<GameEvent>>
    where
        P: OpponentPolicy + ?Sized,
    {
        let ticket = self.begin_opponent_turn(0)?;
        let decision = policy.decide(self.current()?);
        let result = self.apply_decision(ticket, decision);
        if result.is_err() {
            self.pending = None;
        }
        result
    }

    // -- Internals --

    fn current(&self) -> EngineResult<&GameState> {
        self.state.as_ref().ok_or(EngineError::NoActiveGame)
    }

    fn live_mut(&mut self) -> EngineResult<&mut GameState> {
        self.state.as_mut().ok_or(EngineError::NoActiveGame)
    }

    fn guard(&self, caller: Caller) -> EngineResult<&GameState> {
        let state = self.current()?;
        if state.is_over() {
            return Err(EngineError::IllegalTransition("the game is over".into()));
        }
        if caller == Caller::Input {
            if self.pending.is_some() {
                return Err(EngineError::IllegalTransition(
                    "waiting for the opponent's decision".into(),
                ));
            }
            if self.config.policy_player == Some(state.current_player) {
                return Err(EngineError::IllegalTransition(format!(
                    "{} is played by the opponent policy",
                    state.current_player
                )));
            }
        }
        Ok(state)
    }

    fn commit(&mut self) -> EngineResult<Vec<GameEvent>> {
        let state = self.current()?;
        let plan = plan_attack(state)?;
        let player = state.current_player;
        let opponent = player.opponent();
        let snapshot = state.clone();
        self.undo.store(snapshot, self.tally.clone(), player);

        let Some(state) = self.state.as_mut() else {
            return Err(EngineError::NoActiveGame);
        };
        state.pool_mut(opponent).capture(plan.target);
        for id in &plan.attackers {
            state
                .pool_mut(player)
                .reroll(*id, self.config.roll_bias, &mut self.rng);
        }
        state.move_count += 1;
        self.tally
            .record_capture(player, plan.attack, plan.attackers.len());

        let mut events = vec![GameEvent::new(
            state.move_count,
            GameEventKind::AttackCommitted {
                player,
                attack: plan.attack,
                captured: plan.target,
                text: plan.text.clone(),
            },
            format!(
                "{player} captured {} by {} ({})",
                plan.target, plan.attack, plan.text
            ),
        )];

        if state.pool(opponent).is_eliminated() {
            state.outcome = Some(Outcome {
                winner: player,
                cause: GameOverCause::Elimination,
            });
            state.selection.clear();
            self.pending = None;
            events.push(GameEvent::new(
                state.move_count,
                GameEventKind::GameOver {
                    winner: player,
                    cause: GameOverCause::Elimination,
                },
                format!("{player} wins by capturing every die"),
            ));
        } else {
            state.pass_to_opponent();
            self.turn += 1;
        }
        Ok(self.log(events))
    }

    fn pass_turn(&mut self, reason: PassReason) -> EngineResult<Vec<GameEvent>> {
        let Some(state) = self.state.as_mut() else {
            return Err(EngineError::NoActiveGame);
        };
        let player = state.current_player;
        state.move_count += 1;
        state.pass_to_opponent();
        self.turn += 1;
        let discarded = self.pending.take().is_some();
        self.tally.record_skip(player);

        let mut events = Vec::new();
        if discarded {
            events.push(GameEvent::new(
                state.move_count,
                GameEventKind::DecisionDiscarded { player },
                format!("{player}'s pending decision was discarded"),
            ));
        }

        let (kind, description) = match reason {
            PassReason::Skipped => (
                GameEventKind::TurnSkipped { player },
                format!("{player} skipped"),
            ),
            PassReason::TimedOut => (
                GameEventKind::TurnTimedOut { player },
                format!("{player} ran out of time"),
            ),
        };
        events.push(GameEvent::new(state.move_count, kind, description));
        Ok(self.log(events))
    }

    fn end_by_clock(&mut self) -> EngineResult<Vec<GameEvent>> {
        let Some(state) = self.state.as_mut() else {
            return Err(EngineError::NoActiveGame);
        };
        let winner = rules::tie_break(state);
        state.outcome = Some(Outcome {
            winner,
            cause: GameOverCause::Clock,
        });
        state.selection.clear();

        let mut events = Vec::new();
        if self.pending.take().is_some() {
            events.push(GameEvent::new(
                state.move_count,
                GameEventKind::DecisionDiscarded {
                    player: state.current_player,
                },
                format!("{}'s pending decision was discarded", state.current_player),
            ));
        }
        let one = state.pool(Player::One).active_count();
        let two = state.pool(Player::Two).active_count();
        events.push(GameEvent::new(
            state.move_count,
            GameEventKind::GameOver {
                winner,
                cause: GameOverCause::Clock,
            },
            format!("time is up with {one} dice to {two}, {winner} wins the tie-break"),
        ));
        Ok(self.log(events))
    }

    fn log(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for event in &events {
            self.events.push(event.clone());
        }
        events
    }
}

/// Check the selection and describe the attack it would make.
fn plan_attack(state: &GameState) -> EngineResult<AttackPlan> {
    let selection = &state.selection;
    rules::check_selection(state, selection)?;
    let target = selection
        .target()
        .ok_or_else(|| EngineError::IllegalSelection("no target chosen".into()))?;
    let target_value = state.die(target).map_or(0, |d| d.value);
    let attackers: Vec<DieId> = selection.selected().collect();

    let text = match selection.attack_type() {
        AttackType::Strength => {
            let value = attackers
                .first()
                .and_then(|id| state.die(*id))
                .map_or(0, |d| d.value);
            let cmp = if rules::final_capture_penalty(state) {
                ">"
            } else {
                "≥"
            };
            format!("{value} {cmp} {target_value}")
        }
        AttackType::Mind => {
            let symbols = rules::symbols_for(state, selection.tokens())?;
            format!("{} = {target_value}", expression::render(&symbols))
        }
    };

    Ok(AttackPlan {
        attack: selection.attack_type(),
        attackers,
        target,
        text,
    })
}
