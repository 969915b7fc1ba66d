//! Rule engine for Mindwar, a two-player dice-capture game.
//!
//! Each side owns one d4, d6, d8, d10, d12 and d20. On their turn a player
//! captures an opposing die either by **strength** (one of their dice shows
//! at least the target's value) or by **mind** (an arithmetic expression
//! over two or more of their dice equals the target's value exactly). The
//! attacking dice are then re-rolled. Whoever captures all six opposing
//! dice wins; if the game clock runs out first, a tie-break decides.
//!
//! The engine renders nothing and owns no wall clock. A surrounding system
//! forwards player input to a [`Session`], calls [`Session::tick`] once per
//! elapsed second, and relays decisions from an external opponent policy.

pub mod config;
pub mod dice;
pub mod error;
pub mod event;
pub mod expression;
pub mod policy;
pub mod rules;
pub mod selection;
pub mod session;
pub mod state;
pub mod tally;
pub mod timer;
pub mod undo;

pub use config::{DiceSort, GameConfig};
pub use dice::{Die, DieId, Player, Pool, Sides};
pub use error::{EngineError, EngineResult, ExprError};
pub use event::{EventLog, GameEvent, GameEventKind};
pub use expression::{ExprToken, Op, Paren, Symbol, evaluate};
pub use policy::{DecisionTicket, OpponentDecision, OpponentPolicy};
pub use selection::{AttackType, Selection};
pub use session::{AttackPlan, Session, TickReport, TimeoutKind};
pub use state::{GameOverCause, GameState, Outcome};
pub use tally::GameTally;
pub use timer::{Countdown, DualTimer};
