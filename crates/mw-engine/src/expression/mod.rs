//! Arithmetic over die values.
//!
//! A mind attack is written as a sequence of [`ExprToken`]s that refer to
//! dice. Before evaluation the dice are replaced by their faces, giving a
//! stream of [`Symbol`]s that [`evaluate`] reduces to an integer. Only the
//! four binary operators and parentheses exist; there is no unary minus.

pub mod notation;
mod parser;
mod ratio;

use serde::{Deserialize, Serialize};

use crate::dice::DieId;
use crate::error::ExprError;
use ratio::Ratio;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division (exact, not truncating).
    Div,
}

impl Op {
    /// Parse an operator from its ASCII or typographic symbol.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.trim() {
            "+" => Some(Self::Add),
            "-" | "−" => Some(Self::Sub),
            "*" | "×" | "x" => Some(Self::Mul),
            "/" | "÷" => Some(Self::Div),
            _ => None,
        }
    }

    /// True for `*` and `/`, which bind tighter than `+` and `-`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Mul | Self::Div)
    }

    /// Apply the operator exactly. `None` on division by zero.
    pub(crate) fn apply(self, lhs: Ratio, rhs: Ratio) -> Option<Ratio> {
        match self {
            Self::Add => lhs.add(rhs),
            Self::Sub => lhs.sub(rhs),
            Self::Mul => lhs.mul(rhs),
            Self::Div => lhs.div(rhs),
        }
    }

    /// The symbol shown to players.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "−",
            Self::Mul => "×",
            Self::Div => "÷",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// An opening or closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Paren {
    /// `(`
    Open,
    /// `)`
    Close,
}

/// One token of a mind-attack expression, bound to the attacker's dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprToken {
    /// The current face of a selected die.
    Die(DieId),
    /// A binary operator.
    Op(Op),
    /// A parenthesis.
    Paren(Paren),
}

/// One token of a numeric expression, ready for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A literal value.
    Value(u32),
    /// A binary operator.
    Op(Op),
    /// `(`
    Open,
    /// `)`
    Close,
}

impl From<Paren> for Symbol {
    fn from(p: Paren) -> Self {
        match p {
            Paren::Open => Symbol::Open,
            Paren::Close => Symbol::Close,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Op(op) => write!(f, "{op}"),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
        }
    }
}

/// Evaluate a numeric expression to an exact integer.
///
/// Rejects an empty stream, a trailing operator, mismatched parenthesis
/// counts, any stream the grammar cannot parse (such as `) (`), and results
/// that are undefined or not integral. Arithmetic is exact over the
/// rationals with the usual precedence; nothing is rounded.
pub fn evaluate(symbols: &[Symbol]) -> Result<i64, ExprError> {
    let Some(last) = symbols.last() else {
        return Err(ExprError::Empty);
    };
    if matches!(last, Symbol::Op(_)) {
        return Err(ExprError::TrailingOperator);
    }
    let open = symbols.iter().filter(|s| **s == Symbol::Open).count();
    let close = symbols.iter().filter(|s| **s == Symbol::Close).count();
    if open != close {
        return Err(ExprError::UnbalancedParens { open, close });
    }

    let value = parser::parse(symbols)?.ok_or(ExprError::NonFinite)?;
    if !value.is_integer() {
        return Err(ExprError::NotIntegral {
            numer: value.numer(),
            denom: value.denom(),
        });
    }
    i64::try_from(value.numer()).map_err(|_| ExprError::NonFinite)
}

/// Render symbols the way players see them, e.g. `(2 + 3) × 4`.
pub fn render(symbols: &[Symbol]) -> String {
    let mut out = String::new();
    for symbol in symbols {
        match symbol {
            Symbol::Op(op) => {
                out.push(' ');
                out.push_str(op.glyph());
                out.push(' ');
            }
            other => out.push_str(&other.to_string()),
        }
    }
    out
}
