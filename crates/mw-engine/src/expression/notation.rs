//! Text notation for expressions.
//!
//! Attacks are written against the acting player's dice, e.g.
//! `d4 + (d6 × d8)`. Plain numbers such as `(2 + 3) * 4` are accepted for
//! numeric evaluation only. Both ASCII and typographic operators lex.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use logos::Logos;

use super::{ExprToken, Op, Paren, Symbol, evaluate};
use crate::dice::{DieId, Player, Sides};
use crate::error::ExprError;

/// A lexed notation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationToken {
    /// A die named by face-count, e.g. `d6`.
    Die(Sides),
    /// A numeric literal.
    Number(u32),
    /// A binary operator.
    Op(Op),
    /// `(`
    Open,
    /// `)`
    Close,
}

/// A token together with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token.
    pub token: NotationToken,
    /// Byte range in the source text.
    pub span: Range<usize>,
}

/// A problem found in notation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationError {
    /// Byte range the problem refers to.
    pub span: Range<usize>,
    /// Human-readable description.
    pub message: String,
}

impl NotationError {
    fn new(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("+")]
    Plus,

    #[token("-")]
    #[token("−")]
    Minus,

    #[token("*")]
    #[token("×")]
    Times,

    #[token("/")]
    #[token("÷")]
    Divide,

    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[regex(r"[dD][0-9]+")]
    Die,

    #[regex(r"[0-9]+")]
    Number,
}

/// Lex notation text into spanned tokens.
///
/// All lexing errors are collected rather than stopping at the first one.
pub fn lex(source: &str) -> Result<Vec<Spanned>, Vec<NotationError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let token = match result {
            Ok(RawToken::Plus) => NotationToken::Op(Op::Add),
            Ok(RawToken::Minus) => NotationToken::Op(Op::Sub),
            Ok(RawToken::Times) => NotationToken::Op(Op::Mul),
            Ok(RawToken::Divide) => NotationToken::Op(Op::Div),
            Ok(RawToken::Open) => NotationToken::Open,
            Ok(RawToken::Close) => NotationToken::Close,
            Ok(RawToken::Die) => match Sides::from_str_tag(slice) {
                Some(sides) => NotationToken::Die(sides),
                None => {
                    errors.push(NotationError::new(span, format!("there is no {slice} die")));
                    continue;
                }
            },
            Ok(RawToken::Number) => match slice.parse::<u32>() {
                Ok(n) => NotationToken::Number(n),
                Err(_) => {
                    errors.push(NotationError::new(span, "number is too large"));
                    continue;
                }
            },
            Err(()) => {
                errors.push(NotationError::new(
                    span,
                    format!("unexpected character '{slice}'"),
                ));
                continue;
            }
        };
        tokens.push(Spanned { token, span });
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Bind lexed tokens to `owner`'s dice. Numbers are rejected: an attack
/// may only use dice.
pub fn to_expr_tokens(
    tokens: &[Spanned],
    owner: Player,
) -> Result<Vec<ExprToken>, Vec<NotationError>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut errors = Vec::new();
    for Spanned { token, span } in tokens {
        match token {
            NotationToken::Die(sides) => out.push(ExprToken::Die(DieId::new(owner, *sides))),
            NotationToken::Op(op) => out.push(ExprToken::Op(*op)),
            NotationToken::Open => out.push(ExprToken::Paren(Paren::Open)),
            NotationToken::Close => out.push(ExprToken::Paren(Paren::Close)),
            NotationToken::Number(_) => errors.push(NotationError::new(
                span.clone(),
                "attacks use dice, not numbers (try d6)",
            )),
        }
    }
    if errors.is_empty() { Ok(out) } else { Err(errors) }
}

/// Convert lexed tokens into numeric symbols. Dice are rejected since there
/// is no board to read their faces from.
pub fn to_symbols(tokens: &[Spanned]) -> Result<Vec<Symbol>, Vec<NotationError>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut errors = Vec::new();
    for Spanned { token, span } in tokens {
        match token {
            NotationToken::Number(n) => out.push(Symbol::Value(*n)),
            NotationToken::Op(op) => out.push(Symbol::Op(*op)),
            NotationToken::Open => out.push(Symbol::Open),
            NotationToken::Close => out.push(Symbol::Close),
            NotationToken::Die(sides) => errors.push(NotationError::new(
                span.clone(),
                format!("{sides} has no value outside a game"),
            )),
        }
    }
    if errors.is_empty() { Ok(out) } else { Err(errors) }
}

/// Parse an attack written against `owner`'s dice.
pub fn parse_attack(source: &str, owner: Player) -> Result<Vec<ExprToken>, ExprError> {
    lex(source)
        .and_then(|tokens| to_expr_tokens(&tokens, owner))
        .map_err(|errors| ExprError::Notation(join_messages(&errors)))
}

/// Evaluate a purely numeric expression, reporting problems with spans.
pub fn evaluate_source(source: &str) -> Result<i64, Vec<NotationError>> {
    let tokens = lex(source)?;
    let symbols = to_symbols(&tokens)?;
    evaluate(&symbols).map_err(|err| {
        let span = match err {
            ExprError::TrailingOperator => tokens
                .last()
                .map_or(0..source.len(), |t| t.span.clone()),
            _ => 0..source.len(),
        };
        vec![NotationError::new(span, err.to_string())]
    })
}

/// Render notation errors using ariadne for terminal output.
pub fn render_errors(source: &str, filename: &str, errors: &[NotationError]) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = (filename, error.span.clone());
        Report::build(ReportKind::Error, span.clone())
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(&error.message)
            .with_label(
                Label::new(span)
                    .with_message(&error.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

fn join_messages(errors: &[NotationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
