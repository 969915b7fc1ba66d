//! The attack a player is putting together.
//!
//! Selected dice and the expression are one ordered token list: the dice
//! selected are exactly the die tokens, in expression order. A strength
//! attack holds a single die token and nothing else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::DieId;
use crate::error::{EngineError, EngineResult, ExprError};
use crate::expression::{ExprToken, Op, Paren};

/// How a capture is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackType {
    /// Compare one die directly against the target.
    #[default]
    Strength,
    /// Build an expression from two or more dice that equals the target.
    Mind,
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => f.write_str("strength"),
            Self::Mind => f.write_str("mind"),
        }
    }
}

/// The in-progress attack: mode, ordered tokens, and target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    attack_type: AttackType,
    tokens: Vec<ExprToken>,
    target: Option<DieId>,
}

impl Selection {
    /// An empty strength selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from a complete token list supplied at once.
    ///
    /// Every token must be placeable by the incremental rules, with no
    /// implicit `+` and no operator replacement, so `) (` and `d4 d6` are
    /// both refused. All dice must come from one pool and appear once.
    pub fn from_tokens(
        attack_type: AttackType,
        tokens: Vec<ExprToken>,
        target: Option<DieId>,
    ) -> EngineResult<Self> {
        let mut selection = Self {
            attack_type,
            tokens: Vec::with_capacity(tokens.len()),
            target,
        };
        match attack_type {
            AttackType::Strength => match tokens.as_slice() {
                [ExprToken::Die(id)] => selection.tokens.push(ExprToken::Die(*id)),
                _ => {
                    return Err(EngineError::IllegalSelection(
                        "a strength attack uses exactly one die".into(),
                    ));
                }
            },
            AttackType::Mind => {
                for token in tokens {
                    selection.push_strict(token)?;
                }
            }
        }
        Ok(selection)
    }

    /// Current attack mode.
    pub fn attack_type(&self) -> AttackType {
        self.attack_type
    }

    /// The ordered tokens, dice included.
    pub fn tokens(&self) -> &[ExprToken] {
        &self.tokens
    }

    /// The targeted opponent die, if one is set.
    pub fn target(&self) -> Option<DieId> {
        self.target
    }

    /// Selected dice in expression order.
    pub fn selected(&self) -> impl Iterator<Item = DieId> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            ExprToken::Die(id) => Some(*id),
            _ => None,
        })
    }

    /// Number of selected dice.
    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Whether `id` is among the selected dice.
    pub fn contains(&self, id: DieId) -> bool {
        self.tokens.contains(&ExprToken::Die(id))
    }

    /// True when nothing is selected or targeted.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.target.is_none()
    }

    /// Change mode. Strength to mind with one die selected keeps that die as
    /// the first token; any other change drops the tokens. The target is
    /// kept. Returns `false` if already in that mode.
    pub(crate) fn switch_type(&mut self, attack_type: AttackType) -> bool {
        if self.attack_type == attack_type {
            return false;
        }
        let carry = self.attack_type == AttackType::Strength
            && attack_type == AttackType::Mind
            && self.selected_count() == 1;
        self.attack_type = attack_type;
        if !carry {
            self.tokens.clear();
        }
        true
    }

    /// Select or deselect one of the acting player's dice.
    pub(crate) fn toggle(&mut self, id: DieId) {
        match self.attack_type {
            AttackType::Strength => {
                self.tokens.clear();
                self.tokens.push(ExprToken::Die(id));
            }
            AttackType::Mind if self.contains(id) => self.remove_die(id),
            AttackType::Mind => {
                if matches!(self.tokens.last(), Some(ExprToken::Die(_))) {
                    self.tokens.push(ExprToken::Op(Op::Add));
                }
                self.tokens.push(ExprToken::Die(id));
            }
        }
    }

    pub(crate) fn set_target(&mut self, id: DieId) {
        self.target = Some(id);
    }

    /// Append an operator, replacing a trailing one.
    pub(crate) fn push_operator(&mut self, op: Op) -> EngineResult<()> {
        self.require_mind("operators")?;
        match self.tokens.last_mut() {
            Some(ExprToken::Op(last)) => *last = op,
            Some(ExprToken::Die(_)) | Some(ExprToken::Paren(Paren::Close)) => {
                self.tokens.push(ExprToken::Op(op));
            }
            None | Some(ExprToken::Paren(Paren::Open)) => {
                return Err(misplaced("an operator must follow a die or ')'"));
            }
        }
        Ok(())
    }

    /// Append a parenthesis where it keeps the expression well formed.
    pub(crate) fn push_paren(&mut self, paren: Paren) -> EngineResult<()> {
        self.require_mind("parentheses")?;
        let last = self.tokens.last();
        match paren {
            Paren::Open => {
                if !matches!(
                    last,
                    None | Some(ExprToken::Op(_)) | Some(ExprToken::Paren(Paren::Open))
                ) {
                    return Err(misplaced(
                        "'(' must start the expression or follow an operator or '('",
                    ));
                }
            }
            Paren::Close => {
                if !self.ends_with_operand() {
                    return Err(misplaced("')' must follow a die or ')'"));
                }
                let (open, close) = self.paren_counts();
                if open <= close {
                    return Err(misplaced("')' has no matching '('"));
                }
            }
        }
        self.tokens.push(ExprToken::Paren(paren));
        Ok(())
    }

    /// Remove and return the last token.
    pub(crate) fn pop_token(&mut self) -> Option<ExprToken> {
        self.tokens.pop()
    }

    /// Back to an empty strength selection.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    fn push_strict(&mut self, token: ExprToken) -> EngineResult<()> {
        match token {
            ExprToken::Die(id) => {
                if self.contains(id) {
                    return Err(EngineError::IllegalSelection(format!("{id} is used twice")));
                }
                if self.selected().next().is_some_and(|first| first.owner != id.owner) {
                    return Err(EngineError::IllegalSelection(
                        "dice must all come from one pool".into(),
                    ));
                }
                if self.ends_with_operand() {
                    return Err(misplaced("a die must follow an operator or '('"));
                }
                self.tokens.push(token);
                Ok(())
            }
            ExprToken::Op(op) => {
                if !self.ends_with_operand() {
                    return Err(misplaced("an operator must follow a die or ')'"));
                }
                self.tokens.push(ExprToken::Op(op));
                Ok(())
            }
            ExprToken::Paren(paren) => self.push_paren(paren),
        }
    }

    fn remove_die(&mut self, id: DieId) {
        let Some(i) = self.tokens.iter().position(|t| *t == ExprToken::Die(id)) else {
            return;
        };
        if i > 0 && matches!(self.tokens[i - 1], ExprToken::Op(_)) {
            self.tokens.drain(i - 1..=i);
        } else {
            self.tokens.remove(i);
            if matches!(self.tokens.get(i), Some(ExprToken::Op(_))) {
                self.tokens.remove(i);
            }
        }
    }

    fn ends_with_operand(&self) -> bool {
        matches!(
            self.tokens.last(),
            Some(ExprToken::Die(_)) | Some(ExprToken::Paren(Paren::Close))
        )
    }

    fn paren_counts(&self) -> (usize, usize) {
        let count = |p: Paren| {
            self.tokens
                .iter()
                .filter(|t| **t == ExprToken::Paren(p))
                .count()
        };
        (count(Paren::Open), count(Paren::Close))
    }

    fn require_mind(&self, what: &str) -> EngineResult<()> {
        match self.attack_type {
            AttackType::Mind => Ok(()),
            AttackType::Strength => Err(EngineError::IllegalTransition(format!(
                "{what} are only used in mind attacks"
            ))),
        }
    }
}

fn misplaced(message: &str) -> EngineError {
    EngineError::IllegalExpression(ExprError::Malformed(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{Player, Sides};

    fn die(sides: Sides) -> DieId {
        DieId::new(Player::One, sides)
    }

    fn mind() -> Selection {
        let mut s = Selection::new();
        s.switch_type(AttackType::Mind);
        s
    }

    #[test]
    fn strength_toggle_replaces_the_single_die() {
        let mut s = Selection::new();
        s.toggle(die(Sides::D4));
        s.toggle(die(Sides::D6));
        assert_eq!(s.selected().collect::<Vec<_>>(), vec![die(Sides::D6)]);
        assert_eq!(s.tokens().len(), 1);
    }

    #[test]
    fn switching_to_mind_carries_a_single_die() {
        let mut s = Selection::new();
        s.toggle(die(Sides::D8));
        s.set_target(DieId::new(Player::Two, Sides::D4));
        assert!(s.switch_type(AttackType::Mind));
        assert_eq!(s.tokens(), &[ExprToken::Die(die(Sides::D8))]);
        assert!(s.target().is_some());
    }

    #[test]
    fn switching_back_to_strength_clears_tokens() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.toggle(die(Sides::D6));
        assert!(s.switch_type(AttackType::Strength));
        assert!(s.tokens().is_empty());
        assert!(!s.switch_type(AttackType::Strength));
    }

    #[test]
    fn mind_toggle_inserts_implicit_plus() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.toggle(die(Sides::D6));
        assert_eq!(
            s.tokens(),
            &[
                ExprToken::Die(die(Sides::D4)),
                ExprToken::Op(Op::Add),
                ExprToken::Die(die(Sides::D6)),
            ]
        );
    }

    #[test]
    fn deselect_removes_preceding_operator() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.push_operator(Op::Mul).unwrap();
        s.toggle(die(Sides::D6));
        s.toggle(die(Sides::D6));
        assert_eq!(s.tokens(), &[ExprToken::Die(die(Sides::D4))]);
    }

    #[test]
    fn deselect_first_die_removes_following_operator() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.toggle(die(Sides::D6));
        s.toggle(die(Sides::D4));
        assert_eq!(s.tokens(), &[ExprToken::Die(die(Sides::D6))]);
    }

    #[test]
    fn operator_replaces_trailing_operator() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.push_operator(Op::Add).unwrap();
        s.push_operator(Op::Div).unwrap();
        assert_eq!(s.tokens().last(), Some(&ExprToken::Op(Op::Div)));
        assert_eq!(s.tokens().len(), 2);
    }

    #[test]
    fn operator_rejected_at_start_or_after_open_paren() {
        let mut s = mind();
        assert!(s.push_operator(Op::Add).is_err());
        s.push_paren(Paren::Open).unwrap();
        assert!(s.push_operator(Op::Add).is_err());
    }

    #[test]
    fn operators_need_mind_mode() {
        let mut s = Selection::new();
        s.toggle(die(Sides::D4));
        assert!(matches!(
            s.push_operator(Op::Add),
            Err(EngineError::IllegalTransition(_))
        ));
        assert!(s.push_paren(Paren::Open).is_err());
    }

    #[test]
    fn paren_placement_rules() {
        let mut s = mind();
        assert!(s.push_paren(Paren::Close).is_err());
        s.push_paren(Paren::Open).unwrap();
        s.push_paren(Paren::Open).unwrap();
        s.toggle(die(Sides::D4));
        assert!(s.push_paren(Paren::Open).is_err());
        s.push_paren(Paren::Close).unwrap();
        s.push_paren(Paren::Close).unwrap();
        // no open paren left to close
        assert!(s.push_paren(Paren::Close).is_err());
    }

    #[test]
    fn pop_token_drops_die_from_selection() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.toggle(die(Sides::D6));
        assert_eq!(s.pop_token(), Some(ExprToken::Die(die(Sides::D6))));
        assert!(!s.contains(die(Sides::D6)));
        assert_eq!(s.selected_count(), 1);
    }

    #[test]
    fn clear_returns_to_strength() {
        let mut s = mind();
        s.toggle(die(Sides::D4));
        s.set_target(DieId::new(Player::Two, Sides::D4));
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.attack_type(), AttackType::Strength);
    }

    #[test]
    fn from_tokens_accepts_well_formed_mind_attack() {
        let tokens = vec![
            ExprToken::Paren(Paren::Open),
            ExprToken::Die(die(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(die(Sides::D6)),
            ExprToken::Paren(Paren::Close),
            ExprToken::Op(Op::Mul),
            ExprToken::Die(die(Sides::D8)),
        ];
        let s = Selection::from_tokens(AttackType::Mind, tokens.clone(), None).unwrap();
        assert_eq!(s.tokens(), tokens.as_slice());
        assert_eq!(s.selected_count(), 3);
    }

    #[test]
    fn from_tokens_rejects_misplaced_parens() {
        let tokens = vec![
            ExprToken::Die(die(Sides::D4)),
            ExprToken::Paren(Paren::Close),
            ExprToken::Op(Op::Add),
            ExprToken::Paren(Paren::Open),
            ExprToken::Die(die(Sides::D6)),
        ];
        assert!(matches!(
            Selection::from_tokens(AttackType::Mind, tokens, None),
            Err(EngineError::IllegalExpression(ExprError::Malformed(_)))
        ));
    }

    #[test]
    fn from_tokens_rejects_repeats_and_mixed_pools() {
        let repeated = vec![
            ExprToken::Die(die(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(die(Sides::D4)),
        ];
        assert!(matches!(
            Selection::from_tokens(AttackType::Mind, repeated, None),
            Err(EngineError::IllegalSelection(_))
        ));
        let mixed = vec![
            ExprToken::Die(die(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(DieId::new(Player::Two, Sides::D6)),
        ];
        assert!(Selection::from_tokens(AttackType::Mind, mixed, None).is_err());
    }

    #[test]
    fn from_tokens_strength_needs_one_die() {
        assert!(
            Selection::from_tokens(AttackType::Strength, vec![ExprToken::Die(die(Sides::D4))], None)
                .is_ok()
        );
        assert!(Selection::from_tokens(AttackType::Strength, vec![], None).is_err());
    }
}
