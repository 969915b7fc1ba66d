//! Error types for the rule engine.
//!
//! Every rejection is local: a mutator that returns an error has left the
//! session untouched, so callers can simply re-query state and try again.

/// Reasons an arithmetic expression is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    /// The expression has no tokens.
    #[error("expression is empty")]
    Empty,

    /// The expression ends with an operator.
    #[error("expression ends with an operator")]
    TrailingOperator,

    /// Opening and closing parentheses do not pair up.
    #[error("unbalanced parentheses: {open} opening, {close} closing")]
    UnbalancedParens {
        /// Number of `(` tokens.
        open: usize,
        /// Number of `)` tokens.
        close: usize,
    },

    /// The token stream is not a well-formed arithmetic expression.
    #[error("malformed expression: {0}")]
    Malformed(String),

    /// The expression evaluates to a value with a fractional part.
    #[error("result {numer}/{denom} is not an integer")]
    NotIntegral {
        /// Numerator of the reduced result.
        numer: i128,
        /// Denominator of the reduced result.
        denom: i128,
    },

    /// The expression divides by zero.
    #[error("result is not a finite number")]
    NonFinite,

    /// The expression is valid but does not equal the target's face.
    #[error("expression gives {value}, target shows {target}")]
    Mismatch {
        /// What the expression evaluated to.
        value: i64,
        /// The target die's face.
        target: u32,
    },

    /// Textual notation could not be turned into tokens.
    #[error("invalid notation: {0}")]
    Notation(String),
}

/// Errors that can occur while driving a game session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A die was selected or targeted that the caller may not use.
    #[error("illegal selection: {0}")]
    IllegalSelection(String),

    /// The attack expression is malformed or does not hit the target.
    #[error("illegal expression: {0}")]
    IllegalExpression(#[from] ExprError),

    /// The operation is not allowed in the current phase of the game.
    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    /// There is no retained snapshot that may be restored right now.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The session has been torn down or never started a game.
    #[error("no active game")]
    NoActiveGame,

    /// A game configuration could not be loaded.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_error_messages() {
        assert_eq!(ExprError::Empty.to_string(), "expression is empty");
        assert_eq!(
            ExprError::UnbalancedParens { open: 2, close: 1 }.to_string(),
            "unbalanced parentheses: 2 opening, 1 closing"
        );
        assert_eq!(
            ExprError::NotIntegral { numer: 5, denom: 2 }.to_string(),
            "result 5/2 is not an integer"
        );
    }

    #[test]
    fn expr_error_converts_into_engine_error() {
        let err: EngineError = ExprError::TrailingOperator.into();
        assert!(matches!(
            err,
            EngineError::IllegalExpression(ExprError::TrailingOperator)
        ));
        assert_eq!(
            err.to_string(),
            "illegal expression: expression ends with an operator"
        );
    }
}
