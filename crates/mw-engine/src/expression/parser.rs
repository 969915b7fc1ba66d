use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ratio::Ratio;
use super::{Op, Symbol};
use crate::error::ExprError;

type Span = SimpleSpan;

/// Value of a (sub)expression; `None` once a division by zero occurred.
type Value = Option<Ratio>;

/// Build the arithmetic parser: sums of products of atoms, where an atom is
/// a literal or a parenthesized expression.
fn expression_parser<'a, I>() -> impl Parser<'a, I, Value, extra::Err<Rich<'a, Symbol>>> + Clone
where
    I: ValueInput<'a, Token = Symbol, Span = Span>,
{
    recursive(|expr| {
        let literal = select! { Symbol::Value(v) => Some(Ratio::integer(v)) }.labelled("value");
        let atom = literal.or(expr.delimited_by(just(Symbol::Open), just(Symbol::Close)));

        let mul_op =
            select! { Symbol::Op(op) if op.is_multiplicative() => op }.labelled("operator");
        let add_op =
            select! { Symbol::Op(op) if !op.is_multiplicative() => op }.labelled("operator");

        let product = atom.clone().foldl(mul_op.then(atom).repeated(), combine);

        product.clone().foldl(add_op.then(product).repeated(), combine)
    })
}

fn combine(lhs: Value, (op, rhs): (Op, Value)) -> Value {
    op.apply(lhs?, rhs?)
}

/// Parse and reduce a symbol stream. Spans are symbol indices.
pub(super) fn parse(symbols: &[Symbol]) -> Result<Value, ExprError> {
    let token_iter = symbols
        .iter()
        .enumerate()
        .map(|(i, sym)| (*sym, Span::from(i..i + 1)));

    let eoi: Span = (symbols.len()..symbols.len()).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    expression_parser()
        .then_ignore(end())
        .parse(stream)
        .into_result()
        .map_err(|errors| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| format!("{} at token {}", e, e.span().start))
                .collect();
            ExprError::Malformed(messages.join("; "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_groups() {
        // ((3))
        let symbols = [
            Symbol::Open,
            Symbol::Open,
            Symbol::Value(3),
            Symbol::Close,
            Symbol::Close,
        ];
        let value = parse(&symbols).unwrap().unwrap();
        assert_eq!(value, Ratio::integer(3));
    }

    #[test]
    fn empty_group_is_malformed() {
        let symbols = [Symbol::Open, Symbol::Close];
        assert!(matches!(parse(&symbols), Err(ExprError::Malformed(_))));
    }

    #[test]
    fn error_mentions_position() {
        let symbols = [Symbol::Value(1), Symbol::Value(2)];
        let Err(ExprError::Malformed(msg)) = parse(&symbols) else {
            panic!("expected a parse error");
        };
        assert!(msg.contains("at token 1"), "{msg}");
    }

    #[test]
    fn division_by_zero_propagates_as_undefined() {
        // 1 / (2 - 2) + 5
        let symbols = [
            Symbol::Value(1),
            Symbol::Op(Op::Div),
            Symbol::Open,
            Symbol::Value(2),
            Symbol::Op(Op::Sub),
            Symbol::Value(2),
            Symbol::Close,
            Symbol::Op(Op::Add),
            Symbol::Value(5),
        ];
        assert_eq!(parse(&symbols).unwrap(), None);
    }
}
