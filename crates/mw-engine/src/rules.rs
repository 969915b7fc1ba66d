//! Capture legality, turn order, and the clock tie-break.
//!
//! Every check here is a pure function of a [`GameState`] and is made on
//! behalf of the player whose turn it is.

use std::cmp::Ordering;

use crate::dice::{Die, DieId, Player, Pool};
use crate::error::{EngineError, EngineResult, ExprError};
use crate::expression::{self, ExprToken, Symbol};
use crate::selection::{AttackType, Selection};
use crate::state::GameState;

/// Decide who moves first by comparing both pools' faces in ascending
/// order. The first lower value moves first; a complete tie gives player 1.
pub fn first_player(one: &Pool, two: &Pool) -> Player {
    let a = one.sorted_values();
    let b = two.sorted_values();
    a.iter()
        .zip(&b)
        .find_map(|(x, y)| match x.cmp(y) {
            Ordering::Less => Some(Player::One),
            Ordering::Greater => Some(Player::Two),
            Ordering::Equal => None,
        })
        .unwrap_or(Player::One)
}

/// Whether the acting player must beat the target strictly: the opponent
/// has one die left and the acting player moved first.
pub fn final_capture_penalty(state: &GameState) -> bool {
    let player = state.current_player;
    player == state.first_player && state.pool(player.opponent()).active_count() == 1
}

/// Compare faces for a strength attack.
pub fn strength_beats(attacker: u32, target: u32, strict: bool) -> bool {
    if strict {
        attacker > target
    } else {
        attacker >= target
    }
}

/// Check a strength attack by the acting player.
pub fn check_strength(state: &GameState, attacker: DieId, target: DieId) -> EngineResult<()> {
    let own = own_die(state, attacker)?;
    let opp = target_die(state, target)?;
    if strength_beats(own.value, opp.value, final_capture_penalty(state)) {
        Ok(())
    } else {
        Err(EngineError::IllegalSelection(format!(
            "{} ({}) does not beat {} ({})",
            attacker, own.value, target, opp.value
        )))
    }
}

/// Replace each die token with its current face.
pub fn symbols_for(state: &GameState, tokens: &[ExprToken]) -> EngineResult<Vec<Symbol>> {
    tokens
        .iter()
        .map(|token| match token {
            ExprToken::Die(id) => state
                .die(*id)
                .map(|d| Symbol::Value(d.value))
                .ok_or_else(|| EngineError::IllegalSelection(format!("no such die {id}"))),
            ExprToken::Op(op) => Ok(Symbol::Op(*op)),
            ExprToken::Paren(p) => Ok(Symbol::from(*p)),
        })
        .collect()
}

/// Check a mind attack by the acting player. Returns the expression's value.
pub fn check_mind(state: &GameState, tokens: &[ExprToken], target: DieId) -> EngineResult<i64> {
    let mut used: Vec<DieId> = Vec::new();
    for token in tokens {
        if let ExprToken::Die(id) = token {
            own_die(state, *id)?;
            if used.contains(id) {
                return Err(EngineError::IllegalSelection(format!(
                    "{id} is used twice in the expression"
                )));
            }
            used.push(*id);
        }
    }
    if used.len() < 2 {
        return Err(EngineError::IllegalSelection(
            "a mind attack needs at least two dice".into(),
        ));
    }
    let opp = target_die(state, target)?;
    let value = expression::evaluate(&symbols_for(state, tokens)?)?;
    if value != i64::from(opp.value) {
        return Err(ExprError::Mismatch {
            value,
            target: opp.value,
        }
        .into());
    }
    Ok(value)
}

/// Check whatever attack `selection` describes.
pub fn check_selection(state: &GameState, selection: &Selection) -> EngineResult<()> {
    let target = selection
        .target()
        .ok_or_else(|| EngineError::IllegalSelection("no target chosen".into()))?;
    match selection.attack_type() {
        AttackType::Strength => {
            let mut dice = selection.selected();
            match (dice.next(), dice.next()) {
                (Some(attacker), None) => check_strength(state, attacker, target),
                _ => Err(EngineError::IllegalSelection(
                    "a strength attack uses exactly one die".into(),
                )),
            }
        }
        AttackType::Mind => check_mind(state, selection.tokens(), target).map(|_| ()),
    }
}

/// Every `(attacker, target)` strength attack open to the acting player.
pub fn legal_strength_attacks(state: &GameState) -> Vec<(DieId, DieId)> {
    let player = state.current_player;
    let mut moves = Vec::new();
    for own in state.pool(player).active() {
        for opp in state.pool(player.opponent()).active() {
            if check_strength(state, own.id, opp.id).is_ok() {
                moves.push((own.id, opp.id));
            }
        }
    }
    moves
}

/// Winner when the game clock runs out: the side with more of its own dice
/// still active. A tie goes against the first player.
pub fn tie_break(state: &GameState) -> Player {
    let one = state.pool(Player::One).active_count();
    let two = state.pool(Player::Two).active_count();
    match one.cmp(&two) {
        Ordering::Greater => Player::One,
        Ordering::Less => Player::Two,
        Ordering::Equal => state.first_player.opponent(),
    }
}

pub(crate) fn own_die(state: &GameState, id: DieId) -> EngineResult<&Die> {
    if id.owner != state.current_player {
        return Err(EngineError::IllegalSelection(format!(
            "{id} does not belong to {}",
            state.current_player
        )));
    }
    active_die(state, id)
}

pub(crate) fn target_die(state: &GameState, id: DieId) -> EngineResult<&Die> {
    if id.owner == state.current_player {
        return Err(EngineError::IllegalSelection(format!(
            "{id} is not an opponent die"
        )));
    }
    active_die(state, id)
}

fn active_die(state: &GameState, id: DieId) -> EngineResult<&Die> {
    match state.die(id) {
        Some(die) if die.is_active() => Ok(die),
        Some(_) => Err(EngineError::IllegalSelection(format!(
            "{id} has been captured"
        ))),
        None => Err(EngineError::IllegalSelection(format!("no such die {id}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Sides;
    use crate::expression::{Op, Paren};
    use crate::timer::DualTimer;
    use proptest::prelude::*;

    fn board(one: [u32; 6], two: [u32; 6], first: Player) -> GameState {
        GameState::new(
            [
                Pool::from_values(Player::One, one).unwrap(),
                Pool::from_values(Player::Two, two).unwrap(),
            ],
            first,
            DualTimer::new(720, 60),
        )
        .unwrap()
    }

    fn p1(sides: Sides) -> DieId {
        DieId::new(Player::One, sides)
    }

    fn p2(sides: Sides) -> DieId {
        DieId::new(Player::Two, sides)
    }

    /// Capture every die of `player` except those listed.
    fn keep_only(state: &mut GameState, player: Player, keep: &[Sides]) {
        for sides in Sides::ALL {
            if !keep.contains(&sides) {
                state.pool_mut(player).capture(DieId::new(player, sides));
            }
        }
    }

    #[test]
    fn first_player_is_the_lower_roll() {
        let one = Pool::from_values(Player::One, [1, 2, 3, 4, 5, 6]).unwrap();
        let two = Pool::from_values(Player::Two, [1, 2, 3, 4, 5, 7]).unwrap();
        assert_eq!(first_player(&one, &two), Player::One);
        assert_eq!(first_player(&two, &one), Player::Two);
    }

    #[test]
    fn first_player_compares_sorted_values() {
        // sorted: [1,2,3,3,4,5] vs [1,2,3,4,4,5]; fourth position decides
        let one = Pool::from_values(Player::One, [3, 5, 1, 4, 2, 3]).unwrap();
        let two = Pool::from_values(Player::Two, [4, 4, 5, 1, 3, 2]).unwrap();
        assert_eq!(first_player(&one, &two), Player::One);
    }

    #[test]
    fn full_tie_gives_player_one() {
        let one = Pool::from_values(Player::One, [2, 2, 2, 2, 2, 2]).unwrap();
        let two = Pool::from_values(Player::Two, [2, 2, 2, 2, 2, 2]).unwrap();
        assert_eq!(first_player(&one, &two), Player::One);
    }

    #[test]
    fn strength_equal_values_capture() {
        // d6=5 against d4=3, and d4=3 against d4=3
        let s = board([3, 5, 1, 1, 1, 1], [3, 1, 1, 1, 1, 1], Player::One);
        assert!(check_strength(&s, p1(Sides::D6), p2(Sides::D4)).is_ok());
        assert!(check_strength(&s, p1(Sides::D4), p2(Sides::D4)).is_ok());
        assert!(check_strength(&s, p1(Sides::D8), p2(Sides::D4)).is_err());
    }

    #[test]
    fn final_capture_penalty_requires_strictly_greater() {
        let mut s = board([3, 5, 1, 1, 1, 1], [3, 1, 1, 1, 1, 1], Player::One);
        keep_only(&mut s, Player::Two, &[Sides::D4]);
        assert!(final_capture_penalty(&s));
        assert!(check_strength(&s, p1(Sides::D4), p2(Sides::D4)).is_err());
        assert!(check_strength(&s, p1(Sides::D6), p2(Sides::D4)).is_ok());
    }

    #[test]
    fn second_player_is_never_penalized() {
        let mut s = board([3, 5, 1, 1, 1, 1], [3, 1, 1, 1, 1, 1], Player::Two);
        s.current_player = Player::One;
        keep_only(&mut s, Player::Two, &[Sides::D4]);
        assert!(!final_capture_penalty(&s));
        assert!(check_strength(&s, p1(Sides::D4), p2(Sides::D4)).is_ok());
    }

    #[test]
    fn strength_rejects_wrong_owner_and_captured_dice() {
        let mut s = board([3, 5, 1, 1, 1, 1], [3, 1, 1, 1, 1, 1], Player::One);
        assert!(check_strength(&s, p2(Sides::D6), p2(Sides::D4)).is_err());
        assert!(check_strength(&s, p1(Sides::D6), p1(Sides::D4)).is_err());
        s.pool_mut(Player::Two).capture(p2(Sides::D4));
        assert!(check_strength(&s, p1(Sides::D6), p2(Sides::D4)).is_err());
    }

    #[test]
    fn mind_attack_matches_target() {
        let s = board([2, 3, 1, 1, 1, 1], [1, 5, 1, 1, 1, 1], Player::One);
        let tokens = [
            ExprToken::Die(p1(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(p1(Sides::D6)),
        ];
        assert_eq!(check_mind(&s, &tokens, p2(Sides::D6)).unwrap(), 5);
        let miss = check_mind(&s, &tokens, p2(Sides::D4)).unwrap_err();
        assert!(matches!(
            miss,
            EngineError::IllegalExpression(ExprError::Mismatch { value: 5, target: 1 })
        ));
    }

    #[test]
    fn mind_attack_rejects_trailing_operator() {
        let s = board([2, 3, 1, 1, 1, 1], [1, 5, 1, 1, 1, 1], Player::One);
        let tokens = [
            ExprToken::Die(p1(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(p1(Sides::D6)),
            ExprToken::Op(Op::Add),
        ];
        assert!(matches!(
            check_mind(&s, &tokens, p2(Sides::D6)),
            Err(EngineError::IllegalExpression(ExprError::TrailingOperator))
        ));
    }

    #[test]
    fn mind_attack_needs_two_dice() {
        let s = board([4, 3, 1, 1, 1, 1], [1, 5, 1, 1, 1, 1], Player::One);
        let tokens = [
            ExprToken::Paren(Paren::Open),
            ExprToken::Die(p1(Sides::D4)),
            ExprToken::Paren(Paren::Close),
        ];
        assert!(matches!(
            check_mind(&s, &tokens, p2(Sides::D6)),
            Err(EngineError::IllegalSelection(_))
        ));
    }

    #[test]
    fn mind_attack_rejects_a_repeated_die() {
        // d4 + d4 = 3 + 3 would hit d6=6
        let s = board([3, 1, 1, 1, 1, 1], [1, 6, 1, 1, 1, 1], Player::One);
        let tokens = [
            ExprToken::Die(p1(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(p1(Sides::D4)),
        ];
        assert!(matches!(
            check_mind(&s, &tokens, p2(Sides::D6)),
            Err(EngineError::IllegalSelection(_))
        ));
    }

    #[test]
    fn mind_attack_with_grouping() {
        // (d4 + d6) × d8 = (2 + 3) × 4 = 20 against d20=20
        let s = board([2, 3, 4, 1, 1, 1], [1, 1, 1, 1, 1, 20], Player::One);
        let tokens = [
            ExprToken::Paren(Paren::Open),
            ExprToken::Die(p1(Sides::D4)),
            ExprToken::Op(Op::Add),
            ExprToken::Die(p1(Sides::D6)),
            ExprToken::Paren(Paren::Close),
            ExprToken::Op(Op::Mul),
            ExprToken::Die(p1(Sides::D8)),
        ];
        assert_eq!(check_mind(&s, &tokens, p2(Sides::D20)).unwrap(), 20);
    }

    #[test]
    fn check_selection_dispatches_on_mode() {
        let s = board([2, 3, 1, 1, 1, 1], [1, 5, 1, 1, 1, 1], Player::One);
        let strength = Selection::from_tokens(
            AttackType::Strength,
            vec![ExprToken::Die(p1(Sides::D6))],
            Some(p2(Sides::D4)),
        )
        .unwrap();
        assert!(check_selection(&s, &strength).is_ok());

        let untargeted =
            Selection::from_tokens(AttackType::Strength, vec![ExprToken::Die(p1(Sides::D6))], None)
                .unwrap();
        assert!(check_selection(&s, &untargeted).is_err());
    }

    #[test]
    fn legal_strength_attacks_lists_every_pair() {
        // p1: d4=1 d6=6, rest captured; p2: d4=4 d6=6 d8=7, rest captured
        let mut s = board([1, 6, 1, 1, 1, 1], [4, 6, 7, 1, 1, 1], Player::Two);
        s.current_player = Player::One;
        keep_only(&mut s, Player::One, &[Sides::D4, Sides::D6]);
        keep_only(&mut s, Player::Two, &[Sides::D4, Sides::D6, Sides::D8]);
        let moves = legal_strength_attacks(&s);
        assert_eq!(
            moves,
            vec![(p1(Sides::D6), p2(Sides::D4)), (p1(Sides::D6), p2(Sides::D6))]
        );
    }

    #[test]
    fn tie_break_rewards_more_surviving_own_dice() {
        // Player 1 has 4 active, player 2 has 2: player 1 wins even though
        // player 2 captured more.
        let mut s = board([1; 6], [1; 6], Player::One);
        keep_only(&mut s, Player::One, &[Sides::D4, Sides::D6, Sides::D8, Sides::D10]);
        keep_only(&mut s, Player::Two, &[Sides::D4, Sides::D6]);
        assert_eq!(tie_break(&s), Player::One);
    }

    #[test]
    fn tie_break_equal_counts_go_against_first_player() {
        let s = board([1; 6], [1; 6], Player::One);
        assert_eq!(tie_break(&s), Player::Two);
        let s = board([1; 6], [1; 6], Player::Two);
        assert_eq!(tie_break(&s), Player::One);
    }

    proptest! {
        #[test]
        fn strength_legality_follows_comparison_rule(
            own in 1u32..=20,
            opp in 1u32..=4,
            remaining in 1usize..=6,
            acting_first in any::<bool>(),
        ) {
            let first = if acting_first { Player::One } else { Player::Two };
            let mut s = board([1, 1, 1, 1, 1, own], [opp, 1, 1, 1, 1, 1], first);
            s.current_player = Player::One;
            let keep: Vec<Sides> = Sides::ALL[..remaining].to_vec();
            keep_only(&mut s, Player::Two, &keep);

            let legal = check_strength(&s, p1(Sides::D20), p2(Sides::D4)).is_ok();
            let expected = if remaining == 1 && acting_first { own > opp } else { own >= opp };
            prop_assert_eq!(legal, expected);
        }
    }
}
