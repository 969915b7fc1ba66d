//! Biased die rolls.

use rand::Rng;

use super::Sides;

/// Largest bias magnitude a game accepts.
pub const MAX_BIAS: i32 = 3;

/// Roll one die.
///
/// A bias of 0 is a uniform roll. A positive bias keeps the highest of
/// `bias + 1` uniform rolls, a negative bias the lowest of `|bias| + 1`.
pub fn roll_biased<R: Rng + ?Sized>(rng: &mut R, sides: Sides, bias: i32) -> u32 {
    let faces = sides.count();
    let rolls = bias.unsigned_abs() + 1;
    let mut values = (0..rolls).map(|_| rng.random_range(1..=faces));
    let first = values.next().unwrap_or(1);
    if bias >= 0 {
        values.fold(first, u32::max)
    } else {
        values.fold(first, u32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn uniform_rolls_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for sides in Sides::ALL {
            for _ in 0..200 {
                let v = roll_biased(&mut rng, sides, 0);
                assert!((1..=sides.count()).contains(&v));
            }
        }
    }

    #[test]
    fn deterministic_with_seed() {
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                roll_biased(&mut rng1, Sides::D20, 2),
                roll_biased(&mut rng2, Sides::D20, 2)
            );
        }
    }

    #[test]
    fn positive_bias_raises_the_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 2000;
        let lucky: u32 = (0..n).map(|_| roll_biased(&mut rng, Sides::D20, 3)).sum();
        let unlucky: u32 = (0..n).map(|_| roll_biased(&mut rng, Sides::D20, -3)).sum();
        let plain: u32 = (0..n).map(|_| roll_biased(&mut rng, Sides::D20, 0)).sum();
        assert!(lucky > plain);
        assert!(plain > unlucky);
    }
}
