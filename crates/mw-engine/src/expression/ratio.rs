//! Exact rational numbers for expression evaluation.

/// A normalized fraction: denominator positive, lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ratio {
    numer: i128,
    denom: i128,
}

impl Ratio {
    pub(crate) fn integer(n: u32) -> Self {
        Self {
            numer: i128::from(n),
            denom: 1,
        }
    }

    /// Build `numer / denom`. `None` when the denominator is zero.
    pub(crate) fn new(numer: i128, denom: i128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let g = gcd(numer.unsigned_abs(), denom.unsigned_abs()).max(1) as i128;
        let sign = if denom < 0 { -1 } else { 1 };
        Some(Self {
            numer: sign * numer / g,
            denom: sign * denom / g,
        })
    }

    pub(crate) fn numer(self) -> i128 {
        self.numer
    }

    pub(crate) fn denom(self) -> i128 {
        self.denom
    }

    pub(crate) fn is_integer(self) -> bool {
        self.denom == 1
    }

    pub(crate) fn add(self, rhs: Self) -> Option<Self> {
        let n = self
            .numer
            .checked_mul(rhs.denom)?
            .checked_add(rhs.numer.checked_mul(self.denom)?)?;
        Self::new(n, self.denom.checked_mul(rhs.denom)?)
    }

    pub(crate) fn sub(self, rhs: Self) -> Option<Self> {
        self.add(Self {
            numer: -rhs.numer,
            denom: rhs.denom,
        })
    }

    pub(crate) fn mul(self, rhs: Self) -> Option<Self> {
        Self::new(
            self.numer.checked_mul(rhs.numer)?,
            self.denom.checked_mul(rhs.denom)?,
        )
    }

    pub(crate) fn div(self, rhs: Self) -> Option<Self> {
        Self::new(
            self.numer.checked_mul(rhs.denom)?,
            self.denom.checked_mul(rhs.numer)?,
        )
    }
}

fn gcd(a: u128, b: u128) -> u128 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_sign_and_terms() {
        let r = Ratio::new(6, -4).unwrap();
        assert_eq!((r.numer(), r.denom()), (-3, 2));
        let zero = Ratio::new(0, 7).unwrap();
        assert_eq!((zero.numer(), zero.denom()), (0, 1));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        assert_eq!(Ratio::new(1, 0), None);
        let zero = Ratio::integer(3).sub(Ratio::integer(3)).unwrap();
        assert_eq!(Ratio::integer(4).div(zero), None);
    }

    #[test]
    fn thirds_recombine_exactly() {
        let third = Ratio::integer(1).div(Ratio::integer(49)).unwrap();
        let back = third.mul(Ratio::integer(49)).unwrap();
        assert!(back.is_integer());
        assert_eq!(back.numer(), 1);
    }
}
