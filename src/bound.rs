//! Integer interval arithmetic for MDP variable ranges.
//!
//! Multiplication and division use the corner-product shortcuts of the
//! translation scheme: `[a,b] * [c,d] = [a*c, b*d]` and `[a,b] / [c,d] =
//! [a/d, b/d]`, which assume non-negative operand intervals and a positive
//! divisor. Tightening either requires new tests on the translation cases
//! that consume them.

use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub min: i64,
    pub max: i64,
}

impl Bound {
    pub fn new(min: i64, max: i64) -> Self {
        Bound { min, max }
    }

    pub fn point(n: i64) -> Self {
        Bound { min: n, max: n }
    }

    /// Smallest interval covering both operands.
    pub fn union(self, other: Bound) -> Bound {
        Bound {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlap of the two intervals, if any.
    pub fn intersect(self, other: Bound) -> Option<Bound> {
        let result = Bound {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        (result.min <= result.max).then_some(result)
    }
}

impl Add for Bound {
    type Output = Bound;

    fn add(self, rhs: Bound) -> Bound {
        Bound {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

impl Sub for Bound {
    type Output = Bound;

    fn sub(self, rhs: Bound) -> Bound {
        Bound {
            min: self.min - rhs.max,
            max: self.max - rhs.min,
        }
    }
}

impl Mul for Bound {
    type Output = Bound;

    fn mul(self, rhs: Bound) -> Bound {
        Bound {
            min: self.min * rhs.min,
            max: self.max * rhs.max,
        }
    }
}

impl Div for Bound {
    type Output = Bound;

    fn div(self, rhs: Bound) -> Bound {
        Bound {
            min: self.min / rhs.max,
            max: self.max / rhs.max,
        }
    }
}

impl Neg for Bound {
    type Output = Bound;

    fn neg(self) -> Bound {
        Bound {
            min: -self.max,
            max: -self.min,
        }
    }
}
