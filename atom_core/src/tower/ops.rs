//! Arithmetic on tower numbers

use super::{Repr, TowerNumber, ADD_PRECISION_DIGITS};
use std::cmp::Ordering;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

impl TowerNumber {
    /// Sum of two numbers
    ///
    /// When the exponents differ by more than [`ADD_PRECISION_DIGITS`] the
    /// smaller operand is dropped: it cannot matter at that scale.
    pub fn add(self, other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        let (big, small) = if self.compare_magnitude(&other) == Ordering::Less {
            (other, self)
        } else {
            (self, other)
        };

        match (big.repr, small.repr) {
            (
                Repr::Scientific {
                    negative: big_negative,
                    mantissa: big_mantissa,
                    exponent: big_exponent,
                },
                Repr::Scientific {
                    negative: small_negative,
                    mantissa: small_mantissa,
                    exponent: small_exponent,
                },
            ) => {
                let gap = big_exponent - small_exponent;
                if gap > ADD_PRECISION_DIGITS {
                    return big;
                }
                let aligned = super::scale10(small_mantissa, -gap);
                // |big| >= |small| so this never goes negative
                let mantissa = if big_negative == small_negative {
                    big_mantissa + aligned
                } else {
                    big_mantissa - aligned
                };
                let signed = if big_negative { -mantissa } else { mantissa };
                Self::from_scientific(signed, big_exponent)
            }
            _ => big.add_in_log_space(small),
        }
    }

    /// Addition for layered operands: `log|big| + log10(1 ± 10^-gap)`
    fn add_in_log_space(self, small: Self) -> Self {
        let big_log = self.log10();
        let small_log = small.log10();
        let gap = big_log.sub(small_log);
        if gap > Self::from_f64(ADD_PRECISION_DIGITS) {
            return self;
        }

        let ratio = 10f64.powf(-gap.to_f64());
        let factor = if self.is_negative() == small.is_negative() {
            1.0 + ratio
        } else {
            1.0 - ratio
        };
        if factor <= 0.0 {
            return Self::ZERO;
        }

        let magnitude = big_log.add(Self::from_f64(factor.log10())).exp10();
        if self.is_negative() {
            magnitude.neg()
        } else {
            magnitude
        }
    }

    /// Difference of two numbers
    pub fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    /// Product of two numbers
    pub fn mul(self, other: Self) -> Self {
        match (self.repr, other.repr) {
            (Repr::Zero, _) | (_, Repr::Zero) => Self::ZERO,
            (
                Repr::Scientific {
                    negative: n1,
                    mantissa: m1,
                    exponent: e1,
                },
                Repr::Scientific {
                    negative: n2,
                    mantissa: m2,
                    exponent: e2,
                },
            ) => {
                let mantissa = m1 * m2;
                let signed = if n1 != n2 { -mantissa } else { mantissa };
                Self::from_scientific(signed, e1 + e2)
            }
            _ => {
                let magnitude = self.log10().add(other.log10()).exp10();
                if self.is_negative() != other.is_negative() {
                    magnitude.neg()
                } else {
                    magnitude
                }
            }
        }
    }

    /// Multiply by a plain number (non-finite scalars give zero)
    pub fn mul_scalar(self, scalar: f64) -> Self {
        self.mul(Self::from_f64(scalar))
    }

    /// Divide by a plain number. Division by zero (or a non-finite scalar)
    /// yields zero.
    pub fn div_scalar(self, scalar: f64) -> Self {
        match Self::from_f64(scalar).repr {
            Repr::Scientific {
                negative,
                mantissa,
                exponent,
            } => {
                let inverse = if negative { -1.0 / mantissa } else { 1.0 / mantissa };
                self.mul(Self::from_scientific(inverse, -exponent))
            }
            _ => Self::ZERO,
        }
    }

    /// Additive inverse
    pub fn neg(self) -> Self {
        let repr = match self.repr {
            Repr::Zero => Repr::Zero,
            Repr::Scientific {
                negative,
                mantissa,
                exponent,
            } => Repr::Scientific {
                negative: !negative,
                mantissa,
                exponent,
            },
            Repr::Tower {
                negative,
                layer,
                value,
            } => Repr::Tower {
                negative: !negative,
                layer,
                value,
            },
        };
        TowerNumber { repr }
    }

    /// Absolute value
    pub fn abs(self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self
        }
    }

    /// Base-10 logarithm of the magnitude, one layer down
    ///
    /// Zero maps to zero; callers check `is_zero` first when that matters.
    pub fn log10(self) -> Self {
        match self.repr {
            Repr::Zero => Self::ZERO,
            Repr::Scientific {
                mantissa, exponent, ..
            } => Self::from_f64(mantissa.log10() + exponent),
            Repr::Tower { layer: 1, value, .. } => Self::from_f64(value),
            Repr::Tower { layer, value, .. } => Self::tower(false, layer - 1, value),
        }
    }

    /// `10^self`, one layer up
    pub fn exp10(self) -> Self {
        match self.repr {
            Repr::Zero => Self::ONE,
            Repr::Scientific {
                negative,
                mantissa,
                exponent,
            } => {
                if exponent < 308.0 {
                    Self::from_log10(false, self.to_f64())
                } else if negative {
                    Self::ZERO
                } else {
                    Self::tower(false, 2, mantissa.log10() + exponent)
                }
            }
            Repr::Tower {
                negative: true, ..
            } => Self::ZERO,
            Repr::Tower { layer, value, .. } => Self::tower(false, layer + 1, value),
        }
    }

    /// Raise to a plain power
    ///
    /// Negative bases only accept integer powers; anything else gives zero.
    pub fn pow_f64(self, power: f64) -> Self {
        if !power.is_finite() {
            return Self::ZERO;
        }
        if power == 0.0 {
            return Self::ONE;
        }
        if self.is_zero() {
            return if power > 0.0 { Self::ZERO } else { Self::ONE };
        }
        let is_integer = power.fract() == 0.0;
        if self.is_negative() && !is_integer {
            return Self::ZERO;
        }

        if self.layer() == 0 {
            let base = self.to_f64();
            let direct = if is_integer && power.abs() <= i32::MAX as f64 {
                base.powi(power as i32)
            } else {
                base.powf(power)
            };
            if direct.is_finite() && direct != 0.0 {
                return Self::from_f64(direct);
            }
        }

        let magnitude = self.log10().mul_scalar(power).exp10();
        let odd = is_integer && (power % 2.0).abs() == 1.0;
        if self.is_negative() && odd {
            magnitude.neg()
        } else {
            magnitude
        }
    }

    /// Round to the nearest integer while the value is small enough for
    /// whole units to be meaningful; larger values are returned unchanged
    pub fn round(self) -> Self {
        match self.repr {
            Repr::Scientific { exponent, .. } if exponent < 15.0 => {
                Self::from_f64(self.to_f64().round())
            }
            _ => self,
        }
    }
}

impl Add for TowerNumber {
    type Output = TowerNumber;

    fn add(self, rhs: Self) -> Self::Output {
        TowerNumber::add(self, rhs)
    }
}

impl Sub for TowerNumber {
    type Output = TowerNumber;

    fn sub(self, rhs: Self) -> Self::Output {
        TowerNumber::sub(self, rhs)
    }
}

impl Mul for TowerNumber {
    type Output = TowerNumber;

    fn mul(self, rhs: Self) -> Self::Output {
        TowerNumber::mul(self, rhs)
    }
}

impl Mul<f64> for TowerNumber {
    type Output = TowerNumber;

    fn mul(self, rhs: f64) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl Div<f64> for TowerNumber {
    type Output = TowerNumber;

    fn div(self, rhs: f64) -> Self::Output {
        self.div_scalar(rhs)
    }
}

impl Neg for TowerNumber {
    type Output = TowerNumber;

    fn neg(self) -> Self::Output {
        TowerNumber::neg(self)
    }
}

impl AddAssign for TowerNumber {
    fn add_assign(&mut self, rhs: Self) {
        *self = TowerNumber::add(*self, rhs);
    }
}

impl SubAssign for TowerNumber {
    fn sub_assign(&mut self, rhs: Self) {
        *self = TowerNumber::sub(*self, rhs);
    }
}

impl MulAssign for TowerNumber {
    fn mul_assign(&mut self, rhs: Self) {
        *self = TowerNumber::mul(*self, rhs);
    }
}

impl Sum for TowerNumber {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TowerNumber::ZERO, TowerNumber::add)
    }
}

impl Product for TowerNumber {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TowerNumber::ONE, TowerNumber::mul)
    }
}
