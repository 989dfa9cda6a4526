//! TowerNumber - Signed numbers with an effectively unbounded exponent range
//!
//! A tower number is stored as one of three shapes:
//! - zero
//! - scientific notation: `±mantissa × 10^exponent` with `mantissa ∈ [1, 10)`
//! - a power tower: `±10^10^…^value` where the number of tens is the `layer`
//!
//! Every constructor normalizes, so two equal numbers always share a shape and
//! comparisons can be done structurally.

mod format;
mod ops;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Largest layer-0 exponent magnitude (the integer-exact range of an f64)
pub const EXPONENT_LIMIT: f64 = 1e15;

/// A layered value reaching this is promoted one more layer
pub const LAYER_VALUE_LIMIT: f64 = 1e300;

/// Tallest representable tower; anything taller is clamped here
pub const MAX_LAYER: u32 = 64;

/// Exponent gap beyond which the smaller addend is dropped
pub const ADD_PRECISION_DIGITS: f64 = 17.0;

/// Tolerance for treating a multiplier as neutral
pub const EPSILON: f64 = 1e-9;

/// Smallest canonical value at layer 2 and above (`log10(LAYER_VALUE_LIMIT)`)
const LAYER_VALUE_FLOOR: f64 = 300.0;

#[derive(Debug, Clone, Copy)]
enum Repr {
    Zero,
    /// `±mantissa × 10^exponent`, mantissa in [1, 10), |exponent| < EXPONENT_LIMIT
    Scientific {
        negative: bool,
        mantissa: f64,
        exponent: f64,
    },
    /// `±10^10^…^value` with `layer` tens
    Tower {
        negative: bool,
        layer: u32,
        value: f64,
    },
}

/// Arbitrary-magnitude signed number used for every resource and rate
///
/// Values are `Copy`; every operation returns a new number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "TowerParts", into = "TowerParts")]
pub struct TowerNumber {
    repr: Repr,
}

/// Plain-data form of a tower number (the persisted wire shape)
///
/// Layer 0 stores `sign · mantissa · 10^exponent`. Layered numbers store their
/// tower value in `exponent` and keep `mantissa` at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerParts {
    pub sign: i8,
    pub mantissa: f64,
    pub exponent: f64,
    pub layer: u32,
}

impl TowerNumber {
    pub const ZERO: TowerNumber = TowerNumber { repr: Repr::Zero };
    pub const ONE: TowerNumber = TowerNumber {
        repr: Repr::Scientific {
            negative: false,
            mantissa: 1.0,
            exponent: 0.0,
        },
    };

    /// The additive identity
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// The multiplicative identity
    pub fn one() -> Self {
        Self::ONE
    }

    /// Convert a plain number. Non-finite input degenerates to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value == 0.0 {
            return Self::ZERO;
        }
        Self::from_scientific(value, 0.0)
    }

    /// Build `mantissa × 10^exponent`, normalizing both parts
    ///
    /// The mantissa carries the sign. A fractional exponent is folded into
    /// the mantissa.
    pub fn from_scientific(mantissa: f64, exponent: f64) -> Self {
        if !mantissa.is_finite() || !exponent.is_finite() || mantissa == 0.0 {
            return Self::ZERO;
        }
        let negative = mantissa < 0.0;
        let mut m = mantissa.abs();
        let mut e = exponent.floor();
        let fraction = exponent - e;
        if fraction != 0.0 {
            m *= 10f64.powf(fraction);
        }

        if !(1.0..10.0).contains(&m) {
            let shift = m.log10().floor();
            m = scale10(m, -shift);
            e += shift;
            if m >= 10.0 {
                m /= 10.0;
                e += 1.0;
            } else if m < 1.0 {
                m *= 10.0;
                e -= 1.0;
            }
        }

        if e >= EXPONENT_LIMIT {
            return Self::tower(negative, 1, e + m.log10());
        }
        if e <= -EXPONENT_LIMIT {
            return Self::ZERO;
        }
        TowerNumber {
            repr: Repr::Scientific {
                negative,
                mantissa: m,
                exponent: e,
            },
        }
    }

    /// Build `±10^log`
    pub fn from_log10(negative: bool, log: f64) -> Self {
        if log.is_nan() {
            return Self::ZERO;
        }
        if log >= EXPONENT_LIMIT {
            return Self::tower(negative, 1, log);
        }
        if log <= -EXPONENT_LIMIT {
            return Self::ZERO;
        }
        let mut e = log.floor();
        let mut m = 10f64.powf(log - e);
        if m >= 10.0 {
            m /= 10.0;
            e += 1.0;
        } else if m < 1.0 {
            m *= 10.0;
            e -= 1.0;
        }
        TowerNumber {
            repr: Repr::Scientific {
                negative,
                mantissa: m,
                exponent: e,
            },
        }
    }

    /// Build `±10^10^…^value` with `layer` tens, demoting or promoting until
    /// the value sits in the canonical range for its layer
    pub fn tower(negative: bool, layer: u32, value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        let mut layer = layer;
        let mut value = value;

        loop {
            match layer {
                0 => {
                    let signed = if negative { -value } else { value };
                    return Self::from_f64(signed);
                }
                1 if value < EXPONENT_LIMIT => return Self::from_log10(negative, value),
                1 => break,
                _ if value < LAYER_VALUE_FLOOR => {
                    value = 10f64.powf(value);
                    layer -= 1;
                }
                _ => break,
            }
        }

        while layer < MAX_LAYER && value >= LAYER_VALUE_LIMIT {
            value = value.log10();
            layer += 1;
        }
        if layer >= MAX_LAYER {
            layer = MAX_LAYER;
            if !value.is_finite() {
                value = f64::MAX;
            }
        }

        TowerNumber {
            repr: Repr::Tower {
                negative,
                layer,
                value,
            },
        }
    }

    /// Rebuild from the plain-data form, sanitizing malformed parts
    pub fn from_parts(parts: TowerParts) -> Self {
        if parts.sign == 0 || !parts.mantissa.is_finite() || !parts.exponent.is_finite() {
            return Self::ZERO;
        }
        let negative = parts.sign < 0;
        if parts.layer == 0 {
            let mantissa = parts.mantissa.abs();
            Self::from_scientific(if negative { -mantissa } else { mantissa }, parts.exponent)
        } else {
            Self::tower(negative, parts.layer, parts.exponent)
        }
    }

    /// Plain-data form used for persistence
    pub fn to_parts(&self) -> TowerParts {
        match self.repr {
            Repr::Zero => TowerParts::default(),
            Repr::Scientific {
                negative,
                mantissa,
                exponent,
            } => TowerParts {
                sign: if negative { -1 } else { 1 },
                mantissa,
                exponent,
                layer: 0,
            },
            Repr::Tower {
                negative,
                layer,
                value,
            } => TowerParts {
                sign: if negative { -1 } else { 1 },
                mantissa: 1.0,
                exponent: value,
                layer,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.repr, Repr::Zero)
    }

    /// -1, 0 or 1
    pub fn sign(&self) -> i8 {
        match self.repr {
            Repr::Zero => 0,
            Repr::Scientific { negative, .. } | Repr::Tower { negative, .. } => {
                if negative {
                    -1
                } else {
                    1
                }
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        self.sign() < 0
    }

    pub fn is_positive(&self) -> bool {
        self.sign() > 0
    }

    /// Tower height (0 for zero and scientific numbers)
    pub fn layer(&self) -> u32 {
        match self.repr {
            Repr::Tower { layer, .. } => layer,
            _ => 0,
        }
    }

    /// Layer-0 mantissa (0 for zero, 1 for layered numbers)
    pub fn mantissa(&self) -> f64 {
        self.to_parts().mantissa
    }

    /// Layer-0 exponent, or the stored tower value for layered numbers
    pub fn exponent(&self) -> f64 {
        self.to_parts().exponent
    }

    /// Best-effort downcast: ±infinity above f64 range, zero below it
    pub fn to_f64(&self) -> f64 {
        match self.repr {
            Repr::Zero => 0.0,
            Repr::Scientific {
                negative,
                mantissa,
                exponent,
            } => {
                let magnitude = if exponent > 308.0 {
                    f64::INFINITY
                } else if exponent < -340.0 {
                    0.0
                } else if exponent >= 0.0 {
                    snap_integral(scale10(mantissa, exponent))
                } else {
                    scale10(mantissa, exponent)
                };
                if negative {
                    -magnitude
                } else {
                    magnitude
                }
            }
            Repr::Tower { negative, .. } => {
                if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }
        }
    }

    /// Total ordering across every layer combination
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.sign().cmp(&other.sign()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        let magnitude = self.compare_magnitude(other);
        if self.is_negative() {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Compare absolute values
    pub fn compare_magnitude(&self, other: &Self) -> Ordering {
        match (self.repr, other.repr) {
            (Repr::Zero, Repr::Zero) => Ordering::Equal,
            (Repr::Zero, _) => Ordering::Less,
            (_, Repr::Zero) => Ordering::Greater,
            (
                Repr::Scientific {
                    mantissa: m1,
                    exponent: e1,
                    ..
                },
                Repr::Scientific {
                    mantissa: m2,
                    exponent: e2,
                    ..
                },
            ) => cmp_f64(e1, e2).then(cmp_f64(m1, m2)),
            (Repr::Scientific { .. }, Repr::Tower { .. }) => Ordering::Less,
            (Repr::Tower { .. }, Repr::Scientific { .. }) => Ordering::Greater,
            (
                Repr::Tower {
                    layer: l1,
                    value: v1,
                    ..
                },
                Repr::Tower {
                    layer: l2,
                    value: v2,
                    ..
                },
            ) => l1.cmp(&l2).then(cmp_f64(v1, v2)),
        }
    }

    /// Whether this multiplier is 1 within [`EPSILON`]
    pub fn is_effectively_one(&self) -> bool {
        match self.repr {
            Repr::Scientific {
                negative: false,
                exponent,
                ..
            } if exponent == 0.0 || exponent == -1.0 => (self.to_f64() - 1.0).abs() <= EPSILON,
            _ => false,
        }
    }

    /// Larger of two numbers
    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Smaller of two numbers
    pub fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Plain display string (see the `Display` impl)
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl Default for TowerNumber {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for TowerNumber {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for TowerNumber {}

impl PartialOrd for TowerNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for TowerNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<f64> for TowerNumber {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<u32> for TowerNumber {
    fn from(value: u32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<u64> for TowerNumber {
    fn from(value: u64) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<TowerParts> for TowerNumber {
    fn from(parts: TowerParts) -> Self {
        Self::from_parts(parts)
    }
}

impl From<TowerNumber> for TowerParts {
    fn from(number: TowerNumber) -> Self {
        number.to_parts()
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Mantissas carry a few ulps of error; values that close to an integer are
/// that integer
fn snap_integral(x: f64) -> f64 {
    let rounded = x.round();
    if (x - rounded).abs() <= x.abs() * 8.0 * f64::EPSILON {
        rounded
    } else {
        x
    }
}

/// `x × 10^power` for an integer-valued power, without intermediate overflow
fn scale10(x: f64, power: f64) -> f64 {
    if power >= 0.0 {
        if power > 300.0 {
            x * 1e300 * 10f64.powi((power - 300.0) as i32)
        } else {
            x * 10f64.powi(power as i32)
        }
    } else if power < -300.0 {
        x / 1e300 / 10f64.powi((-power - 300.0) as i32)
    } else {
        x / 10f64.powi(-power as i32)
    }
}
