//! Display formatting for tower numbers

use super::{Repr, TowerNumber};
use std::fmt;

/// Towers taller than this are written as `(e^N)value`
const MAX_SPELLED_LAYERS: u32 = 4;

impl fmt::Display for TowerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Zero => write!(f, "0"),
            Repr::Scientific {
                negative,
                mantissa,
                exponent,
            } => {
                let sign = if negative { "-" } else { "" };
                if (-3.0..6.0).contains(&exponent) {
                    let value = self.to_f64().abs();
                    if value.fract() == 0.0 {
                        write!(f, "{}{:.0}", sign, value)
                    } else {
                        write!(f, "{}{}", sign, trim_decimals(&format!("{:.3}", value)))
                    }
                } else {
                    let (mantissa, exponent) = round_mantissa(mantissa, exponent);
                    write!(f, "{}{:.3}e{}", sign, mantissa, exponent as i64)
                }
            }
            Repr::Tower {
                negative,
                layer,
                value,
            } => {
                let sign = if negative { "-" } else { "" };
                if layer <= MAX_SPELLED_LAYERS {
                    write!(f, "{}{}{:.3e}", sign, "e".repeat(layer as usize), value)
                } else {
                    write!(f, "{}(e^{}){:.3e}", sign, layer, value)
                }
            }
        }
    }
}

/// Round to three decimals, carrying into the exponent when the mantissa
/// rounds up to 10
fn round_mantissa(mantissa: f64, exponent: f64) -> (f64, f64) {
    let rounded = (mantissa * 1000.0).round() / 1000.0;
    if rounded >= 10.0 {
        (rounded / 10.0, exponent + 1.0)
    } else {
        (rounded, exponent)
    }
}

fn trim_decimals(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
