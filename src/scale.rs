//! The discrete rating scale and the quantizer that snaps means onto it.
//!
//! Ratings live on an irregular eight-step scale, `0 1 2 3 4 5 7 10`. Every
//! rank value shown anywhere in Platter is one of those points, so it is
//! modelled as a closed enum: an illegal value like `6` cannot be built.
//! [`quantize_rank`] is the only way to get a [`ScaleValue`] from an arbitrary
//! number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of the rating scale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ScaleValue {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Seven = 7,
    Ten = 10,
}

/// The scale in ascending order.
pub const SCALE: [ScaleValue; 8] = [
    ScaleValue::Zero,
    ScaleValue::One,
    ScaleValue::Two,
    ScaleValue::Three,
    ScaleValue::Four,
    ScaleValue::Five,
    ScaleValue::Seven,
    ScaleValue::Ten,
];

impl ScaleValue {
    /// Integer value of this scale point.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.value())
    }

    /// `true` for every point above zero, i.e. "has been rated".
    #[must_use]
    pub const fn is_rated(self) -> bool {
        !matches!(self, Self::Zero)
    }
}

impl fmt::Display for ScaleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Returned when an integer is not a point of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidScaleValue(pub u8);

impl fmt::Display for InvalidScaleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not on the rating scale (0, 1, 2, 3, 4, 5, 7, 10)", self.0)
    }
}

impl std::error::Error for InvalidScaleValue {}

impl TryFrom<u8> for ScaleValue {
    type Error = InvalidScaleValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SCALE
            .iter()
            .copied()
            .find(|s| s.value() == value)
            .ok_or(InvalidScaleValue(value))
    }
}

impl From<ScaleValue> for u8 {
    fn from(value: ScaleValue) -> Self {
        value.value()
    }
}

/// Snap a mean rating to the nearest scale point.
///
/// Ties go to the larger point: `6.0` lands on `7`, `8.5` on `10`. Values
/// outside `[0, 10]` end up on the nearest end of the scale.
///
/// Non-finite input has a fixed policy: `NaN` and `-inf` give
/// [`ScaleValue::Zero`], `+inf` gives [`ScaleValue::Ten`].
///
/// # Examples
///
/// ```
/// use platter::scale::{quantize_rank, ScaleValue};
///
/// assert_eq!(quantize_rank(0.6), ScaleValue::One);
/// assert_eq!(quantize_rank(6.0), ScaleValue::Seven);
/// assert_eq!(quantize_rank(15.0), ScaleValue::Ten);
/// ```
#[must_use]
pub fn quantize_rank(mean: f64) -> ScaleValue {
    if mean.is_nan() {
        return ScaleValue::Zero;
    }
    if mean.is_infinite() {
        return if mean.is_sign_positive() { ScaleValue::Ten } else { ScaleValue::Zero };
    }

    let mut best = SCALE[0];
    let mut best_diff = f64::INFINITY;
    for s in SCALE {
        let diff = (mean - s.as_f64()).abs();
        // ascending walk: an equal distance later on is always the larger point
        if diff < best_diff || (diff == best_diff && s > best) {
            best = s;
            best_diff = diff;
        }
    }

    log::trace!("Quantized mean `{mean}' to rank `{best}'.");
    best
}
