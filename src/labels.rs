//! Display tables keyed by [`ScaleValue`].
//!
//! Albums and tracks use one vocabulary ("Poor" .. "Masterpiece"), artists
//! another ("Forgettable" .. "Legendary"). Colors are presentation tokens
//! shared by both.

use crate::scale::ScaleValue;
use serde::{Deserialize, Serialize};

/// Which vocabulary a rank label is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelContext {
    Album,
    Artist,
}

/// Label for an album or track rank.
#[must_use]
pub const fn album_label(rank: ScaleValue) -> &'static str {
    match rank {
        ScaleValue::Zero => "Poor",
        ScaleValue::One => "Fair",
        ScaleValue::Two => "Quite good",
        ScaleValue::Three => "Good",
        ScaleValue::Four => "More than good",
        ScaleValue::Five => "Very good",
        ScaleValue::Seven => "Excellent",
        ScaleValue::Ten => "Masterpiece",
    }
}

/// Label for an artist rank.
#[must_use]
pub const fn artist_label(rank: ScaleValue) -> &'static str {
    match rank {
        ScaleValue::Zero => "Forgettable",
        ScaleValue::One => "Mediocre",
        ScaleValue::Two => "Decent",
        ScaleValue::Three => "Solid",
        ScaleValue::Four => "Accomplished",
        ScaleValue::Five => "Outstanding",
        ScaleValue::Seven => "Iconic",
        ScaleValue::Ten => "Legendary",
    }
}

#[must_use]
pub const fn label(rank: ScaleValue, context: LabelContext) -> &'static str {
    match context {
        LabelContext::Album => album_label(rank),
        LabelContext::Artist => artist_label(rank),
    }
}

/// Foreground color token.
#[must_use]
pub const fn rating_color(rank: ScaleValue) -> &'static str {
    match rank {
        ScaleValue::Zero => "text-red-500",
        ScaleValue::One => "text-orange-500",
        ScaleValue::Two => "text-amber-500",
        ScaleValue::Three => "text-yellow-500",
        ScaleValue::Four => "text-lime-500",
        ScaleValue::Five => "text-green-500",
        ScaleValue::Seven => "text-sky-500",
        ScaleValue::Ten => "text-violet-500",
    }
}

/// Background color token.
#[must_use]
pub const fn rating_bg(rank: ScaleValue) -> &'static str {
    match rank {
        ScaleValue::Zero => "bg-red-100",
        ScaleValue::One => "bg-orange-100",
        ScaleValue::Two => "bg-amber-100",
        ScaleValue::Three => "bg-yellow-100",
        ScaleValue::Four => "bg-lime-100",
        ScaleValue::Five => "bg-green-100",
        ScaleValue::Seven => "bg-sky-100",
        ScaleValue::Ten => "bg-violet-100",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::SCALE;

    #[test]
    fn test_album_labels() {
        let labels: Vec<&str> = SCALE.iter().map(|s| album_label(*s)).collect();
        assert_eq!(
            labels,
            vec![
                "Poor",
                "Fair",
                "Quite good",
                "Good",
                "More than good",
                "Very good",
                "Excellent",
                "Masterpiece"
            ]
        );
    }

    #[test]
    fn test_artist_labels() {
        assert_eq!(artist_label(ScaleValue::Zero), "Forgettable");
        assert_eq!(artist_label(ScaleValue::One), "Mediocre");
        assert_eq!(artist_label(ScaleValue::Two), "Decent");
        assert_eq!(artist_label(ScaleValue::Three), "Solid");
        assert_eq!(artist_label(ScaleValue::Four), "Accomplished");
        assert_eq!(artist_label(ScaleValue::Five), "Outstanding");
        assert_eq!(artist_label(ScaleValue::Seven), "Iconic");
        assert_eq!(artist_label(ScaleValue::Ten), "Legendary");
    }

    #[test]
    fn test_label_dispatches_on_context() {
        assert_eq!(label(ScaleValue::Ten, LabelContext::Album), "Masterpiece");
        assert_eq!(label(ScaleValue::Ten, LabelContext::Artist), "Legendary");
    }

    #[test]
    fn test_colors_cover_whole_scale() {
        for s in SCALE {
            assert!(rating_color(s).starts_with("text-"));
            assert!(rating_bg(s).starts_with("bg-"));
        }
        assert_eq!(rating_color(ScaleValue::Seven), "text-sky-500");
        assert_eq!(rating_bg(ScaleValue::Zero), "bg-red-100");
    }
}
