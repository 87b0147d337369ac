//! Rating aggregation: tracks to albums, albums to artists.
//!
//! Everything here is pure. Callers load catalogue data, shape it into
//! [`TrackForRating`] / [`AlbumModifiers`] (see [`crate::transform`]) and get
//! freshly computed values back. Nothing is cached and nothing can fail.
//!
//! # Album rating
//!
//! ```text
//! base   = Σ (duration_sec / 60) * score          (rated tracks only)
//! rank   = quantize(Σ score / rated_tracks)
//! boost  = 1 + (cover + production + mix) / 100
//! boost *= 1.05   if cover, production and mix are all >= 9
//! final  = base * boost
//! ```
//!
//! # Artist rating
//!
//! Unrated albums (rank 0) are dropped, the remaining rank values are averaged
//! and quantized once, and the final album ratings are averaged and rounded.

use crate::labels::{album_label, artist_label};
use crate::scale::{quantize_rank, ScaleValue};
use serde::{Deserialize, Serialize};

/// A single score attached to a track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingRecord {
    pub score: Option<f64>,
}

impl RatingRecord {
    #[must_use]
    pub const fn new(score: f64) -> Self {
        Self { score: Some(score) }
    }
}

/// The part of a track the engines look at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackForRating {
    pub duration_sec: Option<u32>,
    pub ratings: Vec<RatingRecord>,
}

impl TrackForRating {
    #[must_use]
    pub fn new(duration_sec: Option<u32>, scores: &[f64]) -> Self {
        Self {
            duration_sec,
            ratings: scores.iter().copied().map(RatingRecord::new).collect(),
        }
    }

    /// Score used by the album engine: the first rating only.
    #[must_use]
    pub fn first_score(&self) -> Option<f64> {
        self.ratings.first().and_then(|r| r.score)
    }
}

/// The three quality sliders of an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlbumModifiers {
    pub cover: Option<u8>,
    pub production: Option<u8>,
    pub mix: Option<u8>,
}

impl AlbumModifiers {
    /// Slider position shown when editing a modifier that was never set.
    pub const EDIT_DEFAULT: u8 = 5;

    #[must_use]
    pub const fn new(cover: u8, production: u8, mix: u8) -> Self {
        Self {
            cover: Some(cover),
            production: Some(production),
            mix: Some(mix),
        }
    }

    /// `(cover, production, mix)` as the engine sees them: unset is 0.
    #[must_use]
    pub fn resolved(&self) -> (u8, u8, u8) {
        (
            self.cover.unwrap_or(0),
            self.production.unwrap_or(0),
            self.mix.unwrap_or(0),
        )
    }

    /// `(cover, production, mix)` as an editor shows them: unset is 5.
    #[must_use]
    pub fn for_editing(&self) -> (u8, u8, u8) {
        (
            self.cover.unwrap_or(Self::EDIT_DEFAULT),
            self.production.unwrap_or(Self::EDIT_DEFAULT),
            self.mix.unwrap_or(Self::EDIT_DEFAULT),
        )
    }

    /// Apply an edit on top of [`Self::for_editing`]. `None` fields keep
    /// their current slider position.
    ///
    /// Returns `None` when the result equals what the editor started from,
    /// so an untouched album keeps its unset modifiers.
    #[must_use]
    pub fn edited(&self, cover: Option<u8>, production: Option<u8>, mix: Option<u8>) -> Option<(u8, u8, u8)> {
        let start = self.for_editing();
        let edited = (
            cover.unwrap_or(start.0),
            production.unwrap_or(start.1),
            mix.unwrap_or(start.2),
        );
        (edited != start).then_some(edited)
    }
}

/// Parameters of the quality boost.
#[derive(Debug, Clone, Copy)]
pub struct QualityContext {
    /// Modifier points per +100% boost.
    pub points_per_unit: f64,
    /// Every modifier must reach this for the excellence bonus.
    pub excellence_threshold: u8,
    pub excellence_bonus: f64,
}

impl Default for QualityContext {
    fn default() -> Self {
        Self {
            points_per_unit: 100.0,
            excellence_threshold: 9,
            excellence_bonus: 1.05,
        }
    }
}

impl QualityContext {
    /// Multiplier applied to an album's base rating.
    #[must_use]
    pub fn boost(&self, modifiers: &AlbumModifiers) -> f64 {
        let (cover, production, mix) = modifiers.resolved();
        let sum = u32::from(cover) + u32::from(production) + u32::from(mix);
        let boost = 1.0 + f64::from(sum) / self.points_per_unit;

        let threshold = self.excellence_threshold;
        match cover >= threshold && production >= threshold && mix >= threshold {
            true => boost * self.excellence_bonus,
            false => boost,
        }
    }
}

/// Result of [`compute_album_rating`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRating {
    pub rank_value: ScaleValue,
    pub rank_label: &'static str,
    pub final_album_rating: f64,
    pub base_rating: f64,
    pub quality_boost: f64,
}

/// The two fields of an album rating the artist engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlbumRatingSummary {
    pub rank_value: ScaleValue,
    pub final_album_rating: f64,
}

impl From<&AlbumRating> for AlbumRatingSummary {
    fn from(rating: &AlbumRating) -> Self {
        Self {
            rank_value: rating.rank_value,
            final_album_rating: rating.final_album_rating,
        }
    }
}

impl From<AlbumRating> for AlbumRatingSummary {
    fn from(rating: AlbumRating) -> Self {
        Self::from(&rating)
    }
}

/// Result of [`compute_artist_rating`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRating {
    pub rank_value: ScaleValue,
    pub rank_label: &'static str,
    /// Mean final album rating, rounded to an integer.
    pub avg_final_rating: f64,
}

/// Plain mean of every score on a track. A missing score counts as 0 but
/// still counts towards the denominator.
#[must_use]
pub fn calculate_track_average(track: &TrackForRating) -> f64 {
    if track.ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = track.ratings.iter().map(|r| r.score.unwrap_or(0.0)).sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum / track.ratings.len() as f64;
    average
}

/// Unweighted mean of [`calculate_track_average`] over all tracks.
#[must_use]
pub fn calculate_album_average(tracks: &[TrackForRating]) -> f64 {
    if tracks.is_empty() {
        return 0.0;
    }
    let sum: f64 = tracks.iter().map(calculate_track_average).sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum / tracks.len() as f64;
    average
}

/// Album rating with the standard quality parameters.
///
/// Only the first rating of each track is used, and a track without a
/// duration or without a score is skipped entirely.
///
/// # Examples
///
/// ```
/// use platter::rating::{compute_album_rating, AlbumModifiers, TrackForRating};
/// use platter::scale::ScaleValue;
///
/// let tracks = vec![TrackForRating::new(Some(180), &[8.0])];
/// let rating = compute_album_rating(&tracks, &AlbumModifiers::default());
///
/// assert_eq!(rating.base_rating, 24.0);
/// assert_eq!(rating.rank_value, ScaleValue::Seven);
/// assert_eq!(rating.rank_label, "Excellent");
/// ```
#[must_use]
pub fn compute_album_rating(tracks: &[TrackForRating], modifiers: &AlbumModifiers) -> AlbumRating {
    compute_album_rating_with(tracks, modifiers, &QualityContext::default())
}

#[must_use]
pub fn compute_album_rating_with(
    tracks: &[TrackForRating],
    modifiers: &AlbumModifiers,
    context: &QualityContext,
) -> AlbumRating {
    let mut total_rating_value = 0.0;
    let mut total_rank_value = 0.0;
    let mut count_rated: u32 = 0;

    for track in tracks {
        let (Some(score), Some(duration)) = (track.first_score(), track.duration_sec) else {
            continue;
        };
        total_rating_value += (f64::from(duration) / 60.0) * score;
        total_rank_value += score;
        count_rated += 1;
    }

    let mean_rank = match count_rated {
        0 => 0.0,
        n => total_rank_value / f64::from(n),
    };
    let rank_value = quantize_rank(mean_rank);
    let quality_boost = context.boost(modifiers);
    let final_album_rating = total_rating_value * quality_boost;

    log::trace!(
        "Album rating: {count_rated} rated tracks, base `{total_rating_value}', mean rank `{mean_rank}', boost `{quality_boost}'."
    );

    AlbumRating {
        rank_value,
        rank_label: album_label(rank_value),
        final_album_rating,
        base_rating: total_rating_value,
        quality_boost,
    }
}

/// Artist rating from per-album ratings.
///
/// Albums with rank 0 count as unrated and are ignored. The remaining rank
/// values are averaged before quantizing, never quantized one by one.
#[must_use]
pub fn compute_artist_rating(album_ratings: &[AlbumRatingSummary]) -> ArtistRating {
    let rated: Vec<&AlbumRatingSummary> = album_ratings
        .iter()
        .filter(|a| a.rank_value.is_rated())
        .collect();

    if rated.is_empty() {
        return ArtistRating {
            rank_value: ScaleValue::Zero,
            rank_label: artist_label(ScaleValue::Zero),
            avg_final_rating: 0.0,
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let count = rated.len() as f64;
    let mean_rank = rated.iter().map(|a| a.rank_value.as_f64()).sum::<f64>() / count;
    let mean_final = rated.iter().map(|a| a.final_album_rating).sum::<f64>() / count;
    let rank_value = quantize_rank(mean_rank);

    log::trace!(
        "Artist rating: {} of {} albums rated, mean rank `{mean_rank}', mean final `{mean_final}'.",
        rated.len(),
        album_ratings.len()
    );

    ArtistRating {
        rank_value,
        rank_label: artist_label(rank_value),
        avg_final_rating: mean_final.round(),
    }
}

/// Lazily rate a batch of albums.
#[must_use = "Iterator should be consumed to compute ratings"]
pub fn batch_compute_album_ratings<'a>(
    albums: &'a [(Vec<TrackForRating>, AlbumModifiers)],
    context: &'a QualityContext,
) -> impl Iterator<Item = AlbumRating> + 'a {
    albums
        .iter()
        .map(move |(tracks, modifiers)| compute_album_rating_with(tracks, modifiers, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(rank: ScaleValue, final_album_rating: f64) -> AlbumRatingSummary {
        AlbumRatingSummary {
            rank_value: rank,
            final_album_rating,
        }
    }

    #[test]
    fn test_track_average_without_ratings() {
        assert_eq!(calculate_track_average(&TrackForRating::default()), 0.0);
    }

    #[test]
    fn test_track_average_of_ratings() {
        let track = TrackForRating::new(None, &[8.0, 10.0, 6.0]);
        assert_eq!(calculate_track_average(&track), 8.0);
    }

    #[test]
    fn test_track_average_treats_missing_score_as_zero() {
        let track = TrackForRating {
            duration_sec: None,
            ratings: vec![RatingRecord::new(10.0), RatingRecord { score: None }, RatingRecord::new(5.0)],
        };
        assert_eq!(calculate_track_average(&track), 5.0);
    }

    #[test]
    fn test_album_average() {
        assert_eq!(calculate_album_average(&[]), 0.0);

        let tracks = vec![
            TrackForRating::new(None, &[8.0, 10.0]),
            TrackForRating::new(None, &[6.0]),
            TrackForRating::new(None, &[]),
        ];
        assert_eq!(calculate_album_average(&tracks), 5.0);
    }

    #[test]
    fn test_album_rating_without_tracks() {
        let result = compute_album_rating(&[], &AlbumModifiers::default());

        assert_eq!(result.rank_value, ScaleValue::Zero);
        assert_eq!(result.rank_label, "Poor");
        assert_eq!(result.final_album_rating, 0.0);
        assert_eq!(result.base_rating, 0.0);
        assert_eq!(result.quality_boost, 1.0);
    }

    #[test]
    fn test_album_rating_keeps_boost_without_rated_tracks() {
        let result = compute_album_rating(&[], &AlbumModifiers::new(5, 5, 5));

        assert_eq!(result.final_album_rating, 0.0);
        assert_eq!(result.quality_boost, 1.15);
    }

    #[test]
    fn test_album_rating_single_track() {
        let tracks = vec![TrackForRating::new(Some(180), &[8.0])];
        let result = compute_album_rating(&tracks, &AlbumModifiers::default());

        assert_eq!(result.base_rating, 24.0);
        assert_eq!(result.rank_value, ScaleValue::Seven);
        assert_eq!(result.rank_label, "Excellent");
        assert_eq!(result.final_album_rating, 24.0);
    }

    #[test]
    fn test_album_rating_weights_base_by_duration_only() {
        let tracks = vec![
            TrackForRating::new(Some(180), &[10.0]),
            TrackForRating::new(Some(120), &[5.0]),
        ];
        let result = compute_album_rating(&tracks, &AlbumModifiers::default());

        assert_eq!(result.base_rating, 40.0);
        // (10 + 5) / 2 = 7.5, unweighted
        assert_eq!(result.rank_value, ScaleValue::Seven);
    }

    #[test]
    fn test_album_rating_skips_incomplete_tracks() {
        let tracks = vec![
            TrackForRating::new(Some(180), &[10.0]),
            TrackForRating::new(Some(120), &[]),
            TrackForRating::new(None, &[5.0]),
            TrackForRating {
                duration_sec: Some(200),
                ratings: vec![RatingRecord { score: None }],
            },
        ];
        let result = compute_album_rating(&tracks, &AlbumModifiers::default());

        assert_eq!(result.base_rating, 30.0);
        assert_eq!(result.rank_value, ScaleValue::Ten);
    }

    #[test]
    fn test_album_rating_uses_first_rating_only() {
        let tracks = vec![TrackForRating::new(Some(60), &[2.0, 10.0, 10.0])];
        let result = compute_album_rating(&tracks, &AlbumModifiers::default());

        assert_eq!(result.base_rating, 2.0);
        assert_eq!(result.rank_value, ScaleValue::Two);
        assert!((calculate_track_average(&tracks[0]) - 22.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_excellence_bonus_applies_when_all_modifiers_reach_nine() {
        let tracks = vec![TrackForRating::new(Some(60), &[10.0])];
        let result = compute_album_rating(&tracks, &AlbumModifiers::new(9, 10, 9));

        assert!((result.quality_boost - 1.344).abs() < 1e-5);
        assert!((result.final_album_rating - 13.44).abs() < 1e-5);
    }

    #[test]
    fn test_excellence_bonus_not_applied_below_threshold() {
        let tracks = vec![TrackForRating::new(Some(60), &[10.0])];
        let result = compute_album_rating(&tracks, &AlbumModifiers::new(8, 10, 9));

        assert_eq!(result.quality_boost, 1.27);
        assert_eq!(result.final_album_rating, 12.7);
    }

    #[test]
    fn test_missing_modifier_counts_as_zero() {
        let modifiers = AlbumModifiers {
            cover: Some(10),
            production: Some(10),
            mix: None,
        };
        let tracks = vec![TrackForRating::new(Some(60), &[10.0])];
        let result = compute_album_rating(&tracks, &modifiers);

        assert_eq!(result.quality_boost, 1.2);
        assert_eq!(modifiers.for_editing(), (10, 10, AlbumModifiers::EDIT_DEFAULT));
    }

    #[test]
    fn test_album_rating_is_order_independent() {
        let mut tracks = vec![
            TrackForRating::new(Some(180), &[10.0]),
            TrackForRating::new(Some(240), &[3.0]),
            TrackForRating::new(Some(120), &[7.0]),
            TrackForRating::new(None, &[1.0]),
        ];
        let modifiers = AlbumModifiers::new(6, 7, 4);
        let forward = compute_album_rating(&tracks, &modifiers);

        tracks.reverse();
        let backward = compute_album_rating(&tracks, &modifiers);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_album_rating_is_deterministic() {
        let tracks = vec![
            TrackForRating::new(Some(217), &[7.0]),
            TrackForRating::new(Some(93), &[4.0]),
        ];
        let modifiers = AlbumModifiers::new(9, 9, 9);

        assert_eq!(
            compute_album_rating(&tracks, &modifiers),
            compute_album_rating(&tracks, &modifiers)
        );
    }

    #[test]
    fn test_custom_quality_context() {
        let context = QualityContext {
            excellence_threshold: 5,
            ..QualityContext::default()
        };
        let tracks = vec![TrackForRating::new(Some(60), &[10.0])];
        let result = compute_album_rating_with(&tracks, &AlbumModifiers::new(5, 5, 5), &context);

        assert!((result.quality_boost - 1.15 * 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_artist_rating_without_albums() {
        let result = compute_artist_rating(&[]);

        assert_eq!(result.rank_value, ScaleValue::Zero);
        assert_eq!(result.rank_label, "Forgettable");
        assert_eq!(result.avg_final_rating, 0.0);
    }

    #[test]
    fn test_artist_rating_all_unrated() {
        let albums = vec![summary(ScaleValue::Zero, 0.0), summary(ScaleValue::Zero, 0.0)];
        let result = compute_artist_rating(&albums);

        assert_eq!(result.rank_value, ScaleValue::Zero);
        assert_eq!(result.rank_label, "Forgettable");
        assert_eq!(result.avg_final_rating, 0.0);
    }

    #[test]
    fn test_artist_rating_skips_unrated_albums() {
        let albums = vec![
            summary(ScaleValue::Ten, 100.0),
            summary(ScaleValue::Zero, 0.0),
            summary(ScaleValue::Seven, 70.0),
        ];
        let result = compute_artist_rating(&albums);

        // (10 + 7) / 2 = 8.5, tie goes up
        assert_eq!(result.rank_value, ScaleValue::Ten);
        assert_eq!(result.rank_label, "Legendary");
        assert_eq!(result.avg_final_rating, 85.0);
    }

    #[test]
    fn test_artist_rating_single_album_is_rounded() {
        let result = compute_artist_rating(&[summary(ScaleValue::Seven, 42.5)]);

        assert_eq!(result.rank_value, ScaleValue::Seven);
        assert_eq!(result.rank_label, "Iconic");
        assert_eq!(result.avg_final_rating, 43.0);
    }

    #[test]
    fn test_artist_rating_requantizes_mean() {
        let albums = vec![
            summary(ScaleValue::Ten, 120.0),
            summary(ScaleValue::Seven, 80.0),
            summary(ScaleValue::Five, 60.0),
        ];
        let result = compute_artist_rating(&albums);

        assert_eq!(result.rank_value, ScaleValue::Seven);
        assert_eq!(result.avg_final_rating, 87.0);

        let albums = vec![summary(ScaleValue::Five, 50.8), summary(ScaleValue::Four, 40.2)];
        let result = compute_artist_rating(&albums);

        assert_eq!(result.rank_value, ScaleValue::Five);
        assert_eq!(result.rank_label, "Outstanding");
        assert_eq!(result.avg_final_rating, 46.0);
    }

    #[test]
    fn test_artist_rank_snaps_mean_of_album_ranks() {
        // mean 5.5 is nearer 5 than 7
        let albums = vec![summary(ScaleValue::One, 10.0), summary(ScaleValue::Ten, 100.0)];
        assert_eq!(compute_artist_rating(&albums).rank_value, ScaleValue::Five);
    }

    #[test]
    fn test_edit_without_change_is_none() {
        let unset = AlbumModifiers::default();
        assert_eq!(unset.edited(None, None, None), None);
        // 5 is where an unset slider starts
        assert_eq!(unset.edited(Some(5), None, Some(5)), None);
        assert_eq!(unset.edited(Some(9), None, None), Some((9, 5, 5)));

        let set = AlbumModifiers::new(9, 10, 9);
        assert_eq!(set.edited(Some(9), None, None), None);
        assert_eq!(set.edited(None, None, Some(3)), Some((9, 10, 3)));
    }

    #[test]
    fn test_batch_matches_individual() {
        let albums = vec![
            (vec![TrackForRating::new(Some(180), &[8.0])], AlbumModifiers::default()),
            (vec![TrackForRating::new(Some(60), &[10.0])], AlbumModifiers::new(9, 10, 9)),
        ];
        let context = QualityContext::default();
        let batch: Vec<AlbumRating> = batch_compute_album_ratings(&albums, &context).collect();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], compute_album_rating(&albums[0].0, &albums[0].1));
        assert_eq!(batch[1], compute_album_rating(&albums[1].0, &albums[1].1));
    }

    #[test]
    fn test_summary_from_album_rating() {
        let tracks = vec![TrackForRating::new(Some(180), &[8.0])];
        let rating = compute_album_rating(&tracks, &AlbumModifiers::default());
        let summary = AlbumRatingSummary::from(&rating);

        assert_eq!(summary.rank_value, ScaleValue::Seven);
        assert_eq!(summary.final_album_rating, 24.0);
    }
}
