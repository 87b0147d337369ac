//! Shapes catalogue entities into rating-engine input and back out.
//!
//! The engines in [`crate::rating`] assume clean input. This module is where
//! absent rating lists become empty ones and album columns become
//! [`AlbumModifiers`], so the engines never have to care.

use crate::labels::artist_label;
use crate::models::{AlbumWithReleases, ArtistWithAlbums, Track};
use crate::rating::{
    compute_album_rating, compute_artist_rating, AlbumModifiers, AlbumRating, AlbumRatingSummary,
    RatingRecord, TrackForRating,
};
use crate::scale::ScaleValue;
use rayon::prelude::*;
use serde::Serialize;

/// Label shown for an album nobody has rated yet.
pub const UNRATED_LABEL: &str = "—";

/// Rating block of a listed album. `rank_value` is `None` while unrated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRatingView {
    pub rank_value: Option<ScaleValue>,
    pub rank_label: &'static str,
    pub final_album_rating: f64,
}

impl AlbumRatingView {
    #[must_use]
    pub const fn unrated() -> Self {
        Self {
            rank_value: None,
            rank_label: UNRATED_LABEL,
            final_album_rating: 0.0,
        }
    }
}

impl From<&AlbumRating> for AlbumRatingView {
    fn from(rating: &AlbumRating) -> Self {
        Self {
            rank_value: Some(rating.rank_value),
            rank_label: rating.rank_label,
            final_album_rating: rating.final_album_rating,
        }
    }
}

/// A listed album with its computed rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumWithRating {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub primary_type: String,
    pub artists: Vec<String>,
    pub modifiers: AlbumModifiers,
    pub tracks: Vec<Track>,
    pub has_ratings: bool,
    pub rating: AlbumRatingView,
    pub cover_url: Option<String>,
}

/// An album detail view: first release, full engine output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumDetail {
    pub album: AlbumWithReleases,
    pub tracks: Vec<Track>,
    pub has_ratings: bool,
    pub rating: AlbumRating,
}

/// An artist with its aggregated rating and album counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistWithRatings {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
    pub album_count: usize,
    pub rated_album_count: usize,
    pub avg_rating: f64,
    pub rank_value: ScaleValue,
    pub rank_label: &'static str,
    pub image_url: Option<String>,
}

/// Copy of `tracks` with every absent rating list replaced by an empty one.
#[must_use]
pub fn normalize_tracks(tracks: &[Track]) -> Vec<Track> {
    tracks
        .iter()
        .map(|t| Track {
            ratings: Some(t.ratings.clone().unwrap_or_default()),
            ..t.clone()
        })
        .collect()
}

/// `true` when any track carries at least one rating.
#[must_use]
pub fn has_album_ratings(tracks: &[Track]) -> bool {
    tracks
        .iter()
        .any(|t| t.ratings.as_ref().is_some_and(|r| !r.is_empty()))
}

#[must_use]
pub fn track_for_rating(track: &Track) -> TrackForRating {
    TrackForRating {
        duration_sec: track.duration_sec,
        ratings: track
            .ratings
            .iter()
            .flatten()
            .map(|r| RatingRecord::new(f64::from(r.score)))
            .collect(),
    }
}

#[must_use]
pub fn album_modifiers(album: &AlbumWithReleases) -> AlbumModifiers {
    AlbumModifiers {
        cover: album.album.cover_value,
        production: album.album.production_value,
        mix: album.album.mix_value,
    }
}

fn first_release_tracks(album: &AlbumWithReleases) -> Vec<Track> {
    album
        .releases
        .first()
        .map(|r| normalize_tracks(&r.tracks))
        .unwrap_or_default()
}

fn rate_tracks(tracks: &[Track], modifiers: &AlbumModifiers) -> AlbumRating {
    let shaped: Vec<TrackForRating> = tracks.iter().map(track_for_rating).collect();
    compute_album_rating(&shaped, modifiers)
}

/// List view of an album, rated from its first release only.
///
/// Unrated albums skip the engine and report [`AlbumRatingView::unrated`].
#[must_use]
pub fn transform_album_with_rating(album: &AlbumWithReleases) -> AlbumWithRating {
    let tracks = first_release_tracks(album);
    let has_ratings = has_album_ratings(&tracks);
    let modifiers = album_modifiers(album);

    let rating = match has_ratings {
        true => AlbumRatingView::from(&rate_tracks(&tracks, &modifiers)),
        false => AlbumRatingView::unrated(),
    };

    AlbumWithRating {
        id: album.album.id,
        title: album.album.title.clone(),
        year: album.album.year,
        primary_type: album.album.primary_type.to_string(),
        artists: album.artists.iter().map(|a| a.name.clone()).collect(),
        modifiers,
        tracks,
        has_ratings,
        rating,
        cover_url: album.album.cover_url.clone(),
    }
}

/// Detail view of an album. Always runs the engine, so an unrated album
/// comes back as rank 0 "Poor".
#[must_use]
pub fn transform_album_first_release(album: &AlbumWithReleases) -> AlbumDetail {
    let tracks = first_release_tracks(album);
    let has_ratings = has_album_ratings(&tracks);
    let rating = rate_tracks(&tracks, &album_modifiers(album));

    AlbumDetail {
        album: album.clone(),
        tracks,
        has_ratings,
        rating,
    }
}

/// Rating of one album for artist aggregation, across all of its releases.
#[must_use]
pub fn calculate_artist_album_rating(album: &AlbumWithReleases) -> AlbumRatingSummary {
    let tracks: Vec<Track> = album
        .releases
        .iter()
        .flat_map(|r| normalize_tracks(&r.tracks))
        .collect();

    if !has_album_ratings(&tracks) {
        return AlbumRatingSummary {
            rank_value: ScaleValue::Zero,
            final_album_rating: 0.0,
        };
    }

    AlbumRatingSummary::from(rate_tracks(&tracks, &album_modifiers(album)))
}

#[must_use]
pub fn transform_artist_with_ratings(artist: &ArtistWithAlbums) -> ArtistWithRatings {
    let album_ratings: Vec<AlbumRatingSummary> =
        artist.albums.iter().map(calculate_artist_album_rating).collect();
    let artist_rating = compute_artist_rating(&album_ratings);
    let rated_album_count = album_ratings
        .iter()
        .filter(|a| a.rank_value.is_rated())
        .count();

    log::debug!(
        "Artist `{}': {rated_album_count}/{} albums rated, rank {}.",
        artist.artist.name,
        album_ratings.len(),
        artist_rating.rank_value
    );

    ArtistWithRatings {
        id: artist.artist.id,
        name: artist.artist.name.clone(),
        country: artist.artist.country.clone(),
        album_count: artist.albums.len(),
        rated_album_count,
        avg_rating: artist_rating.avg_final_rating,
        rank_value: artist_rating.rank_value,
        rank_label: artist_label(artist_rating.rank_value),
        image_url: artist.artist.image_url.clone(),
    }
}

/// Batch form of [`transform_artist_with_ratings`], in parallel. Output
/// order matches input order.
#[must_use]
pub fn transform_artists_with_ratings(artists: &[ArtistWithAlbums]) -> Vec<ArtistWithRatings> {
    artists.par_iter().map(transform_artist_with_ratings).collect()
}
