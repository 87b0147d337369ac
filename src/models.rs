//! Catalogue entities as stored in the database.
//!
//! An album is a MusicBrainz-style release group: one or more releases
//! (pressings, editions), each with its own track list. Ratings hang off
//! tracks, quality modifiers off albums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest score a track rating or album modifier may take.
pub const MAX_SCORE: u8 = 10;
/// Longest accepted track review, in characters.
pub const MAX_REVIEW_CHARS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlbumType {
    #[default]
    Album,
    Single,
    Ep,
    Compilation,
    Live,
    Other,
}

impl AlbumType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Album => "ALBUM",
            Self::Single => "SINGLE",
            Self::Ep => "EP",
            Self::Compilation => "COMPILATION",
            Self::Live => "LIVE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for AlbumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlbumType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ALBUM" => Ok(Self::Album),
            "SINGLE" => Ok(Self::Single),
            "EP" => Ok(Self::Ep),
            "COMPILATION" => Ok(Self::Compilation),
            "LIVE" => Ok(Self::Live),
            "OTHER" => Ok(Self::Other),
            other => Err(anyhow::anyhow!("Unknown album type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub sort_name: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

/// A release group plus its stored quality modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub primary_type: AlbumType,
    pub cover_value: Option<u8>,
    pub production_value: Option<u8>,
    pub mix_value: Option<u8>,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: i64,
    pub album_id: i64,
    pub title: String,
    pub label: Option<String>,
}

/// One stored rating. Scores are integers on `0..=10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub track_id: i64,
    pub user: String,
    pub score: u8,
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub release_id: i64,
    pub number: u32,
    pub title: String,
    pub duration_sec: Option<u32>,
    /// `None` when the ratings were not loaded.
    pub ratings: Option<Vec<Rating>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseWithTracks {
    pub release: Release,
    pub tracks: Vec<Track>,
}

/// An album with everything needed to rate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumWithReleases {
    pub album: Album,
    pub artists: Vec<Artist>,
    pub releases: Vec<ReleaseWithTracks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistWithAlbums {
    pub artist: Artist,
    pub albums: Vec<AlbumWithReleases>,
}

/// Reject reviews longer than [`MAX_REVIEW_CHARS`] characters.
///
/// # Errors
///
/// Returns an error with the actual length when the review is too long.
pub fn validate_review(review: &str) -> anyhow::Result<&str> {
    let len = review.chars().count();
    if len > MAX_REVIEW_CHARS {
        anyhow::bail!("Review must be at most {MAX_REVIEW_CHARS} characters, got {len}");
    }
    Ok(review)
}

/// Reject scores outside `0..=10`.
///
/// # Errors
///
/// Returns an error naming `what` when `value` is out of range.
pub fn validate_score(what: &str, value: u8) -> anyhow::Result<u8> {
    if value > MAX_SCORE {
        anyhow::bail!("{what} must be between 0 and {MAX_SCORE}, got {value}");
    }
    Ok(value)
}
