//! Personal music catalogue with album and artist ratings.
//!
//! Core modules:
//! - [`scale`] - The eight-point rating scale and the quantizer
//! - [`labels`] - Rank labels and color tokens
//! - [`rating`] - Track, album and artist rating engines
//! - [`transform`] - Catalogue entities in, rated views out
//! - [`db`] - SQLite catalogue store
//!
//! ### Supporting Modules
//!
//! - [`models`] - Catalogue entities
//! - [`config`] - Data directory and runtime configuration
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use platter::rating::{
//!     compute_album_rating, compute_artist_rating, AlbumModifiers, AlbumRatingSummary, TrackForRating,
//! };
//! use platter::scale::ScaleValue;
//!
//! let tracks = vec![
//!     TrackForRating::new(Some(180), &[10.0]),
//!     TrackForRating::new(Some(120), &[5.0]),
//! ];
//! let album = compute_album_rating(&tracks, &AlbumModifiers::new(9, 10, 9));
//! assert_eq!(album.base_rating, 40.0);
//! assert_eq!(album.rank_value, ScaleValue::Seven);
//!
//! let artist = compute_artist_rating(&[AlbumRatingSummary::from(&album)]);
//! assert_eq!(artist.rank_label, "Iconic");
//! ```
//!
//! ## Rating Details
//!
//! Track scores are integers from 0 to 10. An album's base rating is the sum
//! of its track scores weighted by track length in minutes, so long tracks
//! weigh more. Its rank is the plain mean of the scores snapped to the scale
//! `0 1 2 3 4 5 7 10`, with ties going up.
//!
//! Three quality modifiers (cover, production, mix, 0 to 10 each) add one
//! percent per point to the final rating, plus a further 5% when all three
//! are at least 9.
//!
//! An artist's rank is the mean rank of its rated albums, snapped once.
//!
//! ## Error Handling
//!
//! The rating engines cannot fail. Store, configuration and CLI functions
//! return `anyhow::Result` with context attached.

pub mod cli;
pub mod completion;
pub mod config;
pub mod db;
pub mod labels;
pub mod models;
pub mod rating;
pub mod scale;
pub mod transform;
