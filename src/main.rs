//! # Platter - Personal Record Shelf
//!
//! Command-line front end for the Platter catalogue. Parses arguments, opens
//! the catalogue database and routes each subcommand to the library.
//!
//! ## Usage
//!
//! ```bash
//! platter add-artist "Sample Artist"
//! platter add-album "Example Album" --artist 1 --year 2018
//! platter add-release 1 "Example Album (CD)"
//! platter add-track 1 1 "Intro" --duration 92
//! platter rate 1 8
//! platter album 1
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;
use platter::cli::{self, Command};
use platter::config::RuntimeConfig;
use platter::db::{self, NewAlbum, NewArtist};
use platter::labels::{album_label, rating_bg, rating_color};
use platter::models::Track;
use platter::scale::quantize_rank;
use platter::{completion, transform};
use serde::Serialize;

/// Main entry point for the Platter application.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug platter artists` - Enable debug logging
/// - `RUST_LOG=platter::rating=trace platter album 3` - Engine intermediates
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let json = args.json;

    // Commands that never touch the catalogue
    match args.command {
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
            return Ok(());
        }
        Command::Quantize { mean } => {
            let rank = quantize_rank(mean);
            if json {
                print_json(&serde_json::json!({
                    "rank_value": rank,
                    "rank_label": album_label(rank),
                    "color": rating_color(rank),
                    "bg": rating_bg(rank),
                }))?;
            } else {
                println!("{rank} ({})", album_label(rank));
            }
            return Ok(());
        }
        _ => {}
    }

    let config = RuntimeConfig::resolve(args.db, args.user)?;
    let mut conn = db::open(&config.db_path)?;

    match args.command {
        // handled above
        Command::Completion { .. } | Command::Quantize { .. } => {}
        Command::Init => {
            info!("Catalogue ready at {}", config.db_path.display());
            println!("Catalogue ready at {}", config.db_path.display());
        }
        Command::AddArtist { name, sort_name, country, image_url } => {
            let id = db::insert_artist(&conn, &NewArtist { name: name.clone(), sort_name, country, image_url })?;
            info!("Added artist {id} `{name}'");
            print_created(json, "artist", id)?;
        }
        Command::AddAlbum { title, artists, year, primary_type, cover_url } => {
            let id = db::insert_album(
                &mut conn,
                &NewAlbum { title: title.clone(), year, primary_type, cover_url, artist_ids: artists },
            )?;
            info!("Added album {id} `{title}'");
            print_created(json, "album", id)?;
        }
        Command::AddRelease { album_id, title, label } => {
            let id = db::insert_release(&conn, album_id, &title, label.as_deref())?;
            print_created(json, "release", id)?;
        }
        Command::AddTrack { release_id, number, title, duration } => {
            let id = db::insert_track(&conn, release_id, number, &title, duration)?;
            print_created(json, "track", id)?;
        }
        Command::Rate { track_id, score, review } => {
            let rating = db::upsert_rating(&conn, &config.user, track_id, score, review.as_deref())?;
            info!("User `{}' rated track {track_id}: {score}", config.user);
            if json {
                print_json(&rating)?;
            } else {
                println!("Track {track_id} rated {score} ({})", album_label(quantize_rank(f64::from(score))));
            }
        }
        Command::Unrate { track_id } => {
            let removed = db::delete_rating(&conn, &config.user, track_id)?;
            if json {
                print_json(&serde_json::json!({ "success": true, "removed": removed }))?;
            } else if removed {
                println!("Rating removed from track {track_id}");
            } else {
                println!("Track {track_id} had no rating");
            }
        }
        Command::Modifiers { album_id, cover, production, mix } => {
            if cover.is_none() && production.is_none() && mix.is_none() {
                anyhow::bail!("Nothing to change: pass --cover, --production or --mix");
            }
            let album = db::get_album_with_releases(&conn, album_id)?
                .with_context(|| format!("Album {album_id} not found"))?;

            match transform::album_modifiers(&album).edited(cover, production, mix) {
                Some((c, p, m)) => {
                    db::update_album_modifiers(&conn, album_id, c, p, m)?;
                    info!("Album {album_id} modifiers set to {c}/{p}/{m}");
                }
                None => info!("Album {album_id} modifiers unchanged"),
            }
            show_album(&conn, album_id, json)?;
        }
        Command::Album { id } => show_album(&conn, id, json)?,
        Command::Albums { limit } => {
            let albums: Vec<transform::AlbumWithRating> = db::list_albums(&conn, limit)?
                .iter()
                .map(transform::transform_album_with_rating)
                .collect();
            if json {
                print_json(&albums)?;
            } else {
                for album in &albums {
                    print_album_line(album);
                }
            }
        }
        Command::Artist { id } => {
            let artist = db::get_artist_with_albums(&conn, id)?
                .with_context(|| format!("Artist {id} not found"))?;
            let summary = transform::transform_artist_with_ratings(&artist);
            let albums: Vec<transform::AlbumWithRating> =
                artist.albums.iter().map(transform::transform_album_with_rating).collect();

            if json {
                print_json(&serde_json::json!({ "artist": summary, "albums": albums }))?;
            } else {
                print_artist_line(&summary);
                for album in &albums {
                    print!("  ");
                    print_album_line(album);
                }
            }
        }
        Command::Artists => {
            let artists = db::list_artists_with_albums(&conn)?;
            let summaries = transform::transform_artists_with_ratings(&artists);
            if json {
                print_json(&summaries)?;
            } else {
                for artist in &summaries {
                    print_artist_line(artist);
                }
            }
        }
    }

    Ok(())
}

fn show_album(conn: &rusqlite::Connection, id: i64, json: bool) -> Result<()> {
    let album = db::get_album_with_releases(conn, id)?
        .with_context(|| format!("Album {id} not found"))?;
    let detail = transform::transform_album_first_release(&album);

    if json {
        return print_json(&detail);
    }

    let artists: Vec<&str> = album.artists.iter().map(|a| a.name.as_str()).collect();
    println!(
        "{} - {} ({})",
        artists.join(", "),
        album.album.title,
        album.album.year.map_or_else(|| "????".to_string(), |y| y.to_string())
    );
    for track in &detail.tracks {
        print_track_line(track);
    }

    let modifiers = transform::album_modifiers(&album);
    println!(
        "Modifiers: cover {} / production {} / mix {}",
        show_modifier(modifiers.cover),
        show_modifier(modifiers.production),
        show_modifier(modifiers.mix)
    );

    let rating = &detail.rating;
    match detail.has_ratings {
        true => println!(
            "Rating: {} {} - final {:.2} (base {:.2} x{:.3})",
            rating.rank_value, rating.rank_label, rating.final_album_rating, rating.base_rating, rating.quality_boost
        ),
        false => println!("Rating: {}", transform::UNRATED_LABEL),
    }
    Ok(())
}

fn print_track_line(track: &Track) {
    let score = track
        .ratings
        .iter()
        .flatten()
        .next()
        .map_or_else(|| "-".to_string(), |r| r.score.to_string());
    println!(
        "  {:>2}. {:<40} {:>6}  {:>2}",
        track.number,
        track.title,
        format_duration(track.duration_sec),
        score
    );
}

fn print_album_line(album: &transform::AlbumWithRating) {
    let rank = album
        .rating
        .rank_value
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    println!(
        "[{:>3}] {} - {} ({}) {:>2} {} {:.1}",
        album.id,
        album.artists.join(", "),
        album.title,
        album.year.map_or_else(|| "????".to_string(), |y| y.to_string()),
        rank,
        album.rating.rank_label,
        album.rating.final_album_rating
    );
}

fn print_artist_line(artist: &transform::ArtistWithRatings) {
    println!(
        "[{:>3}] {} - {} {} (avg {}, {}/{} albums rated)",
        artist.id,
        artist.name,
        artist.rank_value,
        artist.rank_label,
        artist.avg_rating,
        artist.rated_album_count,
        artist.album_count
    );
}

fn print_created(json: bool, kind: &str, id: i64) -> Result<()> {
    if json {
        print_json(&serde_json::json!({ "kind": kind, "id": id }))
    } else {
        println!("Created {kind} {id}");
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn show_modifier(value: Option<u8>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn format_duration(duration_sec: Option<u32>) -> String {
    duration_sec.map_or_else(|| "--:--".to_string(), |s| format!("{}:{:02}", s / 60, s % 60))
}
