//! SQLite catalogue store.
//!
//! Holds artists, albums (release groups), releases, tracks, ratings and
//! album quality modifiers. Loads come back as the nested shapes in
//! [`crate::models`], ready for [`crate::transform`].
//!
//! Scores and modifiers are validated here, on the way in. The rating
//! engines never see an out-of-range stored value.

use crate::models::{
    validate_review, validate_score, Album, AlbumType, AlbumWithReleases, Artist, ArtistWithAlbums, Rating,
    Release, ReleaseWithTracks, Track,
};
use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Default number of albums returned by [`list_albums`].
pub const DEFAULT_ALBUM_LIMIT: usize = 50;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS artists (
    id        INTEGER PRIMARY KEY,
    name      TEXT    NOT NULL,
    sort_name TEXT,
    country   TEXT,
    image_url TEXT
);
CREATE TABLE IF NOT EXISTS albums (
    id               INTEGER PRIMARY KEY,
    title            TEXT    NOT NULL,
    year             INTEGER,
    primary_type     TEXT    NOT NULL DEFAULT 'ALBUM',
    cover_value      INTEGER CHECK (cover_value BETWEEN 0 AND 10),
    production_value INTEGER CHECK (production_value BETWEEN 0 AND 10),
    mix_value        INTEGER CHECK (mix_value BETWEEN 0 AND 10),
    cover_url        TEXT,
    updated_at       INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);
CREATE TABLE IF NOT EXISTS album_artists (
    album_id  INTEGER NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
    artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
    position  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (album_id, artist_id)
);
CREATE TABLE IF NOT EXISTS releases (
    id       INTEGER PRIMARY KEY,
    album_id INTEGER NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
    title    TEXT    NOT NULL,
    label    TEXT
);
CREATE TABLE IF NOT EXISTS tracks (
    id           INTEGER PRIMARY KEY,
    release_id   INTEGER NOT NULL REFERENCES releases(id) ON DELETE CASCADE,
    number       INTEGER NOT NULL,
    title        TEXT    NOT NULL,
    duration_sec INTEGER
);
CREATE TABLE IF NOT EXISTS ratings (
    id       INTEGER PRIMARY KEY,
    track_id INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
    user     TEXT    NOT NULL,
    score    INTEGER NOT NULL CHECK (score BETWEEN 0 AND 10),
    review   TEXT,
    UNIQUE (user, track_id)
);
CREATE INDEX IF NOT EXISTS idx_releases_album ON releases(album_id);
CREATE INDEX IF NOT EXISTS idx_tracks_release ON tracks(release_id);
CREATE INDEX IF NOT EXISTS idx_ratings_track ON ratings(track_id);
";

/// New artist row.
#[derive(Debug, Clone, Default)]
pub struct NewArtist {
    pub name: String,
    pub sort_name: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

/// New album row, credited to `artist_ids` in order.
#[derive(Debug, Clone, Default)]
pub struct NewAlbum {
    pub title: String,
    pub year: Option<i32>,
    pub primary_type: AlbumType,
    pub cover_url: Option<String>,
    pub artist_ids: Vec<i64>,
}

/// Open (or create) the database at `db_path` and make sure the schema exists.
///
/// # Errors
///
/// Fails when the file cannot be opened or the schema cannot be applied.
pub fn open(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    prepare(&conn)?;
    debug!("Opened catalogue database at {}", db_path.display());
    Ok(conn)
}

/// In-memory database with the schema applied.
///
/// # Errors
///
/// Fails when SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .context("Failed to enable foreign keys")?;
    conn.execute_batch(SCHEMA)
        .context("Failed to create catalogue schema")?;
    Ok(())
}

/// # Errors
///
/// Fails on any SQLite error.
pub fn insert_artist(conn: &Connection, artist: &NewArtist) -> Result<i64> {
    conn.execute(
        "INSERT INTO artists (name, sort_name, country, image_url) VALUES (?1, ?2, ?3, ?4)",
        params![artist.name, artist.sort_name, artist.country, artist.image_url],
    )
    .with_context(|| format!("Failed to insert artist `{}'", artist.name))?;
    let id = conn.last_insert_rowid();
    debug!("Inserted artist {id} `{}'", artist.name);
    Ok(id)
}

/// Insert an album and its artist credits in one transaction.
///
/// # Errors
///
/// Fails when an artist id does not exist or on any SQLite error.
pub fn insert_album(conn: &mut Connection, album: &NewAlbum) -> Result<i64> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO albums (title, year, primary_type, cover_url) VALUES (?1, ?2, ?3, ?4)",
        params![album.title, album.year, album.primary_type.as_str(), album.cover_url],
    )
    .with_context(|| format!("Failed to insert album `{}'", album.title))?;
    let id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO album_artists (album_id, artist_id, position) VALUES (?1, ?2, ?3)",
        )?;
        for (position, artist_id) in album.artist_ids.iter().enumerate() {
            stmt.execute(params![id, artist_id, i64::try_from(position)?])
                .with_context(|| format!("Failed to credit artist {artist_id} on album {id}"))?;
        }
    }

    tx.commit().context("Committing album transaction failed")?;
    debug!("Inserted album {id} `{}'", album.title);
    Ok(id)
}

/// # Errors
///
/// Fails when the album does not exist or on any SQLite error.
pub fn insert_release(conn: &Connection, album_id: i64, title: &str, label: Option<&str>) -> Result<i64> {
    conn.execute(
        "INSERT INTO releases (album_id, title, label) VALUES (?1, ?2, ?3)",
        params![album_id, title, label],
    )
    .with_context(|| format!("Failed to insert release `{title}' for album {album_id}"))?;
    Ok(conn.last_insert_rowid())
}

/// # Errors
///
/// Fails when the release does not exist or on any SQLite error.
pub fn insert_track(
    conn: &Connection,
    release_id: i64,
    number: u32,
    title: &str,
    duration_sec: Option<u32>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO tracks (release_id, number, title, duration_sec) VALUES (?1, ?2, ?3, ?4)",
        params![release_id, number, title, duration_sec],
    )
    .with_context(|| format!("Failed to insert track `{title}' for release {release_id}"))?;
    Ok(conn.last_insert_rowid())
}

/// Rate a track, replacing this user's previous score if there is one.
///
/// A given `review` replaces the stored one; `None` keeps it.
///
/// # Errors
///
/// Fails when `score` is outside `0..=10`, the review is too long, the track
/// does not exist, or on any SQLite error.
pub fn upsert_rating(
    conn: &Connection,
    user: &str,
    track_id: i64,
    score: u8,
    review: Option<&str>,
) -> Result<Rating> {
    let score = validate_score("Score", score)?;
    let review = review.map(validate_review).transpose()?;

    let exists: bool = conn
        .query_row("SELECT EXISTS(SELECT 1 FROM tracks WHERE id = ?1)", [track_id], |row| row.get(0))
        .context("Failed to look up track")?;
    if !exists {
        anyhow::bail!("Track {track_id} not found");
    }

    let rating = conn
        .query_row(
            "INSERT INTO ratings (track_id, user, score, review) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user, track_id) DO UPDATE
             SET score = excluded.score, review = COALESCE(excluded.review, review)
             RETURNING id, track_id, user, score, review",
            params![track_id, user, score, review],
            rating_from_row,
        )
        .with_context(|| format!("Failed to store rating for track {track_id}"))?;

    debug!("User `{user}' rated track {track_id}: {score}");
    Ok(rating)
}

/// Remove a user's rating. Returns whether a rating was actually removed;
/// removing an absent rating is not an error.
///
/// # Errors
///
/// Fails on any SQLite error.
pub fn delete_rating(conn: &Connection, user: &str, track_id: i64) -> Result<bool> {
    let removed = conn
        .execute(
            "DELETE FROM ratings WHERE user = ?1 AND track_id = ?2",
            params![user, track_id],
        )
        .with_context(|| format!("Failed to delete rating for track {track_id}"))?;
    Ok(removed > 0)
}

/// Store all three quality modifiers of an album.
///
/// # Errors
///
/// Fails when a value is outside `0..=10`, the album does not exist, or on
/// any SQLite error.
pub fn update_album_modifiers(
    conn: &Connection,
    album_id: i64,
    cover: u8,
    production: u8,
    mix: u8,
) -> Result<()> {
    let cover = validate_score("Cover", cover)?;
    let production = validate_score("Production", production)?;
    let mix = validate_score("Mix", mix)?;

    let updated = conn
        .execute(
            "UPDATE albums
             SET cover_value = ?1, production_value = ?2, mix_value = ?3,
                 updated_at = strftime('%s', 'now')
             WHERE id = ?4",
            params![cover, production, mix, album_id],
        )
        .with_context(|| format!("Failed to update modifiers of album {album_id}"))?;
    if updated == 0 {
        anyhow::bail!("Album {album_id} not found");
    }

    debug!("Album {album_id} modifiers: cover {cover}, production {production}, mix {mix}");
    Ok(())
}

/// Every artist, alphabetically, without albums.
///
/// # Errors
///
/// Fails on any SQLite error.
pub fn list_artists(conn: &Connection) -> Result<Vec<Artist>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, sort_name, country, image_url FROM artists ORDER BY name ASC, id ASC",
    )?;
    let artists = stmt
        .query_map([], artist_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Cannot query artists")?;
    Ok(artists)
}

/// # Errors
///
/// Fails on any SQLite error.
pub fn get_album_with_releases(conn: &Connection, album_id: i64) -> Result<Option<AlbumWithReleases>> {
    let album = conn
        .query_row(
            &format!("{ALBUM_SELECT} WHERE id = ?1"),
            [album_id],
            album_from_row,
        )
        .optional()
        .with_context(|| format!("Cannot query album {album_id}"))?;

    album.map(|a| load_album_children(conn, a)).transpose()
}

/// Most recently updated albums first.
///
/// # Errors
///
/// Fails on any SQLite error.
pub fn list_albums(conn: &Connection, limit: usize) -> Result<Vec<AlbumWithReleases>> {
    let mut stmt = conn.prepare(&format!(
        "{ALBUM_SELECT} ORDER BY updated_at DESC, id DESC LIMIT ?1"
    ))?;
    let albums = stmt
        .query_map([i64::try_from(limit)?], album_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Cannot query albums")?;

    albums.into_iter().map(|a| load_album_children(conn, a)).collect()
}

/// An artist with every album it is credited on, newest first.
///
/// # Errors
///
/// Fails on any SQLite error.
pub fn get_artist_with_albums(conn: &Connection, artist_id: i64) -> Result<Option<ArtistWithAlbums>> {
    let artist = conn
        .query_row(
            "SELECT id, name, sort_name, country, image_url FROM artists WHERE id = ?1",
            [artist_id],
            artist_from_row,
        )
        .optional()
        .with_context(|| format!("Cannot query artist {artist_id}"))?;

    artist.map(|a| load_artist_albums(conn, a)).transpose()
}

/// Every artist with its albums, alphabetically.
///
/// # Errors
///
/// Fails on any SQLite error.
pub fn list_artists_with_albums(conn: &Connection) -> Result<Vec<ArtistWithAlbums>> {
    list_artists(conn)?
        .into_iter()
        .map(|a| load_artist_albums(conn, a))
        .collect()
}

const ALBUM_SELECT: &str = "SELECT id, title, year, primary_type, cover_value, production_value, mix_value, cover_url FROM albums";

fn load_artist_albums(conn: &Connection, artist: Artist) -> Result<ArtistWithAlbums> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.title, a.year, a.primary_type, a.cover_value, a.production_value, a.mix_value, a.cover_url
         FROM albums a
         JOIN album_artists aa ON aa.album_id = a.id
         WHERE aa.artist_id = ?1
         ORDER BY a.year DESC NULLS FIRST, a.id ASC",
    )?;
    let albums = stmt
        .query_map([artist.id], album_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Cannot query albums of artist {}", artist.id))?;

    let albums = albums
        .into_iter()
        .map(|a| load_album_children(conn, a))
        .collect::<Result<Vec<_>>>()?;

    Ok(ArtistWithAlbums { artist, albums })
}

fn load_album_children(conn: &Connection, album: Album) -> Result<AlbumWithReleases> {
    let mut stmt = conn.prepare(
        "SELECT ar.id, ar.name, ar.sort_name, ar.country, ar.image_url
         FROM artists ar
         JOIN album_artists aa ON aa.artist_id = ar.id
         WHERE aa.album_id = ?1
         ORDER BY aa.position ASC",
    )?;
    let artists = stmt
        .query_map([album.id], artist_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        "SELECT id, album_id, title, label FROM releases WHERE album_id = ?1 ORDER BY id ASC",
    )?;
    let releases = stmt
        .query_map([album.id], |row| {
            Ok(Release {
                id: row.get(0)?,
                album_id: row.get(1)?,
                title: row.get(2)?,
                label: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let releases = releases
        .into_iter()
        .map(|release| {
            let tracks = load_tracks(conn, release.id)?;
            Ok(ReleaseWithTracks { release, tracks })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Cannot load releases of album {}", album.id))?;

    Ok(AlbumWithReleases {
        album,
        artists,
        releases,
    })
}

fn load_tracks(conn: &Connection, release_id: i64) -> Result<Vec<Track>> {
    let mut stmt = conn.prepare(
        "SELECT id, release_id, number, title, duration_sec FROM tracks
         WHERE release_id = ?1 ORDER BY number ASC, id ASC",
    )?;
    let mut tracks = stmt
        .query_map([release_id], |row| {
            Ok(Track {
                id: row.get(0)?,
                release_id: row.get(1)?,
                number: row.get(2)?,
                title: row.get(3)?,
                duration_sec: row.get(4)?,
                ratings: None,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        "SELECT id, track_id, user, score, review FROM ratings WHERE track_id = ?1 ORDER BY id ASC",
    )?;
    for track in &mut tracks {
        let ratings = stmt
            .query_map([track.id], rating_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        track.ratings = Some(ratings);
    }

    Ok(tracks)
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        sort_name: row.get(2)?,
        country: row.get(3)?,
        image_url: row.get(4)?,
    })
}

fn album_from_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    let primary_type: String = row.get(3)?;
    Ok(Album {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
        primary_type: primary_type.parse().map_err(|e: anyhow::Error| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
        })?,
        cover_value: row.get(4)?,
        production_value: row.get(5)?,
        mix_value: row.get(6)?,
        cover_url: row.get(7)?,
    })
}

fn rating_from_row(row: &Row<'_>) -> rusqlite::Result<Rating> {
    Ok(Rating {
        id: row.get(0)?,
        track_id: row.get(1)?,
        user: row.get(2)?,
        score: row.get(3)?,
        review: row.get(4)?,
    })
}
