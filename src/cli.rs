//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `platter` binary. The binary is a thin
//! shell over the library: every command opens the catalogue, calls into
//! [`crate::db`] / [`crate::transform`], and prints the result.
//!
//! ## Examples
//!
//! ```bash
//! platter add-artist "Sample Artist" --country HU
//! platter add-album "Example Album" --artist 1 --year 2018
//! platter rate 12 8
//! platter modifiers 3 --cover 9 --production 10 --mix 9
//! platter artist 1
//! ```

use crate::config::{DB_ENV, USER_ENV};
use crate::models::AlbumType;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "platter")]
#[command(about = "Platter: a personal record shelf - catalogue, rate and rank your music")]
#[command(version)]
pub struct Args {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true, env = DB_ENV)]
    pub db: Option<PathBuf>,

    /// Whose ratings to write
    #[arg(long, global = true, env = USER_ENV)]
    pub user: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the catalogue database if it does not exist
    Init,

    /// Add an artist
    AddArtist {
        name: String,

        /// Name used for sorting, e.g. "Beatles, The"
        #[arg(long)]
        sort_name: Option<String>,

        /// ISO country code
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Add an album (release group)
    AddAlbum {
        title: String,

        /// Credited artist id; repeat for several artists, in credit order
        #[arg(long = "artist", required = true)]
        artists: Vec<i64>,

        #[arg(long)]
        year: Option<i32>,

        /// ALBUM, SINGLE, EP, COMPILATION, LIVE or OTHER
        #[arg(long = "type", default_value = "ALBUM")]
        primary_type: AlbumType,

        #[arg(long)]
        cover_url: Option<String>,
    },

    /// Add a release (edition) of an album
    AddRelease {
        album_id: i64,
        title: String,

        #[arg(long)]
        label: Option<String>,
    },

    /// Add a track to a release
    AddTrack {
        release_id: i64,
        number: u32,
        title: String,

        /// Track length in seconds
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Rate a track from 0 to 10
    Rate {
        track_id: i64,
        score: u8,

        /// Written review, up to 5000 characters. Re-rating without one
        /// keeps the previous review.
        #[arg(long)]
        review: Option<String>,
    },

    /// Remove your rating from a track
    Unrate {
        track_id: i64,
    },

    /// Set the quality modifiers of an album (0 to 10 each)
    ///
    /// A modifier left out keeps its stored value, or 5 if it was never set.
    /// Nothing is saved unless a value changes.
    Modifiers {
        album_id: i64,

        #[arg(long)]
        cover: Option<u8>,

        #[arg(long)]
        production: Option<u8>,

        #[arg(long)]
        mix: Option<u8>,
    },

    /// Show an album with its tracks and rating
    Album {
        id: i64,
    },

    /// List albums, most recently updated first
    Albums {
        #[arg(long, default_value_t = crate::db::DEFAULT_ALBUM_LIMIT)]
        limit: usize,
    },

    /// Show an artist with its rating and albums
    Artist {
        id: i64,
    },

    /// List artists with their ratings
    Artists,

    /// Snap a mean rating onto the rating scale
    Quantize {
        #[arg(allow_negative_numbers = true)]
        mean: f64,
    },

    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::{OsStr, OsString};

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_rate() {
        let args = Args::try_parse_from(["platter", "rate", "12", "8"]).unwrap();
        assert!(matches!(args.command, Command::Rate { track_id: 12, score: 8, review: None }));
    }

    #[test]
    fn test_parse_rate_with_review() {
        let args = Args::try_parse_from(["platter", "rate", "12", "9", "--review", "Great closer"]).unwrap();
        match args.command {
            Command::Rate { review, .. } => assert_eq!(review.as_deref(), Some("Great closer")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_album_with_several_artists() {
        let args = Args::try_parse_from([
            "platter", "add-album", "Duets", "--artist", "1", "--artist", "2", "--type", "ep",
        ])
        .unwrap();

        match args.command {
            Command::AddAlbum { artists, primary_type, .. } => {
                assert_eq!(artists, vec![1, 2]);
                assert_eq!(primary_type, AlbumType::Ep);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_mean() {
        let args = Args::try_parse_from(["platter", "quantize", "-5"]).unwrap();
        assert!(matches!(args.command, Command::Quantize { mean } if mean == -5.0));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["platter", "artists", "--json", "--db", "/tmp/x.db"]).unwrap();
        assert!(args.json);
        assert_eq!(args.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_env_overrides_use_config_names() {
        let cmd = Args::command();
        let env_of = |id: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == id)
                .and_then(|a| a.get_env())
                .map(OsStr::to_os_string)
        };

        assert_eq!(env_of("db"), Some(OsString::from(DB_ENV)));
        assert_eq!(env_of("user"), Some(OsString::from(USER_ENV)));
    }
}
