//! Command-line mode selection

/// What the program was asked to do, resolved once from the first argument
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CliMode {
    /// No argument: prompt for search text or URLs until input ends
    Interactive,
    /// `-p` / `--playlist`: pick among the user's own playlists
    UserPlaylists,
    /// `-ls` / `--liked-songs`: download every liked song
    LikedSongs,
    /// `-h` / `--help`
    Help,
    /// Any other argument: a URL, URI or search text
    Direct(String),
}

pub const USAGE: &str = "\
Usage: spotify-dl [OPTION | URL | SEARCH]

With no argument, prompts for search text or a Spotify URL repeatedly.

Options:
  -p,  --playlist      Download one or more of your own playlists
  -ls, --liked-songs   Download all of your liked songs
  -h,  --help          Show this help

Environment:
  SPOTIFY_DL_CONFIG        Path of a JSON config file (default: spotify-dl.json)
  SPOTIFY_DL_ROOT          Download folder for music
  SPOTIFY_DL_PODCAST_ROOT  Download folder for podcast episodes
  SPOTIFY_DL_CACHE         Credentials cache folder
  SPOTIFY_DL_LOG_DIR       Log folder
  SPOTIFY_DL_SEARCH_LIMIT  Results per search category (1-50)
  SPOTIFY_DL_ENCODER       Encoder command reading PCM on stdin, {} is the output path
  SPOTIFY_DL_ENCODER_EXT   Extension of encoded files (default: ogg)
  RUST_LOG                 Log filter
";

impl CliMode {
    /// Resolves the mode from the program arguments, excluding the program name.
    ///
    /// Only the first argument is significant.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(first) = args.into_iter().next().map(Into::into) else {
            return Self::Interactive;
        };

        match first.as_str() {
            "-p" | "--playlist" => Self::UserPlaylists,
            "-ls" | "--liked-songs" => Self::LikedSongs,
            "-h" | "--help" => Self::Help,
            _ if first.trim().is_empty() => Self::Interactive,
            _ => Self::Direct(first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_interactive() {
        assert_eq!(CliMode::from_args(Vec::<String>::new()), CliMode::Interactive);
        assert_eq!(CliMode::from_args([""]), CliMode::Interactive);
    }

    #[test]
    fn recognizes_short_and_long_flags() {
        assert_eq!(CliMode::from_args(["-p"]), CliMode::UserPlaylists);
        assert_eq!(CliMode::from_args(["--playlist"]), CliMode::UserPlaylists);
        assert_eq!(CliMode::from_args(["-ls"]), CliMode::LikedSongs);
        assert_eq!(CliMode::from_args(["--liked-songs"]), CliMode::LikedSongs);
        assert_eq!(CliMode::from_args(["--help"]), CliMode::Help);
    }

    #[test]
    fn anything_else_is_direct_input() {
        assert_eq!(
            CliMode::from_args(["https://open.spotify.com/track/abc", "ignored"]),
            CliMode::Direct("https://open.spotify.com/track/abc".into())
        );
        assert_eq!(
            CliMode::from_args(["daft punk"]),
            CliMode::Direct("daft punk".into())
        );
    }
}
