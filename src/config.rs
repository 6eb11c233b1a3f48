//! Runtime configuration: defaults, an optional JSON file, then environment overrides

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "spotify-dl.json";
const CONFIG_ENV: &str = "SPOTIFY_DL_CONFIG";

/// The catalog accepts between 1 and 50 results per category
const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where tracks, albums and playlists are written
    pub root_path: PathBuf,
    /// Where podcast episodes are written
    pub podcast_root_path: PathBuf,
    /// Credentials and refresh token cache
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Results requested per search category
    pub search_limit: u32,
    pub skip_existing: bool,
    /// Shell command receiving raw PCM on stdin; when unset PCM is written as-is
    pub encoder_command: Option<String>,
    /// File extension of encoder output
    pub encoder_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("Downloads"),
            podcast_root_path: PathBuf::from("Downloads/Podcasts"),
            cache_dir: PathBuf::from(".cache"),
            log_dir: PathBuf::from(".logs"),
            search_limit: 10,
            skip_existing: true,
            encoder_command: None,
            encoder_extension: "ogg".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file named by `SPOTIFY_DL_CONFIG`, or `spotify-dl.json` if present,
    /// and applies `SPOTIFY_DL_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        config.validated()
    }

    /// Applies overrides looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SPOTIFY_DL_ROOT") {
            self.root_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("SPOTIFY_DL_PODCAST_ROOT") {
            self.podcast_root_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("SPOTIFY_DL_CACHE") {
            self.cache_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("SPOTIFY_DL_LOG_DIR") {
            self.log_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("SPOTIFY_DL_SEARCH_LIMIT") {
            self.search_limit = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "search_limit",
                value,
            })?;
        }
        if let Some(value) = lookup("SPOTIFY_DL_ENCODER") {
            self.encoder_command = Some(value).filter(|v| !v.trim().is_empty());
        }
        if let Some(value) = lookup("SPOTIFY_DL_ENCODER_EXT") {
            self.encoder_extension = value.trim().trim_start_matches('.').to_string();
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !(1..=MAX_SEARCH_LIMIT).contains(&self.search_limit) {
            return Err(ConfigError::InvalidValue {
                key: "search_limit",
                value: self.search_limit.to_string(),
            });
        }
        if self.encoder_extension.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "encoder_extension",
                value: self.encoder_extension,
            });
        }
        Ok(self)
    }

    /// Extension of downloaded audio files
    pub fn audio_extension(&self) -> &str {
        match self.encoder_command {
            Some(_) => &self.encoder_extension,
            None => "pcm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = Config::default().with_overrides(env(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search_limit, 10);
        assert!(config.skip_existing);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::default()
            .with_overrides(env(&[
                ("SPOTIFY_DL_ROOT", "/music"),
                ("SPOTIFY_DL_SEARCH_LIMIT", "25"),
                ("SPOTIFY_DL_ENCODER", "ffmpeg -f s16le -i - {}"),
            ]))
            .unwrap();
        assert_eq!(config.root_path, PathBuf::from("/music"));
        assert_eq!(config.search_limit, 25);
        assert_eq!(config.encoder_command.as_deref(), Some("ffmpeg -f s16le -i - {}"));
    }

    #[test]
    fn rejects_bad_search_limits() {
        for value in ["0", "51", "ten"] {
            let err = Config::default()
                .with_overrides(env(&[("SPOTIFY_DL_SEARCH_LIMIT", value)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { key: "search_limit", .. }));
        }
    }

    #[test]
    fn audio_extension_follows_encoder() {
        let raw = Config::default();
        assert_eq!(raw.audio_extension(), "pcm");

        let encoded = Config::default()
            .with_overrides(env(&[
                ("SPOTIFY_DL_ENCODER", "lame -r - {}"),
                ("SPOTIFY_DL_ENCODER_EXT", ".mp3"),
            ]))
            .unwrap();
        assert_eq!(encoded.audio_extension(), "mp3");
    }

    #[test]
    fn reads_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "root_path": "/srv/music", "skip_existing": false }}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/srv/music"));
        assert!(!config.skip_existing);
        assert_eq!(config.search_limit, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "root": "/srv/music" }}"#).unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
