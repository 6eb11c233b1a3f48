//! Core type definitions for the application

use std::fmt;

/// A typed reference naming exactly one catalog object to download
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceRef {
    Track(String),
    Album(String),
    Playlist(String),
    Episode(String),
    Show(String),
    Artist(String),
}

impl ResourceRef {
    /// Build a reference from the kind segment of a URI or URL (`track`, `album`, ...)
    pub fn from_kind(kind: &str, id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        match kind {
            "track" => Some(Self::Track(id)),
            "album" => Some(Self::Album(id)),
            "playlist" => Some(Self::Playlist(id)),
            "episode" => Some(Self::Episode(id)),
            "show" => Some(Self::Show(id)),
            "artist" => Some(Self::Artist(id)),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Track(_) => "track",
            Self::Album(_) => "album",
            Self::Playlist(_) => "playlist",
            Self::Episode(_) => "episode",
            Self::Show(_) => "show",
            Self::Artist(_) => "artist",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Track(id)
            | Self::Album(id)
            | Self::Playlist(id)
            | Self::Episode(id)
            | Self::Show(id)
            | Self::Artist(id) => id,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spotify:{}:{}", self.kind(), self.id())
    }
}

/// Which section of search results an item belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchResultSection {
    Tracks,
    Albums,
    Artists,
    Playlists,
}

impl SearchResultSection {
    /// Display and numbering order of the sections
    pub const ALL: [Self; 4] = [Self::Tracks, Self::Albums, Self::Artists, Self::Playlists];

    pub fn label(self) -> &'static str {
        match self {
            Self::Tracks => "TRACKS",
            Self::Albums => "ALBUMS",
            Self::Artists => "ARTISTS",
            Self::Playlists => "PLAYLISTS",
        }
    }

    /// The downloadable reference for an item of this section
    pub fn reference(self, id: &str) -> ResourceRef {
        let id = id.to_string();
        match self {
            Self::Tracks => ResourceRef::Track(id),
            Self::Albums => ResourceRef::Album(id),
            Self::Artists => ResourceRef::Artist(id),
            Self::Playlists => ResourceRef::Playlist(id),
        }
    }
}

/// Subscription level of the logged in account
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountTier {
    Premium,
    Free,
}

/// Playlist metadata, used both for search dispatch and the user playlist picker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub total_tracks: u32,
}

/// Track metadata needed to name and fetch a download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub playable: bool,
}

/// Album metadata with its track listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumInfo {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub track_ids: Vec<String>,
}

/// Podcast episode metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub id: String,
    pub name: String,
    pub show: String,
}

/// An entry of the user's liked songs; `id` is missing for tracks removed from the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedTrack {
    pub id: Option<String>,
    pub name: String,
}
