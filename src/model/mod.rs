//! Model module - catalog data types and the catalog client
//!
//! - `types`: Core type definitions (resource references, sections, metadata)
//! - `content`: Search result categories and items
//! - `catalog`: The `Catalog` trait the rest of the application queries through
//! - `spotify_client`: Spotify Web API implementation of `Catalog`

mod types;
mod content;
mod catalog;
mod spotify_client;

pub use types::{
    AccountTier, AlbumInfo, EpisodeInfo, PlaylistInfo, ResourceRef, SavedTrack,
    SearchResultSection, TrackInfo,
};

pub use content::{CatalogItem, Category, SearchPayload, SearchResults};

pub use catalog::Catalog;

pub use spotify_client::SpotifyClient;
