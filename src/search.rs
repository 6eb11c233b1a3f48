//! Multi-category catalog search.

use thiserror::Error;

use crate::model::{Catalog, CatalogItem, SearchPayload, SearchResultSection, SearchResults};

/// Errors surfaced by [`search`]. None are retried.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("catalog search failed: {0}")]
    Catalog(#[source] anyhow::Error),

    #[error("catalog response is missing the {} category", .0.label().to_lowercase())]
    Malformed(SearchResultSection),
}

/// Queries the catalog once for tracks, albums, artists and playlists matching `term`.
///
/// Each category holds at most `limit` items, starting at offset 0, in the order the catalog
/// returned them.
pub async fn search<C>(catalog: &C, term: &str, limit: u32) -> Result<SearchResults, SearchError>
where
    C: Catalog + ?Sized,
{
    let term = term.trim();
    if term.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    tracing::debug!(query = term, limit, "Performing search");

    let payload = catalog
        .search(term, limit, 0)
        .await
        .map_err(|e| {
            tracing::error!(query = term, error = %e, "Search failed");
            SearchError::Catalog(e)
        })?;

    let results = assemble(payload)?;

    let [tracks, albums, artists, playlists] = results.counts().map(|(_, count)| count);
    tracing::info!(
        query = term,
        tracks,
        albums,
        artists,
        playlists,
        "Search completed successfully"
    );

    Ok(results)
}

fn assemble(payload: SearchPayload) -> Result<SearchResults, SearchError> {
    fn require(
        items: Option<Vec<CatalogItem>>,
        section: SearchResultSection,
    ) -> Result<Vec<CatalogItem>, SearchError> {
        items.ok_or(SearchError::Malformed(section))
    }

    Ok(SearchResults::new(
        require(payload.tracks, SearchResultSection::Tracks)?,
        require(payload.albums, SearchResultSection::Albums)?,
        require(payload.artists, SearchResultSection::Artists)?,
        require(payload.playlists, SearchResultSection::Playlists)?,
    ))
}
