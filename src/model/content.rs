//! Search result data: categories of catalog items in a fixed display order

use super::types::SearchResultSection;

/// One row of a search result category
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Tracks only
    pub explicit: bool,
    /// Tracks and albums
    pub artists: Vec<String>,
    /// Playlists only
    pub owner: Option<String>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_artists<I, S>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artists = artists.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Name as shown in result tables; explicit tracks carry an `[E]` marker
    pub fn display_name(&self) -> String {
        if self.explicit {
            format!("{} [E]", self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn artist_line(&self) -> String {
        self.artists.join(",")
    }
}

/// A labelled block of search results
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub section: SearchResultSection,
    pub items: Vec<CatalogItem>,
}

impl Category {
    pub fn new(section: SearchResultSection, items: Vec<CatalogItem>) -> Self {
        Self { section, items }
    }

    pub fn label(&self) -> &'static str {
        self.section.label()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tracks, albums and artists are hidden when empty; playlists are always listed.
    pub fn is_displayed(&self) -> bool {
        self.section == SearchResultSection::Playlists || !self.is_empty()
    }
}

/// Raw per-category item lists as returned by a catalog search.
///
/// A `None` entry means the catalog response did not contain that category at all.
#[derive(Clone, Debug, Default)]
pub struct SearchPayload {
    pub tracks: Option<Vec<CatalogItem>>,
    pub albums: Option<Vec<CatalogItem>>,
    pub artists: Option<Vec<CatalogItem>>,
    pub playlists: Option<Vec<CatalogItem>>,
}

/// Combined search results, always holding the four categories in
/// [`SearchResultSection::ALL`] order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResults {
    categories: [Category; 4],
}

impl SearchResults {
    pub fn new(
        tracks: Vec<CatalogItem>,
        albums: Vec<CatalogItem>,
        artists: Vec<CatalogItem>,
        playlists: Vec<CatalogItem>,
    ) -> Self {
        Self {
            categories: [
                Category::new(SearchResultSection::Tracks, tracks),
                Category::new(SearchResultSection::Albums, albums),
                Category::new(SearchResultSection::Artists, artists),
                Category::new(SearchResultSection::Playlists, playlists),
            ],
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, section: SearchResultSection) -> &Category {
        // categories are stored in ALL order
        let index = match section {
            SearchResultSection::Tracks => 0,
            SearchResultSection::Albums => 1,
            SearchResultSection::Artists => 2,
            SearchResultSection::Playlists => 3,
        };
        &self.categories[index]
    }

    /// Per-category item counts in display order
    pub fn counts(&self) -> [(SearchResultSection, usize); 4] {
        self.categories.each_ref().map(|c| (c.section, c.count()))
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(Category::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for SearchResults {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_lookup_matches_section() {
        let results = SearchResults::new(
            vec![CatalogItem::new("t", "t")],
            vec![CatalogItem::new("a", "a")],
            vec![CatalogItem::new("r", "r")],
            vec![CatalogItem::new("p", "p")],
        );
        for section in SearchResultSection::ALL {
            let category = results.category(section);
            assert_eq!(category.section, section);
            assert_eq!(category.count(), 1);
        }
    }

    #[test]
    fn explicit_marker_is_display_only() {
        let item = CatalogItem::new("1", "Song").with_explicit(true);
        assert_eq!(item.display_name(), "Song [E]");
        assert_eq!(item.name, "Song");
        assert_eq!(CatalogItem::new("2", "Clean").display_name(), "Clean");
    }

    #[test]
    fn playlists_are_displayed_even_when_empty() {
        let results = SearchResults::default();
        let shown: Vec<_> = results
            .categories()
            .iter()
            .filter(|c| c.is_displayed())
            .map(|c| c.section)
            .collect();
        assert_eq!(shown, vec![SearchResultSection::Playlists]);
    }

    #[test]
    fn counts_follow_fixed_order() {
        let results = SearchResults::new(
            vec![CatalogItem::new("t", "t")],
            vec![],
            vec![CatalogItem::new("r1", "r1"), CatalogItem::new("r2", "r2")],
            vec![],
        );
        assert_eq!(
            results.counts(),
            [
                (SearchResultSection::Tracks, 1),
                (SearchResultSection::Albums, 0),
                (SearchResultSection::Artists, 2),
                (SearchResultSection::Playlists, 0),
            ]
        );
        assert_eq!(results.total(), 3);
        assert_eq!(results.category(SearchResultSection::Artists).count(), 2);
    }
}
