//! Maps user-typed ordinals onto the flattened search result index space.
//!
//! Categories are numbered consecutively from 1 in [`SearchResultSection::ALL`] order; an
//! empty category takes up no numbers.

use thiserror::Error;

use crate::model::{CatalogItem, ResourceRef, SearchResultSection, SearchResults};

/// Upper bound on the number of ordinals a single `a-b` range may expand to
const MAX_RANGE_LEN: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no selection given")]
    Empty,

    #[error("'{0}' is not a valid selection")]
    Invalid(String),

    #[error("selection {ordinal} is out of range, choose between 1 and {total}")]
    OutOfRange { ordinal: usize, total: usize },
}

/// The inclusive ordinal range covered by one non-empty category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryRange {
    pub section: SearchResultSection,
    pub start: usize,
    pub end: usize,
}

impl CategoryRange {
    pub fn contains(&self, ordinal: usize) -> bool {
        (self.start..=self.end).contains(&ordinal)
    }
}

/// First ordinal of every category, empty ones included, from the ordered per-category counts.
///
/// An empty category starts where the next one does.
pub fn category_starts(counts: &[(SearchResultSection, usize)]) -> Vec<usize> {
    counts
        .iter()
        .scan(1usize, |next, &(_, count)| {
            let start = *next;
            *next += count;
            Some(start)
        })
        .collect()
}

/// Computes the ordinal range of each non-empty category from the ordered per-category counts.
pub fn category_ranges(counts: &[(SearchResultSection, usize)]) -> Vec<CategoryRange> {
    counts
        .iter()
        .zip(category_starts(counts))
        .filter(|&(&(_, count), _)| count > 0)
        .map(|(&(section, count), start)| CategoryRange {
            section,
            start,
            end: start + count - 1,
        })
        .collect()
}

/// A selected ordinal resolved to its category and item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedItem<'a> {
    pub ordinal: usize,
    pub section: SearchResultSection,
    pub local_index: usize,
    pub item: &'a CatalogItem,
}

impl ResolvedItem<'_> {
    pub fn reference(&self) -> ResourceRef {
        self.section.reference(&self.item.id)
    }
}

/// Resolves every ordinal of `selection`, preserving selection order.
///
/// Fails on the first ordinal outside `1..=results.total()`; nothing is resolved in that case.
pub fn resolve<'a>(
    results: &'a SearchResults,
    selection: &[usize],
) -> Result<Vec<ResolvedItem<'a>>, SelectionError> {
    let ranges = category_ranges(&results.counts());
    let total = results.total();

    selection
        .iter()
        .map(|&ordinal| {
            let range = ranges
                .iter()
                .find(|range| range.contains(ordinal))
                .ok_or(SelectionError::OutOfRange { ordinal, total })?;
            let local_index = ordinal - range.start;
            let item = results
                .category(range.section)
                .items
                .get(local_index)
                .ok_or(SelectionError::OutOfRange { ordinal, total })?;

            tracing::trace!(ordinal, section = ?range.section, local_index, "Resolved selection");
            Ok(ResolvedItem {
                ordinal,
                section: range.section,
                local_index,
                item,
            })
        })
        .collect()
}

/// Picks items from a plain numbered list, preserving selection order.
pub fn pick<'a, T>(items: &'a [T], selection: &[usize]) -> Result<Vec<&'a T>, SelectionError> {
    selection
        .iter()
        .map(|&ordinal| {
            ordinal
                .checked_sub(1)
                .and_then(|index| items.get(index))
                .ok_or(SelectionError::OutOfRange {
                    ordinal,
                    total: items.len(),
                })
        })
        .collect()
}

/// Parses ordinals typed by the user.
///
/// Accepts single numbers and inclusive `a-b` ranges separated by commas and/or whitespace,
/// e.g. `1, 3-5 8`.
pub fn parse_selection(text: &str) -> Result<Vec<usize>, SelectionError> {
    let mut ordinals = Vec::new();

    for token in text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        let invalid = || SelectionError::Invalid(token.to_string());
        match token.split_once('-') {
            Some((start, end)) => {
                let start: usize = start.parse().map_err(|_| invalid())?;
                let end: usize = end.parse().map_err(|_| invalid())?;
                if start > end || end - start >= MAX_RANGE_LEN {
                    return Err(invalid());
                }
                ordinals.extend(start..=end);
            }
            None => ordinals.push(token.parse().map_err(|_| invalid())?),
        }
    }

    if ordinals.is_empty() {
        return Err(SelectionError::Empty);
    }
    Ok(ordinals)
}
