//! Text rendering of search results and playlist listings

use ratatui::layout::Constraint;

use crate::model::{Category, PlaylistInfo, SearchResultSection, SearchResults};
use crate::selection::category_starts;
use super::utils::{number_column_width, render_table};

pub const NO_RESULTS: &str = "NO RESULTS FOUND";

/// Renders every displayed category with its flattened ordinals.
///
/// Tracks, albums and artists are left out entirely when empty; the playlists section is always
/// shown, even as an empty table.
pub fn render_search_results(results: &SearchResults, width: u16) -> String {
    let starts = category_starts(&results.counts());

    results
        .categories()
        .iter()
        .zip(starts)
        .filter(|(category, _)| category.is_displayed())
        .map(|(category, start)| {
            format!(
                "###  {}  ###\n{}\n",
                category.label(),
                render_category(category, start, width)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_category(category: &Category, start: usize, width: u16) -> String {
    let num_width = number_column_width(start, category.count());
    let numbered = category.items.iter().zip(start..);

    match category.section {
        SearchResultSection::Tracks => render_table(
            &["S.NO", "Name", "Artists"],
            numbered
                .map(|(item, n)| vec![n.to_string(), item.display_name(), item.artist_line()])
                .collect(),
            &[Constraint::Length(num_width), Constraint::Fill(3), Constraint::Fill(2)],
            width,
        ),
        SearchResultSection::Albums => render_table(
            &["S.NO", "Album", "Artists"],
            numbered
                .map(|(item, n)| vec![n.to_string(), item.display_name(), item.artist_line()])
                .collect(),
            &[Constraint::Length(num_width), Constraint::Fill(3), Constraint::Fill(2)],
            width,
        ),
        SearchResultSection::Artists => render_table(
            &["S.NO", "Name"],
            numbered
                .map(|(item, n)| vec![n.to_string(), item.display_name()])
                .collect(),
            &[Constraint::Length(num_width), Constraint::Fill(1)],
            width,
        ),
        SearchResultSection::Playlists => render_table(
            &["S.NO", "Name", "Owner"],
            numbered
                .map(|(item, n)| {
                    vec![n.to_string(), item.display_name(), item.owner.clone().unwrap_or_default()]
                })
                .collect(),
            &[Constraint::Length(num_width), Constraint::Fill(3), Constraint::Fill(2)],
            width,
        ),
    }
}

/// Numbered listing of the user's own playlists
pub fn render_playlists(playlists: &[PlaylistInfo], width: u16) -> String {
    render_table(
        &["S.NO", "Name", "Owner", "Tracks"],
        playlists
            .iter()
            .zip(1..)
            .map(|(playlist, n)| {
                vec![
                    n.to_string(),
                    playlist.name.clone(),
                    playlist.owner.clone(),
                    playlist.total_tracks.to_string(),
                ]
            })
            .collect(),
        &[
            Constraint::Length(number_column_width(1, playlists.len())),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(6),
        ],
        width,
    )
}
