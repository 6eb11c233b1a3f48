//! Utility functions for rendering widgets to plain text

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Row, Table, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Narrowest table we render, regardless of terminal size
const MIN_TABLE_WIDTH: u16 = 40;

/// Width available for tables: the terminal width, or 100 columns when it is unknown
pub fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .unwrap_or(100)
        .max(MIN_TABLE_WIDTH)
}

/// Renders a bordered table with a header row into lines of text.
///
/// `widths` holds one constraint per column; the first column is sized to fit the row numbers.
pub fn render_table(
    headers: &[&str],
    rows: Vec<Vec<String>>,
    widths: &[Constraint],
    width: u16,
) -> String {
    // borders + header
    let height = rows.len() as u16 + 3;
    let area = Rect::new(0, 0, width.max(MIN_TABLE_WIDTH), height);

    let header = Row::new(headers.iter().copied())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(rows.into_iter().map(Row::new), widths.iter().copied())
        .header(header)
        .column_spacing(2)
        .block(Block::bordered());

    let mut buffer = Buffer::empty(area);
    table.render(area, &mut buffer);
    buffer_to_string(&buffer)
}

/// Flattens a buffer into newline separated rows, dropping trailing blanks.
///
/// Cells covered by a wide grapheme are skipped so columns stay aligned in a terminal.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        let mut skip = 0usize;
        for x in area.left()..area.right() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = buffer[(x, y)].symbol();
            line.push_str(symbol);
            skip = symbol.width().saturating_sub(1);
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Width of the row number column for `count` rows starting at `first`
pub fn number_column_width(first: usize, count: usize) -> u16 {
    let last = first + count.saturating_sub(1);
    let digits = last.max(1).to_string().len();
    // never narrower than the "S.NO" header
    digits.max(4) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_rows() {
        let text = render_table(
            &["S.NO", "Name"],
            vec![
                vec!["1".into(), "First".into()],
                vec!["2".into(), "Second".into()],
            ],
            &[Constraint::Length(4), Constraint::Fill(1)],
            40,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with('┌'));
        assert!(lines[1].contains("S.NO") && lines[1].contains("Name"));
        assert!(lines[2].contains('1') && lines[2].contains("First"));
        assert!(lines[3].contains('2') && lines[3].contains("Second"));
        assert!(lines[4].starts_with('└'));
    }

    #[test]
    fn empty_table_still_has_header() {
        let text = render_table(
            &["S.NO", "Name", "Owner"],
            vec![],
            &[Constraint::Length(4), Constraint::Fill(3), Constraint::Fill(2)],
            40,
        );
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Owner"));
    }

    #[test]
    fn wide_characters_keep_borders_aligned() {
        let text = render_table(
            &["S.NO", "Name"],
            vec![vec!["1".into(), "東京".into()]],
            &[Constraint::Length(4), Constraint::Fill(1)],
            40,
        );
        let widths: Vec<usize> = text.lines().map(UnicodeWidthStr::width).collect();
        // every line ends at the right border
        assert!(widths.iter().all(|w| *w == 40), "{widths:?}");
    }

    #[test]
    fn number_column_fits_largest_ordinal() {
        assert_eq!(number_column_width(1, 9), 4);
        assert_eq!(number_column_width(95, 10), 4);
        assert_eq!(number_column_width(99_990, 20), 6);
        assert_eq!(number_column_width(1, 0), 4);
    }
}
