//! Plain-text table for a result's rows.
//!
//! Columns size to their widest cell (in display columns), capped at
//! `MAX_COLUMN_WIDTH`. Lines never exceed the width they are built for;
//! anything longer is cut with `…` so the surrounding paragraph never wraps
//! a table row.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::render::TableView;

const MAX_COLUMN_WIDTH: usize = 32;
const COLUMN_GAP: &str = " │ ";
const ELLIPSIS: char = '…';

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Control characters would break the grid; show them as spaces.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Left-align `text` in a cell exactly `width` columns wide.
fn pad_cell(text: &str, width: usize) -> String {
    let cut = truncate_to_width(&single_line(text), width);
    let fill = width.saturating_sub(cut.width());
    format!("{cut}{}", " ".repeat(fill))
}

fn column_widths(table: &TableView) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| single_line(c).width())
                .chain(std::iter::once(single_line(h).width()))
                .max()
                .unwrap_or(0)
                .clamp(1, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn join_cells(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| pad_cell(c, w))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

/// Header, rule, data rows, then the truncation note when rows were capped.
pub fn table_lines(table: &TableView, max_width: u16) -> Vec<Line<'static>> {
    let max_width = usize::from(max_width);
    let widths = column_widths(table);
    let fit = |s: String| truncate_to_width(s.trim_end(), max_width);

    let header = fit(join_cells(&table.headers, &widths));
    let rule = fit(
        widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );

    let mut lines = vec![
        Line::from(Span::styled(
            header,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(rule, Style::default().fg(Color::DarkGray))),
    ];
    lines.extend(table.rows.iter().map(|row| {
        Line::from(Span::styled(
            fit(join_cells(row, &widths)),
            Style::default().fg(Color::White),
        ))
    }));
    if let Some(note) = table.truncation_note() {
        lines.push(Line::from(Span::styled(
            note,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}
