//! Character wrapping and dimensional constants for the InputBox.
//!
//! Questions are short and often contain identifiers and SQL-ish fragments,
//! so the box wraps at the exact column rather than at word boundaries. Widths
//! are display columns (`unicode-width`), not bytes or chars.

use unicode_width::UnicodeWidthChar;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + left padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

/// One on-screen row of the buffer: `buffer[start..end]`, never containing `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct VisualRow {
    pub start: usize,
    pub end: usize,
}

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Split `text` into rows no wider than `width` columns.
///
/// Every logical line yields at least one row, so an empty buffer or a
/// trailing newline still produces a row for the cursor to sit on.
pub(super) fn visual_rows(text: &str, width: u16) -> Vec<VisualRow> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut row_width = 0;
        for (i, c) in line.char_indices() {
            let w = c.width().unwrap_or(0);
            if row_width + w > width && row_width > 0 {
                rows.push(VisualRow {
                    start: row_start,
                    end: line_start + i,
                });
                row_start = line_start + i;
                row_width = 0;
            }
            row_width += w;
        }
        let line_end = line_start + line.len();
        rows.push(VisualRow {
            start: row_start,
            end: line_end,
        });
        line_start = line_end + 1;
    }
    rows
}

/// Row index and display column of byte offset `pos`.
///
/// At a soft wrap the cursor belongs to the start of the next row.
pub(super) fn locate(text: &str, rows: &[VisualRow], pos: usize) -> (usize, u16) {
    let row = rows
        .iter()
        .rposition(|r| r.start <= pos)
        .unwrap_or(0);
    let Some(r) = rows.get(row) else {
        return (0, 0);
    };
    let end = pos.min(r.end);
    (row, display_width(&text[r.start..end]))
}

/// Display columns occupied by `s`.
pub(super) fn display_width(s: &str) -> u16 {
    let w: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    u16::try_from(w).unwrap_or(u16::MAX)
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
