//! # HistoryPanel Component
//!
//! Side panel listing the recent-results cache, most recent first. Each entry
//! shows its status glyph, a row-count summary, and the SQL (or a placeholder
//! when none was generated), wrapped to the panel with `textwrap`.
//!
//! `selected` marks the entry Ctrl+Y copies from; `copied` marks the entry
//! whose SQL was just copied.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::history::HistoryEntryView;
use crate::tui::component::Component;

/// Width the panel asks for when shown.
pub const PANEL_WIDTH: u16 = 36;
/// SQL lines shown per entry before eliding.
const MAX_SQL_LINES: usize = 3;

pub struct HistoryPanel<'a> {
    pub entries: Vec<HistoryEntryView<'a>>,
    pub selected: Option<usize>,
    pub copied: Option<usize>,
}

#[derive(Clone, Copy, Default)]
struct EntryMarks {
    selected: bool,
    copied: bool,
}

fn entry_lines(entry: &HistoryEntryView<'_>, width: usize, marks: EntryMarks) -> Vec<Line<'static>> {
    let color = if entry.success { Color::Green } else { Color::Red };
    let mut header = vec![
        Span::styled(
            format!("{} ", entry.status_glyph()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(entry.summary(), Style::default().fg(color)),
    ];
    if marks.selected {
        header.insert(0, Span::styled("▸ ", Style::default().fg(Color::Cyan)));
    }
    if marks.copied {
        header.push(Span::styled(" · Copied", Style::default().fg(Color::Green)));
    }
    let mut lines = vec![Line::from(header)];

    // SQL is often one long line; collapse whitespace so it wraps evenly.
    let flat = entry.sql_label.split_whitespace().collect::<Vec<_>>().join(" ");
    let wrapped = textwrap::wrap(&flat, textwrap::Options::new(width.max(1)).break_words(true));
    let elided = wrapped.len() > MAX_SQL_LINES;
    for (i, part) in wrapped.into_iter().take(MAX_SQL_LINES).enumerate() {
        let mut text = part.into_owned();
        if elided && i + 1 == MAX_SQL_LINES {
            text.push('…');
        }
        let sql_style = if marks.selected {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(text, sql_style)));
    }
    lines.push(Line::default());
    lines
}

impl Component for HistoryPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" History ({}) ", self.entries.len()))
            .title_bottom(Line::from(" ^Y copy · ^L clear · ^O hide ").right_aligned())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        // Leave a column for the elision mark.
        let width = usize::from(inner.width.saturating_sub(1));

        let lines: Vec<Line> = if self.entries.is_empty() {
            vec![Line::from(Span::styled(
                "No queries yet",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            self.entries
                .iter()
                .enumerate()
                .flat_map(|(i, e)| {
                    let marks = EntryMarks {
                        selected: self.selected == Some(i),
                        copied: self.copied == Some(i),
                    };
                    entry_lines(e, width, marks)
                })
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::ResultModel;
    use crate::test_support::backend_rows;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(panel: &mut HistoryPanel<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(PANEL_WIDTH, 20)).unwrap();
        terminal.draw(|f| panel.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_panel() {
        let text = draw(&mut HistoryPanel {
            entries: vec![],
            selected: None,
            copied: None,
        });
        assert!(text.contains("History (0)"));
        assert!(text.contains("No queries yet"));
    }

    #[test]
    fn test_entries_show_status_and_sql() {
        let ok = backend_rows("SELECT provider FROM costs", 4);
        let failed = ResultModel::connection_failure();
        let text = draw(&mut HistoryPanel {
            entries: vec![HistoryEntryView::new(&ok), HistoryEntryView::new(&failed)],
            selected: None,
            copied: None,
        });
        assert!(text.contains("History (2)"));
        assert!(text.contains("✓ 4 rows"));
        assert!(text.contains("SELECT provider FROM"));
        assert!(text.contains("✗ Failed"));
        assert!(text.contains("Natural language query"));
    }

    #[test]
    fn test_long_sql_is_elided() {
        let long = format!("SELECT {} FROM t", "col, ".repeat(60));
        let result = backend_rows(&long, 1);
        let lines = entry_lines(&HistoryEntryView::new(&result), 30, EntryMarks::default());
        // status + 3 sql lines + spacer
        assert_eq!(lines.len(), 5);
        let last_sql: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(last_sql.ends_with('…'));
    }

    #[test]
    fn test_selected_and_copied_marks() {
        let first = backend_rows("SELECT newest FROM costs", 1);
        let second = backend_rows("SELECT older FROM costs", 2);
        let text = draw(&mut HistoryPanel {
            entries: vec![HistoryEntryView::new(&first), HistoryEntryView::new(&second)],
            selected: Some(1),
            copied: Some(1),
        });
        assert!(text.contains("▸ ✓ 2 rows · Copied"));
        assert!(!text.contains("▸ ✓ 1 rows"));
    }
}
