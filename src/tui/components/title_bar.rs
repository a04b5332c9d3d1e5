//! # TitleBar Component
//!
//! Top status bar: app name, backend endpoint, request status, and a
//! "↓ New" indicator when the message list has content below the fold.
//!
//! Stateless. Everything it shows arrives as props:
//! - `endpoint`: from the resolved config
//! - `status`: derived from the session phase and the last result
//! - `spinner_frame`: animation tick while a request is in flight
//! - `has_unseen_content`: from the message list's scroll position
//! - `sql_copied`: a copy happened within the last two seconds

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// What the status segment of the bar says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarStatus {
    Ready,
    Querying,
    /// Label of the most recent result (success or failure text).
    Settled { label: String, success: bool },
}

pub struct TitleBar<'a> {
    pub endpoint: &'a str,
    pub status: BarStatus,
    pub spinner_frame: usize,
    pub has_unseen_content: bool,
    pub sql_copied: bool,
}

impl TitleBar<'_> {
    fn status_span(&self) -> Span<'static> {
        match &self.status {
            BarStatus::Ready => Span::styled("Ready", Style::default().fg(Color::DarkGray)),
            BarStatus::Querying => Span::styled(
                format!("{} Querying…", SPINNER[self.spinner_frame % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            ),
            BarStatus::Settled { label, success } => {
                let (glyph, color) = if *success {
                    ("✓", Color::Green)
                } else {
                    ("✗", Color::Red)
                };
                Span::styled(format!("{glyph} {label}"), Style::default().fg(color))
            }
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sep = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled(
                "QueryChat",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", self.endpoint),
                Style::default().fg(Color::DarkGray),
            ),
            sep.clone(),
            self.status_span(),
        ];
        if self.sql_copied {
            spans.push(sep.clone());
            spans.push(Span::styled("⧉ SQL copied", Style::default().fg(Color::Green)));
        }
        if self.has_unseen_content {
            spans.push(sep);
            spans.push(Span::styled(
                "↓ New",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(mut bar: TitleBar<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_ready_shows_endpoint() {
        let text = render(TitleBar {
            endpoint: "http://localhost:8000/query",
            status: BarStatus::Ready,
            spinner_frame: 0,
            has_unseen_content: false,
            sql_copied: false,
        });
        assert!(text.contains("QueryChat"));
        assert!(text.contains("http://localhost:8000/query"));
        assert!(text.contains("Ready"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_querying_shows_spinner() {
        let text = render(TitleBar {
            endpoint: "e",
            status: BarStatus::Querying,
            spinner_frame: 11,
            has_unseen_content: false,
            sql_copied: false,
        });
        assert!(text.contains("⠙ Querying"));
    }

    #[test]
    fn test_settled_failure_and_unseen() {
        let text = render(TitleBar {
            endpoint: "e",
            status: BarStatus::Settled {
                label: "Query failed".into(),
                success: false,
            },
            spinner_frame: 0,
            has_unseen_content: true,
            sql_copied: false,
        });
        assert!(text.contains("✗ Query failed"));
        assert!(text.contains("↓ New"));
        assert!(!text.contains("copied"));
    }

    #[test]
    fn test_copied_marker() {
        let text = render(TitleBar {
            endpoint: "e",
            status: BarStatus::Ready,
            spinner_frame: 0,
            has_unseen_content: false,
            sql_copied: true,
        });
        assert!(text.contains("SQL copied"));
    }
}
