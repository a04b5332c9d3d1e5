use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::render::{NO_RESULTS_TEXT, ResultBody, ResultView, Status};
use crate::core::result::ResultModel;
use crate::core::timeline::{Message, Role};
use crate::tui::components::result_table::table_lines;
use crate::tui::rich_text;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders one timeline entry.
///
/// # Design
///
/// `Turn` is a **transient component**: it's created fresh each frame with the
/// message it draws. User turns show the question; assistant turns show the
/// result in render-contract order: status, SQL, explanation, then the table,
/// the no-results notice, or nothing further on failure.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) builds the same lines the
/// widget draws and asks `Paragraph::line_count` for the wrapped height, so
/// the parent `MessageList` can lay out the scroll canvas before rendering.
#[derive(Clone, Copy)]
pub struct Turn<'a> {
    pub message: &'a Message,
}

impl<'a> Turn<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still occupy a row.
            return 1;
        }
        let lines = body_lines(message, content_width);
        let rows = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn accent(message: &Message) -> Color {
    match (&message.role, &message.result) {
        (Role::User, _) => Color::Cyan,
        (Role::Assistant, Some(r)) if r.success => Color::Green,
        (Role::Assistant, _) => Color::Red,
    }
}

fn title(message: &Message) -> Line<'static> {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "querychat",
    };
    let at = message.created_at.with_timezone(&Local).format("%H:%M");
    Line::from(format!(" {who} · {at} "))
}

/// Everything inside the border, pre-cut to `width` where wrapping would
/// misalign (SQL and tables).
pub(crate) fn body_lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    match (&message.role, &message.result) {
        (Role::User, _) => message
            .content
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Cyan))))
            .collect(),
        (Role::Assistant, Some(result)) => result_lines(result, width),
        (Role::Assistant, None) => vec![Line::from(message.content.clone())],
    }
}

fn section_label(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
}

fn result_lines(result: &ResultModel, width: u16) -> Vec<Line<'static>> {
    let view = ResultView::new(result);
    let mut lines = Vec::new();

    let (glyph, color) = match view.status {
        Status::Success => ("✓", Color::Green),
        Status::Failure => ("✗", Color::Red),
    };
    lines.push(Line::from(Span::styled(
        format!("{glyph} {}", view.status.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    if view.status == Status::Failure
        && let Some(error) = result.error.as_deref()
        && error != view.explanation
    {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    if let Some(sql) = view.sql {
        lines.push(Line::default());
        lines.push(section_label("SQL"));
        lines.extend(rich_text::sql(sql));
    }

    if !view.explanation.trim().is_empty() {
        lines.push(Line::default());
        // Failure text comes from the database or the service and is shown as-is.
        lines.extend(match view.status {
            Status::Success => rich_text::explanation(view.explanation, Color::White),
            Status::Failure => rich_text::verbatim(view.explanation, Color::LightRed),
        });
    }

    match &view.body {
        ResultBody::Table(table) => {
            lines.push(Line::default());
            lines.push(section_label(format!("Results ({} rows):", table.total_rows)));
            lines.extend(table_lines(table, width));
        }
        ResultBody::NoResults => {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                NO_RESULTS_TEXT,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        ResultBody::Failed => {}
    }
    lines
}

impl Widget for Turn<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = accent(self.message);
        let block = Block::bordered()
            .title(title(self.message))
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color).add_modifier(Modifier::DIM))
            .title_style(Style::default().fg(color))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(body_lines(self.message, inner_area.width))
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}
