//! # InputBox Component
//!
//! The question editor at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and explicit line breaks
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter
//! - Grow with its content up to `MAX_VISIBLE_LINES`, then scroll internally
//!
//! ## State Management
//!
//! The session owns the canonical pending input. The box edits a local copy,
//! reports every change with `InputEvent::Changed`, and is re-synced from the
//! session after each dispatch with [`InputBox::sync`]. Submitting therefore
//! does not clear the box itself: it empties only when the session accepts
//! the question.

mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use text_wrap::{
    CONTENT_OFFSET, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, locate,
    next_char_boundary, prev_char_boundary, visual_rows,
};

const PLACEHOLDER: &str = "Ask a question about your cloud costs…";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed. The parent decides whether the text is accepted.
    Submit,
    /// The buffer text changed.
    Changed(String),
    /// Only the cursor moved.
    CursorMoved,
}

/// Text input component.
///
/// # Props
///
/// - `busy`: a request is in flight (changes the title, editing still allowed)
///
/// # State
///
/// - `buffer`: current text
/// - `cursor`: byte offset into `buffer`
/// - `scroll_offset`: first visible wrapped row
pub struct InputBox {
    pub busy: bool,
    buffer: String,
    cursor: usize,
    scroll_offset: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            busy: false,
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Adopt `text` as the buffer if it differs, moving the cursor to the end.
    pub fn sync(&mut self, text: &str) {
        if self.buffer != text {
            self.buffer = text.to_string();
            self.cursor = self.buffer.len();
            if self.buffer.is_empty() {
                self.scroll_offset = 0;
            }
        }
    }

    /// Required height for the current buffer, clamped to viewport limits.
    /// Returns a value in `[1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD]`.
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let rows = visual_rows(&self.buffer, inner_width(content_width)).len();
        let visible = u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .clamp(1, MAX_VISIBLE_LINES);
        visible + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) -> InputEvent {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        InputEvent::Changed(self.buffer.clone())
    }

    /// Keep the cursor row inside the visible window.
    fn update_scroll_offset(&mut self, cursor_row: u16, total_rows: u16) {
        let max_offset = total_rows.saturating_sub(MAX_VISIBLE_LINES);
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_LINES;
        }
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    fn title(&self) -> Line<'static> {
        let (label, hint) = if self.busy {
            (" Waiting for results… ", "")
        } else {
            (" Ask ", "Enter to send · Shift+Enter for newline ")
        };
        Line::from(vec![
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let rows = visual_rows(&self.buffer, width);
        let (cursor_row, cursor_col) = locate(&self.buffer, &rows, self.cursor);
        let total_rows = u16::try_from(rows.len()).unwrap_or(u16::MAX);
        let cursor_row = u16::try_from(cursor_row).unwrap_or(u16::MAX);
        self.update_scroll_offset(cursor_row, total_rows);

        let border_color = if self.busy { Color::DarkGray } else { Color::Green };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(1))
            .title(self.title());

        let lines: Vec<Line> = if self.buffer.is_empty() {
            vec![Line::from(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            rows.iter()
                .skip(usize::from(self.scroll_offset))
                .take(usize::from(MAX_VISIBLE_LINES))
                .map(|r| Line::from(&self.buffer[r.start..r.end]))
                .collect()
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(Style::default().fg(Color::Green)),
            area,
        );

        let x = area.x + CONTENT_OFFSET + cursor_col.min(width);
        let y = area.y + 1 + cursor_row.saturating_sub(self.scroll_offset);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => Some(self.insert(c.encode_utf8(&mut [0; 4]))),
            TuiEvent::Newline => Some(self.insert("\n")),
            TuiEvent::Paste(text) => {
                // Terminals paste CRLF; keep one newline per break.
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                Some(self.insert(&normalized))
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::Changed(self.buffer.clone())
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::Changed(self.buffer.clone())
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::CursorMoved
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::CursorMoved
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::CursorMoved
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::CursorMoved
                })
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(input: &mut InputBox, s: &str) {
        for c in s.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn rendered(input: &mut InputBox, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut input = InputBox::new();
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::Changed("a".into()))
        );
        type_str(&mut input, "bc");
        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::Changed("ab".into()))
        );
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_submit_keeps_buffer() {
        let mut input = InputBox::new();
        type_str(&mut input, "total cost");
        assert_eq!(input.handle_event(&TuiEvent::Submit), Some(InputEvent::Submit));
        assert_eq!(input.text(), "total cost");
    }

    #[test]
    fn test_newline_inserts_line_break() {
        let mut input = InputBox::new();
        type_str(&mut input, "a");
        input.handle_event(&TuiEvent::Newline);
        type_str(&mut input, "b");
        assert_eq!(input.text(), "a\nb");
    }

    #[test]
    fn test_paste_normalizes_crlf() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\r\ntwo".into()));
        assert_eq!(input.text(), "one\ntwo");
    }

    #[test]
    fn test_cursor_editing_mid_buffer() {
        let mut input = InputBox::new();
        type_str(&mut input, "café");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.text(), "caé");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.text(), "aé");
        assert_eq!(input.handle_event(&TuiEvent::CursorHome), None);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(input.handle_event(&TuiEvent::Delete), None);
        assert_eq!(input.handle_event(&TuiEvent::CursorLeft), None);
    }

    #[test]
    fn test_sync_replaces_buffer() {
        let mut input = InputBox::new();
        type_str(&mut input, "question");
        input.sync("");
        assert_eq!(input.text(), "");
        type_str(&mut input, "x");
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(20), 3);
        input.sync("a\nb\nc");
        assert_eq!(input.calculate_height(20), 5);
        input.sync("1\n2\n3\n4\n5\n6\n7\n8");
        assert_eq!(input.calculate_height(20), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_placeholder_and_busy_title() {
        let mut input = InputBox::new();
        let text = rendered(&mut input, 80, 3);
        assert!(text.contains("Ask a question"));
        assert!(text.contains("Enter to send"));

        input.busy = true;
        let text = rendered(&mut input, 80, 3);
        assert!(text.contains("Waiting for results"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut input = InputBox::new();
        input.sync("l1\nl2\nl3\nl4\nl5\nl6\nl7");
        let text = rendered(&mut input, 20, 7);
        assert!(text.contains("l7"));
        assert!(!text.contains("l1"));
    }
}
