//! # MessageList Component
//!
//! Scrollable view of the session timeline.
//!
//! ## Responsibilities
//!
//! - Display every turn in order
//! - Keep the view pinned to the newest turn unless the user scrolled away
//! - Show a pending row while a request is in flight
//! - Cache turn heights so long sessions do not re-measure every frame
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the timeline (props).
//! Turns never change after they are appended, so a cached height stays
//! valid until the width changes or the timeline is cleared.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::timeline::{Message, MessageId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Turn;
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Rows reserved under the last turn for the pending indicator.
const PENDING_ROWS: u16 = 2;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Canvas height of the last frame, pending row included
    pub canvas_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            canvas_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user is back at the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        self.clamp_scroll();
        if self.scroll_state.offset().y >= self.max_offset() {
            self.stick_to_bottom = true;
        }
    }

    /// Whether content sits below the visible window.
    pub fn has_unseen_content(&self) -> bool {
        self.scroll_state.offset().y < self.max_offset()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.messages, content_width);
        layout.heights.truncate(reusable);
        for message in self.messages.iter().skip(reusable) {
            layout
                .heights
                .push(Turn::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.messages, content_width);

        let total_height = layout.total_height();
        let pending = if self.is_loading { PENDING_ROWS } else { 0 };
        let canvas_height = total_height.saturating_add(pending);

        // 2. Clamp scroll against this frame's canvas
        self.state.viewport_height = area.height;
        self.state.canvas_height = canvas_height;
        if self.state.stick_to_bottom {
            let bottom = self.state.max_offset();
            self.state
                .scroll_state
                .set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible turns into the ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = self.state.layout.top_of(visible.start);
        for i in visible {
            let height = self.state.layout.heights[i];
            scroll_view.render_widget(
                Turn::new(&self.messages[i]),
                Rect::new(0, y, content_width, height),
            );
            y += height;
        }

        if self.is_loading {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            let line = Line::from(vec![
                Span::styled(format!(" {spinner} "), Style::default().fg(Color::Yellow)),
                Span::styled(
                    "Generating SQL and running the query…",
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            scroll_view.render_widget(
                Paragraph::new(line),
                Rect::new(0, total_height + 1, content_width, 1),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because scrolling mutates persistent state and `MessageList` is rebuilt
/// every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached turn heights for one width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    /// Id of the first cached turn. A different first id means the timeline
    /// was cleared and refilled.
    first_id: Option<MessageId>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            first_id: None,
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid for `messages` at `content_width`.
    pub fn reusable_count(&self, messages: &[Message], content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if messages.len() < self.message_count
            || messages.first().map(|m| &m.id) != self.first_id.as_ref()
        {
            return 0;
        }
        self.message_count.min(self.heights.len())
    }

    pub fn update_metadata(&mut self, messages: &[Message], content_width: u16) {
        self.first_id = messages.first().map(|m| m.id.clone());
        self.message_count = messages.len();
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where turn `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        index
            .checked_sub(1)
            .and_then(|i| self.prefix_heights.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Turns overlapping the viewport, plus half a screen either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::timeline::MessageTimeline;
    use crate::test_support::backend_rows;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn timeline_with_turns(n: usize) -> MessageTimeline {
        let mut timeline = MessageTimeline::new();
        for i in 0..n {
            timeline.push_user(format!("question {i}"));
            timeline.push_assistant(Arc::new(backend_rows("SELECT a, b FROM t", 3)));
        }
        timeline
    }

    fn draw(state: &mut MessageListState, messages: &[Message], loading: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| {
                MessageList {
                    state: &mut *state,
                    messages,
                    is_loading: loading,
                    spinner_frame: 0,
                }
                .render(f, f.area())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_cache_reusable() {
        let timeline = timeline_with_turns(2);
        let messages = timeline.messages();
        let mut cache = LayoutCache::new();
        assert_eq!(cache.reusable_count(messages, 80), 0);

        cache.heights = vec![3; messages.len()];
        cache.update_metadata(messages, 80);
        assert_eq!(cache.reusable_count(messages, 80), 4);

        // Width change invalidates everything
        assert_eq!(cache.reusable_count(messages, 40), 0);
    }

    #[test]
    fn test_cache_reuses_prefix_when_turns_appended() {
        let mut timeline = timeline_with_turns(1);
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 9];
        cache.update_metadata(timeline.messages(), 80);

        timeline.push_user("next".into());
        assert_eq!(cache.reusable_count(timeline.messages(), 80), 2);
    }

    #[test]
    fn test_cache_invalidated_after_clear_and_refill() {
        let mut timeline = timeline_with_turns(2);
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 4];
        cache.update_metadata(timeline.messages(), 80);

        // Same length, different turns: ids differ so nothing is reused.
        timeline.clear();
        for _ in 0..4 {
            timeline.push_user("again".into());
        }
        assert_eq!(cache.reusable_count(timeline.messages(), 80), 0);
    }

    #[test]
    fn test_visible_range() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10, 10, 10, 10, 10];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.total_height(), 50);
        assert_eq!(cache.top_of(0), 0);
        assert_eq!(cache.top_of(3), 30);
        // Viewport 20..30 with a 5-row buffer covers 15..35
        assert_eq!(cache.visible_range(20, 10), 1..4);
    }

    #[test]
    fn test_render_sticks_to_newest_turn() {
        let timeline = timeline_with_turns(5);
        let mut state = MessageListState::new();
        let text = draw(&mut state, timeline.messages(), false);
        assert!(text.contains("question 4"));
        assert!(!text.contains("question 0"));
        assert!(!state.has_unseen_content());
    }

    #[test]
    fn test_scroll_up_reveals_unseen_indicator() {
        let timeline = timeline_with_turns(5);
        let mut state = MessageListState::new();
        draw(&mut state, timeline.messages(), false);

        state.handle_event(&TuiEvent::ScrollPageUp);
        assert!(!state.stick_to_bottom);
        draw(&mut state, timeline.messages(), false);
        assert!(state.has_unseen_content());

        for _ in 0..200 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_pending_row_while_loading() {
        let mut timeline = MessageTimeline::new();
        timeline.push_user("total cost by provider".into());
        let mut state = MessageListState::new();
        let text = draw(&mut state, timeline.messages(), true);
        assert!(text.contains("total cost by provider"));
        assert!(text.contains("Generating SQL"));
    }
}
