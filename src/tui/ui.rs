use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::render::ResultView;
use crate::core::session::QuerySession;
use crate::tui::TuiState;
use crate::tui::clipboard::CopyTarget;
use crate::tui::component::Component;
use crate::tui::components::history_panel::PANEL_WIDTH;
use crate::tui::components::{
    BarStatus, HistoryPanel, LandingPage, MessageList, TitleBar,
};

/// Narrowest main column the history panel may squeeze the timeline to.
const MIN_MAIN_WIDTH: u16 = 40;

/// Title bar status for the current session state.
pub fn bar_status(session: &QuerySession) -> BarStatus {
    if session.is_submitting() {
        return BarStatus::Querying;
    }
    session
        .timeline()
        .last()
        .and_then(|m| m.result.as_deref())
        .map(|result| {
            let view = ResultView::new(result);
            BarStatus::Settled {
                label: view.status.label().to_string(),
                success: result.success,
            }
        })
        .unwrap_or(BarStatus::Ready)
}

/// Split the body into (timeline, optional history panel).
fn body_areas(area: Rect, show_history: bool) -> (Rect, Option<Rect>) {
    if !show_history || area.width < MIN_MAIN_WIDTH + PANEL_WIDTH {
        return (area, None);
    }
    let [main, side] =
        Layout::horizontal([Constraint::Min(MIN_MAIN_WIDTH), Constraint::Length(PANEL_WIDTH)])
            .areas(area);
    (main, Some(side))
}

pub fn draw_ui(
    frame: &mut Frame,
    session: &QuerySession,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min};

    tui.input_box.busy = session.is_submitting();
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, body_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame.area());
    let (main_area, history_area) = body_areas(body_area, tui.show_history);

    let copied = tui.copied_target(Instant::now());
    let timeline = session.timeline();
    if timeline.is_empty() {
        LandingPage {
            pulse: tui.pulse_value,
        }
        .render(frame, main_area);
    } else {
        MessageList {
            state: &mut tui.message_list,
            messages: timeline.messages(),
            is_loading: session.is_submitting(),
            spinner_frame,
        }
        .render(frame, main_area);
    }

    if let Some(area) = history_area {
        HistoryPanel {
            entries: session.history().entries(),
            selected: tui.history_selected,
            copied: match copied {
                Some(CopyTarget::History(index)) => Some(index),
                _ => None,
            },
        }
        .render(frame, area);
    }

    // After the list rendered, so the unseen-content flag reflects this frame.
    TitleBar {
        endpoint: &tui.endpoint,
        status: bar_status(session),
        spinner_frame,
        has_unseen_content: !timeline.is_empty() && tui.message_list.has_unseen_content(),
        sql_copied: copied.is_some(),
    }
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
