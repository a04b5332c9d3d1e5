//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Request Flow
//!
//! ```text
//! Enter ─► Action::Submit ─► update() ─► Effect::SendQuery
//!                                            │ tokio::spawn(run_query)
//!                                            ▼
//!          update() ◄─ Action::QuerySettled ◄─ mpsc channel
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Animating** (landing page, request in flight): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms and redraws only on terminal events or
//!   when the session's revision counter moves.
//! - **Copied marker**: polls fast while it is up and redraws once more when
//!   it expires.
//!
//! ## Copying SQL
//!
//! Ctrl+Y copies the SQL of the history entry selected with Alt+Up/Alt+Down
//! when the history panel is open, otherwise the SQL of the latest result.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod clipboard;
mod component;
mod components;
mod event;
pub mod rich_text;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, run_query, update};
use crate::core::config::ResolvedConfig;
use crate::core::result::{QueryRequest, ResultModel};
use crate::core::session::{QuerySession, RequestId};
use crate::transport::{HttpTransport, QueryTransport};
use crate::tui::clipboard::{Clipboard, CopiedMarker, CopyTarget, Osc52Clipboard};
use crate::tui::component::EventHandler;
use crate::tui::components::landing::EXAMPLE_PROMPTS;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the session)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub show_history: bool,
    /// History entry Ctrl+Y copies from, newest first.
    pub history_selected: Option<usize>,
    pub copied: Option<CopiedMarker>,
    /// Shown in the title bar.
    pub endpoint: String,
    // Animation state
    pub pulse_value: f32,
}

impl TuiState {
    pub fn new(endpoint: String, show_history: bool) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            show_history,
            history_selected: None,
            copied: None,
            endpoint,
            pulse_value: 0.0,
        }
    }

    /// Target of a copy made less than two seconds before `now`.
    pub fn copied_target(&self, now: Instant) -> Option<CopyTarget> {
        self.copied
            .filter(|marker| marker.is_visible(now))
            .map(|marker| marker.target)
    }

    /// Step the history selection. Moving newer past the first entry
    /// deselects, which makes Ctrl+Y copy the latest result again.
    fn move_history_selection(&mut self, older: bool, len: usize) {
        self.history_selected = match (self.history_selected, older) {
            _ if len == 0 => None,
            (None, true) => Some(0),
            (None, false) => None,
            (Some(i), true) => Some((i + 1).min(len - 1)),
            (Some(i), false) => i.checked_sub(1),
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter. Terminals
        // without it ignore the request, and Alt+Enter / Ctrl+J still work there.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// The SQL Ctrl+Y would copy right now.
fn copy_source<'a>(tui: &TuiState, session: &'a QuerySession) -> Option<(CopyTarget, &'a str)> {
    if tui.show_history
        && let Some(index) = tui.history_selected
    {
        let result = session.history().get(index)?;
        return result
            .has_sql()
            .then(|| (CopyTarget::History(index), result.sql_query.as_str()));
    }
    session
        .timeline()
        .messages()
        .iter()
        .rev()
        .find_map(|m| m.result.as_deref().filter(|r| r.has_sql()))
        .map(|r| (CopyTarget::LatestResult, r.sql_query.as_str()))
}

fn copy_sql(tui: &mut TuiState, session: &QuerySession, clipboard: &mut dyn Clipboard) {
    let Some((target, sql)) = copy_source(tui, session) else {
        debug!("Copy requested but there is no SQL to copy");
        return;
    };
    match clipboard.copy_text(sql) {
        Ok(()) => {
            info!("Copied SQL from {:?} ({} bytes)", target, sql.len());
            tui.copied = Some(CopiedMarker::new(target));
        }
        Err(e) => warn!("Failed to copy SQL to clipboard: {}", e),
    }
}

/// Translate one terminal event into a session action, updating
/// presentation-only state along the way.
fn route_event(
    tui: &mut TuiState,
    session: &QuerySession,
    clipboard: &mut dyn Clipboard,
    event: &TuiEvent,
) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit | TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::NewChat => {
            tui.message_list = MessageListState::new();
            Some(Action::NewSession)
        }
        TuiEvent::ClearHistory => Some(Action::ClearHistory),
        TuiEvent::ToggleHistory => {
            tui.show_history = !tui.show_history;
            None
        }
        TuiEvent::CopySql => {
            copy_sql(tui, session, clipboard);
            None
        }
        TuiEvent::HistoryPrev | TuiEvent::HistoryNext => {
            if tui.show_history {
                let older = *event == TuiEvent::HistoryNext;
                tui.move_history_selection(older, session.history().len());
            }
            None
        }
        TuiEvent::PickExample(index) => {
            // Examples live on the landing page only.
            if !session.timeline().is_empty() {
                return None;
            }
            let prompt = EXAMPLE_PROMPTS.get(*index)?;
            Some(Action::InputChanged(prompt.question.to_string()))
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            None
        }
        TuiEvent::Resize => None,
        _ => match tui.input_box.handle_event(event)? {
            InputEvent::Submit => Some(Action::Submit),
            InputEvent::Changed(text) => Some(Action::InputChanged(text)),
            InputEvent::CursorMoved => None,
        },
    }
}

/// Apply `action` and carry out its effect. Returns true when the app should exit.
fn dispatch(
    session: &mut QuerySession,
    tui: &mut TuiState,
    action: Action,
    transport: &Arc<dyn QueryTransport>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let newest = newest_history_entry(session);
    let effect = update(session, action);
    // Accepted submits and examples change the canonical input; mirror it.
    tui.input_box.sync(session.input());
    // Indices shift when history changes, so a selection would point elsewhere.
    if newest_history_entry(session) != newest {
        tui.history_selected = None;
        tui.copied = None;
    }
    match effect {
        Effect::Quit => true,
        Effect::SendQuery {
            request_id,
            request,
        } => {
            spawn_request(Arc::clone(transport), request_id, request, tx.clone());
            false
        }
        Effect::None => false,
    }
}

fn newest_history_entry(session: &QuerySession) -> Option<*const ResultModel> {
    session.history().get(0).map(Arc::as_ptr)
}

fn spawn_request(
    transport: Arc<dyn QueryTransport>,
    request_id: RequestId,
    request: QueryRequest,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning request {} via {}",
        request_id,
        transport.describe()
    );
    tokio::spawn(async move {
        let action = run_query(transport.as_ref(), request_id, request).await;
        if tx.send(action).is_err() {
            warn!(
                "Failed to deliver result of request {}: receiver dropped",
                request_id
            );
        }
    });
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let http = HttpTransport::new(&config.base_url, &config.query_path);
    let endpoint = http.endpoint().to_string();
    let transport: Arc<dyn QueryTransport> = Arc::new(http);
    info!("Query endpoint: {}", endpoint);

    let mut session = QuerySession::new();
    let mut tui = TuiState::new(endpoint, config.show_history);
    let mut clipboard = Osc52Clipboard::new(stdout());

    let mut terminal = ratatui::init();
    let terminal_modes = TerminalModeGuard::new();

    let result = event_loop(
        &mut terminal,
        &mut session,
        &mut tui,
        &mut clipboard,
        &transport,
    );

    info!("Exiting session {}", session.id());
    drop(terminal_modes);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    session: &mut QuerySession,
    tui: &mut TuiState,
    clipboard: &mut dyn Clipboard,
    transport: &Arc<dyn QueryTransport>,
) -> std::io::Result<()> {
    // Channel for settled requests from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut drawn_revision = session.revision();
    let mut drawn_copied = false;

    loop {
        let animating = session.is_submitting() || session.timeline().is_empty();
        let copied = tui.copied_target(Instant::now()).is_some();
        if animating || copied != drawn_copied || session.revision() != drawn_revision {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 3.0).sin() * 0.5 + 0.5;
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, session, tui, spinner_frame))?;
            drawn_revision = session.revision();
            drawn_copied = copied;
            needs_redraw = false;
        }

        // Short poll while animating (~12fps), long when idle
        let timeout = if animating || copied {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(tui, session, clipboard, &event) else {
                continue;
            };
            if dispatch(session, tui, action, transport, &tx) {
                return Ok(());
            }
        }

        // Settled requests from background tasks
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            if dispatch(session, tui, action, transport, &tx) {
                return Ok(());
            }
        }
    }
}
