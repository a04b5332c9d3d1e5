//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields, built fresh each frame:
//! - `TitleBar`: app name, endpoint, request status, "↓ New" indicator
//! - `Turn`: one timeline entry (question, or result with SQL/explanation/table)
//! - `HistoryPanel`: recent-results side panel
//! - `LandingPage`: greeting and example questions for an empty session
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state across frames and react to events:
//! - `InputBox`: question editor; reports edits, the session owns the text
//! - `MessageList`: scrollable timeline with layout caching
//!
//! ## Props-Based Data Flow
//!
//! Components receive session data as props rather than reaching into the
//! session themselves:
//!
//! ```rust,ignore
//! MessageList {
//!     state: &mut tui.message_list,
//!     messages: session.timeline().messages(),
//!     is_loading: session.is_submitting(),
//!     spinner_frame,
//! }
//! .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (top status bar)
//! ├── landing.rs        (empty-session page)
//! ├── message.rs        (single turn renderer)
//! ├── result_table.rs   (result rows as aligned text)
//! ├── message_list.rs   (scrollable turn container)
//! ├── history_panel.rs  (recent results)
//! └── input_box/        (question editor)
//! ```

pub mod history_panel;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod result_table;
pub mod title_bar;

pub use history_panel::HistoryPanel;
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use title_bar::{BarStatus, TitleBar};
