//! # Core Session Engine
//!
//! This module contains QueryChat's state and request lifecycle.
//! It knows nothing about any specific UI technology. From the transport it
//! only sees the seam (the `QueryTransport` trait and `TransportError`);
//! HTTP and reqwest stay in `crate::transport`.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • QuerySession (state) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • ResultView (render)  │
//!                    │                         │
//!                    │  No terminal. No HTTP.  │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │ Transport  │
//!          │  Adapter   │                │  (reqwest) │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`result`]: `ResultModel`, the normalized outcome of one query
//! - [`timeline`]: append-only log of user/assistant turns
//! - [`history`]: bounded most-recent-first result cache
//! - [`render`]: pure render contract for a result
//! - [`session`]: `QuerySession`, the controller
//! - [`action`]: `Action` / `Effect` / `update()`
//! - [`config`]: config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod history;
pub mod render;
pub mod result;
pub mod session;
pub mod timeline;
