//! Client core shared by the OperatorOS browser shell.
//!
//! Nothing in this crate touches the DOM. The browser side is reached through
//! the [`session::PageSurface`], [`api::OperatorApi`] and
//! [`history::HistoryStorage`] seams, which the wasm shell implements with
//! `web-sys` and the tests implement in memory.

pub mod api;
pub mod config;
pub mod export;
pub mod form;
pub mod format;
pub mod history;
pub mod markdown;
pub mod notify;
pub mod rating;
pub mod search;
pub mod session;
pub mod upload;

pub use config::ClientConfig;
pub use notify::{Notification, Severity};
pub use session::{ClientSession, ClientState, PageSurface};
