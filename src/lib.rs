//! Library crate for rbac-console.
//!
//! The headless core is usable without a terminal:
//! - Entity types and the `Entity` trait (`model`)
//! - In-memory stores (`store`) and list derivation (`listview`)
//! - Mutation handlers (`handlers`) behind the `Notifier` capability (`notify`)
//! - Modal forms (`form`) with declarative validation (`validate`)
//! - Per-screen state (`screen`), search debounce (`debounce`)
//! - Seed loading (`seed`) and dashboard totals (`dashboard`)
//!
//! The terminal front end lives in `app` (state, keymap, event loop) and `ui`
//! (rendering), used by the `rbac-console` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod form;
pub mod handlers;
pub mod listview;
pub mod model;
pub mod notify;
pub mod screen;
pub mod seed;
pub mod selection;
pub mod store;
pub mod ui;
pub mod validate;

/// Convenient error and result types shared across the crate.
pub use error::{ConsoleError, Result};
