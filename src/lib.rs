//! folio: a client for OPDS book catalogs.
//!
//! Fetches catalog feeds, classifies each catalog path into a render
//! strategy, extracts entry fields, builds a declarative view, and keeps a
//! navigable history in step with what is displayed. The library is
//! host-agnostic; the `folio` binary hosts it in a terminal.

pub mod app;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod nav;
pub mod theme;
pub mod ui;
pub mod util;
pub mod view;
