//! A file navigator that keeps a tree of workspace folders in step with the
//! file open in an editor, plus the terminal host that drives it.

pub mod error;
pub mod fs;
pub mod nav;

pub mod app;
pub mod components;
pub mod config;
pub mod event;
pub mod handler;
pub mod logging;
pub mod theme;
pub mod tui;
pub mod ui;
