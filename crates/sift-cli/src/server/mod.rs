//! Web server for the browser UI.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
