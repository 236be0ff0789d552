//! arbcore library: application logic for the `arbcore` command-line tool.

pub mod app;
pub mod config;
pub mod errors;
pub mod input;
pub mod output;
