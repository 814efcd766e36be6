//! `seija` command-line client: clap definitions, command handlers and the
//! small file helpers they share.

pub mod cli;
pub mod commands;
pub mod utils;
