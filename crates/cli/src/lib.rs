//! `skillforge` command-line tool: generate, inspect and simulate skills.
pub mod commands;
pub mod config;
pub mod content;
pub mod simulation;
