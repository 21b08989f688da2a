//! PromptForge - AI-Powered Prompt Refinement Wizard (TUI Edition)
//!
//! Core library providing the three-step refinement wizard,
//! LLM client layer with retry, and the ratatui front-end.

pub mod config;
pub mod core;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
