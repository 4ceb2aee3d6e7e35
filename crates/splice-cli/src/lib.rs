//! splice CLI.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `inline`, `sync` and `config`
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing setup
//! - [`ui`] - status lines and summaries

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
