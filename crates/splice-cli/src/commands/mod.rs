//! Command implementations.
//!
//! - [`inline`] - inline a reference and print or write the block
//! - [`sync`] - inline a note's reference into its code block
//! - [`config`] - print the effective configuration
//!
//! Each command provides an `execute` function taking its parsed arguments
//! and the global options. `inline` and `sync` also expose `run`, which takes
//! the fetcher to use.

pub mod config;
pub mod inline;
pub mod sync;
pub mod utils;

pub use config::execute as config_execute;
pub use inline::execute as inline_execute;
pub use sync::execute as sync_execute;
