//! Command implementations for tokensync-cli

pub mod diff;
pub mod export;
pub mod import;

pub use diff::run_diff;
pub use export::run_export;
pub use import::run_import;
