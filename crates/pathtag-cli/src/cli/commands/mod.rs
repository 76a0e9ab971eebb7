//! CLI command handlers, one per file.

mod annotate;
mod audit_har;
mod completions;
mod fetch;
mod resolve;

pub use annotate::run_annotate;
pub use audit_har::run_audit_har;
pub use completions::{run_completions, run_man};
pub use fetch::run_fetch;
pub use resolve::run_resolve;
