//! HAR (HTTP Archive) audit: replay captured signed-URL exchanges offline.
//!
//! A browser capture of the storage web app contains the request `uris` and
//! the signed-URL response side by side, which is enough to show which URLs
//! would be annotated and with what logical path.

mod audit;
mod parse;

pub use audit::{audit_har, AuditedExchange, ExchangeOutcome};
