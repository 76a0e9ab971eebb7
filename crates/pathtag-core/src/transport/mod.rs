//! Transports that carry an [`OutboundRequest`] to the network.
//!
//! The intercepting client only depends on the [`Transport`] trait; the
//! libcurl-backed implementation is what the CLI and integration tests use.

mod error;
mod libcurl;

pub use error::TransportError;
pub use libcurl::CurlTransport;

use crate::exchange::{InboundResponse, OutboundRequest};

/// Sends one request and returns whatever response came back.
///
/// Any HTTP status is a successful send; only failures to complete the
/// exchange are errors. Implementations block the calling thread.
pub trait Transport: Send + Sync {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError>;
}
