//! Intercepting client: a transport decorated with a request/response interceptor.
//!
//! The interceptor is installed once, when the client is built, and stays for
//! the client's lifetime. Each call carries its own pending state from the
//! request phase to the response phase, so concurrent calls never share
//! anything mutable.

use std::sync::Arc;

use crate::exchange::{InboundResponse, OutboundRequest};
use crate::transport::{Transport, TransportError};

/// Observes an outbound request and optionally transforms its response.
pub trait Interceptor: Send + Sync {
    /// State captured from a request and handed to its response.
    type Pending: Send + 'static;

    /// Inspects `request` before it is sent. `None` leaves the exchange alone.
    fn on_request(&self, request: &OutboundRequest) -> Option<Self::Pending>;

    /// Produces the response the caller will see. Must never fail: on any
    /// problem, return `response` as received.
    fn on_response(&self, pending: Self::Pending, response: InboundResponse) -> InboundResponse;
}

/// A [`Transport`] with an [`Interceptor`] applied to every exchange.
///
/// Cheap to clone; clones share the transport and the interceptor.
#[derive(Debug)]
pub struct InterceptingClient<T, I> {
    transport: Arc<T>,
    interceptor: Arc<I>,
}

impl<T, I> Clone for InterceptingClient<T, I> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            interceptor: Arc::clone(&self.interceptor),
        }
    }
}

impl<T: Transport, I: Interceptor> InterceptingClient<T, I> {
    pub fn new(transport: T, interceptor: I) -> Self {
        Self {
            transport: Arc::new(transport),
            interceptor: Arc::new(interceptor),
        }
    }

    /// Sends `request` on the current thread.
    ///
    /// The request goes out unchanged. Transport errors are returned as is;
    /// the pending state is then simply dropped.
    pub fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError> {
        let pending = self.interceptor.on_request(request);
        let response = self.transport.send(request)?;
        Ok(self.finish(pending, response))
    }

    fn finish(&self, pending: Option<I::Pending>, response: InboundResponse) -> InboundResponse {
        match pending {
            Some(p) => self.interceptor.on_response(p, response),
            None => response,
        }
    }
}

impl<T, I> InterceptingClient<T, I>
where
    T: Transport + 'static,
    I: Interceptor + 'static,
{
    /// Async form of [`send`](Self::send).
    ///
    /// The transfer runs on the tokio blocking pool; the response is rewritten
    /// as the continuation once it completes. Dropping the future before then
    /// drops the pending state with it.
    pub async fn send_async(
        &self,
        request: OutboundRequest,
    ) -> Result<InboundResponse, TransportError> {
        let pending = self.interceptor.on_request(&request);
        let transport = Arc::clone(&self.transport);
        let response = tokio::task::spawn_blocking(move || transport.send(&request)).await??;
        Ok(self.finish(pending, response))
    }
}
