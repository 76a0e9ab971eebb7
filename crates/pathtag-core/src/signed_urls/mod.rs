//! Signed-URL endpoint interception.
//!
//! The storage service hands out signed object-store URLs for a list of
//! logical identifiers. [`SignedUrlAnnotator`] remembers the identifiers of
//! each request to that endpoint and, when the response comes back, tags every
//! URL served by the metrics host with the file's logical path.

mod correlate;
mod layout;
mod observe;
mod rewrite;

pub use correlate::{correlate, Alignment, Pair, Slot};
pub use layout::ResponseLayout;
pub use observe::{observe_request, targets_endpoint, PendingRequest};
pub use rewrite::{rewrite_body, EntryOutcome, EntryStatus, Rewrite, RewriteError};

use crate::client::Interceptor;
use crate::config::{PathtagConfig, DEFAULT_ENDPOINT_PATH};
use crate::exchange::{InboundResponse, OutboundRequest};
use crate::host_scope::HostScope;

/// Interceptor for the signed-URL endpoint.
#[derive(Debug, Clone)]
pub struct SignedUrlAnnotator {
    endpoint_path: String,
    layout: ResponseLayout,
    scope: HostScope,
}

impl Default for SignedUrlAnnotator {
    fn default() -> Self {
        Self::new(
            DEFAULT_ENDPOINT_PATH,
            ResponseLayout::Auto,
            HostScope::default(),
        )
    }
}

impl SignedUrlAnnotator {
    pub fn new(endpoint_path: impl Into<String>, layout: ResponseLayout, scope: HostScope) -> Self {
        Self {
            endpoint_path: endpoint_path.into(),
            layout,
            scope,
        }
    }

    /// Endpoint and layout from `cfg`, metrics host from the build.
    pub fn from_config(cfg: &PathtagConfig) -> Self {
        Self::new(
            cfg.endpoint_path.clone(),
            cfg.response_layout,
            HostScope::default(),
        )
    }

    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    pub fn scope(&self) -> &HostScope {
        &self.scope
    }

    pub fn targets(&self, request_url: &str) -> bool {
        targets_endpoint(&self.endpoint_path, request_url)
    }

    pub fn observe(&self, request: &OutboundRequest) -> Option<PendingRequest> {
        observe_request(&self.endpoint_path, request)
    }

    pub fn rewrite(&self, pending: &PendingRequest, body: &[u8]) -> Result<Rewrite, RewriteError> {
        rewrite_body(body, &pending.uris, self.layout, &self.scope)
    }
}

impl Interceptor for SignedUrlAnnotator {
    type Pending = PendingRequest;

    fn on_request(&self, request: &OutboundRequest) -> Option<PendingRequest> {
        self.observe(request)
    }

    fn on_response(&self, pending: PendingRequest, response: InboundResponse) -> InboundResponse {
        match self.rewrite(&pending, &response.body) {
            Ok(Rewrite {
                body: Some(body), ..
            }) => response.with_body(body),
            Ok(_) => response,
            Err(e) => {
                tracing::warn!(
                    "failed to patch response for {} (HTTP {}): {}",
                    pending.target_path,
                    response.status,
                    e
                );
                response
            }
        }
    }
}
