//! Replay HAR-recorded signed-URL exchanges through the annotator.

use anyhow::{Context, Result};
use std::path::Path;

use super::parse::{HarEntry, HarHeader, HarLog};
use crate::exchange::{InboundResponse, OutboundRequest};
use crate::signed_urls::{Rewrite, SignedUrlAnnotator};

/// One recorded request to the signed-URL endpoint and what the annotator made of it.
#[derive(Debug, Clone)]
pub struct AuditedExchange {
    /// Position of the exchange in the HAR `entries` array.
    pub entry_index: usize,
    pub request_url: String,
    /// Status as recorded; negative when the exporter marked the request aborted.
    pub status: i32,
    pub outcome: ExchangeOutcome,
}

#[derive(Debug, Clone)]
pub enum ExchangeOutcome {
    Rewritten(Rewrite),
    /// Request body had no `uris` array, so nothing would be annotated.
    NotObserved,
    /// Response body missing from the capture, or recorded base64-encoded.
    NoResponseBody,
    /// Response body present but not a usable signed-URL response.
    Failed(String),
}

/// Audits every signed-URL exchange recorded in the HAR file at `path`.
///
/// Entries targeting other paths are not reported. An archive without any
/// signed-URL exchange yields an empty report.
pub fn audit_har(path: &Path, annotator: &SignedUrlAnnotator) -> Result<Vec<AuditedExchange>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    let har: HarLog = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse HAR JSON: {}", path.display()))?;

    let report = har
        .log
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| annotator.targets(&e.request.url))
        .map(|(i, e)| AuditedExchange {
            entry_index: i,
            request_url: e.request.url.clone(),
            status: e.response.status,
            outcome: audit_entry(e, annotator),
        })
        .collect();
    Ok(report)
}

fn audit_entry(entry: &HarEntry, annotator: &SignedUrlAnnotator) -> ExchangeOutcome {
    let request = to_request(entry);
    let pending = match annotator.observe(&request) {
        Some(p) => p,
        None => return ExchangeOutcome::NotObserved,
    };

    let response = match to_response(entry) {
        Some(r) => r,
        None => {
            tracing::warn!(
                "HAR entry for {} has no plain-text response body",
                entry.request.url
            );
            return ExchangeOutcome::NoResponseBody;
        }
    };

    match annotator.rewrite(&pending, &response.body) {
        Ok(rw) => ExchangeOutcome::Rewritten(rw),
        Err(e) => ExchangeOutcome::Failed(e.to_string()),
    }
}

fn to_request(entry: &HarEntry) -> OutboundRequest {
    OutboundRequest {
        method: entry.request.method.clone(),
        url: entry.request.url.clone(),
        headers: header_pairs(&entry.request.headers),
        body: entry
            .request
            .post_data
            .as_ref()
            .and_then(|p| p.text.as_ref())
            .map(|t| t.as_bytes().to_vec()),
    }
}

fn to_response(entry: &HarEntry) -> Option<InboundResponse> {
    let content = entry.response.content.as_ref()?;
    if content
        .encoding
        .as_deref()
        .is_some_and(|enc| enc.eq_ignore_ascii_case("base64"))
    {
        return None;
    }
    let text = content.text.as_ref()?;
    Some(InboundResponse {
        status: u32::try_from(entry.response.status).unwrap_or(0),
        headers: header_pairs(&entry.response.headers),
        body: text.as_bytes().to_vec(),
    })
}

fn header_pairs(headers: &[HarHeader]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|h| (h.name.clone(), h.value.clone()))
        .collect()
}
