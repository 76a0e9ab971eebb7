//! Response side: annotate the URLs of a signed-URL response.

use serde_json::Value;
use thiserror::Error;

use super::correlate::{correlate, Alignment, Slot};
use super::layout::ResponseLayout;
use crate::host_scope::HostScope;
use crate::logical_path::resolve_logical_path;

/// Why a response body could not be rewritten at all.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("response body is not JSON: {0}")]
    Body(#[source] serde_json::Error),
    #[error("response has no entry array for layout {0:?}")]
    MissingEntries(ResponseLayout),
    #[error("serialize patched body: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// What happened to one response entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// URL rewritten to the contained value.
    Annotated(String),
    /// Patcher left the URL as is (host not scoped, or URL unparseable).
    Unchanged,
    /// Entry has no non-empty string `url`.
    MissingUrl,
    /// Request had no string identifier at this position.
    MissingIdentifier,
    /// Identifier could not be turned into a logical path.
    UnresolvablePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub index: usize,
    pub identifier: Option<String>,
    pub url: Option<String>,
    pub status: EntryStatus,
}

/// Result of rewriting one response body.
#[derive(Debug, Clone)]
pub struct Rewrite {
    /// Serialized patched body; `None` when no entry changed.
    pub body: Option<Vec<u8>>,
    pub alignment: Alignment,
    pub entries: Vec<EntryOutcome>,
}

impl Rewrite {
    pub fn annotated(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Annotated(_)))
            .count()
    }
}

/// Annotates each entry URL of `body` with the logical path of the identifier
/// at the same position.
///
/// Entries that can't be paired or resolved are skipped one by one; only an
/// unparseable body or a missing entry array fails the whole rewrite.
pub fn rewrite_body(
    body: &[u8],
    identifiers: &[Option<String>],
    layout: ResponseLayout,
    scope: &HostScope,
) -> Result<Rewrite, RewriteError> {
    let mut json: Value = serde_json::from_slice(body).map_err(RewriteError::Body)?;
    let entries = layout
        .entries_mut(&mut json)
        .ok_or(RewriteError::MissingEntries(layout))?;

    let (alignment, pairs) = correlate(identifiers, entries);
    if alignment != Alignment::Exact {
        tracing::warn!(
            "signed URL response misaligned with request: {:?}",
            alignment
        );
    }

    let mut outcomes = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let url = pair
            .entry
            .get("url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let identifier = match pair.slot {
            Slot::Identifier(id) => Some(id.to_string()),
            Slot::NotAString | Slot::Missing => None,
        };

        let status = match (&url, &identifier) {
            (None, _) => {
                tracing::warn!(
                    "entry {} has no usable url: {} (identifier {:?})",
                    pair.index,
                    pair.entry,
                    identifier
                );
                EntryStatus::MissingUrl
            }
            (Some(u), None) => {
                tracing::warn!(
                    "no identifier for entry {} ({}): {:?}",
                    pair.index,
                    u,
                    pair.slot
                );
                EntryStatus::MissingIdentifier
            }
            (Some(u), Some(id)) => match resolve_logical_path(id) {
                None => EntryStatus::UnresolvablePath,
                Some(logical_path) => {
                    let patched = scope.annotate(u, &logical_path);
                    if &patched == u {
                        EntryStatus::Unchanged
                    } else {
                        tracing::debug!("patched URL: {} -> {}", u, patched);
                        pair.entry["url"] = Value::String(patched.clone());
                        EntryStatus::Annotated(patched)
                    }
                }
            },
        };

        outcomes.push(EntryOutcome {
            index: pair.index,
            identifier,
            url,
            status,
        });
    }

    let changed = outcomes
        .iter()
        .any(|o| matches!(o.status, EntryStatus::Annotated(_)));
    let body = if changed {
        Some(serde_json::to_vec(&json).map_err(RewriteError::Serialize)?)
    } else {
        None
    };

    Ok(Rewrite {
        body,
        alignment,
        entries: outcomes,
    })
}
