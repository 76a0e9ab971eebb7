//! Host-scoped `logical_path` annotation of download URLs.
//!
//! Only URLs served through the metrics collector may carry the logical path;
//! every other URL (direct object-store links, third-party hosts) passes
//! through untouched.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Query parameter read by the metrics collector.
pub const LOGICAL_PATH_PARAM: &str = "logical_path";

/// Metrics-collector host, fixed at build time via `PATHTAG_METRICS_HOST`.
///
/// Falls back to a reserved name that never matches a real download host.
pub const METRICS_HOST: &str = match option_env!("PATHTAG_METRICS_HOST") {
    Some(host) => host,
    None => "metrics.invalid",
};

/// Characters left unescaped in the parameter value: `A-Z a-z 0-9 - _ . ! ~ * ( )`.
/// The apostrophe is escaped as well; special-scheme queries never carry it raw.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// The single host allowed to receive `logical_path` annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScope {
    host: String,
}

impl Default for HostScope {
    fn default() -> Self {
        Self::new(METRICS_HOST)
    }
}

impl HostScope {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// True if the host of `url` is exactly the scoped host.
    pub fn matches(&self, url: &url::Url) -> bool {
        url.host_str() == Some(self.host.as_str())
    }

    /// Sets `logical_path` on `download_url` when it points at the scoped host.
    ///
    /// Returns the input unchanged when either argument is empty, the URL does
    /// not parse, or the host differs. An existing `logical_path` parameter is
    /// overwritten, so annotating twice equals annotating once. Only the query
    /// is rebuilt; every byte before `?` and from `#` on is kept as received.
    pub fn annotate(&self, download_url: &str, logical_path: &str) -> String {
        if download_url.is_empty() || logical_path.is_empty() {
            return download_url.to_string();
        }

        let parsed = match url::Url::parse(download_url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(
                    "failed to parse download URL {:?} for logical path {:?}: {}",
                    download_url,
                    logical_path,
                    e
                );
                return download_url.to_string();
            }
        };

        if !self.matches(&parsed) {
            return download_url.to_string();
        }

        let fragment_at = download_url.find('#').unwrap_or(download_url.len());
        let query_at = download_url[..fragment_at].find('?');
        let raw_query = query_at.map(|i| &download_url[i + 1..fragment_at]);
        format!(
            "{}?{}{}",
            &download_url[..query_at.unwrap_or(fragment_at)],
            with_param(raw_query, LOGICAL_PATH_PARAM, logical_path),
            &download_url[fragment_at..]
        )
    }
}

/// Rebuilds a raw query string with `name` set to `value`, dropping earlier
/// occurrences of `name` and leaving every other pair byte-identical.
fn with_param(query: Option<&str>, name: &str, value: &str) -> String {
    let mut pairs: Vec<String> = query
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair_has_name(pair, name))
        .map(str::to_string)
        .collect();
    pairs.push(format!(
        "{}={}",
        name,
        utf8_percent_encode(value, COMPONENT)
    ));
    pairs.join("&")
}

fn pair_has_name(pair: &str, name: &str) -> bool {
    let raw = pair.split_once('=').map_or(pair, |(k, _)| k);
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy() == name
}
