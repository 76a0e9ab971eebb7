//! Request side: capture the `uris` list of signed-URL requests.

use serde_json::Value;

use crate::exchange::OutboundRequest;

/// Origin used to resolve origin-relative request targets; only the path is compared.
const RELATIVE_BASE: &str = "http://localhost/";

/// Identifiers captured from one in-flight signed-URL request.
///
/// Owned by that request's call and consumed by its response; never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Path the request targeted (always the endpoint path).
    pub target_path: String,
    /// `uris` from the request body, in order. Non-string elements keep
    /// their position as `None`.
    pub uris: Vec<Option<String>>,
}

/// Snapshots `request` if it targets `endpoint_path` and carries a `uris` array.
///
/// Every other request, including ones with a missing or malformed body,
/// yields `None`; parse problems are logged and otherwise ignored.
pub fn observe_request(endpoint_path: &str, request: &OutboundRequest) -> Option<PendingRequest> {
    let target_path = request_path(&request.url)?;
    if target_path != endpoint_path {
        return None;
    }

    let body = match request.body.as_deref() {
        Some(b) => b,
        None => {
            tracing::debug!("{} request without body; not annotating", target_path);
            return None;
        }
    };

    let parsed: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(
                "failed to parse JSON body for {}: {} (body: {:?})",
                target_path,
                e,
                String::from_utf8_lossy(body)
            );
            return None;
        }
    };

    let uris = match parsed.get("uris").and_then(Value::as_array) {
        Some(list) => list
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => {
            tracing::debug!("{} request body has no uris array", target_path);
            return None;
        }
    };

    Some(PendingRequest { target_path, uris })
}

/// True if `url` (absolute or origin-relative) targets `endpoint_path`.
pub fn targets_endpoint(endpoint_path: &str, url: &str) -> bool {
    request_path(url).as_deref() == Some(endpoint_path)
}

/// Path component of a request target, resolving origin-relative targets.
fn request_path(target: &str) -> Option<String> {
    let parsed = match url::Url::parse(target) {
        Ok(u) => Ok(u),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(RELATIVE_BASE).and_then(|base| base.join(target))
        }
        Err(e) => Err(e),
    };
    match parsed {
        Ok(u) => Some(u.path().to_string()),
        Err(e) => {
            tracing::warn!("failed to get path from request URL {:?}: {}", target, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "/api/v4/file/url";

    fn post(url: &str, body: &str) -> OutboundRequest {
        OutboundRequest::post_json(url, body)
    }

    #[test]
    fn captures_uris_in_order() {
        let req = post(
            "https://drive.example/api/v4/file/url",
            r#"{"uris":["cloudreve://my/b.txt","cloudreve://my/a.txt"],"download":true}"#,
        );
        let pending = observe_request(ENDPOINT, &req).unwrap();
        assert_eq!(pending.target_path, ENDPOINT);
        assert_eq!(
            pending.uris,
            vec![
                Some("cloudreve://my/b.txt".to_string()),
                Some("cloudreve://my/a.txt".to_string())
            ]
        );
    }

    #[test]
    fn relative_target_with_query() {
        let req = post(
            "/api/v4/file/url?archive=false",
            r#"{"uris":["cloudreve://my/a"]}"#,
        );
        assert!(observe_request(ENDPOINT, &req).is_some());
    }

    #[test]
    fn other_paths_ignored() {
        let body = r#"{"uris":["cloudreve://my/a"]}"#;
        assert!(observe_request(ENDPOINT, &post("/api/v4/file/urls", body)).is_none());
        assert!(observe_request(ENDPOINT, &post("/api/v4/file", body)).is_none());
        assert!(observe_request(ENDPOINT, &post("https://x.example/", body)).is_none());
    }

    #[test]
    fn missing_or_bad_body_ignored() {
        let mut req = post(ENDPOINT, "");
        req.body = None;
        assert!(observe_request(ENDPOINT, &req).is_none());
        assert!(observe_request(ENDPOINT, &post(ENDPOINT, "{not json")).is_none());
        assert!(observe_request(ENDPOINT, &post(ENDPOINT, r#"{"uri":"x"}"#)).is_none());
        assert!(observe_request(ENDPOINT, &post(ENDPOINT, r#"{"uris":"x"}"#)).is_none());
    }

    #[test]
    fn non_string_uris_keep_position() {
        let req = post(ENDPOINT, r#"{"uris":[42,"cloudreve://my/a",null]}"#);
        let pending = observe_request(ENDPOINT, &req).unwrap();
        assert_eq!(
            pending.uris,
            vec![None, Some("cloudreve://my/a".to_string()), None]
        );
    }

    #[test]
    fn targets_endpoint_compares_path_only() {
        assert!(targets_endpoint(ENDPOINT, "https://drive.example/api/v4/file/url?a=1"));
        assert!(targets_endpoint(ENDPOINT, "/api/v4/file/url"));
        assert!(!targets_endpoint(ENDPOINT, "/api/v4/file/url/"));
        assert!(!targets_endpoint(ENDPOINT, "http://[::1"));
    }

    #[test]
    fn empty_uris_still_recorded() {
        let pending = observe_request(ENDPOINT, &post(ENDPOINT, r#"{"uris":[]}"#)).unwrap();
        assert!(pending.uris.is_empty());
    }
}
