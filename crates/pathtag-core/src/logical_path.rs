//! Logical path derivation from storage identifiers.
//!
//! A logical identifier looks like `cloudreve://token@share/My%20Folder/File.ext`;
//! its decoded path component (`/My Folder/File.ext`) is what the metrics
//! collector attributes downloads to.

use percent_encoding::percent_decode_str;

/// Derives the logical path for a storage identifier.
///
/// Returns `None` (and logs a warning) when the identifier is not a
/// well-formed URI, or when its path contains a malformed percent escape or
/// decodes to invalid UTF-8. The result always starts with `/`.
pub fn resolve_logical_path(identifier: &str) -> Option<String> {
    let parsed = match url::Url::parse(identifier) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("failed to parse logical identifier {:?}: {}", identifier, e);
            return None;
        }
    };

    let path = match decode_component(parsed.path()) {
        Some(p) => p,
        None => {
            tracing::warn!(
                "failed to decode path of logical identifier {:?}",
                identifier
            );
            return None;
        }
    };

    if path.starts_with('/') {
        Some(path)
    } else {
        Some(format!("/{path}"))
    }
}

/// Strict percent-decoding: every `%` must introduce two hex digits.
fn decode_component(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_identifier_decodes_path() {
        assert_eq!(
            resolve_logical_path("cloudreve://tok@share/My%20Folder/File.ext").as_deref(),
            Some("/My Folder/File.ext")
        );
    }

    #[test]
    fn multibyte_names() {
        assert_eq!(
            resolve_logical_path("cloudreve://my/%E6%96%87%E4%BB%B6/a%2Bb.txt").as_deref(),
            Some("/文件/a+b.txt")
        );
    }

    #[test]
    fn opaque_path_gets_leading_slash() {
        assert_eq!(
            resolve_logical_path("cloudreve:docs/report.pdf").as_deref(),
            Some("/docs/report.pdf")
        );
    }

    #[test]
    fn root_identifier() {
        assert_eq!(
            resolve_logical_path("cloudreve://my").as_deref(),
            Some("/")
        );
    }

    #[test]
    fn not_a_uri() {
        assert_eq!(resolve_logical_path("My Folder/File.ext"), None);
        assert_eq!(resolve_logical_path(""), None);
    }

    #[test]
    fn malformed_escape_rejected() {
        assert_eq!(resolve_logical_path("cloudreve://my/bad%zzname"), None);
        assert_eq!(resolve_logical_path("cloudreve://my/trailing%2"), None);
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(resolve_logical_path("cloudreve://my/%FF%FE"), None);
    }
}
