//! `pathtag annotate --request <file> --response <file>` – offline rewrite of a saved exchange.

use anyhow::{Context, Result};
use pathtag_core::config::PathtagConfig;
use pathtag_core::exchange::OutboundRequest;
use pathtag_core::signed_urls::SignedUrlAnnotator;
use std::path::Path;

/// Rewrites the saved response as the client would and prints the resulting body.
pub fn run_annotate(cfg: &PathtagConfig, request: &Path, response: &Path) -> Result<()> {
    let request_body = std::fs::read(request)
        .with_context(|| format!("read request body: {}", request.display()))?;
    let response_body = std::fs::read(response)
        .with_context(|| format!("read response body: {}", response.display()))?;

    let annotator = SignedUrlAnnotator::from_config(cfg);
    let req = OutboundRequest::post_json(cfg.endpoint_path.clone(), request_body);
    let pending = annotator
        .observe(&req)
        .with_context(|| format!("no uris array in {}", request.display()))?;

    let rewrite = annotator
        .rewrite(&pending, &response_body)
        .with_context(|| format!("rewrite {}", response.display()))?;
    eprintln!(
        "annotated {} of {} entries (metrics host {})",
        rewrite.annotated(),
        rewrite.entries.len(),
        annotator.scope().host()
    );

    let out = rewrite.body.unwrap_or(response_body);
    println!("{}", String::from_utf8_lossy(&out));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn annotate_rejects_request_without_uris() {
        let req = file(r#"{"download":true}"#);
        let resp = file(r#"{"data":{"urls":[]}}"#);
        let err = run_annotate(&PathtagConfig::default(), req.path(), resp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("no uris array"));
    }

    #[test]
    fn annotate_rejects_unusable_response() {
        let req = file(r#"{"uris":["cloudreve://my/a"]}"#);
        let resp = file("<html></html>");
        assert!(run_annotate(&PathtagConfig::default(), req.path(), resp.path()).is_err());
    }

    #[test]
    fn annotate_accepts_aligned_exchange() {
        let req = file(r#"{"uris":["cloudreve://my/a"]}"#);
        let resp = file(r#"{"data":{"urls":[{"url":"https://b2.other.example/a"}]}}"#);
        run_annotate(&PathtagConfig::default(), req.path(), resp.path()).unwrap();
    }

    #[test]
    fn annotate_missing_file_err() {
        let resp = file("{}");
        assert!(run_annotate(
            &PathtagConfig::default(),
            Path::new("/nonexistent/req.json"),
            resp.path()
        )
        .is_err());
    }
}
