//! `pathtag fetch <url>` – live request through the annotating client.

use anyhow::{Context, Result};
use pathtag_core::client::InterceptingClient;
use pathtag_core::config::PathtagConfig;
use pathtag_core::exchange::OutboundRequest;
use pathtag_core::signed_urls::SignedUrlAnnotator;
use pathtag_core::transport::CurlTransport;

pub async fn run_fetch(
    cfg: &PathtagConfig,
    url: String,
    method: Option<String>,
    body: Option<String>,
    headers: &[String],
) -> Result<()> {
    let request = build_request(url, method, body, headers)?;
    let client = InterceptingClient::new(
        CurlTransport::from_config(cfg),
        SignedUrlAnnotator::from_config(cfg),
    );

    let response = client.send_async(request).await.context("request failed")?;
    eprintln!("HTTP {}", response.status);
    println!("{}", String::from_utf8_lossy(&response.body));
    Ok(())
}

fn build_request(
    url: String,
    method: Option<String>,
    body: Option<String>,
    headers: &[String],
) -> Result<OutboundRequest> {
    let mut request = match body {
        Some(b) => OutboundRequest::post_json(url, b),
        None => OutboundRequest::get(url),
    };
    if let Some(m) = method {
        request.method = m.to_ascii_uppercase();
    }
    for raw in headers {
        let (name, value) = raw
            .split_once(':')
            .with_context(|| format!("header must be \"Name: value\": {raw}"))?;
        request = request.with_header(name.trim(), value.trim());
    }
    Ok(request)
}
