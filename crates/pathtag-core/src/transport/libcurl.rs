//! libcurl-backed transport.
//!
//! One easy handle per request. The request is sent exactly as given: no
//! redirects are followed and no headers are added besides suppressing
//! `Expect: 100-continue`.

use std::str;
use std::time::Duration;

use curl::easy::{Easy, List};

use super::{Transport, TransportError};
use crate::config::PathtagConfig;
use crate::exchange::{InboundResponse, OutboundRequest};

/// Blocking HTTP transport using the curl crate.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &PathtagConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
        )
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = Easy::new();
        easy.url(&request.url)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let method = request.method.to_ascii_uppercase();
        if let Some(payload) = &request.body {
            easy.post_fields_copy(payload)?;
        }
        match method.as_str() {
            "GET" if request.body.is_none() => easy.get(true)?,
            "POST" => easy.post(true)?,
            "HEAD" => easy.nobody(true)?,
            other => easy.custom_request(other)?,
        }

        let mut list = List::new();
        for (name, value) in &request.headers {
            list.append(&format!("{}: {}", name.trim(), value.trim()))?;
        }
        list.append("Expect:")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::debug!(
            "{} {} -> HTTP {} ({} bytes)",
            method,
            request.url,
            status,
            body.len()
        );

        Ok(InboundResponse {
            status,
            headers: parse_header_lines(&header_lines),
            body,
        })
    }
}

/// Header pairs of the final response; interim blocks (`100 Continue`) are dropped.
fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}
