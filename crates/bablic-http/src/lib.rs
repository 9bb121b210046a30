//! # bablic-http
//!
//! `HttpClient` implementation on top of `reqwest`.

use async_trait::async_trait;
use bablic_core::{error::BablicError, traits::HttpClient};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Shared `reqwest` client speaking JSON.
#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl Default for ReqwestHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestHttp {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client with a request timeout. Without one, requests wait as long
    /// as the server lets them.
    pub fn with_timeout(timeout: Duration) -> Result<Self, BablicError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BablicError::Http(format!("failed to build client: {e}")))?;
        Ok(Self { client })
    }
}

/// Turn a response into JSON, mapping failures onto `BablicError`.
async fn read_json(resp: reqwest::Response, url: &str) -> Result<Value, BablicError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| BablicError::Http(format!("{url}: failed to read body: {e}")))?;

    if !status.is_success() {
        return Err(BablicError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    decode_body(&text).map_err(|e| BablicError::Decode(format!("{url}: {e}")))
}

/// Empty bodies decode to `Null`.
fn decode_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
}

#[async_trait]
impl HttpClient for ReqwestHttp {
    async fn get_json(&self, url: &str) -> Result<Value, BablicError> {
        debug!("http: GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BablicError::Http(format!("GET {url} failed: {e}")))?;
        read_json(resp, url).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, BablicError> {
        debug!("http: POST {url}");
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| BablicError::Http(format!("POST {url} failed: {e}")))?;
        read_json(resp, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_body_is_null() {
        assert_eq!(decode_body("").unwrap(), Value::Null);
        assert_eq!(decode_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_json_body() {
        let v = decode_body(r#"{"updated":true}"#).unwrap();
        assert_eq!(v["updated"], Value::Bool(true));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_body("<html>").is_err());
    }

    #[test]
    fn test_with_timeout_builds() {
        assert!(ReqwestHttp::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let http = ReqwestHttp::with_timeout(Duration::from_millis(500)).unwrap();
        let err = http
            .get_json("http://127.0.0.1:1/sites/abc/ngx.fr.json")
            .await
            .unwrap_err();
        assert!(matches!(err, BablicError::Http(_)));
    }
}
