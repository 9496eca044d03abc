pub mod dashboard_client;
pub mod dto;

pub use dashboard_client::DashboardApiClient;

use futures::future::{Either, select};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::{
    errors::{AppError, NetworkResult},
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::config::ApiConfig;
use dto::ErrorBody;

/// JSON-over-HTTP transport built on gloo for WASM
#[derive(Debug, Clone)]
pub struct GlooHttpClient {
    config: ApiConfig,
}

impl GlooHttpClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// GET with JSON decoding of the body
    pub async fn get_json<T>(&self, endpoint: &str) -> NetworkResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(endpoint);
        get_logger().debug(LogComponent::Infrastructure("HTTP"), &format!("🌐 GET JSON: {}", url));

        let request = with_json_headers(Request::get(&url));
        let text = self.send(request.build(), &url).await?;
        HttpUtils::decode(&text)
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> NetworkResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(endpoint);
        get_logger().debug(LogComponent::Infrastructure("HTTP"), &format!("🌐 POST JSON: {}", url));

        let request = with_json_headers(Request::post(&url)).json(body);
        let text = self.send(request, &url).await?;
        HttpUtils::decode(&text)
    }

    /// Reachability probe
    pub async fn health_check(&self, endpoint: &str) -> bool {
        let url = self.config.endpoint(endpoint);
        match self.send(Request::get(&url).build(), &url).await {
            Ok(_) => {
                get_logger().info(
                    LogComponent::Infrastructure("HTTP"),
                    &format!("✅ Health check passed: {}", endpoint),
                );
                true
            }
            Err(e) => {
                get_logger().warn(
                    LogComponent::Infrastructure("HTTP"),
                    &format!("❌ Health check failed: {} - {}", endpoint, e),
                );
                false
            }
        }
    }

    async fn send(
        &self,
        request: Result<Request, gloo_net::Error>,
        url: &str,
    ) -> NetworkResult<String> {
        let request =
            request.map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

        let result = if self.config.request_timeout_ms == 0 {
            request.send().await
        } else {
            let pending = Box::pin(request.send());
            match select(pending, TimeoutFuture::new(self.config.request_timeout_ms)).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => {
                    get_logger().error(
                        LogComponent::Infrastructure("HTTP"),
                        &format!("⏱️ Timed out after {} ms: {}", self.config.request_timeout_ms, url),
                    );
                    return Err(AppError::Network(format!(
                        "request timed out after {} ms",
                        self.config.request_timeout_ms
                    )));
                }
            }
        };
        let response = result.map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        Self::read_body(response, url).await
    }

    async fn read_body(response: Response, url: &str) -> NetworkResult<String> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response: {}", e)))?;

        if !HttpUtils::is_success_status(status) {
            let message = HttpUtils::error_message(&text);
            get_logger().error(
                LogComponent::Infrastructure("HTTP"),
                &format!("HTTP error: {} - {} ({})", status, message, url),
            );
            return Err(AppError::Remote { status, message });
        }

        get_logger().debug(
            LogComponent::Infrastructure("HTTP"),
            &format!("✅ Response: {} bytes", text.len()),
        );
        Ok(text)
    }
}

fn with_json_headers(builder: RequestBuilder) -> RequestBuilder {
    builder.header("Accept", "application/json")
}

/// Helpers shared by the HTTP clients
pub struct HttpUtils;

impl HttpUtils {
    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// `base?key=value&...` with percent-encoded values
    pub fn build_url_with_params(base_url: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return base_url.to_string();
        }

        let query_string = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", base_url, query_string)
    }

    /// Percent-encode everything outside the RFC 3986 unreserved set
    pub fn url_encode(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    out.push(byte as char)
                }
                _ => out.push_str(&format!("%{:02X}", byte)),
            }
        }
        out
    }

    pub fn decode<T: DeserializeOwned>(text: &str) -> NetworkResult<T> {
        serde_json::from_str(text).map_err(|e| AppError::Decode(e.to_string()))
    }

    /// Server-provided error text, empty when the body carries none
    pub fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let url = HttpUtils::build_url_with_params(
            "https://api.example.com/chart/IBM",
            &[("interval", "15min")],
        );
        assert_eq!(url, "https://api.example.com/chart/IBM?interval=15min");
        assert_eq!(HttpUtils::build_url_with_params("https://a.b", &[]), "https://a.b");
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(HttpUtils::url_encode("hello world"), "hello%20world");
        assert_eq!(HttpUtils::url_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(HttpUtils::url_encode("BRK.B"), "BRK.B");
    }

    #[test]
    fn error_body_is_optional() {
        assert_eq!(HttpUtils::error_message(r#"{"error":"Symbol not found"}"#), "Symbol not found");
        assert_eq!(HttpUtils::error_message(r#"{"message":"busy"}"#), "busy");
        assert_eq!(HttpUtils::error_message("<html>"), "");
    }

    #[test]
    fn decode_failure_maps_to_decode_error() {
        let result: NetworkResult<Vec<u8>> = HttpUtils::decode("{");
        assert!(matches!(result, Err(AppError::Decode(_))));
    }
}
