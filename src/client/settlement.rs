use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;

use crate::types::ApiConfig;

use super::auth::{build_request_signature, current_unix_timestamp};
use super::{ClientError, ClientResult};

const DEFAULT_MAX_RETRIES: u32 = 3;

/// HTTP client for the settlement venue.
///
/// Requests are HMAC-signed and retried with exponential backoff on transport
/// errors and 5xx responses. A definitive venue answer (2xx or 4xx) is never
/// retried; callers rely on one request producing at most one wager.
pub struct SettlementClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    api_passphrase: String,
    max_retries: u32,
}

impl SettlementClient {
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::Config(
                "settlement base_url must be configured".to_string(),
            ));
        }

        let http = Client::builder()
            .user_agent("betslip-engine/0.1")
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            api_passphrase: config.api_passphrase.clone(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    fn build_url_and_path(&self, path: &str) -> (String, String) {
        let request_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request_path.trim_start_matches('/')
        );

        (url, request_path)
    }

    fn backoff(attempt: u32) -> Duration {
        let capped = attempt.min(5);
        let millis = 500 * (1_u64 << capped);
        Duration::from_millis(millis.min(8_000))
    }

    async fn send_signed_request<TBody, TResp>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TBody>,
    ) -> ClientResult<TResp>
    where
        TBody: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let (url, request_path) = self.build_url_and_path(path);
        let timestamp = current_unix_timestamp();

        let body_json = if let Some(body) = body {
            Some(serde_json::to_string(body)?)
        } else {
            None
        };

        let signature = build_request_signature(
            &self.api_secret,
            timestamp,
            method.as_str(),
            &request_path,
            body_json.as_deref(),
        )?;

        let mut attempt = 0;
        loop {
            let mut req = self
                .http
                .request(method.clone(), &url)
                .header("X-BOOK-KEY", &self.api_key)
                .header("X-BOOK-SIGNATURE", &signature)
                .header("X-BOOK-TIMESTAMP", timestamp.to_string())
                .header("X-BOOK-PASSPHRASE", &self.api_passphrase);

            if let Some(body) = &body_json {
                req = req
                    .header("Content-Type", "application/json")
                    .body(body.clone());
            }

            match req.send().await {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let parsed = resp.json::<TResp>().await?;
                        return Ok(parsed);
                    }

                    if resp.status().is_server_error() && attempt < self.max_retries {
                        attempt += 1;
                        sleep(Self::backoff(attempt)).await;
                        continue;
                    }

                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    return Err(ClientError::HttpStatus { status, body });
                }
                Err(err) => {
                    if attempt < self.max_retries {
                        attempt += 1;
                        sleep(Self::backoff(attempt)).await;
                        continue;
                    }

                    return Err(ClientError::Http(err));
                }
            }
        }
    }

    /// POST a signed JSON body and decode the JSON response.
    pub async fn post<TBody, TResp>(&self, path: &str, body: &TBody) -> ClientResult<TResp>
    where
        TBody: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        self.send_signed_request(Method::POST, path, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig {
            base_url: "https://settle.example.com/".to_string(),
            api_key: "key".to_string(),
            api_secret: "c2VjcmV0".to_string(),
            api_passphrase: "pass".to_string(),
        }
    }

    #[test]
    fn url_and_path_are_normalized() {
        let client = SettlementClient::new(&config()).unwrap();
        let (url, path) = client.build_url_and_path("bets/parlay");
        assert_eq!(url, "https://settle.example.com/bets/parlay");
        assert_eq!(path, "/bets/parlay");

        let (url, path) = client.build_url_and_path("/bets");
        assert_eq!(url, "https://settle.example.com/bets");
        assert_eq!(path, "/bets");
    }

    #[test]
    fn backoff_grows_and_caps() {
        assert!(SettlementClient::backoff(1) < SettlementClient::backoff(3));
        assert_eq!(SettlementClient::backoff(10), Duration::from_millis(8_000));
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        let mut cfg = config();
        cfg.base_url.clear();
        assert!(matches!(
            SettlementClient::new(&cfg),
            Err(ClientError::Config(_))
        ));
    }
}
