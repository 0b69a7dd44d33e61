use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;

const USER_AGENT: &str = "fleet-console/0.1";
const ACCEPT: &str = "application/json";

/// Thin wrapper over `reqwest::Client` bound to the back-office API root.
#[derive(Debug, Clone)]
pub struct FleetClient {
    client: reqwest::Client,
    base_url: String,
}

impl FleetClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(FleetClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ConsoleError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConsoleError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ConsoleError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        let response = self.send(self.client.get(&url).query(query), &url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<u8>, ConsoleError> {
        let url = self.url(path);
        debug!("GET (binary) {} {:?}", url, query);
        let response = self.send(self.client.get(&url).query(query), &url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ConsoleError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.send(self.client.post(&url).json(body), &url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// PUT with an optional JSON body; action endpoints take only query
    /// parameters.
    pub async fn put_json<B, T>(
        &self,
        path: &str,
        body: Option<&B>,
        query: &[(String, String)],
    ) -> Result<T, ConsoleError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("PUT {} {:?}", url, query);
        let mut request = self.client.put(&url).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request, &url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        self.send(self.client.delete(&url), &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = FleetClient::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/api/vehicles"),
            "http://localhost:8080/api/vehicles"
        );
        assert_eq!(
            client.url("api/reports/costs"),
            "http://localhost:8080/api/reports/costs"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ConsoleConfig {
            api_base_url: "http://fleet.internal".to_string(),
            ..ConsoleConfig::default()
        };
        let client = FleetClient::from_config(&config).unwrap();
        assert_eq!(client.url("api/drivers"), "http://fleet.internal/api/drivers");
    }
}
