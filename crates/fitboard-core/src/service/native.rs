//! Native HTTP client for the modeling service using reqwest

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use super::ModelRequest;
use crate::config::ServiceConfig;
use crate::error::ServiceError;

pub struct ModelClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl ModelClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::RequestFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Issue a fit request and parse the JSON reply
    pub async fn fit(&self, request: &ModelRequest) -> Result<Value, ServiceError> {
        let url = request.url(&self.base_url)?;
        self.get_json(&url).await
    }

    pub async fn get_json(&self, url: &str) -> Result<Value, ServiceError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(ServiceError::Status { status });
        }

        let body = response.text().await.map_err(|e| ServiceError::ParseError {
            message: e.to_string(),
        })?;

        Ok(serde_json::from_str(&body)?)
    }
}
