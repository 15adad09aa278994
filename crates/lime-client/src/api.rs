//! Control operations against the LIME web service
//!
//! The [`ControlApi`] trait is the seam between the application layer and
//! the network: the TUI uses [`HttpControlApi`], tests substitute a
//! recording fake.

use serde_json::Value;

use lime_core::prelude::*;
use lime_core::ServerEndpoints;

/// Content type the service expects on save and run bodies
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Save/run/fetch operations of the LIME web service
#[trait_variant::make(ControlApi: Send)]
pub trait LocalControlApi {
    /// Persist the configuration on the server (`POST /save`)
    async fn save(&self, body: String) -> Result<()>;

    /// Start a run with `{config, workspace}` (`POST /run`)
    async fn run(&self, body: String) -> Result<()>;

    /// Download the initial configuration (`GET /static/lime_config.json`)
    async fn fetch_config(&self) -> Result<Value>;
}

/// [`ControlApi`] over HTTP using reqwest
#[derive(Debug, Clone)]
pub struct HttpControlApi {
    client: reqwest::Client,
    endpoints: ServerEndpoints,
}

impl HttpControlApi {
    pub fn new(endpoints: ServerEndpoints) -> Self {
        Self::with_client(endpoints, reqwest::Client::new())
    }

    pub fn with_client(endpoints: ServerEndpoints, client: reqwest::Client) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &ServerEndpoints {
        &self.endpoints
    }

    async fn post_json(&self, url: url::Url, body: String) -> Result<()> {
        debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(url.as_str())
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("POST {url}: {e}")))?;

        check_status(response).await.map(|_| ())
    }
}

impl ControlApi for HttpControlApi {
    async fn save(&self, body: String) -> Result<()> {
        self.post_json(self.endpoints.save(), body).await
    }

    async fn run(&self, body: String) -> Result<()> {
        self.post_json(self.endpoints.run(), body).await
    }

    async fn fetch_config(&self) -> Result<Value> {
        let url = self.endpoints.static_config();
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("GET {url}: {e}")))?;

        let response = check_status(response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::http(format!("invalid configuration from {url}: {e}")))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    Err(Error::http(format!(
        "{} returned {}: {}",
        url,
        status,
        body.trim()
    )))
}
