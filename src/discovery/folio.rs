//! FOLIO Okapi client
//!
//! Thin JSON client over the Okapi gateway: tenant header on every call,
//! token from `/authn/login` once connected.

use crate::config::FolioConfig;
use crate::discovery::{DiscoveryError, DiscoveryResult};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TENANT_HEADER: &str = "X-Okapi-Tenant";
const TOKEN_HEADER: &str = "X-Okapi-Token";

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    okapi_token: Option<String>,
}

/// Authenticated access to one FOLIO tenant
#[derive(Debug, Clone)]
pub struct FolioClient {
    client: Client,
    okapi_url: String,
    tenant_id: String,
    token: Option<String>,
}

impl FolioClient {
    /// Creates an unauthenticated client
    pub fn new(okapi_url: &str, tenant_id: &str, timeout: Duration) -> DiscoveryResult<Self> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self {
            client,
            okapi_url: okapi_url.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            token: None,
        })
    }

    /// Creates a client and logs in with the configured credentials
    pub async fn connect(config: &FolioConfig, timeout: Duration) -> DiscoveryResult<Self> {
        let mut client = Self::new(&config.okapi_url, &config.tenant_id, timeout)?;
        tracing::debug!("Connecting to FOLIO at {}", client.okapi_url);
        client.login(&config.username, &config.password).await?;
        Ok(client)
    }

    /// Obtains an Okapi token
    ///
    /// The token is read from the `x-okapi-token` response header, falling
    /// back to the `okapiToken` body field.
    pub async fn login(&mut self, username: &str, password: &str) -> DiscoveryResult<()> {
        let response = self
            .client
            .post(self.url("/authn/login"))
            .header(TENANT_HEADER, &self.tenant_id)
            .json(&Credentials { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Login(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let header_token = response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let token = match header_token {
            Some(token) => token,
            None => {
                let body = response.text().await?;
                serde_json::from_str::<LoginResponse>(&body)
                    .ok()
                    .and_then(|login| login.okapi_token)
                    .ok_or_else(|| DiscoveryError::Login("no token in response".to_string()))?
            }
        };

        tracing::info!("Logged in to FOLIO tenant {}", self.tenant_id);
        self.token = Some(token);
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// GETs `path` with query parameters and decodes the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> DiscoveryResult<T> {
        tracing::debug!("GET {}{}", self.okapi_url, path);
        let request = self.client.get(self.url(path)).query(query);
        self.send_json(request).await
    }

    /// POSTs a JSON body to `path` and decodes the JSON response
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> DiscoveryResult<T> {
        tracing::debug!("POST {}{}", self.okapi_url, path);
        let request = self.client.post(self.url(path)).json(body);
        self.send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> DiscoveryResult<T> {
        let mut request = request.header(TENANT_HEADER, &self.tenant_id);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DiscoveryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.okapi_url, path)
    }
}
