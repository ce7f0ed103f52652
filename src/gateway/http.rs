// src/gateway/http.rs — HTTP backend gateway (reqwest)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::collections::HashMap;
use std::time::Duration;

use super::wire::{self, QueryRequest};
use super::{BackendGateway, QueryAnswer, UploadReceipt};
use crate::core::types::{Provider, SelectedFile};
use crate::infra::config::Config;
use crate::infra::errors::{DocQueryError, GatewayError};
use crate::util::preview;

/// Talks to `POST {base}/upload` and `POST {base}/query`, one base URL per
/// wired provider.
pub struct HttpGateway {
    client: reqwest::Client,
    routes: HashMap<Provider, String>,
    upload_field: String,
}

impl HttpGateway {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            routes: HashMap::new(),
            upload_field: "file".into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, DocQueryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.backend.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let mut gateway =
            Self::new(builder.build()?).with_upload_field(config.backend.upload_field.clone());
        for provider in Provider::ALL {
            if let Some(url) = config.route(provider) {
                gateway = gateway.with_route(provider, url);
            }
        }
        Ok(gateway)
    }

    pub fn with_route(mut self, provider: Provider, base_url: impl Into<String>) -> Self {
        let url = base_url.into().trim_end_matches('/').to_string();
        self.routes.insert(provider, url);
        self
    }

    /// Multipart field name carrying the file.
    pub fn with_upload_field(mut self, field: impl Into<String>) -> Self {
        self.upload_field = field.into();
        self
    }

    pub fn route(&self, provider: Provider) -> Option<&str> {
        self.routes.get(&provider).map(String::as_str)
    }

    fn endpoint(&self, provider: Provider, path: &str) -> Result<String, GatewayError> {
        self.route(provider)
            .map(|base| format!("{base}/{path}"))
            .ok_or(GatewayError::Unwired { provider })
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn upload(
        &self,
        provider: Provider,
        file: &SelectedFile,
    ) -> Result<UploadReceipt, GatewayError> {
        let url = self.endpoint(provider, "upload")?;

        let part = Part::bytes(file.content().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(transport_error)?;
        let form = Form::new().part(self.upload_field.clone(), part);

        tracing::debug!(
            "POST {} ({} bytes as '{}')",
            url,
            file.len(),
            self.upload_field
        );
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!("upload -> HTTP {}", status);
        wire::decode_upload(status, &body)
    }

    async fn query(&self, provider: Provider, query: &str) -> Result<QueryAnswer, GatewayError> {
        let url = self.endpoint(provider, "query")?;

        tracing::debug!("POST {} query='{}'", url, preview(query, 60));
        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!("query -> HTTP {} ({} bytes)", status, body.len());
        wire::decode_query(status, &body)
    }
}
