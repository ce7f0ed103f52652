// src/gateway/mod.rs — Backend gateway layer

pub mod http;
pub mod wire;

use async_trait::async_trait;

use crate::core::types::{Provider, SelectedFile};
use crate::infra::errors::GatewayError;

pub use http::HttpGateway;

/// Stateless adapter over the two backend operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Send one document for server-side processing.
    async fn upload(
        &self,
        provider: Provider,
        file: &SelectedFile,
    ) -> Result<UploadReceipt, GatewayError>;

    /// Ask a question about the processed document.
    async fn query(&self, provider: Provider, query: &str) -> Result<QueryAnswer, GatewayError>;
}

/// Successful upload acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
}

/// A normalized answer: ordered markdown segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryAnswer {
    pub segments: Vec<String>,
}

impl QueryAnswer {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn markdown(&self) -> String {
        self.segments.join("\n")
    }
}
