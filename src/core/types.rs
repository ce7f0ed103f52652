// src/core/types.rs — Session domain types

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::infra::errors::{DocQueryError, ValidationError};

/// Backend capability selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    TestCaseGenerator,
    AbapCodeGenerator,
    SmartConnector,
}

impl Provider {
    pub const ALL: [Provider; 3] = [
        Provider::TestCaseGenerator,
        Provider::AbapCodeGenerator,
        Provider::SmartConnector,
    ];

    /// Stable identifier, also the config key.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::TestCaseGenerator => "test_case_generator",
            Provider::AbapCodeGenerator => "abap_code_generator",
            Provider::SmartConnector => "smart_connector",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::TestCaseGenerator => "Test Case Generator",
            Provider::AbapCodeGenerator => "ABAP Code Generator",
            Provider::SmartConnector => "Smart Connector",
        }
    }

    /// Parse a provider from its id, its label, or a short alias
    /// (`tests`, `abap`, `smart`). Case-insensitive; `-` and spaces count as `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "test_case_generator" | "testcase" | "testcases" | "tests" | "test_cases" => {
                Some(Provider::TestCaseGenerator)
            }
            "abap_code_generator" | "abap" | "abap_code" => Some(Provider::AbapCodeGenerator),
            "smart_connector" | "smart" | "connector" => Some(Provider::SmartConnector),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of the selected file's server-side processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Uploaded,
    UploadFailed,
}

/// Lifecycle of the current query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryState {
    #[default]
    Idle,
    Querying,
    Answered,
    QueryFailed,
}

/// The two network operations a session can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Upload,
    Query,
}

impl RequestKind {
    /// Message used when a failure carries no server-provided text.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            RequestKind::Upload => "Error uploading file.",
            RequestKind::Query => "Error generating test cases.",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Upload => f.write_str("upload"),
            RequestKind::Query => f.write_str("query"),
        }
    }
}

/// A document chosen by the user. Cheap to clone; the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    /// Read a file from disk. The file name (without directories) becomes the
    /// upload name.
    pub async fn load(path: &Path) -> Result<Self, DocQueryError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| DocQueryError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        let is_pdf = Path::new(&self.name)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }
}

/// The single mutable entity of a session. Only `SessionController` mutates it;
/// everyone else reads through the getters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub(crate) provider: Provider,
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) upload_state: UploadState,
    pub(crate) upload_message: Option<String>,
    pub(crate) query: String,
    pub(crate) query_state: QueryState,
    pub(crate) response: Vec<String>,
    pub(crate) error_message: Option<String>,
    pub(crate) dark_mode: bool,
}

impl Session {
    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload_state
    }

    pub fn upload_message(&self) -> Option<&str> {
        self.upload_message.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn query_state(&self) -> QueryState {
        self.query_state
    }

    /// Answer segments in the order the backend returned them.
    pub fn response(&self) -> &[String] {
        &self.response
    }

    /// The answer as one markdown document.
    pub fn response_markdown(&self) -> String {
        self.response.join("\n")
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Whether an upload click would be accepted.
    pub fn upload_enabled(&self) -> bool {
        !matches!(
            self.upload_state,
            UploadState::Uploading | UploadState::Uploaded
        )
    }

    /// Whether the query input is shown/editable.
    pub fn query_enabled(&self) -> bool {
        self.upload_state == UploadState::Uploaded
    }

    /// Reset every field except the dark-mode preference.
    pub(crate) fn reset(&mut self) {
        let dark_mode = self.dark_mode;
        *self = Session {
            dark_mode,
            ..Session::default()
        };
    }
}

/// Notifications emitted by the controller after each state change.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ProviderSelected { provider: Provider },
    FileSelected { name: String, bytes: usize },
    UploadStarted { name: String },
    UploadCompleted { message: String },
    UploadFailed { error: String },
    QueryStarted { query: String },
    QueryAnswered { segments: usize },
    QueryFailed { error: String },
    Rejected { error: ValidationError },
    StaleDiscarded { kind: RequestKind, generation: u64 },
    DarkModeChanged { enabled: bool },
}
