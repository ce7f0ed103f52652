// src/core/controller.rs — Session state machine
//
// Commands validate locally and return a `Request` stamped with the current
// session generation. Gateway outcomes come back through `apply()`; an outcome
// whose generation is no longer current is dropped.

use crate::core::types::{
    Provider, QueryState, RequestKind, SelectedFile, Session, SessionEvent, UploadState,
};
use crate::gateway::{QueryAnswer, UploadReceipt};
use crate::infra::errors::{GatewayError, ValidationError};
use crate::util::preview;

/// A network operation the controller wants performed.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Upload {
        generation: u64,
        provider: Provider,
        file: SelectedFile,
    },
    Query {
        generation: u64,
        provider: Provider,
        query: String,
    },
}

impl Request {
    pub fn generation(&self) -> u64 {
        match self {
            Request::Upload { generation, .. } | Request::Query { generation, .. } => *generation,
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Upload { .. } => RequestKind::Upload,
            Request::Query { .. } => RequestKind::Query,
        }
    }

}

/// The result of a `Request`, tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Upload {
        generation: u64,
        result: Result<UploadReceipt, GatewayError>,
    },
    Query {
        generation: u64,
        result: Result<QueryAnswer, GatewayError>,
    },
}

impl Outcome {
    pub fn generation(&self) -> u64 {
        match self {
            Outcome::Upload { generation, .. } | Outcome::Query { generation, .. } => *generation,
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Outcome::Upload { .. } => RequestKind::Upload,
            Outcome::Query { .. } => RequestKind::Query,
        }
    }

    /// Build the failure outcome for `request`.
    pub fn failed(request: &Request, error: GatewayError) -> Self {
        let generation = request.generation();
        match request.kind() {
            RequestKind::Upload => Outcome::Upload {
                generation,
                result: Err(error),
            },
            RequestKind::Query => Outcome::Query {
                generation,
                result: Err(error),
            },
        }
    }
}

/// What a submit command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Accepted; the caller must perform the request.
    Dispatch(Request),
    /// Same operation already in flight (or the file is already processed).
    Ignored,
    /// A precondition failed. The message is also in `error_message`.
    Rejected(ValidationError),
}

impl Submission {
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Submission::Dispatch(_))
    }
}

/// Whether an outcome changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Discarded,
}

type EventCallback = Box<dyn Fn(SessionEvent) + Send>;

/// Owns the `Session` and enforces its transitions.
pub struct SessionController {
    session: Session,
    generation: u64,
    on_event: Option<EventCallback>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            generation: 0,
            on_event: None,
        }
    }

    /// Register a callback invoked after every state change.
    pub fn with_events(mut self, callback: impl Fn(SessionEvent) + Send + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current session generation. Bumped by provider switches and file
    /// reselection.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(ref cb) = self.on_event {
            cb(event);
        }
    }

    /// Switch provider. Always legal; resets everything but dark mode and
    /// orphans any in-flight request.
    pub fn select_provider(&mut self, provider: Provider) {
        self.generation += 1;
        self.session.reset();
        self.session.provider = provider;
        tracing::info!(
            "Provider set to {} (generation {})",
            provider,
            self.generation
        );
        self.emit(SessionEvent::ProviderSelected { provider });
    }

    /// Choose a new document. Invalidates any previous processing result.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.generation += 1;
        let event = SessionEvent::FileSelected {
            name: file.name().to_string(),
            bytes: file.len(),
        };

        let s = &mut self.session;
        s.selected_file = Some(file);
        s.upload_state = UploadState::Idle;
        s.upload_message = None;
        s.query.clear();
        s.query_state = QueryState::Idle;
        s.response.clear();
        s.error_message = None;

        tracing::debug!("File selected (generation {})", self.generation);
        self.emit(event);
    }

    /// Edit the query text. Only taken once the file is processed.
    pub fn set_query(&mut self, text: impl Into<String>) -> bool {
        if !self.session.query_enabled() {
            tracing::debug!(
                "Query edit ignored while upload is {:?}",
                self.session.upload_state
            );
            return false;
        }
        self.session.query = text.into();
        true
    }

    pub fn set_dark_mode_preference(&mut self, enabled: bool) {
        self.session.dark_mode = enabled;
        self.emit(SessionEvent::DarkModeChanged { enabled });
    }

    pub fn submit_upload(&mut self) -> Submission {
        let Some(file) = self.session.selected_file.clone() else {
            return self.reject(ValidationError::NoFileSelected);
        };
        if !self.session.upload_enabled() {
            tracing::debug!(
                "Upload ignored: already {:?}",
                self.session.upload_state
            );
            return Submission::Ignored;
        }

        self.session.upload_state = UploadState::Uploading;
        self.session.error_message = None;
        self.session.upload_message = None;

        tracing::info!("Uploading '{}' ({} bytes)", file.name(), file.len());
        self.emit(SessionEvent::UploadStarted {
            name: file.name().to_string(),
        });
        Submission::Dispatch(Request::Upload {
            generation: self.generation,
            provider: self.session.provider,
            file,
        })
    }

    pub fn submit_query(&mut self) -> Submission {
        if self.session.upload_state != UploadState::Uploaded {
            return self.reject(ValidationError::FileNotProcessed);
        }
        let query = self.session.query.trim().to_string();
        if query.is_empty() {
            return self.reject(ValidationError::EmptyQuery);
        }
        if self.session.query_state == QueryState::Querying {
            tracing::debug!("Query ignored: one is already in flight");
            return Submission::Ignored;
        }

        self.session.query_state = QueryState::Querying;
        self.session.error_message = None;
        self.session.response.clear();

        tracing::info!("Querying {}: '{}'", self.session.provider, preview(&query, 60));
        self.emit(SessionEvent::QueryStarted {
            query: query.clone(),
        });
        Submission::Dispatch(Request::Query {
            generation: self.generation,
            provider: self.session.provider,
            query,
        })
    }

    fn reject(&mut self, error: ValidationError) -> Submission {
        tracing::debug!("Command rejected: {}", error.code());
        self.session.error_message = Some(error.to_string());
        self.emit(SessionEvent::Rejected {
            error: error.clone(),
        });
        Submission::Rejected(error)
    }

    /// Apply a gateway outcome, unless it belongs to an older generation or
    /// its sub-machine is no longer waiting for it.
    pub fn apply(&mut self, outcome: Outcome) -> Resolution {
        if outcome.generation() != self.generation {
            return self.discard(outcome.kind(), outcome.generation());
        }

        match outcome {
            Outcome::Upload { generation, result } => {
                if self.session.upload_state != UploadState::Uploading {
                    return self.discard(RequestKind::Upload, generation);
                }
                match result {
                    Ok(receipt) => {
                        self.session.upload_state = UploadState::Uploaded;
                        self.session.upload_message = Some(receipt.message.clone());
                        tracing::info!("Upload complete: {}", receipt.message);
                        self.emit(SessionEvent::UploadCompleted {
                            message: receipt.message,
                        });
                    }
                    Err(err) => {
                        tracing::warn!("Upload failed: {}", err);
                        let message = err.user_message(RequestKind::Upload);
                        self.session.upload_state = UploadState::UploadFailed;
                        self.session.error_message = Some(message.clone());
                        self.emit(SessionEvent::UploadFailed { error: message });
                    }
                }
            }
            Outcome::Query { generation, result } => {
                if self.session.query_state != QueryState::Querying {
                    return self.discard(RequestKind::Query, generation);
                }
                match result {
                    Ok(answer) => {
                        let segments = answer.segments.len();
                        self.session.response = answer.segments;
                        self.session.query_state = QueryState::Answered;
                        tracing::info!("Answer received ({} segment(s))", segments);
                        self.emit(SessionEvent::QueryAnswered { segments });
                    }
                    Err(err) => {
                        tracing::warn!("Query failed: {}", err);
                        let message = err.user_message(RequestKind::Query);
                        self.session.query_state = QueryState::QueryFailed;
                        self.session.error_message = Some(message.clone());
                        self.emit(SessionEvent::QueryFailed { error: message });
                    }
                }
            }
        }
        Resolution::Applied
    }

    fn discard(&self, kind: RequestKind, generation: u64) -> Resolution {
        tracing::warn!(
            "Discarding stale {} result (generation {}, current {})",
            kind,
            generation,
            self.generation
        );
        self.emit(SessionEvent::StaleDiscarded { kind, generation });
        Resolution::Discarded
    }
}
