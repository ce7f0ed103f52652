// src/core/driver.rs — Runs controller requests against a gateway
//
// Gateway calls run as spawned tasks; their outcomes are applied back on the
// owning task through `next_outcome()`, so the session is only ever mutated
// in one place.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::controller::{Outcome, Request, Resolution, SessionController, Submission};
use super::types::{Provider, RequestKind, SelectedFile, Session};
use crate::gateway::BackendGateway;
use crate::infra::errors::GatewayError;

pub struct SessionDriver {
    controller: SessionController,
    gateway: Arc<dyn BackendGateway>,
    tasks: JoinSet<Outcome>,
}

impl SessionDriver {
    pub fn new(controller: SessionController, gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            controller,
            gateway,
            tasks: JoinSet::new(),
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    /// Requests spawned and not yet applied, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn select_provider(&mut self, provider: Provider) {
        self.controller.select_provider(provider);
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.controller.select_file(file);
    }

    pub fn set_query(&mut self, text: impl Into<String>) -> bool {
        self.controller.set_query(text)
    }

    pub fn set_dark_mode_preference(&mut self, enabled: bool) {
        self.controller.set_dark_mode_preference(enabled);
    }

    pub fn submit_upload(&mut self) -> Submission {
        let submission = self.controller.submit_upload();
        self.dispatch(&submission);
        submission
    }

    pub fn submit_query(&mut self) -> Submission {
        let submission = self.controller.submit_query();
        self.dispatch(&submission);
        submission
    }

    fn dispatch(&mut self, submission: &Submission) {
        if let Submission::Dispatch(request) = submission {
            let gateway = Arc::clone(&self.gateway);
            let request = request.clone();
            self.tasks.spawn(async move { execute(gateway.as_ref(), request).await });
        }
    }

    /// Wait for the next finished request and apply it.
    /// Returns None when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<(RequestKind, Resolution)> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    let kind = outcome.kind();
                    return Some((kind, self.controller.apply(outcome)));
                }
                Err(e) => tracing::error!("Gateway task did not finish: {}", e),
            }
        }
        None
    }

    /// Apply outcomes until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next_outcome().await.is_some() {}
    }
}

/// Perform `request` against `gateway`. A panic inside the gateway becomes a
/// transport failure so the session never stays stuck waiting.
pub async fn execute(gateway: &dyn BackendGateway, request: Request) -> Outcome {
    let call = async {
        match &request {
            Request::Upload {
                generation,
                provider,
                file,
            } => Outcome::Upload {
                generation: *generation,
                result: gateway.upload(*provider, file).await,
            },
            Request::Query {
                generation,
                provider,
                query,
            } => Outcome::Query {
                generation: *generation,
                result: gateway.query(*provider, query).await,
            },
        }
    };

    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!("Gateway panicked during {} request", request.kind());
            Outcome::failed(
                &request,
                GatewayError::Transport("gateway call panicked".into()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{QueryState, UploadState};
    use crate::gateway::{MockBackendGateway, QueryAnswer, UploadReceipt};

    fn pdf() -> SelectedFile {
        SelectedFile::new("brd.pdf", b"%PDF".to_vec())
    }

    #[tokio::test]
    async fn test_double_upload_hits_gateway_once() {
        let mut gateway = MockBackendGateway::new();
        gateway.expect_upload().times(1).returning(|_, _| {
            Ok(UploadReceipt {
                message: "Processed".into(),
            })
        });

        let mut driver = SessionDriver::new(SessionController::new(), Arc::new(gateway));
        driver.select_file(pdf());
        assert!(driver.submit_upload().is_dispatch());
        assert_eq!(driver.submit_upload(), Submission::Ignored);
        assert_eq!(driver.in_flight(), 1);

        driver.settle().await;
        assert_eq!(driver.session().upload_state(), UploadState::Uploaded);
        assert_eq!(driver.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_rejected_submissions_never_reach_gateway() {
        let mut gateway = MockBackendGateway::new();
        gateway.expect_upload().never();
        gateway.expect_query().never();

        let mut driver = SessionDriver::new(SessionController::new(), Arc::new(gateway));
        assert!(matches!(driver.submit_upload(), Submission::Rejected(_)));
        assert!(matches!(driver.submit_query(), Submission::Rejected(_)));
        assert_eq!(driver.next_outcome().await, None);
    }

    #[tokio::test]
    async fn test_query_uses_selected_provider() {
        let mut gateway = MockBackendGateway::new();
        gateway
            .expect_upload()
            .returning(|_, _| Ok(UploadReceipt { message: "ok".into() }));
        gateway
            .expect_query()
            .withf(|provider, query| {
                *provider == Provider::AbapCodeGenerator && query.to_string() == "Generate a report"
            })
            .times(1)
            .returning(|_, _| Ok(QueryAnswer::new(vec!["REPORT z_demo.".into()])));

        let mut driver = SessionDriver::new(SessionController::new(), Arc::new(gateway));
        driver.select_provider(Provider::AbapCodeGenerator);
        driver.select_file(pdf());
        driver.submit_upload();
        driver.settle().await;
        driver.set_query("Generate a report");
        driver.submit_query();
        driver.settle().await;

        assert_eq!(driver.session().query_state(), QueryState::Answered);
        assert_eq!(driver.session().response_markdown(), "REPORT z_demo.");
    }

    /// Gateway that panics on every call.
    struct PanickingGateway;

    #[async_trait::async_trait]
    impl BackendGateway for PanickingGateway {
        async fn upload(
            &self,
            _provider: Provider,
            _file: &SelectedFile,
        ) -> Result<UploadReceipt, GatewayError> {
            panic!("backend adapter bug")
        }

        async fn query(&self, _provider: Provider, _query: &str) -> Result<QueryAnswer, GatewayError> {
            panic!("backend adapter bug")
        }
    }

    #[tokio::test]
    async fn test_panicking_gateway_becomes_failure() {
        let mut driver = SessionDriver::new(SessionController::new(), Arc::new(PanickingGateway));
        driver.select_file(pdf());
        driver.submit_upload();
        driver.settle().await;

        assert_eq!(driver.session().upload_state(), UploadState::UploadFailed);
        assert_eq!(
            driver.session().error_message(),
            Some("Error uploading file.")
        );
        assert_eq!(driver.in_flight(), 0);
    }
}
