// src/cli/ask.rs — One-shot upload-and-ask command

use std::path::PathBuf;
use std::sync::Arc;

use super::progress::terminal_events;
use super::render::answer_text;
use super::theme::Theme;
use crate::core::controller::Submission;
use crate::core::types::{Provider, QueryState, SelectedFile, UploadState};
use crate::core::{SessionController, SessionDriver};
use crate::gateway::BackendGateway;
use crate::infra::config::Config;

#[derive(Debug, Clone)]
pub struct AskOptions {
    pub file: PathBuf,
    pub provider: Provider,
    pub query: String,
    pub dark: bool,
    pub quiet: bool,
}

/// Upload `options.file`, ask one question, print the answer to stdout.
pub async fn run_ask(
    config: &Config,
    gateway: Arc<dyn BackendGateway>,
    options: AskOptions,
) -> anyhow::Result<()> {
    let controller = if options.quiet {
        SessionController::new()
    } else {
        SessionController::new().with_events(terminal_events())
    };
    let mut driver = SessionDriver::new(controller, gateway);
    driver.set_dark_mode_preference(config.display.dark_mode || options.dark);
    driver.select_provider(options.provider);

    let file = SelectedFile::load(&options.file).await?;
    driver.select_file(file);

    ensure_dispatched(driver.submit_upload())?;
    driver.settle().await;
    if driver.session().upload_state() != UploadState::Uploaded {
        anyhow::bail!("{}", failure_message(driver.session().error_message()));
    }

    driver.set_query(options.query);
    ensure_dispatched(driver.submit_query())?;
    driver.settle().await;
    if driver.session().query_state() != QueryState::Answered {
        anyhow::bail!("{}", failure_message(driver.session().error_message()));
    }

    let session = driver.session();
    let theme = Theme::for_display(session.dark_mode(), &config.display);
    println!("{}", answer_text(session, &config.display, &theme));
    Ok(())
}

fn ensure_dispatched(submission: Submission) -> anyhow::Result<()> {
    match submission {
        Submission::Dispatch(_) => Ok(()),
        Submission::Rejected(e) => Err(e.into()),
        Submission::Ignored => anyhow::bail!("request was not sent"),
    }
}

fn failure_message(error: Option<&str>) -> &str {
    error.unwrap_or("request did not complete")
}
