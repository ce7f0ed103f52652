// src/cli/session.rs — Interactive document session REPL

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::progress::terminal_events;
use super::render::answer_text;
use super::status::format_status;
use super::theme::Theme;
use crate::core::controller::{Resolution, Submission};
use crate::core::types::{Provider, QueryState, RequestKind, SelectedFile, Session, UploadState};
use crate::core::{SessionController, SessionDriver};
use crate::gateway::BackendGateway;
use crate::infra::config::Config;

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub file: Option<PathBuf>,
    pub provider: Option<Provider>,
    pub dark: bool,
}

enum Flow {
    Continue,
    Quit,
}

/// Run the interactive session.
///
/// Stdin lines and gateway outcomes are multiplexed on one task, so commands
/// such as `/provider` stay responsive while a request is in flight.
pub async fn run_session(
    config: &Config,
    gateway: Arc<dyn BackendGateway>,
    options: SessionOptions,
) -> anyhow::Result<()> {
    let controller = SessionController::new().with_events(terminal_events());
    let mut driver = SessionDriver::new(controller, gateway);

    if config.display.dark_mode || options.dark {
        driver.set_dark_mode_preference(true);
    }
    if let Some(provider) = options.provider {
        driver.select_provider(provider);
    }

    let provider = driver.session().provider();
    eprintln!(
        "docquery v{} | {} | backend: {}",
        env!("CARGO_PKG_VERSION"),
        provider,
        config
            .route(provider)
            .unwrap_or_else(|| "not connected".to_string()),
    );
    eprintln!("Type /help for commands.\n");

    let file = options.file.or_else(prompt_for_file);
    if let Some(path) = file {
        load_file(&mut driver, &path).await;
    }

    // Piped input runs line by line: each command finishes before the next.
    let scripted = !std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt(driver.session()).await;

    loop {
        tokio::select! {
            Some((kind, resolution)) = driver.next_outcome(), if driver.in_flight() > 0 => {
                report_outcome(kind, resolution, driver.session(), config);
                print_prompt(driver.session()).await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let flow = handle_input(line.trim(), &mut driver, config).await;
                if scripted {
                    drain(&mut driver, config).await;
                }
                match flow {
                    Flow::Quit => break,
                    Flow::Continue => print_prompt(driver.session()).await,
                }
            }
        }
    }

    if scripted {
        drain(&mut driver, config).await;
    }
    let pending = driver.in_flight();
    if pending > 0 {
        eprintln!("  Abandoning {} request(s) in flight.", pending);
    }
    Ok(())
}

/// Apply outcomes until nothing is in flight, printing answers as they land.
async fn drain(driver: &mut SessionDriver, config: &Config) {
    while let Some((kind, resolution)) = driver.next_outcome().await {
        report_outcome(kind, resolution, driver.session(), config);
    }
}

fn report_outcome(kind: RequestKind, resolution: Resolution, session: &Session, config: &Config) {
    let answered = kind == RequestKind::Query
        && resolution == Resolution::Applied
        && session.query_state() == QueryState::Answered;
    if answered {
        print_answer(session, config);
    }
}

/// Ask for a document on start when running on a terminal.
fn prompt_for_file() -> Option<PathBuf> {
    if !std::io::stdin().is_terminal() {
        return None;
    }
    let answer = inquire::Text::new("Document to upload:")
        .with_help_message("Leave empty to choose one later with /file")
        .prompt()
        .ok()?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

async fn print_prompt(session: &Session) {
    let marker = match (session.upload_state(), session.query_state()) {
        (UploadState::Uploading, _) => "uploading",
        (_, QueryState::Querying) => "generating",
        (UploadState::Uploaded, _) => "ask",
        _ => "file",
    };
    let mut stdout = tokio::io::stdout();
    let prompt = format!("{} [{}]> ", session.provider().id(), marker);
    stdout.write_all(prompt.as_bytes()).await.ok();
    stdout.flush().await.ok();
}

fn print_answer(session: &Session, config: &Config) {
    let theme = Theme::for_display(session.dark_mode(), &config.display);
    println!("\n{}\n", answer_text(session, &config.display, &theme));
}

async fn load_file(driver: &mut SessionDriver, path: &Path) {
    match SelectedFile::load(path).await {
        Ok(file) => driver.select_file(file),
        Err(e) => eprintln!("[error] {}", e),
    }
}

async fn handle_input(input: &str, driver: &mut SessionDriver, config: &Config) -> Flow {
    if input.is_empty() {
        return Flow::Continue;
    }
    if input == "quit" || input == "exit" || input == "/quit" {
        return Flow::Quit;
    }
    if input.starts_with('/') {
        handle_slash_command(input, driver, config).await;
        return Flow::Continue;
    }

    // Plain text is a question about the processed document. The running
    // query keeps its text until its answer lands.
    if driver.session().query_state() == QueryState::Querying {
        eprintln!("  A query is already running. Wait for it or switch provider.");
        return Flow::Continue;
    }
    driver.set_query(input);
    driver.submit_query();
    Flow::Continue
}

async fn handle_slash_command(input: &str, driver: &mut SessionDriver, config: &Config) {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/file" => {
            if arg.is_empty() {
                match driver.session().selected_file() {
                    Some(file) => eprintln!("  Selected: {} ({} bytes)", file.name(), file.len()),
                    None => eprintln!("  No file selected."),
                }
                eprintln!("  Usage: /file <path>");
                return;
            }
            load_file(driver, Path::new(arg)).await;
        }
        "/upload" => {
            if driver.submit_upload() == Submission::Ignored {
                match driver.session().upload_state() {
                    UploadState::Uploading => eprintln!("  Upload already in progress."),
                    _ => eprintln!("  File already processed. Choose another with /file."),
                }
            }
        }
        "/provider" => {
            if arg.is_empty() {
                let current = driver.session().provider();
                eprintln!("  Current provider: {}", current);
                for provider in Provider::ALL {
                    let marker = if provider == current { " *" } else { "" };
                    eprintln!("    {:<22} {}{}", provider.id(), provider.label(), marker);
                }
                eprintln!("  Usage: /provider <name>");
                return;
            }
            match super::parse_provider(arg) {
                Ok(provider) => driver.select_provider(provider),
                Err(e) => eprintln!("  {}", e),
            }
        }
        "/dark" => {
            let enabled = match arg {
                "" => !driver.session().dark_mode(),
                "on" => true,
                "off" => false,
                other => {
                    eprintln!("  Expected 'on' or 'off', got '{}'", other);
                    return;
                }
            };
            driver.set_dark_mode_preference(enabled);
        }
        "/status" => {
            let session = driver.session();
            let route = config.route(session.provider());
            for line in format_status(session, route.as_deref()) {
                eprintln!("{}", line);
            }
            if driver.in_flight() > 0 {
                eprintln!("  In flight: {} request(s)", driver.in_flight());
            }
        }
        "/answer" => {
            if driver.session().query_state() == QueryState::Answered {
                print_answer(driver.session(), config);
            } else {
                eprintln!("  No answer yet.");
            }
        }
        "/help" => {
            eprintln!("Slash commands:");
            eprintln!("  /file <path>       Select a document (clears the session)");
            eprintln!("  /upload            Upload and process the selected document");
            eprintln!("  /provider [name]   Show or switch provider (clears the session)");
            eprintln!("  /dark [on|off]     Toggle or set dark mode");
            eprintln!("  /status            Show session status");
            eprintln!("  /answer            Show the last answer again");
            eprintln!("  /help              Show this help");
            eprintln!("  /quit, quit, exit  End session");
            eprintln!("Any other text is sent as a question once the file is processed.");
            eprintln!("Piped input runs each line to completion; `docquery ask` suits one-shot scripts.");
        }
        _ => {
            eprintln!("Unknown command: {}. Type /help for commands.", cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{QueryAnswer, UploadReceipt};
    use crate::infra::errors::GatewayError;

    /// Gateway that answers immediately.
    struct EchoGateway;

    #[async_trait::async_trait]
    impl BackendGateway for EchoGateway {
        async fn upload(
            &self,
            _provider: Provider,
            file: &SelectedFile,
        ) -> Result<UploadReceipt, GatewayError> {
            Ok(UploadReceipt {
                message: format!("Processed {}", file.name()),
            })
        }

        async fn query(&self, _provider: Provider, query: &str) -> Result<QueryAnswer, GatewayError> {
            Ok(QueryAnswer::new(vec![query.to_uppercase()]))
        }
    }

    fn driver() -> SessionDriver {
        SessionDriver::new(SessionController::new(), Arc::new(EchoGateway))
    }

    #[tokio::test]
    async fn test_text_before_upload_is_rejected() {
        let mut d = driver();
        handle_input("hello", &mut d, &Config::default()).await;
        assert_eq!(d.in_flight(), 0);
        assert_eq!(
            d.session().error_message(),
            Some("Please upload and process a file first.")
        );
    }

    #[tokio::test]
    async fn test_commands_drive_the_session() {
        let config = Config::default();
        let mut d = driver();
        d.select_file(SelectedFile::new("brd.pdf", vec![1, 2, 3]));

        handle_input("/upload", &mut d, &config).await;
        d.settle().await;
        assert_eq!(d.session().upload_state(), UploadState::Uploaded);

        handle_input("list cases", &mut d, &config).await;
        d.settle().await;
        assert_eq!(d.session().response(), ["LIST CASES".to_string()]);

        handle_input("/provider abap", &mut d, &config).await;
        assert_eq!(d.session().provider(), Provider::AbapCodeGenerator);
        assert!(d.session().selected_file().is_none());
    }

    #[tokio::test]
    async fn test_text_during_query_keeps_running_query() {
        let config = Config::default();
        let mut d = driver();
        d.select_file(SelectedFile::new("brd.pdf", vec![1]));
        handle_input("/upload", &mut d, &config).await;
        d.settle().await;

        handle_input("first", &mut d, &config).await;
        assert_eq!(d.session().query_state(), QueryState::Querying);
        handle_input("second", &mut d, &config).await;
        assert_eq!(d.session().query(), "first");
        assert_eq!(d.in_flight(), 1);

        d.settle().await;
        assert_eq!(d.session().response(), ["FIRST".to_string()]);
        assert_eq!(d.session().query(), "first");
    }

    #[tokio::test]
    async fn test_piped_lines_run_to_completion() {
        let config = Config::default();
        let mut d = driver();
        d.select_file(SelectedFile::new("brd.pdf", vec![1]));

        handle_input("/upload", &mut d, &config).await;
        drain(&mut d, &config).await;
        assert_eq!(d.session().upload_state(), UploadState::Uploaded);
        assert_eq!(d.in_flight(), 0);

        handle_input("list cases", &mut d, &config).await;
        drain(&mut d, &config).await;
        assert_eq!(d.session().query_state(), QueryState::Answered);
        assert_eq!(d.session().response(), ["LIST CASES".to_string()]);
        assert_eq!(d.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_dark_toggle_and_quit() {
        let config = Config::default();
        let mut d = driver();
        handle_input("/dark", &mut d, &config).await;
        assert!(d.session().dark_mode());
        handle_input("/dark off", &mut d, &config).await;
        assert!(!d.session().dark_mode());
        assert!(matches!(
            handle_input("exit", &mut d, &config).await,
            Flow::Quit
        ));
    }

    #[tokio::test]
    async fn test_unknown_provider_keeps_session() {
        let config = Config::default();
        let mut d = driver();
        d.select_file(SelectedFile::new("brd.pdf", vec![1]));
        let generation = d.generation();
        handle_input("/provider nope", &mut d, &config).await;
        assert_eq!(d.generation(), generation);
        assert!(d.session().selected_file().is_some());
    }
}
