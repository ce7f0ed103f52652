// src/cli/status.rs — Session status and provider routing display

use crate::core::types::{Provider, QueryState, Session, UploadState};
use crate::infra::config::Config;
use crate::util::preview;

/// Status lines for `/status`.
pub fn format_status(session: &Session, route: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "  Provider: {} ({})",
        session.provider(),
        route.unwrap_or("not connected")
    ));

    match session.selected_file() {
        Some(file) => lines.push(format!("  File: {} ({} bytes)", file.name(), file.len())),
        None => lines.push("  File: none".to_string()),
    }

    let upload = match session.upload_state() {
        UploadState::Idle => "not uploaded".to_string(),
        UploadState::Uploading => "uploading...".to_string(),
        UploadState::Uploaded => match session.upload_message() {
            Some(msg) => format!("processed ({})", msg),
            None => "processed".to_string(),
        },
        UploadState::UploadFailed => "failed (retry with /upload)".to_string(),
    };
    lines.push(format!("  Upload: {}", upload));

    let query = match session.query_state() {
        QueryState::Idle => "idle",
        QueryState::Querying => "generating...",
        QueryState::Answered => "answered (/answer to show)",
        QueryState::QueryFailed => "failed",
    };
    if session.query().is_empty() {
        lines.push(format!("  Query: {}", query));
    } else {
        lines.push(format!(
            "  Query: {} | '{}'",
            query,
            preview(session.query(), 50)
        ));
    }

    if let Some(err) = session.error_message() {
        lines.push(format!("  Error: {}", err));
    }
    lines.push(format!(
        "  Dark mode: {}",
        if session.dark_mode() { "on" } else { "off" }
    ));
    lines
}

/// Handle `docquery providers`.
pub fn show_providers(config: &Config) {
    println!("Providers:");
    for provider in Provider::ALL {
        let marker = if provider == Provider::default() {
            " (default)"
        } else {
            ""
        };
        match config.route(provider) {
            Some(url) => println!("  {:<22} {}{}", provider.id(), url, marker),
            None => println!("  {:<22} not connected{}", provider.id(), marker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SelectedFile;
    use crate::core::SessionController;

    #[test]
    fn test_status_for_new_session() {
        let c = SessionController::new();
        let lines = format_status(c.session(), Some("http://127.0.0.1:5000"));
        assert_eq!(
            lines[0],
            "  Provider: Test Case Generator (http://127.0.0.1:5000)"
        );
        assert_eq!(lines[1], "  File: none");
        assert_eq!(lines[2], "  Upload: not uploaded");
        assert_eq!(lines[3], "  Query: idle");
        assert_eq!(lines.last().unwrap(), "  Dark mode: off");
    }

    #[test]
    fn test_status_shows_error_and_file() {
        let mut c = SessionController::new();
        c.select_provider(Provider::SmartConnector);
        c.select_file(SelectedFile::new("brd.pdf", vec![0; 10]));
        c.submit_query();
        let lines = format_status(c.session(), None);
        assert_eq!(lines[0], "  Provider: Smart Connector (not connected)");
        assert_eq!(lines[1], "  File: brd.pdf (10 bytes)");
        assert!(lines
            .iter()
            .any(|l| l == "  Error: Please upload and process a file first."));
    }
}
