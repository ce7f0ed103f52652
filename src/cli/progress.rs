// src/cli/progress.rs — Terminal renderer for session events

use crate::core::types::SessionEvent;
use crate::util::preview;

/// One status line for `event`.
pub fn format_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::ProviderSelected { provider } => format!("[provider] {}", provider),
        SessionEvent::FileSelected { name, bytes } => {
            format!("[file] {} ({})", name, format_size(*bytes))
        }
        SessionEvent::UploadStarted { name } => format!("[upload] processing {}...", name),
        SessionEvent::UploadCompleted { message } => format!("[upload] {}", message),
        SessionEvent::QueryStarted { query } => {
            format!("[query] generating answer for '{}'...", preview(query, 50))
        }
        SessionEvent::QueryAnswered { segments } => {
            format!("[query] answer ready ({} segment(s))", segments)
        }
        SessionEvent::UploadFailed { error } | SessionEvent::QueryFailed { error } => {
            format!("[error] {}", error)
        }
        SessionEvent::Rejected { error } => format!("[error] {}", error),
        SessionEvent::StaleDiscarded { kind, generation } => format!(
            "[stale] dropped {} result from an earlier session (generation {})",
            kind, generation
        ),
        SessionEvent::DarkModeChanged { enabled } => {
            format!("[theme] dark mode {}", if *enabled { "on" } else { "off" })
        }
    }
}

/// Build an event callback that writes status lines to stderr.
///
/// Returns a closure suitable for `SessionController::with_events()`.
pub fn terminal_events() -> impl Fn(SessionEvent) + Send + 'static {
    move |event| eprintln!("{}", format_event(&event))
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Provider, RequestKind};
    use crate::infra::errors::ValidationError;

    #[test]
    fn test_provider_format() {
        let line = format_event(&SessionEvent::ProviderSelected {
            provider: Provider::AbapCodeGenerator,
        });
        assert_eq!(line, "[provider] ABAP Code Generator");
    }

    #[test]
    fn test_file_format() {
        let line = format_event(&SessionEvent::FileSelected {
            name: "brd.pdf".into(),
            bytes: 2048,
        });
        assert_eq!(line, "[file] brd.pdf (2.0 KB)");
    }

    #[test]
    fn test_failures_are_errors() {
        assert_eq!(
            format_event(&SessionEvent::QueryFailed {
                error: "timeout".into()
            }),
            "[error] timeout"
        );
        assert_eq!(
            format_event(&SessionEvent::Rejected {
                error: ValidationError::EmptyQuery
            }),
            "[error] Please enter a query."
        );
    }

    #[test]
    fn test_stale_format() {
        let line = format_event(&SessionEvent::StaleDiscarded {
            kind: RequestKind::Query,
            generation: 3,
        });
        assert_eq!(
            line,
            "[stale] dropped query result from an earlier session (generation 3)"
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
