// src/cli/mod.rs — CLI definition (clap derive)

pub mod ask;
pub mod progress;
pub mod render;
pub mod session;
pub mod status;
pub mod theme;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::Provider;

#[derive(Parser)]
#[command(
    name = "docquery",
    about = "Upload a document and ask questions about it",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides config and DOCQUERY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session (default)
    Session {
        /// Document to select on start
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Provider to start with (test_case_generator, abap_code_generator, smart_connector)
        #[arg(short, long, value_parser = parse_provider)]
        provider: Option<Provider>,
        /// Start in dark mode
        #[arg(long)]
        dark: bool,
    },
    /// Upload a document, ask one question, print the answer
    Ask {
        /// Document to upload
        #[arg(short, long)]
        file: PathBuf,
        /// Provider answering the question
        #[arg(short, long, value_parser = parse_provider, default_value = "test_case_generator")]
        provider: Provider,
        /// Render with the dark palette
        #[arg(long)]
        dark: bool,
        /// Suppress progress output (only emit the answer)
        #[arg(long)]
        quiet: bool,
        /// The question
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// List providers and the backend each one is routed to
    Providers,
}

pub fn parse_provider(s: &str) -> Result<Provider, String> {
    Provider::parse(s).ok_or_else(|| {
        let known: Vec<&str> = Provider::ALL.iter().map(|p| p.id()).collect();
        format!("unknown provider '{}' (expected one of: {})", s, known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_session() {
        let cli = Cli::try_parse_from(["docquery"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "docquery",
            "ask",
            "--file",
            "brd.pdf",
            "-p",
            "abap",
            "List",
            "test",
            "cases",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Ask {
                file,
                provider,
                query,
                quiet,
                ..
            }) => {
                assert_eq!(file, PathBuf::from("brd.pdf"));
                assert_eq!(provider, Provider::AbapCodeGenerator);
                assert_eq!(query.join(" "), "List test cases");
                assert!(!quiet);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_default_provider() {
        let cli = Cli::try_parse_from(["docquery", "ask", "-f", "a.pdf", "hello"]).unwrap();
        match cli.command {
            Some(Commands::Ask { provider, .. }) => {
                assert_eq!(provider, Provider::TestCaseGenerator)
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = Cli::try_parse_from(["docquery", "session", "--provider", "nope"]);
        assert!(result.is_err());
        assert!(parse_provider("nope").unwrap_err().contains("smart_connector"));
    }

    #[test]
    fn test_global_api_url() {
        let cli =
            Cli::try_parse_from(["docquery", "providers", "--api-url", "http://x:1"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x:1"));
    }
}
