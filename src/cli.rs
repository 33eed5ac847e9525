// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::args::{OcrOptions, QuestionOptions, SummaryFields};
use crate::auth::Auth;
use crate::conf::{self, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::forms::Forms;
use crate::http::{HTTPError, HTTPService};
use crate::input::Input;
use crate::rikai::RikAI;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use std::process;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) {
    eprintln!("{}", message.red());
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Extracts, questions, and summarizes documents using the Lazarus API", long_about = None
)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    /// Lazarus organization ID
    #[arg(long)]
    org_id: String,

    /// Lazarus authentication key
    #[arg(long)]
    auth_key: String,

    /// Base URL of the Lazarus API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Use the custom model with this ID
    #[arg(long, value_name = "MODEL_ID")]
    model: Option<String>,

    /// Do not report library usage to Lazarus
    #[arg(long, default_value_t = false)]
    no_telemetry: bool,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Client configuration built from the command-line options.
    pub fn client_config(&self) -> conf::Config {
        conf::Config::default()
            .base_url(&self.base_url)
            .telemetry(!self.no_telemetry)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run OCR over a document
    Ocr {
        #[command(flatten)]
        input: InputConfig,

        #[command(flatten)]
        document: DocumentConfig,
    },

    /// Ask questions about a document
    Ask {
        #[command(flatten)]
        input: InputConfig,

        #[command(flatten)]
        document: DocumentConfig,

        /// Questions to ask
        #[arg(required = true)]
        questions: Vec<String>,

        /// Include OCR results in the response
        #[arg(long, default_value_t = false)]
        return_ocr: bool,

        /// Translate answers into this language
        #[arg(long)]
        language: Option<String>,

        /// Model settings as a JSON object (custom models only)
        #[arg(long, value_parser = parse_json)]
        settings: Option<Value>,
    },

    /// Summarize a document
    Summarize {
        #[command(flatten)]
        input: InputConfig,

        /// Type of document to summarize
        #[arg(long)]
        document_type: String,

        /// What the summary should include
        #[arg(long)]
        summary_description: String,

        /// Description of a second summary
        #[arg(long)]
        secondary_description: Option<String>,

        /// JSON structure to fill from the summary
        #[arg(long)]
        json_format: Option<String>,
    },
}

/// Where the document comes from. Exactly one must be given.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputConfig {
    /// Path to a local PDF or image
    #[arg(long)]
    file: Option<PathBuf>,

    /// URL of the document
    #[arg(long)]
    url: Option<String>,

    /// Base64-encoded document
    #[arg(long)]
    base64: Option<String>,
}

impl InputConfig {
    fn input(&self) -> Result<Input> {
        match (&self.file, &self.url, &self.base64) {
            (Some(path), None, None) => Ok(Input::file(path)),
            (None, Some(url), None) => Ok(Input::url(url)),
            (None, None, Some(data)) => Ok(Input::base64(data)),
            _ => Err(Error::InvalidArgument(String::from(
                "exactly one of --file, --url, or --base64 is required",
            ))),
        }
    }
}

#[derive(Args, Debug)]
struct DocumentConfig {
    /// Custom ID for the uploaded document
    #[arg(long)]
    file_id: Option<String>,

    /// JSON data returned untouched in the response
    #[arg(long, value_parser = parse_json)]
    metadata: Option<Value>,

    /// URL to notify when processing is done
    #[arg(long)]
    webhook: Option<String>,
}

impl DocumentConfig {
    fn ocr_options(&self) -> OcrOptions {
        let mut opts = OcrOptions::default();
        if let Some(file_id) = &self.file_id {
            opts = opts.file_id(file_id);
        }
        if let Some(metadata) = &self.metadata {
            opts = opts.metadata(metadata.clone());
        }
        if let Some(webhook) = &self.webhook {
            opts = opts.webhook(webhook);
        }
        opts
    }

    fn question_options(&self) -> QuestionOptions {
        let mut opts = QuestionOptions::default();
        if let Some(file_id) = &self.file_id {
            opts = opts.file_id(file_id);
        }
        if let Some(metadata) = &self.metadata {
            opts = opts.metadata(metadata.clone());
        }
        if let Some(webhook) = &self.webhook {
            opts = opts.webhook(webhook);
        }
        opts
    }
}

fn parse_json(s: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(s).map_err(|err| format!("invalid JSON: {err}"))
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the command-line program using its stored configuration options.
    ///
    /// Authenticates, performs the requested operation, and prints the
    /// API's response as pretty-printed JSON.
    pub async fn run(&self) -> Result<()> {
        let service = HTTPService::new(self.config.client_config());
        let auth =
            Auth::new_with_service(&self.config.org_id, &self.config.auth_key, &service).await?;
        let model_id = self.config.model.clone();

        let response = match &self.config.command {
            Command::Ocr { input, document } => {
                let forms = Forms::with_service(auth, service, model_id);
                forms.run_ocr(&input.input()?, document.ocr_options()).await?
            }
            Command::Ask {
                input,
                document,
                questions,
                return_ocr,
                language,
                settings,
            } => {
                let mut opts = document.question_options();
                if *return_ocr {
                    opts = opts.return_ocr(true);
                }
                if let Some(language) = language {
                    opts = opts.language(language);
                }
                if let Some(settings) = settings {
                    opts = opts.settings(settings.clone());
                }
                let rikai = RikAI::with_service(auth, service, model_id);
                rikai
                    .ask_question(&input.input()?, questions.clone(), opts)
                    .await?
            }
            Command::Summarize {
                input,
                document_type,
                summary_description,
                secondary_description,
                json_format,
            } => {
                let mut fields = SummaryFields::new(document_type, summary_description);
                if let Some(description) = secondary_description {
                    fields = fields.secondary_description(description);
                }
                if let Some(format) = json_format {
                    fields = fields.json_format(format);
                }
                let rikai = RikAI::with_service(auth, service, model_id);
                rikai.summarize(&input.input()?, fields).await?
            }
        };

        let output = serde_json::to_string_pretty(&response).map_err(HTTPError::Serialization)?;
        println!("{output}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args as ArgMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const CREDENTIALS: [&str; 5] = ["lazarus", "--org-id", "org", "--auth-key", "key"];

    fn parse(args: &[&str]) -> std::result::Result<Config, clap::Error> {
        Config::try_parse_from(CREDENTIALS.iter().chain(args.iter()))
    }

    #[test]
    fn it_parses_an_ocr_command() {
        let config = parse(&["ocr", "--url", "https://fileurl.com", "--file-id", "f1"]).unwrap();
        match &config.command {
            Command::Ocr { input, document } => {
                assert_eq!(input.input().unwrap(), Input::url("https://fileurl.com"));
                let args: ArgMap = document.ocr_options().into();
                assert_eq!(args, json!({"file_id": "f1"}).as_object().unwrap().clone());
            }
            command => panic!("unexpected command: {command:?}"),
        }
    }

    #[test]
    fn it_requires_an_input() {
        assert!(parse(&["ocr"]).is_err());
    }

    #[test]
    fn it_rejects_more_than_one_input() {
        let config = parse(&["ocr", "--url", "u", "--base64", "b"]);
        assert!(config.is_err());
    }

    #[test]
    fn it_parses_json_metadata() {
        let config = parse(&["ocr", "--base64", "b", "--metadata", r#"{"foo":"bar"}"#]).unwrap();
        match &config.command {
            Command::Ocr { document, .. } => {
                assert_eq!(document.metadata, Some(json!({"foo": "bar"})));
            }
            command => panic!("unexpected command: {command:?}"),
        }
    }

    #[test]
    fn it_rejects_invalid_json_metadata() {
        let config = parse(&["ocr", "--base64", "b", "--metadata", "{nope"]);
        assert!(config.is_err());
    }

    #[test]
    fn it_parses_an_ask_command() {
        let config = parse(&[
            "--model",
            "Riky",
            "ask",
            "--file",
            "form.pdf",
            "--return-ocr",
            "Who?",
            "When?",
        ])
        .unwrap();
        assert_eq!(config.model.as_deref(), Some("Riky"));
        match &config.command {
            Command::Ask {
                input,
                questions,
                return_ocr,
                ..
            } => {
                assert_eq!(input.input().unwrap(), Input::file("form.pdf"));
                assert_eq!(questions, &vec!["Who?".to_string(), "When?".to_string()]);
                assert!(*return_ocr);
            }
            command => panic!("unexpected command: {command:?}"),
        }
    }

    #[test]
    fn it_requires_questions() {
        assert!(parse(&["ask", "--url", "u"]).is_err());
    }

    #[test]
    fn it_requires_summary_fields() {
        assert!(parse(&["summarize", "--url", "u", "--document-type", "Form"]).is_err());
        let config = parse(&[
            "summarize",
            "--url",
            "u",
            "--document-type",
            "Form",
            "--summary-description",
            "Everything",
        ]);
        assert!(config.is_ok());
    }

    #[test]
    fn it_builds_a_client_config() {
        let config = parse(&["--base-url", "http://localhost:9000", "--no-telemetry", "ocr", "--url", "u"])
            .unwrap();
        let client_config = config.client_config();
        assert_eq!(
            client_config.endpoint("/api/rikai"),
            "http://localhost:9000/api/rikai"
        );
        assert!(!client_config.telemetry_enabled());
    }

    #[test]
    fn it_uses_the_production_api_by_default() {
        let config = parse(&["ocr", "--url", "u"]).unwrap();
        let client_config = config.client_config();
        assert!(client_config.telemetry_enabled());
        assert_eq!(
            client_config.endpoint("/api/rikai"),
            "https://api.lazarusforms.com/api/rikai"
        );
    }
}
