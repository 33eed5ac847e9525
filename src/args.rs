// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Optional request arguments and their validation.
//!
//! Every operation accepts a bag of optional arguments. Callers can build
//! one with a typed builder such as [`OcrOptions`], which can only hold
//! arguments the operation understands, or pass an [`Args`] map directly,
//! in which case the keys are checked by [`validate_args()`] before any
//! request is made. Either way, keys are written in snake_case and sent to
//! the API in camelCase.

use crate::error::{Error, Result};
use itertools::Itertools;
use serde_json::{Map, Value};

/// Optional arguments, keyed by their snake_case names.
pub type Args = Map<String, Value>;

/// Checks that `args` only holds keys in `allowed` or `required`, and that
/// every key in `required` is present.
///
/// When `rename` is true, the returned keys are converted to the camelCase
/// names the API expects (see [`camel_case()`]). `args` itself is never
/// modified.
///
/// # Examples
///
/// ```
/// use lazarus::args::{Args, validate_args};
/// use serde_json::json;
///
/// let mut args = Args::new();
/// args.insert("file_id".to_string(), json!("invoice-17"));
/// args.insert("return_ocr".to_string(), json!(true));
/// let args = validate_args(&args, &["file_id", "return_ocr"], &[], true).unwrap();
/// assert_eq!(args["fileId"], json!("invoice-17"));
/// assert_eq!(args["returnOCR"], json!(true));
///
/// let mut args = Args::new();
/// args.insert("badKwarg".to_string(), json!("bad"));
/// assert!(validate_args(&args, &["file_id"], &[], true).is_err());
/// ```
pub fn validate_args(args: &Args, allowed: &[&str], required: &[&str], rename: bool) -> Result<Args> {
    let invalid = args
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()) && !required.contains(&key.as_str()))
        .collect::<Vec<_>>();
    if !invalid.is_empty() {
        return Err(Error::Validation(format!(
            "These fields are not valid arguments: {}",
            invalid.iter().join(", ")
        )));
    }

    let missing = required
        .iter()
        .filter(|key| !args.contains_key(**key))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "These required fields are missing: {}",
            missing.iter().join(", ")
        )));
    }

    let args = args.iter().map(|(key, value)| {
        let key = if rename { camel_case(key) } else { key.clone() };
        (key, value.clone())
    });
    Ok(args.collect())
}

/// Converts a snake_case argument name to the camelCase name used by the API.
///
/// `return_ocr` is special-cased to `returnOCR`. Names that are already in
/// camelCase are returned unchanged.
///
/// # Examples
///
/// ```
/// use lazarus::args::camel_case;
/// assert_eq!(camel_case("file_id"), "fileId");
/// assert_eq!(camel_case("summary_description"), "summaryDescription");
/// assert_eq!(camel_case("return_ocr"), "returnOCR");
/// assert_eq!(camel_case("webhook"), "webhook");
/// ```
pub fn camel_case(key: &str) -> String {
    if key == "return_ocr" {
        return String::from("returnOCR");
    }

    let mut words = key.split('_').filter(|word| !word.is_empty());
    let mut camel = match words.next() {
        Some(first) => lowercase_first(first),
        None => return String::new(),
    };
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            camel.extend(c.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn insert_some(args: &mut Args, key: &str, value: Option<impl Into<Value>>) {
    if let Some(value) = value {
        args.insert(String::from(key), value.into());
    }
}

/// Optional arguments for running OCR over a document.
///
/// # Examples
///
/// ```
/// use lazarus::args::{Args, OcrOptions};
/// use serde_json::json;
///
/// let args: Args = OcrOptions::default()
///     .file_id("invoice-17")
///     .metadata(json!({"customer": 42}))
///     .into();
/// assert_eq!(args.len(), 2);
/// assert_eq!(args["file_id"], json!("invoice-17"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct OcrOptions {
    file_id: Option<String>,
    metadata: Option<Value>,
    webhook: Option<String>,
}

impl OcrOptions {
    /// The argument names accepted by OCR requests.
    pub const ALLOWED: &'static [&'static str] = &["file_id", "metadata", "webhook"];

    /// A custom ID for the uploaded document.
    pub fn file_id(self, file_id: impl Into<String>) -> Self {
        let file_id = Some(file_id.into());
        Self { file_id, ..self }
    }

    /// Data returned untouched in the response.
    pub fn metadata(self, metadata: impl Into<Value>) -> Self {
        let metadata = Some(metadata.into());
        Self { metadata, ..self }
    }

    /// A URL to notify once the document has been processed.
    pub fn webhook(self, webhook: impl Into<String>) -> Self {
        let webhook = Some(webhook.into());
        Self { webhook, ..self }
    }
}

impl From<OcrOptions> for Args {
    fn from(opts: OcrOptions) -> Self {
        let mut args = Args::new();
        insert_some(&mut args, "file_id", opts.file_id);
        insert_some(&mut args, "metadata", opts.metadata);
        insert_some(&mut args, "webhook", opts.webhook);
        args
    }
}

/// Optional arguments for asking questions about a document.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct QuestionOptions {
    file_id: Option<String>,
    metadata: Option<Value>,
    webhook: Option<String>,
    return_ocr: Option<bool>,
    language: Option<String>,
    settings: Option<Value>,
}

impl QuestionOptions {
    /// The argument names accepted by question requests to the standard model.
    pub const ALLOWED: &'static [&'static str] =
        &["file_id", "metadata", "webhook", "return_ocr", "language"];

    /// The argument names accepted by question requests to a custom model.
    pub const ALLOWED_CUSTOM: &'static [&'static str] = &[
        "file_id",
        "metadata",
        "webhook",
        "return_ocr",
        "language",
        "settings",
    ];

    /// A custom ID for the uploaded document.
    pub fn file_id(self, file_id: impl Into<String>) -> Self {
        let file_id = Some(file_id.into());
        Self { file_id, ..self }
    }

    /// Data returned untouched in the response.
    pub fn metadata(self, metadata: impl Into<Value>) -> Self {
        let metadata = Some(metadata.into());
        Self { metadata, ..self }
    }

    /// A URL to notify once the document has been processed.
    pub fn webhook(self, webhook: impl Into<String>) -> Self {
        let webhook = Some(webhook.into());
        Self { webhook, ..self }
    }

    /// Include OCR results in the response.
    pub fn return_ocr(self, return_ocr: bool) -> Self {
        let return_ocr = Some(return_ocr);
        Self { return_ocr, ..self }
    }

    /// Translate answers into this language, given as a two-letter code or
    /// the language's name.
    pub fn language(self, language: impl Into<String>) -> Self {
        let language = Some(language.into());
        Self { language, ..self }
    }

    /// Model settings.
    ///
    /// Only custom models accept settings; requests to the standard model
    /// that include them fail validation.
    pub fn settings(self, settings: impl Into<Value>) -> Self {
        let settings = Some(settings.into());
        Self { settings, ..self }
    }
}

impl From<QuestionOptions> for Args {
    fn from(opts: QuestionOptions) -> Self {
        let mut args = Args::new();
        insert_some(&mut args, "file_id", opts.file_id);
        insert_some(&mut args, "metadata", opts.metadata);
        insert_some(&mut args, "webhook", opts.webhook);
        insert_some(&mut args, "return_ocr", opts.return_ocr);
        insert_some(&mut args, "language", opts.language);
        insert_some(&mut args, "settings", opts.settings);
        args
    }
}

/// Fields that prompt the summarizer.
///
/// # Examples
///
/// ```
/// use lazarus::args::{Args, SummaryFields};
///
/// let fields: Args = SummaryFields::new(
///     "A medical form",
///     "List all patient personal information such as DOB and address",
/// )
/// .secondary_description("Any information related to the health of the patient")
/// .into();
/// assert_eq!(fields.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct SummaryFields {
    document_type: String,
    summary_description: String,
    secondary_description: Option<String>,
    json_format: Option<String>,
}

impl SummaryFields {
    /// Fields every summary request must include.
    pub const REQUIRED: &'static [&'static str] = &["document_type", "summary_description"];

    /// Fields a summary request may include.
    pub const OPTIONAL: &'static [&'static str] = &["secondary_description", "json_format"];

    /// Describes the type of document and what the summary should contain.
    pub fn new(document_type: impl Into<String>, summary_description: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            summary_description: summary_description.into(),
            secondary_description: None,
            json_format: None,
        }
    }

    /// A second summary description. Including one returns a second summary.
    pub fn secondary_description(self, secondary_description: impl Into<String>) -> Self {
        let secondary_description = Some(secondary_description.into());
        Self {
            secondary_description,
            ..self
        }
    }

    /// A JSON structure for the output, filled from the summary.
    pub fn json_format(self, json_format: impl Into<String>) -> Self {
        let json_format = Some(json_format.into());
        Self {
            json_format,
            ..self
        }
    }
}

impl From<SummaryFields> for Args {
    fn from(fields: SummaryFields) -> Self {
        let mut args = Args::new();
        args.insert(String::from("document_type"), fields.document_type.into());
        args.insert(
            String::from("summary_description"),
            fields.summary_description.into(),
        );
        insert_some(&mut args, "secondary_description", fields.secondary_description);
        insert_some(&mut args, "json_format", fields.json_format);
        args
    }
}
