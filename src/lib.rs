// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! lazarus is a client for the [Lazarus] document intelligence APIs. It
//! can run OCR over forms, answer questions about documents, and summarize
//! them, using either Lazarus's standard models or a custom model trained
//! for your organization.
//!
//! # Examples
//!
//! Every client needs credentials, which are checked once when they are
//! created:
//!
//! ```no_run
//! use lazarus::args::{OcrOptions, QuestionOptions, SummaryFields};
//! use lazarus::auth::Auth;
//! use lazarus::forms::Forms;
//! use lazarus::input::Input;
//! use lazarus::rikai::RikAI;
//!
//! # async fn run() -> lazarus::error::Result<()> {
//! let auth = Auth::new("my-org-id", "my-auth-key").await?;
//!
//! // Extract a form from a local file
//! let forms = Forms::new(auth.clone());
//! let response = forms
//!     .run_ocr(&Input::file("/path/to/file.pdf"), OcrOptions::default())
//!     .await?;
//!
//! // Ask questions about a document at a URL, with a custom model
//! let rikai = RikAI::custom(auth.clone(), "my-model-id");
//! let questions = vec!["What is this document about?"];
//! let response = rikai
//!     .ask_question(&Input::url("https://fileurl.com"), questions, QuestionOptions::default())
//!     .await?;
//!
//! // Summarize a base64-encoded document
//! let rikai = RikAI::new(auth);
//! let fields = SummaryFields::new("A medical form", "List all patient personal information");
//! let response = rikai.summarize(&Input::base64("JVBERi0xLjQK"), fields).await?;
//! # Ok(())
//! # }
//! ```
//!
//! To talk to a different host, or to turn off usage reporting, build an
//! [`HTTPService`](http::HTTPService) from a [`Config`](conf::Config) and
//! use the `with_service` constructors.
//!
//! The crate also ships a small `lazarus` command-line tool; run
//! `lazarus --help` for usage.
//!
//! # License
//!
//! lazarus is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [Lazarus]: https://www.lazarusai.com/

pub mod args;
pub mod auth;
pub mod cli;
pub mod conf;
mod dispatch;
pub mod error;
pub mod forms;
pub mod http;
pub mod input;
pub mod metrics;
pub mod rikai;

pub use error::{Error, Result};

#[cfg(test)]
mod test_utils;
