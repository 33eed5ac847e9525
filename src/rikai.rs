// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! RikAI question answering and summarization.

use crate::args::{Args, QuestionOptions, SummaryFields, validate_args};
use crate::auth::Auth;
use crate::dispatch;
use crate::error::{Error, Result};
use crate::http::{APIService, HTTPError, HTTPService};
use crate::input::{Input, InputType};
use serde::Serialize;
use serde_json::Value;

/// Questions to ask about a document.
///
/// The standard model takes a flat list of questions. Custom models can
/// also take nested lists to ask several groups of questions at once.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Questions {
    /// A list of questions.
    List(Vec<String>),

    /// Groups of questions, for multi-question custom calls.
    Nested(Vec<Vec<String>>),
}

impl From<&str> for Questions {
    fn from(question: &str) -> Self {
        Questions::List(vec![question.to_string()])
    }
}

impl From<String> for Questions {
    fn from(question: String) -> Self {
        Questions::List(vec![question])
    }
}

impl From<Vec<String>> for Questions {
    fn from(questions: Vec<String>) -> Self {
        Questions::List(questions)
    }
}

impl From<Vec<&str>> for Questions {
    fn from(questions: Vec<&str>) -> Self {
        Questions::List(questions.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Questions {
    fn from(questions: &[&str]) -> Self {
        Questions::List(questions.iter().map(|q| q.to_string()).collect())
    }
}

impl From<Vec<Vec<String>>> for Questions {
    fn from(questions: Vec<Vec<String>>) -> Self {
        Questions::Nested(questions)
    }
}

impl From<Vec<Vec<&str>>> for Questions {
    fn from(questions: Vec<Vec<&str>>) -> Self {
        let questions = questions
            .into_iter()
            .map(|group| group.into_iter().map(String::from).collect())
            .collect();
        Questions::Nested(questions)
    }
}

/// Posts requests to the `rikai` endpoints.
///
/// A client created without a model ID uses the standard RikAI model. A
/// client created with a model ID uses the custom model with that ID
/// instead, and accepts model `settings` when asking questions.
#[derive(Debug)]
pub struct RikAI<S: APIService = HTTPService> {
    auth: Auth,
    service: S,
    model_id: Option<String>,
}

impl RikAI {
    /// Creates a client for the standard model on the production API.
    pub fn new(auth: Auth) -> Self {
        Self::with_service(auth, HTTPService::default(), None)
    }

    /// Creates a client for the custom model `model_id` on the production
    /// API.
    pub fn custom(auth: Auth, model_id: impl Into<String>) -> Self {
        Self::with_service(auth, HTTPService::default(), Some(model_id.into()))
    }
}

impl<S: APIService> RikAI<S> {
    const QUESTION_ENDPOINT: &'static str = "rikai";
    const SUMMARY_ENDPOINT: &'static str = "rikai/summarizer";
    const SUMMARY_PATH: &'static str = "/api/rikai/summarize";

    /// Creates a client that sends requests through `service`.
    pub fn with_service(auth: Auth, service: S, model_id: Option<String>) -> Self {
        Self {
            auth,
            service,
            model_id,
        }
    }

    /// The custom model used by this client, if any.
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    fn question_path(&self) -> String {
        match &self.model_id {
            Some(model_id) => format!("/api/rikai/custom/{model_id}"),
            None => String::from("/api/rikai"),
        }
    }

    fn allowed_question_args(&self) -> &'static [&'static str] {
        if self.model_id.is_some() {
            QuestionOptions::ALLOWED_CUSTOM
        } else {
            QuestionOptions::ALLOWED
        }
    }

    /// Asks one or more questions about a document.
    ///
    /// `args` may contain `file_id`, `metadata`, `webhook`, `return_ocr`,
    /// and `language`, plus `settings` for custom models; build them with
    /// [`QuestionOptions`] or pass an [`Args`] map.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lazarus::args::QuestionOptions;
    /// use lazarus::auth::Auth;
    /// use lazarus::input::Input;
    /// use lazarus::rikai::RikAI;
    ///
    /// # async fn run() -> lazarus::error::Result<()> {
    /// let auth = Auth::new("my-org-id", "my-auth-key").await?;
    /// let rikai = RikAI::new(auth);
    /// let questions = vec!["What is this document about?", "When was it published?"];
    /// let opts = QuestionOptions::default().return_ocr(true).language("Japanese");
    /// let response = rikai
    ///     .ask_question(&Input::url("https://fileurl.com"), questions, opts)
    ///     .await?;
    /// println!("{response}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn ask_question(
        &self,
        input: &Input,
        questions: impl Into<Questions>,
        args: impl Into<Args>,
    ) -> Result<Value> {
        let args = validate_args(&args.into(), self.allowed_question_args(), &[], true)?;
        let questions: Questions = questions.into();
        let questions = serde_json::to_value(questions).map_err(HTTPError::Serialization)?;

        let mut fields = Args::new();
        fields.insert(String::from("question"), questions);
        fields.extend(args);

        let request =
            dispatch::build_request(&self.service, &self.auth, &self.question_path(), input, fields)
                .await?;
        dispatch::send(
            &self.service,
            &self.auth,
            self.model_id(),
            Self::QUESTION_ENDPOINT,
            request,
        )
        .await
    }

    /// Summarizes a document.
    ///
    /// `fields` must contain `document_type` and `summary_description`, and
    /// may contain `secondary_description` and `json_format`; build them with
    /// [`SummaryFields`] or pass an [`Args`] map. Only URL and base64 inputs
    /// are accepted: a file path fails with [`Error::InvalidArgument`] before
    /// the fields are even checked.
    ///
    /// Summaries always use the standard summarizer, even on a client
    /// created with a custom model.
    pub async fn summarize(&self, input: &Input, fields: impl Into<Args>) -> Result<Value> {
        if input.input_type() == InputType::FilePath {
            return Err(Error::InvalidArgument(String::from(
                "Summarize only accepts \"URL\" and \"BASE64\" input types",
            )));
        }

        let fields = validate_args(
            &fields.into(),
            SummaryFields::OPTIONAL,
            SummaryFields::REQUIRED,
            true,
        )?;
        let mut body = Args::new();
        body.insert(String::from("fields"), Value::Object(fields));

        let request =
            dispatch::build_request(&self.service, &self.auth, Self::SUMMARY_PATH, input, body)
                .await?;
        dispatch::send(
            &self.service,
            &self.auth,
            self.model_id(),
            Self::SUMMARY_ENDPOINT,
            request,
        )
        .await
    }
}
