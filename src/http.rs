// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with the Lazarus API using HTTP.

use crate::conf::Config;
use log::{debug, trace};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Request headers, keyed by header name.
pub type Headers = BTreeMap<String, String>;

/// Merges `other` into a copy of `base`.
///
/// When both contain the same header, the value from `other` wins.
/// Headers only present in `base` are always kept, so merging
/// content headers into authentication headers can never drop the
/// authentication headers.
///
/// # Examples
///
/// ```
/// use lazarus::http::{Headers, merge_headers};
/// let base = Headers::from([("orgId".to_string(), "org".to_string())]);
/// let other = Headers::from([("Content-Type".to_string(), "application/json".to_string())]);
/// let merged = merge_headers(&base, &other);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged["orgId"], "org");
/// ```
pub fn merge_headers(base: &Headers, other: &Headers) -> Headers {
    let mut merged = base.clone();
    merged.extend(other.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// A file read from disk, ready to be uploaded as part of a multipart form.
#[derive(Clone, Debug, PartialEq)]
pub struct FileUpload {
    file_name: String,
    content: Vec<u8>,
    mime_type: &'static str,
}

impl FileUpload {
    /// Wraps the contents of a file named `file_name`.
    pub fn new(file_name: impl Into<String>, content: Vec<u8>, mime_type: &'static str) -> Self {
        let file_name = file_name.into();
        Self {
            file_name,
            content,
            mime_type,
        }
    }

    /// The file's base name, without any leading directories.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The raw bytes of the file.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The MIME type reported for the file.
    pub fn mime_type(&self) -> &str {
        self.mime_type
    }
}

/// The body of a POST request.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// No body at all.
    Empty,

    /// A JSON object.
    Json(Map<String, Value>),

    /// A multipart form: a set of plain form fields and a file upload.
    Multipart {
        /// Form fields sent alongside the file.
        fields: Map<String, Value>,

        /// The uploaded file, sent as the `file` part.
        file: FileUpload,
    },
}

impl Body {
    /// Adds `extra` to the body's fields and returns the new body.
    ///
    /// For JSON bodies the fields are merged into the top-level object;
    /// for multipart bodies they become form fields. Later values win
    /// over earlier ones. An empty body becomes a JSON body.
    pub fn with_fields(self, extra: Map<String, Value>) -> Self {
        match self {
            Body::Empty => Body::Json(extra),
            Body::Json(mut fields) => {
                fields.extend(extra);
                Body::Json(fields)
            }
            Body::Multipart { mut fields, file } => {
                fields.extend(extra);
                Body::Multipart { fields, file }
            }
        }
    }

    /// The body's fields, excluding any uploaded file.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        match self {
            Body::Empty => None,
            Body::Json(fields) => Some(fields),
            Body::Multipart { fields, .. } => Some(fields),
        }
    }

    /// True if the body is sent as a multipart form.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Multipart { .. })
    }
}

/// A fully built POST request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// Absolute URL of the endpoint.
    pub url: String,

    /// All headers sent with the request.
    pub headers: Headers,

    /// The request body.
    pub body: Body,
}

impl ApiRequest {
    /// Creates a new request.
    pub fn new(url: impl Into<String>, headers: Headers, body: Body) -> Self {
        let url = url.into();
        Self { url, headers, body }
    }
}

/// The status and raw body of an HTTP response.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    status: u16,
    body: String,
}

impl RawResponse {
    /// Creates a response with the given HTTP `status` and `body`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self { status, body }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// True if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    pub fn json(&self) -> HTTPResult<Value> {
        serde_json::from_str(&self.body).map_err(HTTPError::Deserialization)
    }
}

/// A general service for making HTTP calls to the Lazarus API.
///
/// While this may appear to be more like a "client", think of it as a
/// proxy for a (possibly remote) API service. Dispatchers are generic
/// over this trait so tests can swap in a deterministic service.
pub trait APIService {
    /// Configuration used to build endpoint URLs.
    fn config(&self) -> &Config;

    /// Sends `request` and returns the response, whatever its status.
    ///
    /// Only transport failures are errors here; unsuccessful status
    /// codes are left for the caller to interpret.
    fn post(&self, request: ApiRequest) -> impl Future<Output = HTTPResult<RawResponse>> + Send;

    /// The full URL for the API endpoint at `path`.
    fn endpoint(&self, path: &str) -> String {
        self.config().endpoint(path)
    }
}

/// A concrete implementation of an HTTP API service.
///
/// It more or less just wraps a Reqwest client, making it easier to swap
/// out the service for a deterministic service when writing tests.
#[derive(Clone, Debug)]
pub struct HTTPService {
    client: Client,
    config: Config,
}

impl Default for HTTPService {
    /// A service talking to the production API.
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl HTTPService {
    /// Creates a new HTTP service using the given configuration.
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent(config.agent())
            .build()
            // Better error handling? According to the docs, build() only
            // fails if a TLS backend cannot be initialized, or if DNS
            // resolution cannot be initialized, and both of these seem
            // like unrecoverable errors for us.
            .expect("could not create a new HTTP client");
        Self { client, config }
    }
}

impl APIService for HTTPService {
    fn config(&self) -> &Config {
        &self.config
    }

    async fn post(&self, request: ApiRequest) -> HTTPResult<RawResponse> {
        let ApiRequest { url, headers, body } = request;
        debug!("POST {url}");

        let mut builder = self.client.post(&url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            Body::Empty => builder,
            Body::Json(fields) => builder.json(&fields),
            Body::Multipart { fields, file } => builder.multipart(multipart_form(fields, file)?),
        };

        let resp = builder.send().await.map_err(HTTPError::Request)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(HTTPError::Body)?;
        trace!("POST {url} returned HTTP {status}: {body}");

        Ok(RawResponse::new(status, body))
    }
}

fn multipart_form(fields: Map<String, Value>, file: FileUpload) -> HTTPResult<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            Value::Array(items) => items
                .into_iter()
                .fold(form, |form, item| form.text(name.clone(), form_text(item))),
            value => form.text(name, form_text(value)),
        };
    }

    let FileUpload {
        file_name,
        content,
        mime_type,
    } = file;
    let part = Part::bytes(content)
        .file_name(file_name)
        .mime_str(mime_type)
        .map_err(HTTPError::Multipart)?;
    Ok(form.part("file", part))
}

// Strings go over the wire as-is; everything else as its JSON text.
fn form_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        value => value.to_string(),
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    /// An error retrieving the body of a response.
    #[error("Error retrieving body of HTTP response: {0}")]
    Body(#[source] reqwest::Error),

    /// An error building a multipart form for a file upload.
    #[error("Error building multipart form: {0}")]
    Multipart(#[source] reqwest::Error),

    /// An error that occurred while trying to serialize a request body.
    #[error("Error serializing POST body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// An error that occurred while trying to parse a JSON response.
    #[error("Error parsing JSON response: {0}")]
    Deserialization(#[source] serde_json::Error),
}
