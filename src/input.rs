// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Documents sent to the API, and how they are encoded in requests.
//!
//! A document can be supplied as a path to a local file, a URL the API can
//! download it from, or a base64-encoded string. Local files are uploaded
//! as multipart forms; the other two are sent as JSON.

use crate::error::{Error, Result};
use crate::http::{Body, FileUpload, Headers};
use log::debug;
use serde_json::{Map, Value};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File extensions the API accepts, with the MIME type reported for each.
pub const FILE_EXTENSIONS: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpeg", "image/jpg"),
    ("jpg", "image/jpg"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("webp", "image/webp"),
];

/// The ways a document can be supplied to the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    /// A path to a local file.
    FilePath,

    /// A URL the API downloads the document from.
    Url,

    /// A base64-encoded document.
    Base64,
}

impl InputType {
    /// Headers needed to send a document of this type.
    ///
    /// Multipart uploads set their own content type, so files need no
    /// extra headers.
    pub fn headers(&self) -> Headers {
        match self {
            InputType::FilePath => Headers::new(),
            InputType::Url | InputType::Base64 => Headers::from([(
                String::from("Content-Type"),
                String::from("application/json"),
            )]),
        }
    }
}

impl FromStr for InputType {
    type Err = Error;

    /// Parses the literal names used by the API: `FILE_PATH`, `URL`, or
    /// `BASE64`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FILE_PATH" => Ok(InputType::FilePath),
            "URL" => Ok(InputType::Url),
            "BASE64" => Ok(InputType::Base64),
            _ => Err(Error::InvalidArgument(format!(
                "Expected one of: \"FILE_PATH\", \"URL\", \"BASE64\"; got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputType::FilePath => "FILE_PATH",
            InputType::Url => "URL",
            InputType::Base64 => "BASE64",
        };
        f.write_str(s)
    }
}

/// A document to be processed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A path to a local file, relative to the current directory or absolute.
    FilePath(PathBuf),

    /// A URL the API downloads the document from.
    Url(String),

    /// A base64-encoded document.
    Base64(String),
}

impl Input {
    /// A local file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Input::FilePath(path.into())
    }

    /// A document at a URL.
    pub fn url(url: impl Into<String>) -> Self {
        Input::Url(url.into())
    }

    /// A base64-encoded document.
    pub fn base64(data: impl Into<String>) -> Self {
        Input::Base64(data.into())
    }

    /// Pairs an input type with its payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazarus::input::{Input, InputType};
    /// let input = Input::typed(InputType::Url, "https://example.com/form.pdf");
    /// assert_eq!(input, Input::url("https://example.com/form.pdf"));
    /// ```
    pub fn typed(input_type: InputType, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        match input_type {
            InputType::FilePath => Input::FilePath(PathBuf::from(payload)),
            InputType::Url => Input::Url(payload),
            InputType::Base64 => Input::Base64(payload),
        }
    }

    /// Parses an input type literal (`FILE_PATH`, `URL`, `BASE64`) and
    /// pairs it with its payload.
    ///
    /// Returns [`Error::InvalidArgument`] for any other literal.
    pub fn parse(input_type: &str, payload: impl Into<String>) -> Result<Self> {
        let input_type = input_type.parse()?;
        Ok(Self::typed(input_type, payload))
    }

    /// The kind of input.
    pub fn input_type(&self) -> InputType {
        match self {
            Input::FilePath(_) => InputType::FilePath,
            Input::Url(_) => InputType::Url,
            Input::Base64(_) => InputType::Base64,
        }
    }

    /// Headers needed to send this document.
    pub fn headers(&self) -> Headers {
        self.input_type().headers()
    }

    /// Builds the request body that carries this document.
    ///
    /// URLs are sent as `{"inputUrl": ...}` and base64 strings as
    /// `{"base64": ...}`. Files are read into memory and attached to a
    /// multipart form; the file is closed again before this returns.
    ///
    /// Returns [`Error::UnsupportedFileType`] if a file's extension is not
    /// in [`FILE_EXTENSIONS`], or [`Error::FileNotFound`] if it does not
    /// exist.
    pub async fn body(&self) -> Result<Body> {
        match self {
            Input::FilePath(path) => {
                let file = read_upload(path).await?;
                Ok(Body::Multipart {
                    fields: Map::new(),
                    file,
                })
            }
            Input::Url(url) => Ok(json_body("inputUrl", url)),
            Input::Base64(data) => Ok(json_body("base64", data)),
        }
    }
}

fn json_body(key: &str, value: &str) -> Body {
    let mut fields = Map::new();
    fields.insert(String::from(key), Value::String(String::from(value)));
    Body::Json(fields)
}

/// The MIME type for a file, based on its extension.
///
/// # Examples
///
/// ```
/// use lazarus::input::mime_type;
/// assert_eq!(mime_type("scans/form.pdf"), Some("application/pdf"));
/// assert_eq!(mime_type("photo.jpeg"), Some("image/jpg"));
/// assert_eq!(mime_type("notes.txt"), None);
/// assert_eq!(mime_type("bad_extension"), None);
/// ```
pub fn mime_type(path: impl AsRef<Path>) -> Option<&'static str> {
    let ext = path.as_ref().extension()?.to_str()?;
    FILE_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

async fn read_upload(path: &Path) -> Result<FileUpload> {
    let mime = mime_type(path).ok_or_else(|| Error::UnsupportedFileType {
        path: path.to_path_buf(),
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let resolved = std::path::absolute(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("reading {} for upload as {mime}", resolved.display());

    let content = tokio::fs::read(&resolved).await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            Error::FileNotFound { path: resolved.clone() }
        } else {
            Error::Io {
                path: resolved.clone(),
                source,
            }
        }
    })?;

    Ok(FileUpload::new(file_name, content, mime))
}
