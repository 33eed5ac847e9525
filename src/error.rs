// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Errors raised by the library and errors reported by the Lazarus API.

use crate::http::{HTTPError, RawResponse};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Standard result type for Lazarus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error from the library or from the Lazarus API.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument can never be valid, such as an empty credential or an
    /// input type the operation does not accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Optional arguments contained unknown keys or were missing required
    /// keys.
    #[error("{0}")]
    Validation(String),

    /// The file's extension is not one the API can process.
    #[error("Unsupported file type: {}", path.display())]
    UnsupportedFileType {
        /// The rejected file.
        path: PathBuf,
    },

    /// The file to upload does not exist.
    #[error("No such file: {}", path.display())]
    FileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// The file to upload exists but could not be read.
    #[error("Could not read {}: {source}", path.display())]
    Io {
        /// The unreadable file.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Credentials were rejected while being validated.
    #[error("{0}")]
    InvalidAuth(String),

    /// The API rejected a request's credentials (HTTP 403).
    #[error("Authentication failure: {0}")]
    Auth(ApiError),

    /// The API returned any other unsuccessful response.
    #[error("API failure: {0}")]
    Api(ApiError),

    /// The request could not be made or its response could not be read.
    #[error(transparent)]
    Http(#[from] HTTPError),
}

impl Error {
    /// Converts an unsuccessful API response into an error.
    ///
    /// A 403 status always produces [`Error::Auth`]; any other status
    /// produces [`Error::Api`]. If the body is a JSON object with a
    /// `message`, the message is carried along, and so is the whole body
    /// when it says more than just `status` and `message`. Otherwise the
    /// error carries only the status code (and a stock message for 403s).
    ///
    /// # Examples
    ///
    /// ```
    /// use lazarus::error::Error;
    /// use lazarus::http::RawResponse;
    ///
    /// let resp = RawResponse::new(403, "Forbidden");
    /// let err = Error::from_response(&resp);
    /// assert!(err.is_auth());
    /// assert_eq!(err.api_error().unwrap().message(), Some("Invalid authentication."));
    /// ```
    pub fn from_response(response: &RawResponse) -> Self {
        let code = response.status();
        let api_error = match response.json() {
            Ok(Value::Object(body)) if body.contains_key("message") => {
                let message = match &body["message"] {
                    Value::String(message) => message.clone(),
                    other => other.to_string(),
                };
                let status_only = body.keys().all(|k| k == "status" || k == "message");
                let api_output = (!status_only).then(|| Value::Object(body));
                ApiError::new(StatusLabel::for_code(code), Some(message), code, api_output)
            }
            _ if code == 403 => ApiError::new(
                StatusLabel::AuthFailure,
                Some(String::from("Invalid authentication.")),
                code,
                None,
            ),
            _ => ApiError::new(StatusLabel::Failure, None, code, None),
        };

        if code == 403 {
            Error::Auth(api_error)
        } else {
            Error::Api(api_error)
        }
    }

    /// True if the error means the credentials were not accepted.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::InvalidAuth(_))
    }

    /// The API's report, if this error came from an API response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Auth(err) | Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Coarse outcome reported by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLabel {
    /// The request failed.
    Failure,

    /// The request failed because its credentials were rejected.
    AuthFailure,
}

impl StatusLabel {
    fn for_code(code: u16) -> Self {
        if code == 403 {
            StatusLabel::AuthFailure
        } else {
            StatusLabel::Failure
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::Failure => write!(f, "FAILURE"),
            StatusLabel::AuthFailure => write!(f, "AUTH_FAILURE"),
        }
    }
}

/// An unsuccessful response from the Lazarus API.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    status: StatusLabel,
    message: Option<String>,
    code: u16,
    api_output: Option<Value>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(
        status: StatusLabel,
        message: Option<String>,
        code: u16,
        api_output: Option<Value>,
    ) -> Self {
        Self {
            status,
            message,
            code,
            api_output,
        }
    }

    /// The status of the request.
    pub fn status(&self) -> StatusLabel {
        self.status
    }

    /// The error message reported by the API, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The HTTP status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The entire response body, when it carried more than a status and
    /// message.
    pub fn api_output(&self) -> Option<&Value> {
        self.api_output.as_ref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n\nSTATUS: {}", self.status)?;
        if let Some(message) = &self.message {
            write!(f, "\nMESSAGE: {message}")?;
        }
        write!(f, "\nERROR CODE: {}", self.code)?;
        if let Some(output) = &self.api_output {
            write!(f, "\nAPI OUTPUT: {output}")?;
        }
        Ok(())
    }
}
