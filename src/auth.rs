// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authentication for the Lazarus API.

use crate::error::{Error, Result};
use crate::http::{APIService, ApiRequest, Body, HTTPService, Headers};
use log::{debug, warn};
use std::fmt;

/// Holds and validates a caller's Lazarus credentials.
///
/// Credentials are checked against the API once, when they are created,
/// and never again. [`Forms`](crate::forms::Forms) and
/// [`RikAI`](crate::rikai::RikAI) clients must be created with a valid
/// `Auth`.
#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    org_id: String,
    auth_key: String,
}

impl Auth {
    /// The endpoint used to check credentials.
    ///
    /// A POST with no body processes no pages, so the caller is not
    /// charged for it.
    pub const PROBE_PATH: &'static str = "/api/forms/generic";

    /// Creates and authenticates credentials against the production API.
    ///
    /// Returns [`Error::InvalidArgument`] if either value is empty and
    /// [`Error::InvalidAuth`] if the API rejects them.
    pub async fn new(org_id: impl Into<String>, auth_key: impl Into<String>) -> Result<Self> {
        let service = HTTPService::default();
        Self::new_with_service(org_id, auth_key, &service).await
    }

    /// Creates and authenticates credentials using the given `service`.
    pub async fn new_with_service<S: APIService>(
        org_id: impl Into<String>,
        auth_key: impl Into<String>,
        service: &S,
    ) -> Result<Self> {
        let auth = Self::unchecked(org_id, auth_key)?;
        auth.authenticate(service).await?;
        Ok(auth)
    }

    /// Creates credentials without checking them against the API.
    ///
    /// Empty values are still rejected.
    pub(crate) fn unchecked(org_id: impl Into<String>, auth_key: impl Into<String>) -> Result<Self> {
        let org_id = org_id.into();
        let auth_key = auth_key.into();
        if org_id.is_empty() || auth_key.is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "Cannot initialize with an empty string.",
            )));
        }
        Ok(Self { org_id, auth_key })
    }

    // Only a 403 counts as a rejection. Anything else, server errors
    // included, means the credentials were not refused.
    async fn authenticate<S: APIService>(&self, service: &S) -> Result<()> {
        let url = service.endpoint(Self::PROBE_PATH);
        let request = ApiRequest::new(url, self.headers(), Body::Empty);
        let response = service.post(request).await?;

        match response.status() {
            403 => Err(Error::InvalidAuth(String::from(
                "Invalid org ID or auth key. Authentication failed.",
            ))),
            status if status >= 500 => {
                warn!("authentication probe returned HTTP {status}; assuming credentials are valid");
                Ok(())
            }
            status => {
                debug!("authentication probe returned HTTP {status}");
                Ok(())
            }
        }
    }

    /// The organization ID.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// The authentication key.
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// The headers that identify the caller on every request.
    pub fn headers(&self) -> Headers {
        Headers::from([
            (String::from("orgId"), self.org_id.clone()),
            (String::from("authKey"), self.auth_key.clone()),
        ])
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Auth {{ org_id = {}, auth_key = <redacted> }}", self.org_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestService;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn it_authenticates_valid_credentials() {
        let service = TestService::responding(400, r#"{"status":"FAILURE","message":"No file"}"#);
        let auth = Auth::new_with_service("org", "key", &service).await;
        let auth = auth.expect("credentials should be accepted");
        assert_eq!(auth.org_id(), "org");
        assert_eq!(auth.auth_key(), "key");
    }

    #[tokio::test]
    async fn it_probes_the_generic_forms_endpoint_once() {
        let service = TestService::responding(200, "{}");
        Auth::new_with_service("org", "key", &service).await.unwrap();
        let requests = service.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.lazarusforms.com/api/forms/generic");
        assert_eq!(requests[0].body, Body::Empty);
        assert_eq!(requests[0].headers["orgId"], "org");
        assert_eq!(requests[0].headers["authKey"], "key");
    }

    #[tokio::test]
    async fn it_rejects_credentials_on_403() {
        let service = TestService::responding(403, r#"{"status":"AUTH_FAILURE","message":"x"}"#);
        let auth = Auth::new_with_service("bad_org_id", "bad_auth_key", &service).await;
        assert!(matches!(auth, Err(Error::InvalidAuth(_))));
    }

    #[tokio::test]
    async fn it_accepts_credentials_when_the_server_errors() {
        let service = TestService::responding(500, "Internal Server Error");
        let auth = Auth::new_with_service("org", "key", &service).await;
        assert!(auth.is_ok());
    }

    #[tokio::test]
    async fn it_rejects_empty_credentials_without_a_request() {
        let service = TestService::responding(200, "{}");
        let auth = Auth::new_with_service("", "", &service).await;
        assert!(matches!(auth, Err(Error::InvalidArgument(_))));

        let auth = Auth::new_with_service("org", "", &service).await;
        assert!(matches!(auth, Err(Error::InvalidArgument(_))));

        let auth = Auth::new_with_service("", "key", &service).await;
        assert!(matches!(auth, Err(Error::InvalidArgument(_))));

        assert!(service.requests().is_empty());
    }

    #[test]
    fn it_returns_credential_headers() {
        let auth = Auth::unchecked("org", "key").unwrap();
        let headers = auth.headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["orgId"], "org");
        assert_eq!(headers["authKey"], "key");
    }

    #[test]
    fn it_redacts_the_key_when_debugging() {
        let auth = Auth::unchecked("org", "supersecret").unwrap();
        let debugged = format!("{auth:?}");
        assert!(!debugged.contains("supersecret"));
        assert!(debugged.contains("org"));
    }
}
