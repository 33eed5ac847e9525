// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! OCR form extraction.

use crate::args::{Args, OcrOptions, validate_args};
use crate::auth::Auth;
use crate::dispatch;
use crate::error::Result;
use crate::http::{APIService, HTTPService};
use crate::input::Input;
use serde_json::Value;

/// Posts requests to the `forms` endpoints.
///
/// A client created without a model ID uses the generic forms model. A
/// client created with a model ID uses the custom model with that ID
/// instead. The model cannot be changed after the client is created.
#[derive(Debug)]
pub struct Forms<S: APIService = HTTPService> {
    auth: Auth,
    service: S,
    model_id: Option<String>,
}

impl Forms {
    /// Creates a client for the generic forms model on the production API.
    pub fn new(auth: Auth) -> Self {
        Self::with_service(auth, HTTPService::default(), None)
    }

    /// Creates a client for the custom model `model_id` on the production
    /// API.
    pub fn custom(auth: Auth, model_id: impl Into<String>) -> Self {
        Self::with_service(auth, HTTPService::default(), Some(model_id.into()))
    }
}

impl<S: APIService> Forms<S> {
    /// Name reported to the metrics endpoint.
    const ENDPOINT: &'static str = "forms";

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

    fn path(&self) -> String {
        match &self.model_id {
            Some(model_id) => format!("/api/forms/custom/{model_id}"),
            None => String::from("/api/forms/generic"),
        }
    }

    /// Runs OCR over a document and returns the API's response.
    ///
    /// `args` may contain `file_id`, `metadata`, and `webhook`; build them
    /// with [`OcrOptions`] or pass an [`Args`] map. Unknown arguments fail
    /// with [`Error::Validation`](crate::error::Error::Validation) before
    /// anything is sent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lazarus::args::OcrOptions;
    /// use lazarus::auth::Auth;
    /// use lazarus::forms::Forms;
    /// use lazarus::input::Input;
    ///
    /// # async fn run() -> lazarus::error::Result<()> {
    /// let auth = Auth::new("my-org-id", "my-auth-key").await?;
    /// let forms = Forms::new(auth);
    /// let opts = OcrOptions::default().file_id("invoice-17");
    /// let response = forms.run_ocr(&Input::file("/path/to/file.pdf"), opts).await?;
    /// println!("{response}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_ocr(&self, input: &Input, args: impl Into<Args>) -> Result<Value> {
        let args = validate_args(&args.into(), OcrOptions::ALLOWED, &[], true)?;
        let request =
            dispatch::build_request(&self.service, &self.auth, &self.path(), input, args).await?;
        dispatch::send(
            &self.service,
            &self.auth,
            self.model_id(),
            Self::ENDPOINT,
            request,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::Body;
    use crate::test_utils::{TestService, test_auth};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    const INPUT_URL: &str = "https://example.com/examples/Sample%20Form.pdf";

    fn forms(service: TestService) -> Forms<TestService> {
        Forms::with_service(test_auth(), service, None)
    }

    #[tokio::test]
    async fn it_runs_ocr() {
        let forms = forms(TestService::responding(200, r#"{"status":"SUCCESS"}"#));
        let resp = forms.run_ocr(&Input::url(INPUT_URL), Args::new()).await;
        assert_eq!(resp.unwrap(), json!({"status": "SUCCESS"}));
    }

    #[tokio::test]
    async fn it_runs_ocr_with_options() {
        let mock_response = r#"{"status":"SUCCESS","documentId":"file_id","metadata":{},"webhook":"url"}"#;
        let forms = forms(TestService::responding(200, mock_response));
        let opts = OcrOptions::default()
            .file_id("file_id")
            .metadata(json!({}))
            .webhook("url");
        let resp = forms.run_ocr(&Input::url(INPUT_URL), opts).await.unwrap();
        assert_eq!(resp["documentId"], "file_id");

        let requests = forms.service.requests();
        let expected = json!({
            "inputUrl": INPUT_URL,
            "fileId": "file_id",
            "metadata": {},
            "webhook": "url",
        });
        assert_eq!(requests[0].body, Body::Json(expected.as_object().unwrap().clone()));
    }

    #[tokio::test]
    async fn it_rejects_bad_arguments_without_a_request() {
        let forms = forms(TestService::responding(200, "{}"));
        let mut args = Args::new();
        args.insert(String::from("badKwarg"), json!("bad"));
        let resp = forms.run_ocr(&Input::url(INPUT_URL), args).await;
        assert!(matches!(resp, Err(Error::Validation(_))));
        assert!(forms.service.requests().is_empty());
    }

    #[tokio::test]
    async fn it_posts_to_the_generic_endpoint_without_a_model() {
        let forms = forms(TestService::responding(200, "{}"));
        forms.run_ocr(&Input::base64("b64"), Args::new()).await.unwrap();
        assert_eq!(
            forms.service.urls(),
            vec!["https://api.lazarusforms.com/api/forms/generic"]
        );
    }

    #[tokio::test]
    async fn it_posts_to_the_custom_endpoint_with_a_model() {
        let service = TestService::responding(200, "{}");
        let forms = Forms::with_service(test_auth(), service, Some(String::from("m1")));
        forms.run_ocr(&Input::base64("b64"), Args::new()).await.unwrap();
        assert_eq!(
            forms.service.urls(),
            vec!["https://api.lazarusforms.com/api/forms/custom/m1"]
        );
    }

    #[tokio::test]
    async fn it_uploads_files_as_multipart_forms() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let forms = forms(TestService::responding(200, "{}"));
        let opts = OcrOptions::default().file_id("scan");
        forms.run_ocr(&Input::file(file.path()), opts).await.unwrap();

        let requests = forms.service.requests();
        assert!(!requests[0].headers.contains_key("Content-Type"));
        assert_eq!(requests[0].headers["orgId"], "test-org-please-ignore");
        match &requests[0].body {
            Body::Multipart { fields, file } => {
                assert_eq!(fields, json!({"fileId": "scan"}).as_object().unwrap());
                assert_eq!(file.mime_type(), "image/png");
            }
            body => panic!("expected multipart body, got {body:?}"),
        }
    }

    #[tokio::test]
    async fn it_rejects_unsupported_files_without_a_request() {
        let forms = forms(TestService::responding(200, "{}"));
        let resp = forms.run_ocr(&Input::file("notes.docx"), Args::new()).await;
        assert!(matches!(resp, Err(Error::UnsupportedFileType { .. })));
        assert!(forms.service.requests().is_empty());
    }

    #[tokio::test]
    async fn it_returns_an_auth_error_on_403() {
        let forms = forms(TestService::responding(403, "nope"));
        let resp = forms.run_ocr(&Input::url(INPUT_URL), Args::new()).await;
        assert!(matches!(resp, Err(Error::Auth(_))));
    }

    #[test]
    fn it_reports_its_model() {
        let forms = Forms::with_service(test_auth(), TestService::failing(), None);
        assert_eq!(forms.model_id(), None);
        let forms = Forms::with_service(test_auth(), TestService::failing(), Some("m".into()));
        assert_eq!(forms.model_id(), Some("m"));
    }
}
