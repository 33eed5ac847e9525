// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! The request/response cycle shared by every operation.

use crate::args::Args;
use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::http::{APIService, ApiRequest, merge_headers};
use crate::input::Input;
use crate::metrics;
use log::debug;
use serde_json::Value;

/// Builds a POST to `path` carrying `input` and the already validated
/// `fields`.
///
/// Credential headers come first and input headers are merged over them.
/// For files, `fields` become form fields next to the upload; otherwise
/// they are merged into the JSON body.
pub(crate) async fn build_request<S: APIService>(
    service: &S,
    auth: &Auth,
    path: &str,
    input: &Input,
    fields: Args,
) -> Result<ApiRequest> {
    let headers = merge_headers(&auth.headers(), &input.headers());
    let body = input.body().await?.with_fields(fields);
    Ok(ApiRequest::new(service.endpoint(path), headers, body))
}

/// Sends `request` and interprets the response.
///
/// Successful responses are decoded and returned as-is. Anything else is
/// turned into an [`Error`]. Usage is reported to the metrics endpoint
/// either way, and reporting never changes the result.
pub(crate) async fn send<S: APIService>(
    service: &S,
    auth: &Auth,
    model_id: Option<&str>,
    endpoint: &str,
    request: ApiRequest,
) -> Result<Value> {
    let result = match service.post(request).await {
        Ok(resp) if resp.is_success() => resp.json().map_err(Error::from),
        Ok(resp) => {
            debug!("{endpoint} request failed with HTTP {}", resp.status());
            Err(Error::from_response(&resp))
        }
        Err(err) => Err(Error::from(err)),
    };

    metrics::record(service, endpoint, auth, model_id, result.as_ref().ok()).await;
    result
}
