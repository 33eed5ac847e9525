// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Library usage reporting.
//!
//! After every call, the library reports which endpoint was used and what
//! it returned. Reporting is best effort: failures are logged and
//! otherwise ignored, and reporting can be turned off entirely with
//! [`Config::telemetry()`](crate::conf::Config::telemetry).

use crate::auth::Auth;
use crate::http::{APIService, ApiRequest, Body};
use log::{debug, warn};
use serde_json::{Map, Value};

/// The endpoint that receives usage reports.
pub const METRICS_PATH: &str = "/api/library-metrics/forms-python";

/// The URL path a usage report for `model_id` is sent to.
///
/// # Examples
///
/// ```
/// use lazarus::metrics::metrics_path;
/// assert_eq!(metrics_path(None), "/api/library-metrics/forms-python");
/// assert_eq!(metrics_path(Some("m1")), "/api/library-metrics/forms-python/m1");
/// ```
pub fn metrics_path(model_id: Option<&str>) -> String {
    match model_id {
        Some(model_id) => format!("{METRICS_PATH}/{model_id}"),
        None => String::from(METRICS_PATH),
    }
}

/// Reports a call to `endpoint`.
///
/// `response` is the decoded response for successful calls and `None`
/// for failed ones. Nothing this function does can fail the caller.
pub async fn record<S: APIService>(
    service: &S,
    endpoint: &str,
    auth: &Auth,
    model_id: Option<&str>,
    response: Option<&Value>,
) {
    if !service.config().telemetry_enabled() {
        return;
    }

    let mut fields = Map::new();
    fields.insert(String::from("endpoint"), Value::String(String::from(endpoint)));
    fields.insert(String::from("response"), response.cloned().unwrap_or(Value::Null));

    let url = service.endpoint(&metrics_path(model_id));
    let request = ApiRequest::new(url, auth.headers(), Body::Json(fields));
    match service.post(request).await {
        Ok(resp) if resp.is_success() => debug!("recorded usage for {endpoint}"),
        Ok(resp) => warn!("usage report for {endpoint} returned HTTP {}", resp.status()),
        Err(err) => warn!("could not report usage for {endpoint}: {err}"),
    }
}
