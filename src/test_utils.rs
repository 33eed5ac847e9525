use crate::auth::Auth;
use crate::conf::Config;
use crate::http::{APIService, ApiRequest, HTTPError, HTTPResult, RawResponse};
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_auth() -> Auth {
    Auth::unchecked("test-org-please-ignore", "test-key-please-ignore")
        .expect("test credentials are not empty")
}

#[derive(Clone, Debug)]
enum Outcome {
    Respond(RawResponse),
    Fail,
}

impl Outcome {
    fn result(&self) -> HTTPResult<RawResponse> {
        match self {
            Outcome::Respond(resp) => Ok(resp.clone()),
            Outcome::Fail => {
                let err = serde_json::from_str::<serde_json::Value>("").unwrap_err();
                Err(HTTPError::Deserialization(err))
            }
        }
    }
}

/// A deterministic service that records every request it is sent.
///
/// Telemetry is disabled unless a config enabling it is supplied.
#[derive(Debug)]
pub struct TestService {
    config: Config,
    routes: Vec<(String, Outcome)>,
    fallback: Outcome,
    requests: Mutex<Vec<ApiRequest>>,
}

impl TestService {
    fn with_fallback(fallback: Outcome) -> Self {
        Self {
            config: Config::default().telemetry(false),
            routes: Vec::new(),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `status` and `body`.
    pub fn responding(status: u16, body: &str) -> Self {
        Self::with_fallback(Outcome::Respond(RawResponse::new(status, body)))
    }

    /// Fails every request as if the connection dropped.
    pub fn failing() -> Self {
        Self::with_fallback(Outcome::Fail)
    }

    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    /// Answers requests whose URL ends with `path` with `status` and `body`.
    pub fn route(mut self, path: &str, status: u16, body: &str) -> Self {
        let outcome = Outcome::Respond(RawResponse::new(status, body));
        self.routes.push((path.to_string(), outcome));
        self
    }

    /// Fails requests whose URL ends with `path`.
    pub fn fail_route(mut self, path: &str) -> Self {
        self.routes.push((path.to_string(), Outcome::Fail));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|req| req.url).collect()
    }
}

impl APIService for TestService {
    fn config(&self) -> &Config {
        &self.config
    }

    async fn post(&self, request: ApiRequest) -> HTTPResult<RawResponse> {
        let outcome = self
            .routes
            .iter()
            .find(|(path, _)| request.url.ends_with(path.as_str()))
            .map(|(_, outcome)| outcome)
            .unwrap_or(&self.fallback);
        let result = outcome.result();
        self.requests.lock().unwrap().push(request);
        result
    }
}
