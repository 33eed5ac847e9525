// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Client configuration.

/// The production Lazarus API.
pub const DEFAULT_BASE_URL: &str = "https://api.lazarusforms.com/";

/// Configuration shared by every request made through an
/// [`HTTPService`](crate::http::HTTPService).
///
/// Nothing is read from the environment; callers that want to take the
/// base URL from `$LAZARUS_BASE_URL` or similar should do so themselves
/// and pass it in with [`Config::base_url()`].
///
/// # Examples
///
/// ```
/// use lazarus::conf::Config;
/// let config = Config::default()
///     .base_url("http://localhost:8080/")
///     .telemetry(false);
/// assert_eq!(config.endpoint("/api/rikai"), "http://localhost:8080/api/rikai");
/// assert!(!config.telemetry_enabled());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    base_url: String,
    telemetry: bool,
    user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            telemetry: true,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl Config {
    /// Points all requests at a different API host.
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url, ..self }
    }

    /// Turns usage reporting on or off.
    ///
    /// Test suites should turn this off (or point the base URL at a mock
    /// server) so that they do not report usage to the live service.
    pub fn telemetry(self, telemetry: bool) -> Self {
        Self { telemetry, ..self }
    }

    /// Overrides the `User-Agent` sent with each request.
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self { user_agent, ..self }
    }

    /// True if usage reports should be sent after each call.
    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry
    }

    /// The `User-Agent` header value.
    pub fn agent(&self) -> &str {
        &self.user_agent
    }

    /// The full URL for the API endpoint at `path`.
    ///
    /// Exactly one slash separates the base URL from the path, no matter
    /// how either one is written.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn default_user_agent() -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}
