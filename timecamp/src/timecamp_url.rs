/// Base URL of the public TimeCamp third-party API.
pub const DEFAULT_BASE_URL: &str = "https://www.timecamp.com/third_party/api";

/// A TimeCamp endpoint URL. The API token is part of the path, so this type deliberately has no
/// `Debug` or `Display` implementation.
#[derive(Clone)]
pub struct TimecampURL(String);

impl AsRef<str> for TimecampURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TimecampURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Select the JSON response format and authenticate with `token`.
    pub fn with_token(&self, token: &str) -> Self {
        self.append_path("format/json/api_token").append_path(token)
    }
}
