use std::time::Duration;

/// Default timeout for a single API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A multispectral capture iterates over all spectra on the camera before it answers.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for one camera.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    /// Host (optionally with `:port`) of the camera.
    pub ip_address: String,
    /// API key, sent as `key` query parameter with every request.
    pub key: String,
    pub timeout: Duration,
    /// Used instead of [`Config::timeout`] when taking a multispectral image.
    pub capture_timeout: Duration,
}

impl Config {
    pub fn new(ip_address: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            key: key.into(),
            timeout: DEFAULT_TIMEOUT,
            capture_timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_capture_timeout(mut self, capture_timeout: Duration) -> Self {
        self.capture_timeout = capture_timeout;
        self
    }
}
