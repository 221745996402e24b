use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.vapi.ai".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    10
}

/// Connection settings for the Vapi API.
///
/// The credential itself travels with the trigger configuration, since
/// changing it resets the whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VapiConfig {
    /// Base URL of the Vapi REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Timeout for each HTTP request in seconds. Default: 10.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for VapiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl VapiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }

    /// Endpoint that creates a web call for an assistant.
    pub fn web_call_url(&self) -> String {
        format!("{}/call/web", self.api_url.trim_end_matches('/'))
    }
}
