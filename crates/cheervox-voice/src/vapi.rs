use crate::client::{user_context_message, AssistantClient};
use crate::config::VapiConfig;
use crate::error::VoiceError;
use async_trait::async_trait;
use cheervox_types::StartedCall;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallResponse {
    id: String,
    #[serde(default)]
    web_call_url: Option<String>,
    #[serde(default)]
    monitor: Option<CallMonitor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallMonitor {
    control_url: Option<String>,
}

/// Vapi implementation of [`AssistantClient`].
///
/// A session is a Vapi web call. Creating the call returns a room URL and a
/// control URL. The assistant is only heard by whoever joins the room, so the
/// room URL is handed back to the caller; user turns and the hang-up are
/// posted to the control URL.
pub struct VapiClient {
    config: VapiConfig,
    credential: String,
    http: reqwest::Client,
    /// Control URL of the open call. Locked only for brief reads and writes,
    /// never across an `.await`.
    control_url: Mutex<Option<String>>,
}

impl fmt::Debug for VapiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapiClient")
            .field("config", &self.config)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

impl VapiClient {
    /// Creates a client that authenticates with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Config`] if the credential is empty and
    /// [`VoiceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: VapiConfig, credential: impl Into<String>) -> Result<Self, VoiceError> {
        let credential = credential.into();
        if credential.is_empty() {
            return Err(VoiceError::Config(
                "assistant credential must not be empty".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            config,
            credential,
            http,
            control_url: Mutex::new(None),
        })
    }

    fn control_url(&self) -> Option<String> {
        match self.control_url.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_control_url(&self, url: Option<String>) -> Option<String> {
        let mut guard = match self.control_url.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("vapi control url lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::replace(&mut *guard, url)
    }

    async fn post_control(
        &self,
        control_url: &str,
        body: serde_json::Value,
    ) -> Result<(), VoiceError> {
        let response = self
            .http
            .post(control_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Send(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VoiceError::Send(format!("status {status}: {text}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AssistantClient for VapiClient {
    async fn start_session(&self, assistant_id: &str) -> Result<StartedCall, VoiceError> {
        info!(assistant_id, "starting vapi web call");

        let response = self
            .http
            .post(self.config.web_call_url())
            .bearer_auth(&self.credential)
            .json(&json!({ "assistantId": assistant_id }))
            .send()
            .await
            .map_err(|e| VoiceError::SessionStart(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VoiceError::SessionStart(format!("status {status}: {text}")));
        }

        let call: CallResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::SessionStart(e.to_string()))?;

        let control_url = call
            .monitor
            .and_then(|m| m.control_url)
            .ok_or_else(|| {
                VoiceError::SessionStart("response is missing monitor.controlUrl".to_string())
            })?;

        if self.set_control_url(Some(control_url)).is_some() {
            warn!("replaced control url of a call that was never ended");
        }
        match &call.web_call_url {
            Some(url) => info!(call_id = %call.id, join_url = %url, "vapi web call created"),
            None => warn!(call_id = %call.id, "vapi web call created without a room url"),
        }
        Ok(StartedCall {
            call_id: call.id,
            join_url: call.web_call_url,
        })
    }

    async fn send_user_context(&self, username: &str) -> Result<(), VoiceError> {
        let control_url = self.control_url().ok_or(VoiceError::NoActiveCall)?;
        debug!(username, "sending user context to vapi");

        self.post_control(
            &control_url,
            json!({
                "type": "add-message",
                "message": {
                    "role": "user",
                    "content": user_context_message(username),
                },
            }),
        )
        .await
    }

    async fn end_session(&self) -> Result<(), VoiceError> {
        let Some(control_url) = self.set_control_url(None) else {
            debug!("end requested without an open vapi call");
            return Ok(());
        };
        info!("ending vapi web call");
        self.post_control(&control_url, json!({ "type": "end-call" }))
            .await
    }
}
