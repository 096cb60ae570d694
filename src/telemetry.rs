//! Install-time environment report
//!
//! The host captures the snapshot; this module only sanitizes it, encodes it
//! and hands it to a transport. Delivery is fire-and-forget: no retry, and a
//! failure is logged and dropped. Nothing here touches the animation engine.

use serde::{Deserialize, Serialize};

use crate::config::TelemetryConfig;
use crate::error::TelemetryError;

/// Longest user agent that leaves the page (characters)
pub const USER_AGENT_LIMIT: usize = 50;

/// Environment as captured by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentSnapshot {
    /// Unix time (ms) of the install event
    pub install_timestamp: u64,
    pub user_agent: String,
    pub language: String,
    /// `"{width}x{height}"`
    pub screen_resolution: String,
    pub timezone: String,
    pub platform: String,
    pub active_tab_url: Option<String>,
    pub installed_extension_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionEntry {
    pub name: String,
}

/// Wire form of a snapshot after sanitation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedSnapshot {
    pub install_time: u64,
    pub user_agent: String,
    pub language: String,
    pub screen: String,
    pub timezone: String,
    pub platform: String,
    /// Empty when the host had no active tab
    pub active_tab_url: String,
    pub extensions: Vec<ExtensionEntry>,
}

/// Request body: the snapshot wrapped in `data`
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    data: &'a SanitizedSnapshot,
}

/// First `USER_AGENT_LIMIT` characters
pub fn truncate_user_agent(user_agent: &str) -> String {
    user_agent.chars().take(USER_AGENT_LIMIT).collect()
}

/// Everything before the first `?`
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

impl EnvironmentSnapshot {
    pub fn sanitize(&self) -> SanitizedSnapshot {
        SanitizedSnapshot {
            install_time: self.install_timestamp,
            user_agent: truncate_user_agent(&self.user_agent),
            language: self.language.clone(),
            screen: self.screen_resolution.clone(),
            timezone: self.timezone.clone(),
            platform: self.platform.clone(),
            active_tab_url: self
                .active_tab_url
                .as_deref()
                .map(strip_query)
                .unwrap_or_default()
                .to_string(),
            extensions: self
                .installed_extension_names
                .iter()
                .map(|name| ExtensionEntry { name: name.clone() })
                .collect(),
        }
    }
}

/// Encode the JSON request body
pub fn encode(snapshot: &SanitizedSnapshot) -> Result<String, TelemetryError> {
    Ok(serde_json::to_string(&Envelope { data: snapshot })?)
}

/// Delivers an encoded report. Implementations must not block.
pub trait Transport {
    fn post_json(&self, endpoint: &str, body: &str) -> Result<(), TelemetryError>;
}

pub struct TelemetryReporter<T: Transport> {
    endpoint: Option<String>,
    transport: T,
}

impl<T: Transport> TelemetryReporter<T> {
    pub fn new(config: &TelemetryConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sanitize and send once. Returns whether the report was handed off;
    /// failures never propagate.
    pub fn report(&self, snapshot: &EnvironmentSnapshot) -> bool {
        let Some(endpoint) = self.endpoint.as_deref() else {
            log::debug!("No telemetry endpoint configured, report skipped");
            return false;
        };

        let result = encode(&snapshot.sanitize())
            .and_then(|body| self.transport.post_json(endpoint, &body));
        match result {
            Ok(()) => {
                log::info!("Environment report sent to {endpoint}");
                true
            }
            Err(e) => {
                log::warn!("Environment report dropped: {e}");
                false
            }
        }
    }
}
