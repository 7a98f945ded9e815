//! External Engine Adapter - REST client for the automation engine
//!
//! Talks to the smart-home automation engine that owns topics, automations,
//! the library, and code validation. Every read endpoint degrades to an empty
//! default on transport failure; `validate` degrades to a synthetic failing
//! result instead, since the caller (the repair loop) needs *something* to
//! react to.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Response bodies larger than this are rejected rather than buffered whole.
const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers the adapter never forwards from a caller, even if asked to.
const BLOCKED_HEADERS: &[&str] = &["authorization", "cookie", "proxy-authorization"];

/// A named automation as reported by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSummary {
    /// Automation name.
    pub name: String,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the automation is currently enabled.
    pub enabled: bool,
}

/// A library module as reported by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryModule {
    /// Module name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Function names the module exports.
    pub functions: Vec<String>,
}

/// Either a generated automation or a library module, as sent to `/validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    /// A standalone automation.
    Automation,
    /// A shared library module.
    Library,
}

/// Result of validating a piece of code against the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the code is valid.
    pub valid: bool,
    /// Error messages, if invalid.
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    code: &'a str,
    #[serde(rename = "type")]
    kind: CodeKind,
}

/// REST client for the engine's read-only catalog endpoints and its
/// validation endpoint.
pub struct EngineClient {
    base_url: String,
    client: reqwest::Client,
}

impl EngineClient {
    /// Create a client targeting `base_url` (no trailing slash expected).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build engine HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = match self.client.get(self.url(path)).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(path, error = %err, "engine request failed");
                return Ok(None);
            }
        };

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path, error = %err, "engine response body read failed");
                return Ok(None);
            }
        };

        if bytes.len() > MAX_RESPONSE_BYTES {
            warn!(path, len = bytes.len(), "engine response exceeded buffer limit");
            return Ok(None);
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(path, error = %err, "engine response was not valid JSON");
                Ok(None)
            }
        }
    }

    /// `GET /topics`
    #[instrument(skip(self))]
    pub async fn get_all_topics(&self) -> Vec<String> {
        self.get_json("/topics").await.ok().flatten().unwrap_or_default()
    }

    /// `GET /automations`
    #[instrument(skip(self))]
    pub async fn get_automations(&self) -> Vec<AutomationSummary> {
        self.get_json("/automations").await.ok().flatten().unwrap_or_default()
    }

    /// `GET /library`
    #[instrument(skip(self))]
    pub async fn get_library_modules(&self) -> Vec<LibraryModule> {
        self.get_json("/library").await.ok().flatten().unwrap_or_default()
    }

    /// `GET /library/{name}`, returning a `"not found"` sentinel on any
    /// failure (missing module or transport error).
    #[instrument(skip(self))]
    pub async fn get_library_code(&self, module_name: &str) -> String {
        let response = match self
            .client
            .get(self.url(&format!("/library/{module_name}")))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            _ => return "not found".to_string(),
        };

        match response.text().await {
            Ok(text) if text.len() <= MAX_RESPONSE_BYTES => text,
            _ => "not found".to_string(),
        }
    }

    /// `GET /global-state-schema`
    #[instrument(skip(self))]
    pub async fn get_global_state_schema(&self) -> std::collections::HashMap<String, Vec<String>> {
        self.get_json("/global-state-schema")
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// `POST /validate`
    #[instrument(skip(self, code))]
    pub async fn validate(&self, code: &str, kind: CodeKind) -> ValidationOutcome {
        let body = ValidateRequest { code, kind };

        let response = match self.client.post(self.url("/validate")).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "validate request failed");
                return ValidationOutcome {
                    valid: false,
                    errors: vec![format!("Validation request failed: {err}")],
                };
            }
        };

        let bytes = match response.bytes().await {
            Ok(bytes) if bytes.len() <= MAX_RESPONSE_BYTES => bytes,
            Ok(_) => {
                return ValidationOutcome {
                    valid: false,
                    errors: vec![
                        "Validation request failed: response exceeded buffer limit".to_string(),
                    ],
                }
            }
            Err(err) => {
                return ValidationOutcome {
                    valid: false,
                    errors: vec![format!("Validation request failed: {err}")],
                }
            }
        };

        match serde_json::from_slice::<ValidationOutcome>(&bytes) {
            Ok(outcome) => {
                debug!(valid = outcome.valid, "engine validation completed");
                outcome
            }
            Err(err) => ValidationOutcome {
                valid: false,
                errors: vec![format!("Validation request failed: {err}")],
            },
        }
    }
}

/// Forwardable-header check mirroring this crate's other HTTP clients:
/// the adapter only ever sends headers it constructs itself, so this exists
/// to guard any future caller-supplied-header path from smuggling one in.
#[must_use]
pub fn is_header_blocked(header_name: &str) -> bool {
    BLOCKED_HEADERS.contains(&header_name.to_lowercase().as_str())
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}
