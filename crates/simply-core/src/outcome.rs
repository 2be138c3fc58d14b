//! Results of a webhook call, as seen by the chat and deploy paths.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const TIMEOUT_MESSAGE: &str =
    "Request timed out. The server is taking too long to respond \u{2014} please try again.";

pub const UNREACHABLE_MESSAGE: &str = "Cannot reach the server. Check your internet connection or open the app via a local server (not file://).";

pub const CHAT_FALLBACK_MESSAGE: &str =
    "System Error: Unable to process request. Please try again.";

pub const DEPLOY_FALLBACK_MESSAGE: &str = "Deployment failed. Please try again.";

/// `data` of a successful chat response.
///
/// Fields that arrive as something other than a string (a list of assets,
/// say) are kept as their JSON text rather than failing the whole reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub code: Option<String>,
    /// Key highlights of the generated code.
    #[serde(default, deserialize_with = "lenient_text")]
    pub keynode: Option<String>,
    #[serde(default, rename = "Assest_list", deserialize_with = "lenient_text")]
    pub asset_list: Option<String>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// `data` of a successful deploy response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployData {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response within the deadline; the request was aborted.
    Timeout,
    /// Network unreachable, connection refused, server down.
    Unreachable,
    /// The server answered with a non-success status.
    Application,
    /// Anything else, e.g. a malformed body.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl Failure {
    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: Some(TIMEOUT_MESSAGE.to_string()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            kind: FailureKind::Unreachable,
            message: Some(UNREACHABLE_MESSAGE.to_string()),
        }
    }

    pub fn application(message: Option<String>) -> Self {
        Self {
            kind: FailureKind::Application,
            message,
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: FailureKind::Unknown,
            message: None,
        }
    }

    /// Text for an error bubble in the chat stream.
    pub fn chat_message(&self) -> &str {
        self.non_empty_message().unwrap_or(CHAT_FALLBACK_MESSAGE)
    }

    /// Text for the deploy error popup.
    pub fn deploy_message(&self) -> &str {
        self.non_empty_message().unwrap_or(DEPLOY_FALLBACK_MESSAGE)
    }

    fn non_empty_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.kind, msg),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

/// Outcome of a single webhook call. Every error is folded into `Failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(Failure),
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ApiResult::Success(_) => None,
            ApiResult::Failure(f) => Some(f),
        }
    }
}
