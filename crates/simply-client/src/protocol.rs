//! Response envelope returned by the generation webhook.
//!
//! The webhook answers every call with `{ "status", "data", "msg"? }`, and the
//! HTTP status code carries no meaning: only `status == "success"` does.

use serde::de::DeserializeOwned;
use serde_json::Value;

use simply_core::outcome::{ApiResult, Failure};

#[derive(Debug, Default)]
pub struct ResponseEnvelope {
    pub status: Option<Value>,
    pub data: Option<Value>,
    pub msg: Option<Value>,
}

impl ResponseEnvelope {
    /// Parse a raw body. `None` means the body is not JSON at all (or is
    /// JSON `null`), which callers treat as an unknown failure.
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(body).ok()? {
            Value::Null => None,
            Value::Object(mut map) => Some(Self {
                status: map.remove("status"),
                data: map.remove("data"),
                msg: map.remove("msg"),
            }),
            // Arrays, strings, numbers: no status field, so a non-success.
            _ => Some(Self::default()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(&self.status, Some(Value::String(s)) if s == "success")
    }

    /// Human-readable server message. Falsy values (`null`, `false`, `0`,
    /// `""`) count as no message.
    pub fn message(&self) -> Option<String> {
        match &self.msg {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Fold the envelope into an [`ApiResult`] with `data` decoded as `D`.
    pub fn into_result<D: DeserializeOwned>(self) -> ApiResult<D> {
        if !self.is_success() {
            return ApiResult::Failure(Failure::application(self.message()));
        }
        match self.data.map(serde_json::from_value::<D>) {
            Some(Ok(data)) => ApiResult::Success(data),
            Some(Err(e)) => {
                tracing::error!("Success response with undecodable data: {}", e);
                ApiResult::Failure(Failure::unknown())
            }
            None => {
                tracing::error!("Success response without data");
                ApiResult::Failure(Failure::unknown())
            }
        }
    }
}
