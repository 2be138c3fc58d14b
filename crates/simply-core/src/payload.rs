//! The single request body shape accepted by the generation webhook.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// `chat` value that turns a request into a deploy request.
pub const DEPLOY_COMMAND: &str = "DEPLOY";

/// `domain_type` sent with ordinary chat turns. The backend expects the
/// literal string, not JSON null.
pub const CHAT_DOMAIN_TYPE: &str = "null";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestPayload {
    pub chat: String,
    pub code_language: String,
    /// Always null on the wire.
    #[serde(rename = "frameId")]
    pub frame_id: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub domain_type: String,
}

impl RequestPayload {
    /// Payload for a chat turn.
    pub fn chat(session: &Session, text: &str) -> Self {
        Self {
            chat: text.to_string(),
            code_language: session.target().label().to_string(),
            frame_id: None,
            session_id: session.id().to_string(),
            domain_type: CHAT_DOMAIN_TYPE.to_string(),
        }
    }

    /// Payload asking the backend to publish the session's project under `domain`.
    pub fn deploy(session: &Session, domain: &str) -> Self {
        Self {
            chat: DEPLOY_COMMAND.to_string(),
            code_language: session.target().label().to_string(),
            frame_id: None,
            session_id: session.id().to_string(),
            domain_type: domain.to_string(),
        }
    }

    pub fn is_deploy(&self) -> bool {
        self.chat == DEPLOY_COMMAND && self.domain_type != CHAT_DOMAIN_TYPE
    }
}
