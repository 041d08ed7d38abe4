use serde::{Deserialize, Serialize};

/// Body of `POST /chat/owl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

/// Assistant reply. The assistant may run an app action on the user's
/// behalf; the action name and its textual result come back alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
    #[serde(default)]
    pub action_executed: Option<String>,
    #[serde(default)]
    pub action_result: Option<String>,
}

/// Response of `GET /chat/owl/info`: who the assistant is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantProfile {
    pub name: String,
    pub description: String,
    pub personality: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub greeting: String,
}
