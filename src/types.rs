// Wire types for the hosted Assistants API. Only the fields this client
// reads are modelled; serde ignores the rest of each payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Any created object where all we need back is its identifier. The id is
/// optional because a response without one must be reported, not panicked on.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ObjectRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl ObjectRef {
    pub fn with_id(id: impl Into<String>) -> Self {
        ObjectRef { id: Some(id.into()) }
    }

    /// The identifier if the service returned a non-empty one.
    pub fn usable_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Envelope used by every list endpoint.
#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

/// A remote assistant as shown in the selection list.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AssistantSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl AssistantSummary {
    /// Name to show in menus; unnamed assistants fall back to their id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Author of a thread message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(other) => other,
        }
    }
}

/// Run status as reported by the service. Values this client has never seen
/// are kept verbatim in `Unknown` rather than failing the decode.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Succeeded,
    Incomplete,
    Expired,
    Unknown(String),
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "cancelled" => RunStatus::Cancelled,
            "failed" => RunStatus::Failed,
            "completed" => RunStatus::Completed,
            "succeeded" => RunStatus::Succeeded,
            "incomplete" => RunStatus::Incomplete,
            "expired" => RunStatus::Expired,
            _ => RunStatus::Unknown(value),
        }
    }
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown(other) => other,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A run as returned by the status endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Run {
    #[serde(default)]
    pub id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    pub fn with_status(status: RunStatus) -> Self {
        Run {
            id: None,
            status,
            last_error: None,
        }
    }

    /// Human readable failure reason, if the service gave one.
    pub fn failure_reason(&self) -> Option<String> {
        self.last_error
            .as_ref()
            .and_then(|err| err.message.clone().or_else(|| err.code.clone()))
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TextBody {
    pub value: String,
}

/// One part of a message body. Image and file parts are decoded but never
/// rendered.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: TextBody },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ThreadMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

impl ThreadMessage {
    pub fn text(role: Role, value: impl Into<String>) -> Self {
        ThreadMessage {
            id: None,
            role,
            content: vec![ContentPart::Text {
                text: TextBody {
                    value: value.into(),
                },
            }],
        }
    }

    /// Text parts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.value.as_str()),
                ContentPart::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Body for `POST /threads/{id}/messages`.
#[derive(Serialize, Debug)]
pub struct NewMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}
