// Error types shared by the library modules. The terminal layer wraps these
// in `anyhow` the same way `main` does; the library keeps them typed so the
// session loop can tell a protocol failure apart from a transport one.

use std::time::Duration;
use thiserror::Error;

/// Failure talking to the remote assistant service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("file read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why a chat session ended early.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Please select an assistant first.")]
    NoAssistantSelected,

    #[error("Failed to create a new thread.")]
    ThreadCreationFailed,

    #[error("Failed to initiate a run for the thread.")]
    RunInitiationFailed,

    #[error("Run processing failed ({status}){}", reason_suffix(.reason))]
    RunFailed {
        status: String,
        reason: Option<String>,
    },

    #[error("Gave up waiting for the run after {}s", .waited.as_secs())]
    PollTimeout { waited: Duration },

    #[error("input error: {0}")]
    Input(anyhow::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

/// Failure rewriting the local assistant registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry encode error: {0}")]
    Json(#[from] serde_json::Error),
}
