// API client module: a small blocking HTTP client for the hosted
// Assistants API, plus the `AssistantService` trait the chat session is
// written against. Keeping the trait separate lets the session loop run
// against a scripted service in tests.

use crate::error::ServiceError;
use crate::types::{
    AssistantSummary, ListResponse, NewMessage, ObjectRef, Role, Run, ThreadMessage,
};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Sort order for listings. The menu always lists newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Desc,
}

impl ListOrder {
    fn as_str(self) -> &'static str {
        match self {
            ListOrder::Desc => "desc",
        }
    }
}

/// Everything the CLI needs from the remote service. Identifiers of newly
/// created objects come back as `ObjectRef` so callers decide what a
/// missing id means.
pub trait AssistantService {
    fn list_assistants(&self, order: ListOrder) -> Result<Vec<AssistantSummary>, ServiceError>;

    fn create_thread(&self, initial_messages: &[ThreadMessage]) -> Result<ObjectRef, ServiceError>;

    fn append_message(&self, thread_id: &str, role: Role, content: &str)
        -> Result<(), ServiceError>;

    fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<ObjectRef, ServiceError>;

    fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ServiceError>;

    /// Messages of a thread, newest first.
    fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ServiceError>;

    fn upload_file(&self, path: &Path, purpose: &str) -> Result<ObjectRef, ServiceError>;

    fn attach_files_to_vector_store(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> Result<ObjectRef, ServiceError>;
}

/// Blocking client holding a reqwest client, the API root and the
/// credential. A missing credential is not checked here; the service
/// rejects the request and that error is what the operator sees.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(OpenAiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        tracing::debug!(method = "GET", path, "calling assistant service");
        let res = self.authorized(self.client.get(self.url(path))).send()?;
        decode(res)
    }

    fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ServiceError> {
        tracing::debug!(method = "POST", path, "calling assistant service");
        let res = self
            .authorized(self.client.post(self.url(path)))
            .json(body)
            .send()?;
        decode(res)
    }
}

/// Turn a response into `T`, or into `ServiceError::Status` carrying the
/// body text when the service refused the request.
fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ServiceError> {
    let status = res.status();
    let text = res.text()?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), body = %text, "service returned an error");
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(serde_json::from_str(&text)?)
}

impl AssistantService for OpenAiClient {
    fn list_assistants(&self, order: ListOrder) -> Result<Vec<AssistantSummary>, ServiceError> {
        let page: ListResponse<AssistantSummary> =
            self.get(&format!("/assistants?order={}", order.as_str()))?;
        Ok(page.data)
    }

    fn create_thread(&self, initial_messages: &[ThreadMessage]) -> Result<ObjectRef, ServiceError> {
        let messages: Vec<_> = initial_messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.plain_text()}))
            .collect();
        self.post("/threads", &json!({ "messages": messages }))
    }

    fn append_message(
        &self,
        thread_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), ServiceError> {
        let body = serde_json::to_value(NewMessage { role, content })?;
        let _: ObjectRef = self.post(&format!("/threads/{thread_id}/messages"), &body)?;
        Ok(())
    }

    fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<ObjectRef, ServiceError> {
        self.post(
            &format!("/threads/{thread_id}/runs"),
            &json!({ "assistant_id": assistant_id }),
        )
    }

    fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ServiceError> {
        self.get(&format!("/threads/{thread_id}/runs/{run_id}"))
    }

    fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ServiceError> {
        let page: ListResponse<ThreadMessage> =
            self.get(&format!("/threads/{thread_id}/messages"))?;
        Ok(page.data)
    }

    fn upload_file(&self, path: &Path, purpose: &str) -> Result<ObjectRef, ServiceError> {
        tracing::debug!(method = "POST", path = "/files", file = %path.display(), "uploading file");
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let file = std::fs::File::open(path)?;
        let part = multipart::Part::reader(file)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        let res = self
            .authorized(self.client.post(self.url("/files")))
            .multipart(form)
            .send()?;
        decode(res)
    }

    fn attach_files_to_vector_store(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> Result<ObjectRef, ServiceError> {
        self.post(
            &format!("/vector_stores/{vector_store_id}/file_batches"),
            &json!({ "file_ids": file_ids }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = OpenAiClient::new("http://localhost:9999/v1/", None).unwrap();
        assert_eq!(client.url("/threads"), "http://localhost:9999/v1/threads");
    }
}
