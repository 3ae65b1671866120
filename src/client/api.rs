use derive_more::Display;
use reqwest::multipart::{Form, Part};
use serde_derive::Deserialize;
use serde_json::json;

use super::session::{NoteDraft, PLACEHOLDER_AUDIO_NAME, PLACEHOLDER_AUDIO_TYPE};
use crate::models::note::Note;

#[derive(Debug, Display)]
pub enum ClientError {
    #[display(fmt = "request failed: {}", _0)]
    Http(String),
    #[display(fmt = "server answered {}: {}", _0, _1)]
    Api(u16, String),
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e.to_string())
    }
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

/// Talks to the notes API mounted at `<base_url>/api`.
pub struct NotesClient {
    base_url: String,
    http: reqwest::Client,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Self {
        NotesClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/notes{}", self.base_url, path)
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let message = match res.json::<ApiMessage>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(ClientError::Api(status.as_u16(), message))
    }

    pub async fn list(&self) -> Result<Vec<Note>, ClientError> {
        let res = self.http.get(self.url("")).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    pub async fn get(&self, note_id: &str) -> Result<Note, ClientError> {
        let res = self.http.get(self.url(&format!("/{note_id}"))).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    /// Uploads the draft together with an empty placeholder recording.
    pub async fn create(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
        let audio = Part::bytes(Vec::new())
            .file_name(PLACEHOLDER_AUDIO_NAME)
            .mime_str(PLACEHOLDER_AUDIO_TYPE)?;
        let form = Form::new()
            .text("title", draft.title.clone())
            .text("transcript", draft.transcript.clone())
            .part("audio", audio);

        let res = self.http.post(self.url("")).multipart(form).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    pub async fn update(&self, note_id: &str, transcript: &str) -> Result<Note, ClientError> {
        let res = self
            .http
            .put(self.url(&format!("/{note_id}")))
            .json(&json!({ "transcript": transcript }))
            .send()
            .await?;
        Ok(Self::check(res).await?.json().await?)
    }

    pub async fn delete(&self, note_id: &str) -> Result<(), ClientError> {
        let res = self
            .http
            .delete(self.url(&format!("/{note_id}")))
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn summarize(&self, note_id: &str) -> Result<String, ClientError> {
        let res = self
            .http
            .post(self.url(&format!("/{note_id}/summary")))
            .send()
            .await?;
        let body: SummaryResponse = Self::check(res).await?.json().await?;
        Ok(body.summary)
    }
}
