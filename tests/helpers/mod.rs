#![allow(dead_code)]

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use actix_web::{http::header, test::TestRequest, web};
use async_trait::async_trait;
use tempfile::TempDir;

use voice_notes::{
    errors::ServerError,
    models::note::{NewNote, Note},
    storage::{MemoryNoteStore, NoteStore},
    summarizer::{CompletionProvider, ProviderError, Summarizer},
    uploads::UploadDir,
    AppState,
};

pub const BOUNDARY: &str = "----voice-notes-test-boundary";

#[allow(unused_macros)]
macro_rules! init_app {
    ($fixture:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($fixture.state.clone())
                .configure(voice_notes::configure),
        )
        .await
    };
}

pub struct Fixture {
    pub state: web::Data<AppState>,
    pub store: Arc<dyn NoteStore>,
    pub upload_dir: TempDir,
}

impl Fixture {
    pub fn new(summarizer: Summarizer) -> Self {
        Fixture::from_parts(Arc::new(MemoryNoteStore::new()), summarizer)
    }

    pub fn from_parts(store: Arc<dyn NoteStore>, summarizer: Summarizer) -> Self {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = web::Data::new(AppState::new(
            store.clone(),
            summarizer,
            UploadDir::new(upload_dir.path().join("uploads")),
            "test",
        ));
        Fixture {
            state,
            store,
            upload_dir,
        }
    }

    pub fn with_provider(provider: impl CompletionProvider + 'static) -> Self {
        Fixture::new(Summarizer::new(Arc::new(provider)))
    }

    pub fn note_count(&self) -> usize {
        self.store.list().expect("list").len()
    }

    pub fn uploaded_files(&self) -> usize {
        let dir = self.upload_dir.path().join("uploads");
        if !dir.exists() {
            return 0;
        }
        std::fs::read_dir(dir).expect("read_dir").count()
    }
}

pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn audio_part(bytes: &[u8]) -> FormPart<'_> {
    FormPart::File {
        name: "audio",
        file_name: "voice-recording.webm",
        content_type: "audio/webm",
        bytes,
    }
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn create_request(parts: &[FormPart<'_>]) -> TestRequest {
    TestRequest::post()
        .uri("/api/notes")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

pub fn file_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Always answers with the same text.
pub struct FixedProvider(pub &'static str);

#[async_trait]
impl CompletionProvider for FixedProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(self.0.to_string())
    }
}

/// Fails like an unreachable provider.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Request("connection refused".to_string()))
    }
}

/// Edits the target note while the "provider" is thinking.
pub struct EditingProvider {
    pub store: Arc<MemoryNoteStore>,
    pub target: Mutex<Option<String>>,
}

#[async_trait]
impl CompletionProvider for EditingProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        let target = self.target.lock().expect("lock").clone();
        if let Some(note_id) = target {
            self.store
                .update_transcript(&note_id, "edited meanwhile")
                .expect("update");
        }
        Ok("A digest of the old words.".to_string())
    }
}

/// Reads and deletes like a normal store but refuses every insert.
#[derive(Default)]
pub struct RejectingStore {
    inner: MemoryNoteStore,
}

impl NoteStore for RejectingStore {
    fn list(&self) -> Result<Vec<Note>, ServerError> {
        self.inner.list()
    }

    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        self.inner.find(note_id)
    }

    fn insert(&self, _note: NewNote) -> Result<Note, ServerError> {
        Err(ServerError::DieselError("disk full".to_string()))
    }

    fn update_transcript(
        &self,
        note_id: &str,
        transcript: &str,
    ) -> Result<Option<Note>, ServerError> {
        self.inner.update_transcript(note_id, transcript)
    }

    fn set_summary(
        &self,
        note_id: &str,
        summarized: &str,
        summary: &str,
    ) -> Result<Option<Note>, ServerError> {
        self.inner.set_summary(note_id, summarized, summary)
    }

    fn delete(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        self.inner.delete(note_id)
    }
}
