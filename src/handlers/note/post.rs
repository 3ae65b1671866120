use std::path::Path;

use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use crate::{
    errors::ServerError,
    handlers::with_store,
    models::note::NewNote,
    uploads::{AudioBlob, UploadDir},
    AppState,
};

const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// The fields of a create request, as sent by the recorder.
#[derive(Debug, Default)]
struct NoteForm {
    title: Option<String>,
    transcript: Option<String>,
    audio: Option<AudioBlob>,
}

impl NoteForm {
    async fn read(payload: &mut Multipart) -> Result<Self, ServerError> {
        let mut form = NoteForm::default();

        while let Some(mut field) = payload.try_next().await? {
            let name = field
                .content_disposition()
                .get_name()
                .unwrap_or_default()
                .to_string();

            match name.as_str() {
                "audio" => form.audio = Some(read_audio(&mut field).await?),
                "title" => form.title = Some(read_text(&mut field, "title").await?),
                "transcript" => form.transcript = Some(read_text(&mut field, "transcript").await?),
                _ => {
                    // unknown parts are drained and ignored
                    while field.try_next().await?.is_some() {}
                }
            }
        }

        Ok(form)
    }
}

async fn read_audio(field: &mut Field) -> Result<AudioBlob, ServerError> {
    let content_type = field.content_type().map(|m| m.essence_str().to_string());
    AudioBlob::check_media_type(content_type.as_deref())?;

    let mut blob = AudioBlob {
        file_name: field
            .content_disposition()
            .get_filename()
            .map(str::to_string),
        content_type,
        bytes: Vec::new(),
    };
    while let Some(chunk) = field.try_next().await? {
        blob.push_chunk(&chunk)?;
    }
    Ok(blob)
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, ServerError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(ServerError::bad_request(format!("{name} is too long")));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes)
        .map_err(|_| ServerError::bad_request(format!("{name} must be valid UTF-8")))
}

pub async fn new(
    mut payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let NoteForm {
        title,
        transcript,
        audio,
    } = NoteForm::read(&mut payload).await?;

    let audio = audio.ok_or_else(|| ServerError::bad_request("Audio file is required"))?;
    let transcript = transcript
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ServerError::bad_request("Transcript is required"))?;

    let uploads = state.uploads.clone();
    let stored_path = web::block(move || uploads.store(&audio)).await??;
    let audio_path = stored_path.to_string_lossy().into_owned();

    let new_note = NewNote::new(title.as_deref(), transcript, audio_path.clone());
    match with_store(&state, move |store| store.insert(new_note)).await {
        Ok(note) => {
            log::info!("note {} saved with {}", note.id, note.audio_path);
            Ok(HttpResponse::Created().json(note))
        }
        Err(e) => {
            web::block(move || UploadDir::remove(Path::new(&audio_path))).await?;
            Err(e)
        }
    }
}
