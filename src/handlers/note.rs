use std::path::Path;

use actix_web::{web, HttpResponse};
use serde_json::json;

use super::with_store;
use crate::{
    errors::ServerError,
    models::note::TranscriptUpdate,
    uploads::UploadDir,
    AppState,
};

pub mod post;
pub mod summary;

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    let result = with_store(&state, |store| store.list()).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn get(
    note_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();
    let lookup_id = note_id.clone();

    match with_store(&state, move |store| store.find(&lookup_id)).await? {
        Some(note) => Ok(HttpResponse::Ok().json(note)),
        None => Err(ServerError::NotFound(note_id)),
    }
}

pub async fn update(
    note_id: web::Path<String>,
    input: web::Json<TranscriptUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();
    let lookup_id = note_id.clone();
    let transcript = input.into_inner().transcript;

    match with_store(&state, move |store| {
        store.update_transcript(&lookup_id, &transcript)
    })
    .await?
    {
        Some(note) => {
            log::info!("note {} transcript edited", note.id);
            Ok(HttpResponse::Ok().json(note))
        }
        None => Err(ServerError::NotFound(note_id)),
    }
}

pub async fn del(
    note_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();
    let lookup_id = note_id.clone();

    let note = with_store(&state, move |store| store.delete(&lookup_id))
        .await?
        .ok_or(ServerError::NotFound(note_id))?;

    let audio_path = note.audio_path.clone();
    web::block(move || UploadDir::remove(Path::new(&audio_path))).await?;

    log::info!("note {} deleted", note.id);
    Ok(HttpResponse::Ok().json(json!({
        "id": note.id,
        "message": "Note deleted successfully",
    })))
}
