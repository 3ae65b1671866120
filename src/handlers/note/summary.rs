use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{errors::ServerError, handlers::with_store, AppState};

pub async fn generate(
    note_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let note_id = note_id.into_inner();
    let lookup_id = note_id.clone();

    let note = with_store(&state, move |store| store.find(&lookup_id))
        .await?
        .ok_or_else(|| ServerError::NotFound(note_id.clone()))?;

    if !note.has_transcript() {
        return Err(ServerError::bad_request("Transcript not available"));
    }

    let summary = state.summarizer.summarize(&note.transcript).await;

    let stored_summary = summary.clone();
    let stored = with_store(&state, move |store| {
        store.set_summary(&note.id, &note.transcript, &stored_summary)
    })
    .await?;

    if stored.is_none() {
        // the note was deleted or re-edited while the provider was working
        let lookup_id = note_id.clone();
        return match with_store(&state, move |store| store.find(&lookup_id)).await? {
            Some(_) => Err(ServerError::Conflict(
                "Transcript changed while the summary was being generated".to_string(),
            )),
            None => Err(ServerError::NotFound(note_id)),
        };
    }

    log::info!("summary stored for note {note_id}");
    Ok(HttpResponse::Ok().json(json!({
        "summary": summary,
        "message": "Summary generated using Google Gemini AI",
    })))
}
