use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::{errors::ServerError, storage::NoteStore, AppState};

pub mod note;

const AVAILABLE_ROUTES: [&str; 8] = [
    "GET /",
    "GET /api/health",
    "GET /api/notes",
    "POST /api/notes",
    "GET /api/notes/:id",
    "PUT /api/notes/:id",
    "DELETE /api/notes/:id",
    "POST /api/notes/:id/summary",
];

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Voice Notes API is running!",
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "API is healthy!",
        "environment": state.environment,
    }))
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Route not found",
        "message": format!("The route {} does not exist.", req.path()),
        "availableRoutes": AVAILABLE_ROUTES,
    }))
}

/// Runs a store call on the blocking pool.
pub(crate) async fn with_store<F, R>(state: &web::Data<AppState>, f: F) -> Result<R, ServerError>
where
    F: FnOnce(&dyn NoteStore) -> Result<R, ServerError> + Send + 'static,
    R: Send + 'static,
{
    let store = state.store.clone();
    web::block(move || f(store.as_ref())).await?
}
