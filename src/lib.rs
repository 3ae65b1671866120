use std::sync::Arc;

use actix_web::web;

pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod storage;
pub mod summarizer;
pub mod uploads;

use errors::ServerError;
use storage::NoteStore;
use summarizer::Summarizer;
use uploads::UploadDir;

/// Built once at startup and shared by every worker.
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    pub summarizer: Summarizer,
    pub uploads: UploadDir,
    pub environment: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn NoteStore>,
        summarizer: Summarizer,
        uploads: UploadDir,
        environment: impl Into<String>,
    ) -> Self {
        AppState {
            store,
            summarizer,
            uploads,
            environment: environment.into(),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ServerError::bad_request(format!("Invalid request body: {err}")).into()
    }))
    .route("/", web::get().to(handlers::index))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/notes")
                    .route("", web::get().to(handlers::note::list))
                    .route("", web::post().to(handlers::note::post::new))
                    .route("/{id}", web::get().to(handlers::note::get))
                    .route("/{id}", web::put().to(handlers::note::update))
                    .route("/{id}", web::delete().to(handlers::note::del))
                    .route(
                        "/{id}/summary",
                        web::post().to(handlers::note::summary::generate),
                    ),
            ),
    )
    .default_service(web::route().to(handlers::not_found));
}
