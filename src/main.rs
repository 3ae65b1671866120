use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use voice_notes::{
    config::Config,
    storage::PgNoteStore,
    summarizer::{GeminiProvider, Summarizer},
    uploads::UploadDir,
    AppState,
};

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;

    let store = PgNoteStore::connect(&config.database_url).map_err(startup_error)?;
    store.run_migrations().map_err(startup_error)?;
    log::info!("database connected");

    let summarizer = match &config.gemini_api_key {
        Some(key) => Summarizer::new(Arc::new(
            GeminiProvider::new(key.clone())
                .map_err(startup_error)?
                .with_model(&config.gemini_model)
                .with_api_base(&config.gemini_api_base),
        )),
        None => {
            log::warn!("GEMINI_API_KEY is not set, summaries will use the fallback text");
            Summarizer::unconfigured()
        }
    };

    let state = web::Data::new(AppState::new(
        Arc::new(store),
        summarizer,
        UploadDir::new(&config.upload_dir),
        config.environment.clone(),
    ));

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(config.rate_limit_replenish_ms)
        .burst_size(config.rate_limit_burst)
        .finish()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid rate limit settings"))?;

    let origins = config.allowed_origins.clone();
    log::info!("server running on port {}", config.port);

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            .wrap(Logger::default())
            .configure(voice_notes::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
