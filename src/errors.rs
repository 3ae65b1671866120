use actix_web::{http::StatusCode, HttpResponse};
use derive_more::Display;
use serde_json::json;

#[derive(Debug, Display)]
pub enum ServerError {
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "note id: {} was not found", _0)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    Conflict(String),
    #[display(fmt = "Diesel Error: {}", _0)]
    DieselError(String),
    #[display(fmt = "Pooling Error: {}", _0)]
    R2D2Error(String),
    #[display(fmt = "Blocking Error")]
    BlockingError,
    #[display(fmt = "IO Error: {}", _0)]
    IoError(String),
    #[display(fmt = "Environment Error: {}", _0)]
    EnvironmentError(String),
    #[display(fmt = "Migration Error: {}", _0)]
    MigrationError(String),
}

impl ServerError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ServerError::BadRequest(msg.into())
    }
}

impl From<r2d2::Error> for ServerError {
    fn from(e: r2d2::Error) -> ServerError {
        ServerError::R2D2Error(e.to_string())
    }
}

impl From<diesel::result::Error> for ServerError {
    fn from(e: diesel::result::Error) -> ServerError {
        ServerError::DieselError(e.to_string())
    }
}

impl From<actix_web::error::BlockingError> for ServerError {
    fn from(_: actix_web::error::BlockingError) -> ServerError {
        ServerError::BlockingError
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> ServerError {
        ServerError::IoError(e.to_string())
    }
}

impl From<actix_multipart::MultipartError> for ServerError {
    fn from(e: actix_multipart::MultipartError) -> ServerError {
        ServerError::BadRequest(format!("invalid multipart payload: {e}"))
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServerError::BadRequest(msg) | ServerError::Conflict(msg) => msg.clone(),
            ServerError::NotFound(_) => "Note not found".to_string(),
            ServerError::DieselError(_) => "Internal Error: Storage Error.".to_string(),
            ServerError::R2D2Error(_) => "Internal Error: Pooling Error.".to_string(),
            ServerError::BlockingError => "Internal Error: Worker Error.".to_string(),
            ServerError::IoError(_) => "Internal Error: File Storage Error.".to_string(),
            ServerError::EnvironmentError(_) => "Internal Error: Environment Error.".to_string(),
            ServerError::MigrationError(_) => "Internal Error: Migration Error.".to_string(),
        };

        if self.status_code().is_server_error() {
            log::error!("{self}");
        }

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[actix_web::test]
    async fn internal_errors_do_not_leak_detail() {
        let err = ServerError::DieselError("relation \"notes\" does not exist".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(err.error_response().into_body())
            .await
            .expect("body");
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("Storage Error"));
        assert!(!text.contains("relation"));
    }

    #[test]
    fn validation_errors_keep_their_message() {
        let err = ServerError::bad_request("Transcript is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Transcript is required");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ServerError::NotFound("abc".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
