use actix_web::{
    dev::ServiceResponse,
    http::StatusCode,
    middleware::ErrorHandlerResponse,
    HttpResponse, ResponseError,
};
use log::error;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid travel style: {0}")]
    InvalidTravelStyle(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    message: String,
    code: &'a str,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized | ApiError::Token(_) => "UNAUTHORIZED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidTravelStyle(_) => "INVALID_TRAVEL_STYLE",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Database(_) | ApiError::Hashing(_) | ApiError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Message safe to return to the client.
    fn public_message(&self) -> String {
        match self {
            ApiError::Token(_) => "Invalid token".to_string(),
            ApiError::Database(_) | ApiError::Hashing(_) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::Token(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::InvalidTravelStyle(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Hashing(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: ErrorDetail {
                message: self.public_message(),
                code: self.code(),
            },
        })
    }
}

/// `ErrorHandlers` hook for 5xx responses. Logs the route with the full error,
/// which the response body deliberately leaves out.
pub fn log_server_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let detail = match res.response().error() {
        Some(err) => err.to_string(),
        None => res.status().to_string(),
    };
    error!(
        "{} {} failed: {}",
        res.request().method(),
        res.request().path(),
        detail
    );
    Ok(ErrorHandlerResponse::Response(res.map_into_left_body()))
}

/// Turns actix's JSON extractor failures into our error envelope.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_rt::test]
    async fn test_not_found_envelope() {
        let (status, body) = body_of(ApiError::NotFound("Trip")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Trip not found");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[actix_rt::test]
    async fn test_invalid_travel_style_is_client_error() {
        let (status, body) = body_of(ApiError::InvalidTravelStyle("luxury".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_TRAVEL_STYLE");
        assert_eq!(body["error"]["message"], "Invalid travel style: luxury");
    }

    #[actix_rt::test]
    async fn test_server_errors_pass_through_logging_hook() {
        use actix_web::{middleware::ErrorHandlers, test, web, App};

        async fn failing() -> ApiResult<HttpResponse> {
            Err(ApiError::Internal("pool exhausted".into()))
        }

        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(ErrorHandlers::new().default_handler_server(log_server_error))
                    .route("/boom", web::get().to(failing)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/boom").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.response().error().is_some());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "Internal server error");
    }

    #[actix_rt::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = body_of(ApiError::Internal("connection reset by peer".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal server error");
    }
}
