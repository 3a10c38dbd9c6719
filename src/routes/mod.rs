use actix_web::{middleware::ErrorHandlers, web};
use mongodb::bson::oid::ObjectId;

use crate::error::{json_error_handler, log_server_error, ApiError, ApiResult};
use crate::middleware::auth::AuthMiddleware;

pub mod activities;
pub mod auth;
pub mod destinations;
pub mod health;
pub mod itineraries;
pub mod memories;
pub mod trips;

/// Parses a path id, answering 400 for anything that isn't an ObjectId.
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| ApiError::BadRequest(format!("Invalid {} id", what)))
}

/// Trims a required text field, treating blank input as missing.
pub(crate) fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Route table. Expects `web::Data<mongodb::Database>` and
/// `web::Data<AuthConfig>` to be registered by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .wrap(ErrorHandlers::new().default_handler_server(log_server_error))
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(auth::signup))
                        .route("/signin", web::post().to(auth::signin))
                        .service(
                            web::scope("")
                                .wrap(AuthMiddleware::required())
                                .route("/session", web::get().to(auth::user_session)),
                        ),
                )
                .service(
                    // Handlers taking `AuthenticatedUser` answer 401 on their own,
                    // so reads of public data work without a token.
                    web::scope("")
                        .wrap(AuthMiddleware::optional())
                        .service(
                            web::scope("/destinations")
                                .route("", web::get().to(destinations::list))
                                .route("", web::post().to(destinations::create)),
                        )
                        .service(
                            web::scope("/trips")
                                .route("", web::get().to(trips::list))
                                .route("", web::post().to(trips::create))
                                .route("/{id}", web::get().to(trips::get_by_id))
                                .route("/{id}", web::put().to(trips::update))
                                .route("/{id}", web::delete().to(trips::delete))
                                .route("/{id}/itineraries", web::get().to(itineraries::list))
                                .route("/{id}/itineraries", web::post().to(itineraries::create))
                                .route("/{id}/memories", web::get().to(memories::list))
                                .route("/{id}/memories", web::post().to(memories::create)),
                        )
                        .route("/itineraries/{id}", web::put().to(itineraries::update))
                        .route("/days/{id}/activities", web::get().to(activities::list))
                        .route("/days/{id}/activities", web::post().to(activities::create))
                        .route("/activities/{id}", web::put().to(activities::update))
                        .route("/activities/{id}", web::delete().to(activities::delete)),
                ),
        );
}
