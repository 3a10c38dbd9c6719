use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::{bson::doc, Database};

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_context::{AuthenticatedUser, MaybeUser};
use crate::models::itinerary::{CreateItineraryRequest, ItineraryUpdate, TravelStyle};
use crate::routes::{parse_id, required_text};
use crate::services::{itinerary_service, trip_service};

/// Missing or blank styles fall back to adventure; unknown ones are rejected.
fn resolve_travel_style(raw: Option<String>) -> ApiResult<TravelStyle> {
    match required_text(raw) {
        None => Ok(TravelStyle::default()),
        Some(style) => style
            .parse()
            .map_err(ApiError::InvalidTravelStyle),
    }
}

/*
    GET /api/trips/{id}/itineraries
*/
pub async fn list(
    viewer: MaybeUser,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    trip_service::find_visible_trip(&db, &trip_id, viewer.user_id()).await?;

    let itineraries = itinerary_service::list_for_trip(&db, &trip_id).await?;
    Ok(HttpResponse::Ok().json(itineraries))
}

/*
    POST /api/trips/{id}/itineraries
*/
pub async fn create(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
    input: web::Json<CreateItineraryRequest>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    let input = input.into_inner();
    let travel_style = if input.use_ai {
        Some(resolve_travel_style(input.travel_style)?)
    } else {
        None
    };

    let trip = trip_service::find_owned_trip(&db, &trip_id, &user.user_id).await?;

    let itinerary = match travel_style {
        Some(style) => itinerary_service::create_generated(&db, &trip, style).await?,
        None => {
            itinerary_service::create_manual(&db, trip_id, input.title, input.description).await?
        }
    };

    Ok(HttpResponse::Created().json(itinerary))
}

/*
    PUT /api/itineraries/{id}
*/
pub async fn update(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
    input: web::Json<ItineraryUpdate>,
) -> ApiResult<HttpResponse> {
    let itinerary_id = parse_id(&path, "itinerary")?;
    let changes = input.into_inner();

    let (mut itinerary, trip) = trip_service::find_itinerary_with_trip(&db, &itinerary_id).await?;
    if !trip.is_owned_by(&user.user_id) {
        return Err(ApiError::Forbidden);
    }

    if changes.title.is_some() {
        itinerary.title = required_text(changes.title)
            .ok_or_else(|| ApiError::BadRequest("title must not be empty".into()))?;
    }
    if changes.description.is_some() {
        itinerary.description = changes.description;
    }
    itinerary.updated_at = Some(Utc::now());

    mongo::itineraries(&db)
        .replace_one(doc! { "_id": itinerary_id }, &itinerary)
        .await?;

    Ok(HttpResponse::Ok().json(itinerary))
}
