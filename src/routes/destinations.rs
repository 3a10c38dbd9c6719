use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, Database};

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::destination::{Destination, NewDestination};
use crate::routes::required_text;

/*
    GET /api/destinations
*/
pub async fn list(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let destinations: Vec<Destination> = mongo::destinations(&db)
        .find(doc! {})
        .sort(doc! { "name": 1 })
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(destinations))
}

/*
    POST /api/destinations
*/
pub async fn create(
    _user: AuthenticatedUser,
    db: web::Data<Database>,
    input: web::Json<NewDestination>,
) -> ApiResult<HttpResponse> {
    let mut destination = validate(input.into_inner())?;

    let result = mongo::destinations(&db).insert_one(&destination).await?;
    destination.id = result.inserted_id.as_object_id();

    Ok(HttpResponse::Created().json(destination))
}

fn validate(input: NewDestination) -> ApiResult<Destination> {
    let (Some(name), Some(country), Some(latitude), Some(longitude)) = (
        required_text(input.name),
        required_text(input.country),
        input.latitude,
        input.longitude,
    ) else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ApiError::BadRequest("latitude must be within [-90, 90]".into()));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::BadRequest("longitude must be within [-180, 180]".into()));
    }

    Ok(Destination {
        id: None,
        name,
        country,
        latitude,
        longitude,
        description: input.description,
        image_url: input.image_url,
        created_at: Some(Utc::now()),
    })
}
