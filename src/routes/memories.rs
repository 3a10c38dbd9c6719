use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, Database};

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_context::{AuthenticatedUser, MaybeUser};
use crate::models::memory::{Memory, NewMemory};
use crate::routes::{parse_id, required_text};
use crate::services::trip_service;

/*
    GET /api/trips/{id}/memories
*/
pub async fn list(
    viewer: MaybeUser,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    trip_service::find_visible_trip(&db, &trip_id, viewer.user_id()).await?;

    let memories: Vec<Memory> = mongo::memories(&db)
        .find(doc! { "trip_id": trip_id })
        .sort(doc! { "date_taken": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(memories))
}

/*
    POST /api/trips/{id}/memories
*/
pub async fn create(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
    input: web::Json<NewMemory>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    let input = input.into_inner();
    let image_url = required_text(input.image_url)
        .ok_or_else(|| ApiError::BadRequest("Image URL is required".into()))?;

    trip_service::find_owned_trip(&db, &trip_id, &user.user_id).await?;

    let now = Utc::now();
    let mut memory = Memory {
        id: None,
        trip_id,
        user_id: user.user_id,
        image_url,
        caption: input.caption,
        date_taken: input.date_taken.unwrap_or_else(|| now.date_naive()),
        created_at: Some(now),
    };
    let result = mongo::memories(&db).insert_one(&memory).await?;
    memory.id = result.inserted_id.as_object_id();

    Ok(HttpResponse::Created().json(memory))
}
