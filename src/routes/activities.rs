use actix_web::{web, HttpResponse};
use chrono::{NaiveTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, Database};
use serde_json::json;

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_context::{AuthenticatedUser, MaybeUser};
use crate::models::activity::{Activity, ActivityUpdate, NewActivity};
use crate::routes::{parse_id, required_text};
use crate::services::trip_service;

/// Normalizes an "H:MM"/"HH:MM" clock time to zero-padded "HH:MM" so that
/// stored times sort correctly as strings.
fn normalize_clock(raw: &str, field: &str) -> ApiResult<String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| ApiError::BadRequest(format!("{} must be HH:MM", field)))
}

fn check_window(start_time: &str, end_time: &str) -> ApiResult<()> {
    if end_time < start_time {
        return Err(ApiError::BadRequest(
            "end_time must not be before start_time".into(),
        ));
    }
    Ok(())
}

/*
    GET /api/days/{id}/activities
*/
pub async fn list(
    viewer: MaybeUser,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let day_id = parse_id(&path, "day")?;
    let (_, trip) = trip_service::find_day_with_trip(&db, &day_id).await?;
    if !trip.is_visible_to(viewer.user_id()) {
        return Err(ApiError::Forbidden);
    }

    let activities: Vec<Activity> = mongo::activities(&db)
        .find(doc! { "day_id": day_id })
        .sort(doc! { "start_time": 1 })
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(activities))
}

/*
    POST /api/days/{id}/activities
*/
pub async fn create(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
    input: web::Json<NewActivity>,
) -> ApiResult<HttpResponse> {
    let day_id = parse_id(&path, "day")?;
    let input = input.into_inner();
    let (Some(title), Some(start_time), Some(end_time), Some(category)) = (
        required_text(input.title),
        required_text(input.start_time),
        required_text(input.end_time),
        input.category,
    ) else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };
    let start_time = normalize_clock(&start_time, "start_time")?;
    let end_time = normalize_clock(&end_time, "end_time")?;
    check_window(&start_time, &end_time)?;

    let (_, trip) = trip_service::find_day_with_trip(&db, &day_id).await?;
    if !trip.is_owned_by(&user.user_id) {
        return Err(ApiError::Forbidden);
    }

    let now = Utc::now();
    let mut activity = Activity {
        id: None,
        day_id,
        title,
        description: input.description,
        start_time,
        end_time,
        location: input.location,
        category,
        created_at: Some(now),
        updated_at: Some(now),
    };
    let result = mongo::activities(&db).insert_one(&activity).await?;
    activity.id = result.inserted_id.as_object_id();

    Ok(HttpResponse::Created().json(activity))
}

/*
    PUT /api/activities/{id}
*/
pub async fn update(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
    input: web::Json<ActivityUpdate>,
) -> ApiResult<HttpResponse> {
    let activity_id = parse_id(&path, "activity")?;
    let changes = input.into_inner();

    let (mut activity, trip) = trip_service::find_activity_with_trip(&db, &activity_id).await?;
    if !trip.is_owned_by(&user.user_id) {
        return Err(ApiError::Forbidden);
    }

    apply_update(&mut activity, changes)?;
    activity.updated_at = Some(Utc::now());

    mongo::activities(&db)
        .replace_one(doc! { "_id": activity_id }, &activity)
        .await?;

    Ok(HttpResponse::Ok().json(activity))
}

fn apply_update(activity: &mut Activity, changes: ActivityUpdate) -> ApiResult<()> {
    if changes.title.is_some() {
        activity.title = required_text(changes.title)
            .ok_or_else(|| ApiError::BadRequest("title must not be empty".into()))?;
    }
    if changes.description.is_some() {
        activity.description = changes.description;
    }
    if let Some(start_time) = changes.start_time {
        activity.start_time = normalize_clock(&start_time, "start_time")?;
    }
    if let Some(end_time) = changes.end_time {
        activity.end_time = normalize_clock(&end_time, "end_time")?;
    }
    if changes.location.is_some() {
        activity.location = changes.location;
    }
    if let Some(category) = changes.category {
        activity.category = category;
    }
    check_window(&activity.start_time, &activity.end_time)
}

/*
    DELETE /api/activities/{id}
*/
pub async fn delete(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let activity_id = parse_id(&path, "activity")?;

    let (_, trip) = trip_service::find_activity_with_trip(&db, &activity_id).await?;
    if !trip.is_owned_by(&user.user_id) {
        return Err(ApiError::Forbidden);
    }

    mongo::activities(&db)
        .delete_one(doc! { "_id": activity_id })
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
