use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Database,
};
use serde_json::json;

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_context::{AuthenticatedUser, MaybeUser};
use crate::models::trip::{NewTrip, Trip, TripUpdate};
use crate::routes::{parse_id, required_text};
use crate::services::trip_service;

fn parse_destination(raw: Option<String>) -> ApiResult<Option<ObjectId>> {
    match required_text(raw) {
        Some(id) => parse_id(&id, "destination").map(Some),
        None => Ok(None),
    }
}

/*
    GET /api/trips
*/
pub async fn list(user: AuthenticatedUser, db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let trips: Vec<Trip> = mongo::trips(&db)
        .find(doc! { "user_id": user.user_id })
        .sort(doc! { "created_at": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(HttpResponse::Ok().json(trips))
}

/*
    POST /api/trips
*/
pub async fn create(
    user: AuthenticatedUser,
    db: web::Data<Database>,
    input: web::Json<NewTrip>,
) -> ApiResult<HttpResponse> {
    let input = input.into_inner();
    let (Some(title), Some(start_date), Some(end_date)) =
        (required_text(input.title), input.start_date, input.end_date)
    else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };
    trip_service::check_trip_dates(start_date, end_date)?;
    let destination_id = parse_destination(input.destination_id)?;

    let now = Utc::now();
    let mut trip = Trip {
        id: None,
        user_id: user.user_id,
        title,
        description: input.description,
        start_date,
        end_date,
        destination_id,
        is_public: false,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let result = mongo::trips(&db).insert_one(&trip).await?;
    trip.id = result.inserted_id.as_object_id();

    Ok(HttpResponse::Created().json(trip))
}

/*
    GET /api/trips/{id}
*/
pub async fn get_by_id(
    viewer: MaybeUser,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    let trip = trip_service::find_visible_trip(&db, &trip_id, viewer.user_id()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    PUT /api/trips/{id}
*/
pub async fn update(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
    input: web::Json<TripUpdate>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    let changes = input.into_inner();
    let destination_id = changes
        .destination_id
        .clone()
        .map(parse_destination)
        .transpose()?;

    let mut trip = trip_service::find_owned_trip(&db, &trip_id, &user.user_id).await?;
    apply_update(&mut trip, changes, destination_id)?;
    trip.updated_at = Some(Utc::now());

    mongo::trips(&db)
        .replace_one(doc! { "_id": trip_id }, &trip)
        .await?;

    Ok(HttpResponse::Ok().json(trip))
}

fn apply_update(
    trip: &mut Trip,
    changes: TripUpdate,
    destination_id: Option<Option<ObjectId>>,
) -> ApiResult<()> {
    if changes.title.is_some() {
        trip.title = required_text(changes.title)
            .ok_or_else(|| ApiError::BadRequest("title must not be empty".into()))?;
    }
    if let Some(description) = changes.description {
        trip.description = description;
    }
    if let Some(start_date) = changes.start_date {
        trip.start_date = start_date;
    }
    if let Some(end_date) = changes.end_date {
        trip.end_date = end_date;
    }
    if let Some(destination_id) = destination_id {
        trip.destination_id = destination_id;
    }
    if let Some(is_public) = changes.is_public {
        trip.is_public = is_public;
    }
    trip_service::check_trip_dates(trip.start_date, trip.end_date)
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete(
    user: AuthenticatedUser,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_id(&path, "trip")?;
    trip_service::find_owned_trip(&db, &trip_id, &user.user_id).await?;
    trip_service::delete_trip(&db, &trip_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sample_trip() -> Trip {
        Trip {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            title: "Kyoto".into(),
            description: None,
            start_date: date(4, 1),
            end_date: date(4, 5),
            destination_id: None,
            is_public: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_apply_partial_update() {
        let mut trip = sample_trip();
        let changes = TripUpdate {
            description: Some(Some("Cherry blossoms".into())),
            is_public: Some(true),
            ..Default::default()
        };

        apply_update(&mut trip, changes, None).unwrap();
        assert_eq!(trip.title, "Kyoto");
        assert_eq!(trip.description.as_deref(), Some("Cherry blossoms"));
        assert!(trip.is_public);
    }

    #[test]
    fn test_update_clears_nullable_fields() {
        let mut trip = Trip {
            description: Some("Cherry blossoms".into()),
            destination_id: Some(ObjectId::new()),
            ..sample_trip()
        };
        let changes = TripUpdate {
            description: Some(None),
            ..Default::default()
        };

        apply_update(&mut trip, changes, Some(None)).unwrap();
        assert!(trip.description.is_none());
        assert!(trip.destination_id.is_none());
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let destination = ObjectId::new();
        let mut trip = Trip {
            description: Some("Cherry blossoms".into()),
            destination_id: Some(destination),
            ..sample_trip()
        };

        apply_update(&mut trip, TripUpdate::default(), None).unwrap();
        assert_eq!(trip.description.as_deref(), Some("Cherry blossoms"));
        assert_eq!(trip.destination_id, Some(destination));
    }

    #[test]
    fn test_update_rejects_reversed_dates() {
        let mut trip = sample_trip();
        let changes = TripUpdate {
            end_date: Some(date(3, 20)),
            ..Default::default()
        };
        assert!(matches!(
            apply_update(&mut trip, changes, None),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let mut trip = sample_trip();
        let changes = TripUpdate {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(apply_update(&mut trip, changes, None).is_err());
    }

    #[test]
    fn test_update_rejects_overlong_trip() {
        let mut trip = sample_trip();
        let changes = TripUpdate {
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            ..Default::default()
        };
        assert!(matches!(
            apply_update(&mut trip, changes, None),
            Err(ApiError::BadRequest(_))
        ));
    }
}
