use chrono::NaiveDate;
use futures::TryStreamExt;
use log::info;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Database,
};

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    activity::Activity,
    itinerary::{Day, Itinerary},
    trip::Trip,
};
use crate::services::itinerary_generation::MAX_TRIP_DAYS;

/// Trips run forward and span at most [`MAX_TRIP_DAYS`] days, which keeps a
/// generated itinerary small.
pub fn check_trip_dates(start: NaiveDate, end: NaiveDate) -> ApiResult<()> {
    if end < start {
        return Err(ApiError::BadRequest(
            "end_date must not be before start_date".into(),
        ));
    }
    if (end - start).num_days() > MAX_TRIP_DAYS {
        return Err(ApiError::BadRequest(format!(
            "A trip may span at most {} days",
            MAX_TRIP_DAYS
        )));
    }
    Ok(())
}

pub async fn find_trip(db: &Database, trip_id: &ObjectId) -> ApiResult<Trip> {
    mongo::trips(db)
        .find_one(doc! { "_id": *trip_id })
        .await?
        .ok_or(ApiError::NotFound("Trip"))
}

/// Loads a trip the viewer may read: their own, or any public one.
pub async fn find_visible_trip(
    db: &Database,
    trip_id: &ObjectId,
    viewer: Option<&ObjectId>,
) -> ApiResult<Trip> {
    let trip = find_trip(db, trip_id).await?;
    if trip.is_visible_to(viewer) {
        Ok(trip)
    } else {
        Err(ApiError::Forbidden)
    }
}

pub async fn find_owned_trip(db: &Database, trip_id: &ObjectId, owner: &ObjectId) -> ApiResult<Trip> {
    let trip = find_trip(db, trip_id).await?;
    if trip.is_owned_by(owner) {
        Ok(trip)
    } else {
        Err(ApiError::Forbidden)
    }
}

pub async fn find_itinerary_with_trip(
    db: &Database,
    itinerary_id: &ObjectId,
) -> ApiResult<(Itinerary, Trip)> {
    let itinerary = mongo::itineraries(db)
        .find_one(doc! { "_id": *itinerary_id })
        .await?
        .ok_or(ApiError::NotFound("Itinerary"))?;
    let trip = find_trip(db, &itinerary.trip_id).await?;
    Ok((itinerary, trip))
}

/// Walks day -> itinerary -> trip.
pub async fn find_day_with_trip(db: &Database, day_id: &ObjectId) -> ApiResult<(Day, Trip)> {
    let day = mongo::days(db)
        .find_one(doc! { "_id": *day_id })
        .await?
        .ok_or(ApiError::NotFound("Day"))?;
    let (_, trip) = find_itinerary_with_trip(db, &day.itinerary_id).await?;
    Ok((day, trip))
}

pub async fn find_activity_with_trip(
    db: &Database,
    activity_id: &ObjectId,
) -> ApiResult<(Activity, Trip)> {
    let activity = mongo::activities(db)
        .find_one(doc! { "_id": *activity_id })
        .await?
        .ok_or(ApiError::NotFound("Activity"))?;
    let (_, trip) = find_day_with_trip(db, &activity.day_id).await?;
    Ok((activity, trip))
}

/// Deletes the itineraries (with their days and activities) of a trip.
pub async fn delete_itineraries_for_trip(db: &Database, trip_id: &ObjectId) -> ApiResult<()> {
    let itinerary_ids: Vec<ObjectId> = mongo::itineraries(db)
        .find(doc! { "trip_id": *trip_id })
        .await?
        .try_collect::<Vec<Itinerary>>()
        .await?
        .into_iter()
        .filter_map(|itinerary| itinerary.id)
        .collect();

    delete_itineraries(db, itinerary_ids).await
}

pub async fn delete_itineraries(db: &Database, itinerary_ids: Vec<ObjectId>) -> ApiResult<()> {
    if itinerary_ids.is_empty() {
        return Ok(());
    }

    let day_ids: Vec<ObjectId> = mongo::days(db)
        .find(doc! { "itinerary_id": { "$in": itinerary_ids.clone() } })
        .await?
        .try_collect::<Vec<Day>>()
        .await?
        .into_iter()
        .filter_map(|day| day.id)
        .collect();

    if !day_ids.is_empty() {
        mongo::activities(db)
            .delete_many(doc! { "day_id": { "$in": day_ids.clone() } })
            .await?;
        mongo::days(db)
            .delete_many(doc! { "_id": { "$in": day_ids } })
            .await?;
    }
    mongo::itineraries(db)
        .delete_many(doc! { "_id": { "$in": itinerary_ids } })
        .await?;

    Ok(())
}

pub async fn delete_trip(db: &Database, trip_id: &ObjectId) -> ApiResult<()> {
    let memories = mongo::memories(db);
    let (_, removed_memories) = futures::try_join!(
        delete_itineraries_for_trip(db, trip_id),
        async {
            memories
                .delete_many(doc! { "trip_id": *trip_id })
                .await
                .map_err(ApiError::from)
        }
    )?;

    mongo::trips(db).delete_one(doc! { "_id": *trip_id }).await?;
    info!(
        "Deleted trip {} ({} memories removed)",
        trip_id, removed_memories.deleted_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_trip_is_allowed() {
        assert!(check_trip_dates(date(2024, 4, 1), date(2024, 4, 1)).is_ok());
    }

    #[test]
    fn test_reversed_dates_rejected() {
        assert!(matches!(
            check_trip_dates(date(2024, 4, 5), date(2024, 4, 1)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_trip_length_is_capped() {
        let start = date(2024, 1, 1);
        assert!(check_trip_dates(start, start + chrono::Duration::days(MAX_TRIP_DAYS)).is_ok());
        assert!(matches!(
            check_trip_dates(start, start + chrono::Duration::days(MAX_TRIP_DAYS + 1)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(check_trip_dates(start, date(262000, 1, 1)).is_err());
    }
}
