use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use log::{error, info};
use mongodb::{
    bson::{doc, oid::ObjectId},
    Database,
};

use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    activity::Activity,
    itinerary::{Day, DayWithActivities, Itinerary, ItineraryWithDays, TravelStyle},
    trip::Trip,
};
use crate::services::itinerary_generation::{
    synthesize, ActivitySpec, DaySpec, GeneratedItinerary, ItinerarySpec, SynthesisInput,
};
use crate::services::trip_service;

const DEFAULT_TITLE: &str = "My Itinerary";

fn inserted_id(result: mongodb::results::InsertOneResult) -> ApiResult<ObjectId> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Internal("insert did not return an ObjectId".into()))
}

pub async fn create_manual(
    db: &Database,
    trip_id: ObjectId,
    title: Option<String>,
    description: Option<String>,
) -> ApiResult<Itinerary> {
    let now = Utc::now();
    let mut itinerary = Itinerary {
        id: None,
        trip_id,
        title: title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let result = mongo::itineraries(db).insert_one(&itinerary).await?;
    itinerary.id = Some(inserted_id(result)?);
    Ok(itinerary)
}

/// Generates a plan for the trip and stores it. The trip title stands in for
/// the destination and the trip id seeds the generator, so regenerating the
/// same trip yields the same plan.
pub async fn create_generated(
    db: &Database,
    trip: &Trip,
    travel_style: TravelStyle,
) -> ApiResult<Itinerary> {
    let trip_id = trip
        .id
        .ok_or_else(|| ApiError::Internal("trip without id".into()))?;
    trip_service::check_trip_dates(trip.start_date, trip.end_date)?;
    let seed_source = trip_id.to_hex();

    let generated = synthesize(&SynthesisInput {
        destination: &trip.title,
        start_date: trip.start_date,
        end_date: trip.end_date,
        travel_style,
        seed_source: &seed_source,
    });

    let day_count = generated.days.len();
    let itinerary = store_generated(db, trip_id, generated).await?;
    info!(
        "Generated {} itinerary for trip {} with {} days",
        travel_style, trip_id, day_count
    );
    Ok(itinerary)
}

async fn store_generated(
    db: &Database,
    trip_id: ObjectId,
    generated: GeneratedItinerary,
) -> ApiResult<Itinerary> {
    let GeneratedItinerary { itinerary: summary, days } = generated;
    let mut itinerary = itinerary_document(trip_id, summary, Utc::now());
    let itinerary_id = inserted_id(mongo::itineraries(db).insert_one(&itinerary).await?)?;
    itinerary.id = Some(itinerary_id);

    if let Err(err) = store_days(db, itinerary_id, days).await {
        // leave no half-written itinerary behind
        error!("Failed to store generated days, discarding {}: {}", itinerary_id, err);
        if let Err(cleanup) = trip_service::delete_itineraries(db, vec![itinerary_id]).await {
            error!("Cleanup of itinerary {} failed: {}", itinerary_id, cleanup);
        }
        return Err(err);
    }

    Ok(itinerary)
}

async fn store_days(
    db: &Database,
    itinerary_id: ObjectId,
    days: Vec<DaySpec>,
) -> ApiResult<()> {
    let now = Utc::now();

    for day_spec in days {
        let day = Day {
            id: None,
            itinerary_id,
            day_number: day_spec.day_number,
            date: day_spec.date,
            created_at: Some(now),
        };
        let day_id = inserted_id(mongo::days(db).insert_one(&day).await?)?;

        let activities = activity_documents(day_id, day_spec.activities, now);

        if !activities.is_empty() {
            mongo::activities(db).insert_many(&activities).await?;
        }
    }

    Ok(())
}

fn itinerary_document(trip_id: ObjectId, summary: ItinerarySpec, now: DateTime<Utc>) -> Itinerary {
    Itinerary {
        id: None,
        trip_id,
        title: summary.title,
        description: Some(summary.description),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

fn activity_documents(
    day_id: ObjectId,
    specs: Vec<ActivitySpec>,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    specs
        .into_iter()
        .map(|spec| Activity {
            id: None,
            day_id,
            title: spec.title,
            description: Some(spec.description),
            start_time: spec.start_time,
            end_time: spec.end_time,
            location: Some(spec.location),
            category: spec.category,
            created_at: Some(now),
            updated_at: Some(now),
        })
        .collect()
}

/// Itineraries of a trip with their days (by day number) and each day's
/// activities (by start time), loaded in three queries.
pub async fn list_for_trip(db: &Database, trip_id: &ObjectId) -> ApiResult<Vec<ItineraryWithDays>> {
    let itineraries: Vec<Itinerary> = mongo::itineraries(db)
        .find(doc! { "trip_id": *trip_id })
        .sort(doc! { "created_at": 1 })
        .await?
        .try_collect()
        .await?;

    let itinerary_ids: Vec<ObjectId> = itineraries.iter().filter_map(|i| i.id).collect();
    if itinerary_ids.is_empty() {
        return Ok(Vec::new());
    }

    let days: Vec<Day> = mongo::days(db)
        .find(doc! { "itinerary_id": { "$in": itinerary_ids } })
        .sort(doc! { "day_number": 1 })
        .await?
        .try_collect()
        .await?;

    let day_ids: Vec<ObjectId> = days.iter().filter_map(|d| d.id).collect();
    let activities: Vec<Activity> = if day_ids.is_empty() {
        Vec::new()
    } else {
        mongo::activities(db)
            .find(doc! { "day_id": { "$in": day_ids } })
            .sort(doc! { "start_time": 1 })
            .await?
            .try_collect()
            .await?
    };

    Ok(assemble(itineraries, days, activities))
}

fn assemble(
    itineraries: Vec<Itinerary>,
    days: Vec<Day>,
    activities: Vec<Activity>,
) -> Vec<ItineraryWithDays> {
    let mut activities_by_day: HashMap<ObjectId, Vec<Activity>> = HashMap::new();
    for activity in activities {
        activities_by_day
            .entry(activity.day_id)
            .or_default()
            .push(activity);
    }

    let mut days_by_itinerary: HashMap<ObjectId, Vec<DayWithActivities>> = HashMap::new();
    for day in days {
        let activities = day
            .id
            .and_then(|id| activities_by_day.remove(&id))
            .unwrap_or_default();
        days_by_itinerary
            .entry(day.itinerary_id)
            .or_default()
            .push(DayWithActivities { day, activities });
    }

    itineraries
        .into_iter()
        .map(|itinerary| {
            let days = itinerary
                .id
                .and_then(|id| days_by_itinerary.remove(&id))
                .unwrap_or_default();
            ItineraryWithDays { itinerary, days }
        })
        .collect()
}
