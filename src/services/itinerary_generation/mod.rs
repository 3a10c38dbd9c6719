//! Deterministic itinerary synthesis.
//!
//! Given a destination, a date range, a travel style and a seed source, this
//! produces the same day-by-day plan every time. Nothing here touches the
//! database; the caller assigns ids and persists the result.

pub mod catalog;
pub mod sequence;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{activity::ActivityCategory, itinerary::TravelStyle};
use catalog::{templates_for, SELECTION_ORDER};
use sequence::{derive_seed, seeded_index};

const DAY_START_HOUR: u32 = 8;
const DAY_END_HOUR: u32 = 22;
const BUFFER_HOURS: u32 = 1;
const MIN_ACTIVITIES_PER_DAY: u32 = 3;
const ACTIVITY_COUNT_SPREAD: usize = 2;

/// Longest trip, in days, that callers may hand to [`synthesize`].
pub const MAX_TRIP_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItinerarySpec {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySpec {
    pub day_number: u32,
    pub date: NaiveDate,
    pub activities: Vec<ActivitySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivitySpec {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub category: ActivityCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedItinerary {
    pub itinerary: ItinerarySpec,
    pub days: Vec<DaySpec>,
}

#[derive(Debug, Clone)]
pub struct SynthesisInput<'a> {
    pub destination: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travel_style: TravelStyle,
    pub seed_source: &'a str,
}

/// Number of itinerary days covering `span`: whole days rounded up, never
/// negative. A 36 hour span is two days, an empty or reversed span is none.
pub fn day_count(span: Duration) -> u32 {
    let seconds = span.num_seconds();
    if seconds <= 0 {
        return 0;
    }
    let day = Duration::days(1).num_seconds();
    ((seconds + day - 1) / day) as u32
}

pub fn synthesize(input: &SynthesisInput<'_>) -> GeneratedItinerary {
    let seed = derive_seed(input.seed_source);
    let num_days = day_count(input.end_date - input.start_date);

    let itinerary = ItinerarySpec {
        title: format!(
            "{}-Day {} {} Itinerary",
            num_days,
            input.destination,
            input.travel_style.label()
        ),
        description: format!(
            "A curated {}-day itinerary focused on {}.",
            num_days,
            input.travel_style.narrative()
        ),
    };

    let days = (0..num_days)
        .map(|i| DaySpec {
            day_number: i + 1,
            date: input.start_date + Duration::days(i64::from(i)),
            activities: plan_day(seed + i64::from(i), input.destination),
        })
        .collect();

    GeneratedItinerary { itinerary, days }
}

/// Fills one day starting at 08:00. `day_key` is the seed offset by the day
/// index; slot `j` draws its category from `day_key + j` and its template
/// from `day_key + j + 1`.
fn plan_day(day_key: i64, destination: &str) -> Vec<ActivitySpec> {
    let count = MIN_ACTIVITIES_PER_DAY as usize + seeded_index(day_key, ACTIVITY_COUNT_SPREAD);
    let mut current_hour = DAY_START_HOUR;
    let mut activities = Vec::with_capacity(count);

    for j in 0..count as i64 {
        let category = SELECTION_ORDER[seeded_index(day_key + j, SELECTION_ORDER.len())];
        let templates = templates_for(category);
        let template = templates[seeded_index(day_key + j + 1, templates.len())];

        let start_hour = current_hour;
        let end_hour = start_hour + template.duration_minutes.div_ceil(60);

        activities.push(ActivitySpec {
            title: template.title.to_string(),
            description: format!(
                "Enjoy this {} experience during your stay in {}.",
                category, destination
            ),
            start_time: clock(start_hour),
            end_time: clock(end_hour.min(DAY_END_HOUR)),
            location: destination.to_string(),
            category,
        });

        current_hour = (end_hour + BUFFER_HOURS).min(DAY_END_HOUR);
    }

    activities
}

fn clock(hour: u32) -> String {
    format!("{:02}:00", hour)
}
