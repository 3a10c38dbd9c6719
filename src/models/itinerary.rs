use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::activity::Activity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    #[default]
    Adventure,
    Relaxation,
    Cultural,
    Foodie,
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Adventure => "adventure",
            TravelStyle::Relaxation => "relaxation",
            TravelStyle::Cultural => "cultural",
            TravelStyle::Foodie => "foodie",
        }
    }

    /// Capitalized form used in itinerary titles.
    pub fn label(&self) -> &'static str {
        match self {
            TravelStyle::Adventure => "Adventure",
            TravelStyle::Relaxation => "Relaxation",
            TravelStyle::Cultural => "Cultural",
            TravelStyle::Foodie => "Foodie",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            TravelStyle::Adventure => {
                "action-packed activities, outdoor exploration, and thrilling experiences"
            }
            TravelStyle::Relaxation => "spa days, beach time, and peaceful moments with scenic views",
            TravelStyle::Cultural => {
                "museums, historical sites, local traditions, and cultural immersion"
            }
            TravelStyle::Foodie => {
                "culinary tours, local markets, cooking classes, and restaurant experiences"
            }
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adventure" => Ok(TravelStyle::Adventure),
            "relaxation" => Ok(TravelStyle::Relaxation),
            "cultural" => Ok(TravelStyle::Cultural),
            "foodie" => Ok(TravelStyle::Foodie),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Itinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub trip_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Day {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub itinerary_id: ObjectId,
    pub day_number: u32,
    pub date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DayWithActivities {
    #[serde(flatten)]
    pub day: Day,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ItineraryWithDays {
    #[serde(flatten)]
    pub itinerary: Itinerary,
    pub days: Vec<DayWithActivities>,
}

/// Body of `POST /trips/{id}/itineraries`.
#[derive(Debug, Deserialize, Default)]
pub struct CreateItineraryRequest {
    #[serde(rename = "useAI", default)]
    pub use_ai: bool,
    #[serde(rename = "travelStyle")]
    pub travel_style: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ItineraryUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}
