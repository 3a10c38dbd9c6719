use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Transportation,
    Accommodation,
    Attraction,
    Dining,
    Other,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Transportation => "transportation",
            ActivityCategory::Accommodation => "accommodation",
            ActivityCategory::Attraction => "attraction",
            ActivityCategory::Dining => "dining",
            ActivityCategory::Other => "other",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Activity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub day_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    /// "HH:MM", 24h
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub category: ActivityCategory,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /days/{id}/activities`. Required fields are optional here so
/// missing ones produce a 400 with our own message.
#[derive(Debug, Deserialize)]
pub struct NewActivity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub category: Option<ActivityCategory>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub category: Option<ActivityCategory>,
}
