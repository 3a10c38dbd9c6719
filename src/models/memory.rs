use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A photo attached to a trip.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Memory {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub trip_id: ObjectId,
    pub user_id: ObjectId,
    pub image_url: String,
    pub caption: Option<String>,
    pub date_taken: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct NewMemory {
    pub image_url: Option<String>,
    pub caption: Option<String>,
    pub date_taken: Option<NaiveDate>,
}
