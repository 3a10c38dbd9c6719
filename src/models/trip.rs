use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination_id: Option<ObjectId>,
    pub is_public: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.user_id == user_id
    }

    /// Public trips are readable by anyone, private ones only by the owner.
    pub fn is_visible_to(&self, user_id: Option<&ObjectId>) -> bool {
        self.is_public || user_id.is_some_and(|id| self.is_owned_by(id))
    }
}

#[derive(Debug, Deserialize)]
pub struct NewTrip {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub destination_id: Option<String>,
}

/// Partial update. For the nullable fields an absent key leaves the value
/// alone while an explicit `null` clears it.
#[derive(Debug, Deserialize, Default)]
pub struct TripUpdate {
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub destination_id: Option<Option<String>>,
    pub is_public: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(owner: ObjectId, is_public: bool) -> Trip {
        Trip {
            id: Some(ObjectId::new()),
            user_id: owner,
            title: "Lisbon".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            destination_id: None,
            is_public,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_private_trip_visibility() {
        let owner = ObjectId::new();
        let stranger = ObjectId::new();
        let private = trip(owner, false);

        assert!(private.is_visible_to(Some(&owner)));
        assert!(!private.is_visible_to(Some(&stranger)));
        assert!(!private.is_visible_to(None));
    }

    #[test]
    fn test_public_trip_visibility() {
        let public = trip(ObjectId::new(), true);
        assert!(public.is_visible_to(None));
        assert!(public.is_visible_to(Some(&ObjectId::new())));
        assert!(!public.is_owned_by(&ObjectId::new()));
    }

    #[test]
    fn test_dates_use_calendar_format() {
        let body: NewTrip = serde_json::from_str(
            r#"{"title": "Lisbon", "start_date": "2024-05-01", "end_date": "2024-05-04"}"#,
        )
        .unwrap();
        assert_eq!(body.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(body.destination_id.is_none());
    }

    #[test]
    fn test_update_tells_null_from_absent() {
        let update: TripUpdate =
            serde_json::from_str(r#"{"description": null, "is_public": true}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.destination_id, None);

        let update: TripUpdate =
            serde_json::from_str(r#"{"destination_id": "65f000000000000000000001"}"#).unwrap();
        assert_eq!(
            update.destination_id,
            Some(Some("65f000000000000000000001".to_string()))
        );
    }
}
