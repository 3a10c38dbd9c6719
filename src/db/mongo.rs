use log::{info, warn};
use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    activity::Activity,
    destination::Destination,
    itinerary::{Day, Itinerary},
    memory::Memory,
    trip::Trip,
    user::User,
};

pub const USERS: &str = "Users";
pub const TRIPS: &str = "Trips";
pub const DESTINATIONS: &str = "Destinations";
pub const ITINERARIES: &str = "Itineraries";
pub const DAYS: &str = "Days";
pub const ACTIVITIES: &str = "Activities";
pub const MEMORIES: &str = "Memories";

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            warn!("Connected to MongoDB but ping failed: {}", e);
            warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(Arc::new(client))
}

/// Unique email per account; duplicate inserts surface as write error 11000.
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let unique_email = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    users(db).create_index(unique_email).await?;

    trips(db).create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build()).await?;
    itineraries(db).create_index(IndexModel::builder().keys(doc! { "trip_id": 1 }).build()).await?;
    days(db).create_index(IndexModel::builder().keys(doc! { "itinerary_id": 1 }).build()).await?;
    activities(db).create_index(IndexModel::builder().keys(doc! { "day_id": 1 }).build()).await?;
    memories(db).create_index(IndexModel::builder().keys(doc! { "trip_id": 1 }).build()).await?;

    Ok(())
}

pub fn users(db: &Database) -> Collection<User> {
    db.collection(USERS)
}

pub fn trips(db: &Database) -> Collection<Trip> {
    db.collection(TRIPS)
}

pub fn destinations(db: &Database) -> Collection<Destination> {
    db.collection(DESTINATIONS)
}

pub fn itineraries(db: &Database) -> Collection<Itinerary> {
    db.collection(ITINERARIES)
}

pub fn days(db: &Database) -> Collection<Day> {
    db.collection(DAYS)
}

pub fn activities(db: &Database) -> Collection<Activity> {
    db.collection(ACTIVITIES)
}

pub fn memories(db: &Database) -> Collection<Memory> {
    db.collection(MEMORIES)
}

/// Returns true when the error is a duplicate-key write.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(write_error)) => {
            write_error.code == 11000
        }
        _ => false,
    }
}
