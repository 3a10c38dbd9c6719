//! Trip planning API: trips, day-by-day itineraries (hand-made or generated),
//! activities, memories and destinations over MongoDB.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
