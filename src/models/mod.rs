pub mod activity;
pub mod destination;
pub mod itinerary;
pub mod memory;
pub mod trip;
pub mod user;
