pub mod itinerary_generation;
pub mod itinerary_service;
pub mod trip_service;
