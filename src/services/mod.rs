pub mod expenses;
pub mod itinerary;
pub mod ledger;
pub mod places;
pub mod trips;
