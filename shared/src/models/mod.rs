//! Data models shared between the server and its clients

pub mod check_in;
pub mod group;
pub mod hotel;
pub mod itinerary;
pub mod ledger;
pub mod spot;
pub mod sync;
pub mod traveler;

pub use check_in::{CheckIn, CheckInToggle};
pub use group::{TourGroup, TourGroupCreate, TourGroupUpdate};
pub use hotel::{Hotel, HotelCreate, HotelUpdate};
pub use itinerary::{ItineraryDay, ItineraryDayCreate, ItineraryDayUpdate};
pub use ledger::{LedgerEntry, LedgerEntryCreate, LedgerEntryUpdate};
pub use spot::{Spot, SpotCreate, SpotUpdate};
pub use sync::SyncStatus;
pub use traveler::{Traveler, TravelerCreate, TravelerUpdate};
