pub mod connection;
pub mod fixtures;
pub mod front_desk;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{RoomInventory, SeedResult, VerificationResult};
pub use front_desk::{AvailabilityReport, BookingConfirmation, DailyReport, FrontDesk, GuestHistory};
pub use repositories::{HotelRepository, RepositoryError, SqlHotelRepository};
