//! SQLite storage implementation for unavailability windows.

mod model;
mod repository;

pub use model::{NewUnavailabilityDB, UnavailabilityDB};
pub use repository::UnavailabilityRepository;
