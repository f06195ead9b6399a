//! Unavailability module - windows during which a user is away.

mod unavailability_model;
mod unavailability_service;
mod unavailability_traits;


pub use unavailability_model::{NewUnavailability, Unavailability};
pub use unavailability_service::UnavailabilityService;
pub use unavailability_traits::{UnavailabilityRepositoryTrait, UnavailabilityServiceTrait};
