//! Pairgoal Core - Domain entities, services, and traits.
//!
//! This crate contains the business rules of the couples goal app: users and
//! their pairing codes, partner mappings, the paired monthly goal ledger,
//! goal history, the goal-setting questionnaire, subscriptions and
//! unavailability windows. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod partners;
pub mod subscriptions;
pub mod unavailability;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
