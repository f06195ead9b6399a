//! Partners module - the bidirectional pairing between two users.

mod partners_model;
mod partners_service;
mod partners_traits;


pub use partners_model::{single_active_mapping, NewPartnerMapping, PartnerMapping};
pub use partners_service::PartnerService;
pub use partners_traits::{PartnerRepositoryTrait, PartnerServiceTrait};
