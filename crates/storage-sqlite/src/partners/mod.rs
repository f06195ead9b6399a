//! SQLite storage implementation for partner mappings.

mod model;
mod repository;

pub use model::{NewPartnerMappingDB, PartnerMappingDB};
pub use repository::PartnerRepository;
