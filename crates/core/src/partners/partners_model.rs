//! Partner mapping domain models.

use serde::{Deserialize, Serialize};

use crate::constants::STATUS_ACTIVE;
use crate::errors::{Error, Result};

/// Undirected pairing between two users. `status == 1` means active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartnerMapping {
    pub id: i32,
    pub partner_one_id: i32,
    pub partner_two_id: i32,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl PartnerMapping {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn involves(&self, user_id: i32) -> bool {
        self.partner_one_id == user_id || self.partner_two_id == user_id
    }

    /// The side of the mapping that is not `user_id`, if `user_id` is on it at all.
    pub fn other_partner(&self, user_id: i32) -> Option<i32> {
        if self.partner_one_id == user_id {
            Some(self.partner_two_id)
        } else if self.partner_two_id == user_id {
            Some(self.partner_one_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPartnerMapping {
    pub partner_one_id: i32,
    pub partner_two_id: i32,
}

/// Reduces the active mappings found for a user to the single one allowed.
pub fn single_active_mapping(
    user_id: i32,
    mut mappings: Vec<PartnerMapping>,
) -> Result<PartnerMapping> {
    mappings.retain(|m| m.is_active() && m.involves(user_id));
    match mappings.len() {
        0 => Err(Error::NotFound(format!(
            "No active partner found for user {}",
            user_id
        ))),
        1 => Ok(mappings.remove(0)),
        n => Err(Error::DataIntegrity(format!(
            "User {} has {} active partner mappings",
            user_id, n
        ))),
    }
}
