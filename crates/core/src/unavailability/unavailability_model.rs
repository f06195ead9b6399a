use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{invalid_input, Result};

/// A window during which a user does not want to be prompted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unavailability {
    pub id: i32,
    pub user_id: i32,
    pub unavailability_start: NaiveDateTime,
    pub unavailability_end: NaiveDateTime,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnavailability {
    pub user_id: i32,
    pub unavailability_start: NaiveDateTime,
    pub unavailability_end: NaiveDateTime,
}

impl NewUnavailability {
    /// Both ends must lie in the future and the window must not be empty.
    pub fn validate(&self, now: NaiveDateTime) -> Result<()> {
        if self.unavailability_start <= now {
            return Err(invalid_input(
                "Unavailability start time should be greater than current time.",
            ));
        }
        if self.unavailability_end <= now {
            return Err(invalid_input(
                "Unavailability end time should be greater than current time.",
            ));
        }
        if self.unavailability_start >= self.unavailability_end {
            return Err(invalid_input(
                "Unavailability start time should be before unavailability end time.",
            ));
        }
        Ok(())
    }
}
