//! Subscription domain models.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{invalid_input, Error, Result, ValidationError};
use crate::utils::time_utils::add_years;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl SubscriptionPlan {
    /// Monthly plans run for 30 days, yearly plans for one calendar year.
    pub fn expiry_from(self, purchased_at: NaiveDateTime) -> NaiveDateTime {
        match self {
            SubscriptionPlan::Monthly => purchased_at + Duration::days(30),
            SubscriptionPlan::Yearly => add_years(purchased_at, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "monthly",
            SubscriptionPlan::Yearly => "yearly",
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(SubscriptionPlan::Monthly),
            "yearly" => Ok(SubscriptionPlan::Yearly),
            other => Err(invalid_input(format!("Unknown subscription plan '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub partner_mapping_id: Option<i32>,
    pub purchase_plan_id: String,
    pub amount: f64,
    pub device_name: String,
    pub plan: SubscriptionPlan,
    pub receipt: String,
    pub status: i32,
    pub expiry_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Purchase reported by the app for the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubscription {
    pub user_id: i32,
    pub partner_mapping_id: Option<i32>,
    pub purchase_plan_id: String,
    pub amount: f64,
    pub device_name: String,
    pub plan: SubscriptionPlan,
    pub receipt: String,
}

impl NewSubscription {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("Purchase plan id", &self.purchase_plan_id),
            ("Device name", &self.device_name),
            ("Receipt", &self.receipt),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(invalid_input("Amount must be a non-negative number"));
        }
        Ok(())
    }
}

/// Row handed to the repository with the computed expiry.
#[derive(Debug, Clone)]
pub struct NewSubscriptionRecord {
    pub subscription: NewSubscription,
    pub expiry_date: NaiveDateTime,
}
