//! Database models for unavailability windows.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pairgoal_core::unavailability::{NewUnavailability, Unavailability};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::unavailabilities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UnavailabilityDB {
    pub id: i32,
    pub user_id: i32,
    pub unavailability_start: NaiveDateTime,
    pub unavailability_end: NaiveDateTime,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::unavailabilities)]
pub struct NewUnavailabilityDB {
    pub user_id: i32,
    pub unavailability_start: NaiveDateTime,
    pub unavailability_end: NaiveDateTime,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl NewUnavailabilityDB {
    pub fn from_domain(window: NewUnavailability, status: i32, now: String) -> Self {
        Self {
            user_id: window.user_id,
            unavailability_start: window.unavailability_start,
            unavailability_end: window.unavailability_end,
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<UnavailabilityDB> for Unavailability {
    fn from(db: UnavailabilityDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            unavailability_start: db.unavailability_start,
            unavailability_end: db.unavailability_end,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
