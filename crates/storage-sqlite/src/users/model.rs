//! Database models for users.

use diesel::prelude::*;
use pairgoal_core::users::{NewUserRecord, User, UserProfile};

/// Database model for users
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: i32,
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub unique_code: String,
    pub profile_image: Option<String>,
    pub fcm_id: Option<String>,
    pub face_id: bool,
    pub touch_id: bool,
    pub notification_mute_status: bool,
    pub notification_mute_end: Option<String>,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub unique_code: String,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl NewUserDB {
    pub fn from_record(record: NewUserRecord, now: String) -> Self {
        Self {
            role_id: record.role_id,
            first_name: record.first_name,
            last_name: record.last_name,
            gender: record.gender,
            email: record.email,
            password: record.password,
            unique_code: record.unique_code,
            status: record.status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            role_id: db.role_id,
            first_name: db.first_name,
            last_name: db.last_name,
            gender: db.gender,
            email: db.email,
            password: db.password,
            unique_code: db.unique_code,
            profile_image: db.profile_image,
            fcm_id: db.fcm_id,
            face_id: db.face_id,
            touch_id: db.touch_id,
            notification_mute_status: db.notification_mute_status,
            notification_mute_end: db.notification_mute_end,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<UserDB> for UserProfile {
    fn from(db: UserDB) -> Self {
        UserProfile::from(User::from(db))
    }
}
