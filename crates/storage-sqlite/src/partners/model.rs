//! Database models for partner mappings.

use diesel::prelude::*;
use pairgoal_core::partners::PartnerMapping;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::partner_mappings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PartnerMappingDB {
    pub id: i32,
    pub partner_one_id: i32,
    pub partner_two_id: i32,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::partner_mappings)]
pub struct NewPartnerMappingDB {
    pub partner_one_id: i32,
    pub partner_two_id: i32,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PartnerMappingDB> for PartnerMapping {
    fn from(db: PartnerMappingDB) -> Self {
        Self {
            id: db.id,
            partner_one_id: db.partner_one_id,
            partner_two_id: db.partner_two_id,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
