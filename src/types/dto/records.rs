use serde::{Deserialize, Serialize};
use crate::types::db::directory_record;

/// Form payload for creating a directory record
#[derive(Debug, Deserialize)]
pub struct NewRecordPayload {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

impl NewRecordPayload {
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
        ]
    }
}

/// Form payload for editing a directory record's email
#[derive(Debug, Deserialize)]
pub struct EditRecordPayload {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub email: String,
}

impl EditRecordPayload {
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![("email", self.email.as_str())]
    }
}

/// Directory record as exposed by the listing and detail endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<directory_record::Model> for RecordResponse {
    fn from(record: directory_record::Model) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            is_deleted: record.is_deleted,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
