use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    /// UUIDv7 primary key, assigned on insert.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Client-supplied upload filename, stored verbatim.
    pub filename: String,

    pub content_type: String,

    /// Payload length in bytes.
    pub size: i64,

    #[sea_orm(column_type = "Text")]
    pub extracted_text: String,

    pub ocr_used: bool,

    /// Hex blob id of the raw payload in the blob store.
    pub file_id: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
