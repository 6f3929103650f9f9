use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::document;

/// Largest limit the SQL drivers bind without overflowing a signed 64-bit integer.
pub const MAX_LIST_LIMIT: u64 = i64::MAX as u64;

/// Fields of a document record known before insertion.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub extracted_text: String,
    pub ocr_used: bool,
    pub file_id: String,
}

/// Metadata store operations over the `document` table.
pub struct DocumentService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> DocumentService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert a record, assigning its id.
    pub async fn create(&self, doc: NewDocument) -> Result<document::Model, DbErr> {
        let model = document::ActiveModel {
            id: Set(Uuid::now_v7()),
            filename: Set(doc.filename),
            content_type: Set(doc.content_type),
            size: Set(doc.size),
            extracted_text: Set(doc.extracted_text),
            ocr_used: Set(doc.ocr_used),
            file_id: Set(Some(doc.file_id)),
            created_at: Set(Utc::now()),
        };

        model.insert(self.conn).await
    }

    /// Up to `limit` records, newest first. `0` yields an empty list, not "no limit".
    ///
    /// Limits beyond what the database accepts are clamped to `MAX_LIST_LIMIT`.
    pub async fn list(&self, limit: u64) -> Result<Vec<document::Model>, DbErr> {
        document::Entity::find()
            .order_by_desc(document::Column::CreatedAt)
            .order_by_desc(document::Column::Id)
            .limit(limit.min(MAX_LIST_LIMIT))
            .all(self.conn)
            .await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<document::Model>, DbErr> {
        document::Entity::find_by_id(id).one(self.conn).await
    }
}
