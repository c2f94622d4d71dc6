use sqlx::FromRow;

use business::domain::sync::remote::RemoteDocument;

#[derive(Debug, FromRow)]
pub struct RemoteDocumentEntity {
    pub doc_id: String,
    pub body: serde_json::Value,
}

impl RemoteDocumentEntity {
    pub fn into_domain(self) -> RemoteDocument {
        RemoteDocument {
            id: self.doc_id,
            data: self.body,
        }
    }
}
