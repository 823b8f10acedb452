use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'tags' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}
