use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered wardrobe owner
///
/// Profile fields (age, gender, preferences) feed the recommendation
/// prompt; authentication itself lives in the auth layer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    /// Standing style preferences, e.g. "no bright colors"
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied at registration; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub preferences: Vec<String>,
}
