mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Registered site user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Persisted contact-form record. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub visit_date: Option<String>,
    pub interests: Vec<String>,
    pub message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Contact-form fields after validation and sanitization, before an id
/// and timestamp are assigned.
#[derive(Debug, Clone, Default)]
pub struct NewContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub visit_date: Option<String>,
    pub interests: Vec<String>,
    pub message: Option<String>,
}

/// Persisted package-builder record. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdventureSubmission {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub departure_airport: String,
    pub group_size: i32,
    pub package_ids: Vec<String>,
    pub accommodation_ids: Vec<String>,
    pub activity_ids: Vec<String>,
    pub additional_requests: Option<String>,
    pub language: String,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewAdventureSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub departure_airport: String,
    pub group_size: i32,
    pub package_ids: Vec<String>,
    pub accommodation_ids: Vec<String>,
    pub activity_ids: Vec<String>,
    pub additional_requests: Option<String>,
    pub language: String,
}

/// Storage contract shared by the in-memory and Postgres backends.
///
/// Every create assigns the next sequential id and stamps the current time;
/// ids are strictly increasing per store instance. There are no update or
/// delete operations: submissions are append-only.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn get_user(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User>;

    async fn create_contact_submission(
        &self,
        new: NewContactSubmission,
    ) -> anyhow::Result<ContactSubmission>;
    async fn get_contact_submissions(&self) -> anyhow::Result<Vec<ContactSubmission>>;

    async fn create_adventure_submission(
        &self,
        new: NewAdventureSubmission,
    ) -> anyhow::Result<AdventureSubmission>;
    async fn get_adventure_submissions(&self) -> anyhow::Result<Vec<AdventureSubmission>>;
}
