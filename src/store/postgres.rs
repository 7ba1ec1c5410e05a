use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{
    AdventureSubmission, ContactSubmission, NewAdventureSubmission, NewContactSubmission, NewUser,
    SubmissionStore, User,
};

/// Postgres-backed store for production. Sequential ids come from the
/// `BIGSERIAL` sequences, so monotonicity holds across processes.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects the pool and brings the schema up to date. Missing tables
    /// are created by the embedded migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run database migrations")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn get_user(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_contact_submission(
        &self,
        new: NewContactSubmission,
    ) -> anyhow::Result<ContactSubmission> {
        let record = sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions
                (first_name, last_name, email, phone, visit_date, interests, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, email, phone, visit_date,
                      interests, message, submitted_at
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.visit_date)
        .bind(&new.interests)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn get_contact_submissions(&self) -> anyhow::Result<Vec<ContactSubmission>> {
        let rows = sqlx::query_as::<_, ContactSubmission>(
            r#"
            SELECT id, first_name, last_name, email, phone, visit_date,
                   interests, message, submitted_at
            FROM contact_submissions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_adventure_submission(
        &self,
        new: NewAdventureSubmission,
    ) -> anyhow::Result<AdventureSubmission> {
        let record = sqlx::query_as::<_, AdventureSubmission>(
            r#"
            INSERT INTO adventure_submissions
                (first_name, last_name, email, phone, start_date, end_date,
                 departure_airport, group_size, package_ids, accommodation_ids,
                 activity_ids, additional_requests, language)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, first_name, last_name, email, phone, start_date, end_date,
                      departure_airport, group_size, package_ids, accommodation_ids,
                      activity_ids, additional_requests, language, submitted_at
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.start_date)
        .bind(&new.end_date)
        .bind(&new.departure_airport)
        .bind(new.group_size)
        .bind(&new.package_ids)
        .bind(&new.accommodation_ids)
        .bind(&new.activity_ids)
        .bind(&new.additional_requests)
        .bind(&new.language)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn get_adventure_submissions(&self) -> anyhow::Result<Vec<AdventureSubmission>> {
        let rows = sqlx::query_as::<_, AdventureSubmission>(
            r#"
            SELECT id, first_name, last_name, email, phone, start_date, end_date,
                   departure_airport, group_size, package_ids, accommodation_ids,
                   activity_ids, additional_requests, language, submitted_at
            FROM adventure_submissions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
