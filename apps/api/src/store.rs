//! Candidate Store — partitioned, accumulation-only storage of candidate
//! records keyed by category.
//!
//! All candidates live in one table with a category column; identifier
//! uniqueness is GLOBAL (one constraint across every partition), so a
//! candidate can never appear in two partitions. Partition fetches come
//! back in insertion order, which is the ranking tie-break.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::taxonomy::Category;

/// A candidate as supplied by the ingestion feed. Category is not part of
/// this shape: it is assigned exactly once by the classifier on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCandidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub current_role: String,
    pub experience_years: i64,
    pub skills: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub location: String,
}

impl NewCandidate {
    /// The free-text profile the classifier and ranker see.
    pub fn profile_text(&self) -> String {
        format!(
            "{}. {} years experience. Skills: {}. {} {}",
            self.current_role, self.experience_years, self.skills, self.education, self.location
        )
    }
}

/// A stored candidate. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub seq: i64,
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub current_role: String,
    pub experience_years: i64,
    pub skills: String,
    pub education: String,
    pub location: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl CandidateRow {
    /// Free-text view of the stored profile, mirroring
    /// `NewCandidate::profile_text` so ingestion-time and query-time
    /// matching see the same text.
    pub fn profile_text(&self) -> String {
        format!(
            "{}. {} years experience. Skills: {}. {} {}",
            self.current_role, self.experience_years, self.skills, self.education, self.location
        )
    }
}

#[derive(Clone)]
pub struct CandidateStore {
    pool: SqlitePool,
}

impl CandidateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a candidate into the given category's partition.
    /// Fails with `DuplicateIdentifier` if the id exists in ANY partition;
    /// the constraint is enforced atomically by the database, so concurrent
    /// inserts of the same id fail deterministically regardless of order.
    pub async fn insert(
        &self,
        candidate: &NewCandidate,
        category: Category,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO candidates
                (id, name, email, current_role, experience_years,
                 skills, education, location, category, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.current_role)
        .bind(candidate.experience_years)
        .bind(&candidate.skills)
        .bind(&candidate.education)
        .bind(&candidate.location)
        .bind(category.key())
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateIdentifier(candidate.id))
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// Returns the full partition for a category, in insertion order.
    /// A category with no candidates yields an empty Vec, not an error.
    pub async fn fetch_partition(&self, category: Category) -> Result<Vec<CandidateRow>, AppError> {
        Ok(sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates WHERE category = ? ORDER BY seq ASC",
        )
        .bind(category.key())
        .fetch_all(&self.pool)
        .await?)
    }

    /// Per-category candidate counts for the categories endpoint.
    pub async fn partition_counts(&self) -> Result<Vec<(String, i64)>, AppError> {
        Ok(sqlx::query_as::<_, (String, i64)>(
            "SELECT category, COUNT(*) FROM candidates GROUP BY category ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
