//! Ranking Engine — scores and orders a category's candidate pool against a
//! JD's requirement profile.
//!
//! The scoring policy is pluggable behind `Ranker`; the contract is fixed:
//! deterministic for identical inputs, monotonic in signal overlap, output
//! length equals partition length (top-K truncation is a caller concern),
//! and ties keep the partition's insertion order.

pub mod keyword;
pub mod llm;
pub mod profile;
mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::store::CandidateRow;
use crate::taxonomy::Category;

pub use keyword::KeywordRanker;
pub use llm::LlmRanker;
pub use profile::RequirementProfile;

/// One scored candidate in a ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: uuid::Uuid,
    pub name: String,
    /// 0–100; higher is a better fit.
    pub score: f32,
    pub rationale: String,
}

/// Ordered ranking of one category's pool against one JD.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub category: Category,
    pub classifier_confidence: f32,
    pub results: Vec<RankedCandidate>,
}

#[async_trait]
pub trait Ranker: Send + Sync {
    /// Scores every candidate against the profile and returns them in
    /// descending score order. An empty candidate slice yields an empty
    /// ranking; an empty profile is `InvalidInput`.
    async fn rank(
        &self,
        profile: &RequirementProfile,
        candidates: &[CandidateRow],
    ) -> Result<Vec<RankedCandidate>, AppError>;
}

/// Descending stable sort: equal scores keep the input (insertion) order,
/// which is the documented tie-break.
pub(crate) fn sort_ranked(ranked: &mut [RankedCandidate]) {
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
}
