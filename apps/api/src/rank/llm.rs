//! LLM ranker — delegates scoring to Claude, then validates the answer
//! against the partition: ids must come from the pool, every candidate gets
//! a score, and the final order is re-sorted locally so the tie-break stays
//! the store's insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::rank::prompts::{RANK_PROMPT_TEMPLATE, RANK_SYSTEM};
use crate::rank::{sort_ranked, RankedCandidate, Ranker, RequirementProfile};
use crate::store::CandidateRow;

#[derive(Debug, Deserialize)]
struct LlmRankEntry {
    id: Uuid,
    score: f32,
    #[serde(default)]
    rationale: String,
}

pub struct LlmRanker {
    llm: LlmClient,
}

impl LlmRanker {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    fn build_prompt(profile: &RequirementProfile, candidates: &[CandidateRow]) -> String {
        let requirements = profile
            .keywords
            .iter()
            .map(|k| format!("- {} ({:.1})", k.keyword, k.weighted_score))
            .collect::<Vec<_>>()
            .join("\n");

        let candidates = candidates
            .iter()
            .map(|c| {
                format!(
                    "- id: {} | {} | {} | {} years | skills: {} | {} {}",
                    c.id, c.name, c.current_role, c.experience_years, c.skills, c.education,
                    c.location
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        RANK_PROMPT_TEMPLATE
            .replace("{requirements}", &requirements)
            .replace("{candidates}", &candidates)
    }

    /// Merges model scores back onto the partition. Unknown ids are an LLM
    /// contract violation; candidates the model skipped score 0.0 so the
    /// output length still equals the partition length.
    fn merge(
        entries: Vec<LlmRankEntry>,
        candidates: &[CandidateRow],
    ) -> Result<Vec<RankedCandidate>, AppError> {
        let mut by_id: HashMap<Uuid, LlmRankEntry> = HashMap::with_capacity(entries.len());
        for entry in entries {
            if !candidates.iter().any(|c| c.id == entry.id) {
                return Err(AppError::Llm(format!(
                    "Ranker returned unknown candidate id {}",
                    entry.id
                )));
            }
            by_id.insert(entry.id, entry);
        }

        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|candidate| match by_id.remove(&candidate.id) {
                Some(entry) => RankedCandidate {
                    id: candidate.id,
                    name: candidate.name.clone(),
                    score: entry.score.clamp(0.0, 100.0),
                    rationale: entry.rationale,
                },
                None => {
                    warn!("LLM ranker omitted candidate {}; scoring 0", candidate.id);
                    RankedCandidate {
                        id: candidate.id,
                        name: candidate.name.clone(),
                        score: 0.0,
                        rationale: "not scored by ranking backend".to_string(),
                    }
                }
            })
            .collect();

        sort_ranked(&mut ranked);
        Ok(ranked)
    }
}

#[async_trait]
impl Ranker for LlmRanker {
    async fn rank(
        &self,
        profile: &RequirementProfile,
        candidates: &[CandidateRow],
    ) -> Result<Vec<RankedCandidate>, AppError> {
        if profile.keywords.is_empty() {
            return Err(AppError::InvalidInput(
                "Requirement profile has no keywords".to_string(),
            ));
        }
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = Self::build_prompt(profile, candidates);
        let entries: Vec<LlmRankEntry> = self
            .llm
            .call_json(&prompt, RANK_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Ranking call failed: {e}")))?;

        Self::merge(entries, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(name: &str, skills: &str) -> CandidateRow {
        CandidateRow {
            seq: 0,
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            current_role: "Engineer".to_string(),
            experience_years: 5,
            skills: skills.to_string(),
            education: String::new(),
            location: String::new(),
            category: "software_development".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_contains_requirements_and_candidate_ids() {
        let profile = RequirementProfile::from_jd("Senior Java engineer").unwrap();
        let pool = vec![row("Alice", "java"), row("Bob", "rust")];
        let prompt = LlmRanker::build_prompt(&profile, &pool);
        assert!(prompt.contains("java"));
        assert!(prompt.contains(&pool[0].id.to_string()));
        assert!(prompt.contains(&pool[1].id.to_string()));
    }

    #[test]
    fn test_merge_sorts_descending() {
        let pool = vec![row("Alice", "java"), row("Bob", "rust")];
        let entries = vec![
            LlmRankEntry {
                id: pool[0].id,
                score: 40.0,
                rationale: String::new(),
            },
            LlmRankEntry {
                id: pool[1].id,
                score: 90.0,
                rationale: String::new(),
            },
        ];
        let ranked = LlmRanker::merge(entries, &pool).unwrap();
        assert_eq!(ranked[0].id, pool[1].id);
        assert_eq!(ranked[1].id, pool[0].id);
    }

    #[test]
    fn test_merge_rejects_unknown_id() {
        let pool = vec![row("Alice", "java")];
        let entries = vec![LlmRankEntry {
            id: Uuid::new_v4(),
            score: 50.0,
            rationale: String::new(),
        }];
        let err = LlmRanker::merge(entries, &pool).unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[test]
    fn test_merge_fills_omitted_candidates_with_zero() {
        let pool = vec![row("Alice", "java"), row("Bob", "rust")];
        let entries = vec![LlmRankEntry {
            id: pool[0].id,
            score: 80.0,
            rationale: String::new(),
        }];
        let ranked = LlmRanker::merge(entries, &pool).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].id, pool[1].id);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_merge_clamps_out_of_range_scores() {
        let pool = vec![row("Alice", "java")];
        let entries = vec![LlmRankEntry {
            id: pool[0].id,
            score: 250.0,
            rationale: String::new(),
        }];
        let ranked = LlmRanker::merge(entries, &pool).unwrap();
        assert_eq!(ranked[0].score, 100.0);
    }
}
