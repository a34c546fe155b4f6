//! Keyword ranker — pure-Rust, deterministic overlap scoring. The default
//! backend, and the one the ranking contract's tests run against.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::rank::profile::{RequirementProfile, Seniority};
use crate::rank::{sort_ranked, RankedCandidate, Ranker};
use crate::store::CandidateRow;

/// Evidence strength per keyword: an exact skill-tag match beats a free-text
/// mention, which beats nothing.
const STRENGTH_TAG: f32 = 1.0;
const STRENGTH_TEXT: f32 = 0.6;

/// Weight of an agreeing seniority signal, counted as one extra matched
/// requirement when the JD states one.
const SENIORITY_WEIGHT: f32 = 1.0;

pub struct KeywordRanker;

impl KeywordRanker {
    /// Scores one candidate against the profile.
    ///
    /// score = 100 * sum(strength * weighted_score) / sum(weighted_score).
    /// Monotonic in overlap: adding a JD-matching signal to a profile can
    /// only raise a keyword's best strength, never lower another's.
    fn score_candidate(
        profile: &RequirementProfile,
        candidate: &CandidateRow,
    ) -> (f32, String) {
        let tags: Vec<String> = candidate
            .skills
            .split([',', ';'])
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        let full_text = candidate.profile_text().to_lowercase();

        let mut total_weight = 0.0_f32;
        let mut total_score = 0.0_f32;
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for req in &profile.keywords {
            total_weight += req.weighted_score;

            let strength = if tags.iter().any(|t| t == &req.keyword) {
                STRENGTH_TAG
            } else if full_text.contains(&req.keyword) {
                STRENGTH_TEXT
            } else {
                0.0
            };

            if strength > 0.0 {
                matched.push(req.keyword.as_str());
            } else {
                missing.push(req.keyword.as_str());
            }
            total_score += strength * req.weighted_score;
        }

        if let Some(wanted) = profile.seniority {
            total_weight += SENIORITY_WEIGHT;
            if candidate_seniority(candidate.experience_years) == wanted {
                total_score += SENIORITY_WEIGHT;
                matched.push("seniority");
            } else {
                missing.push("seniority");
            }
        }

        let score = if total_weight > 0.0 {
            (total_score / total_weight * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        (score, build_rationale(&matched, &missing))
    }
}

#[async_trait]
impl Ranker for KeywordRanker {
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

        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|candidate| {
                let (score, rationale) = Self::score_candidate(profile, candidate);
                RankedCandidate {
                    id: candidate.id,
                    name: candidate.name.clone(),
                    score,
                    rationale,
                }
            })
            .collect();

        sort_ranked(&mut ranked);
        Ok(ranked)
    }
}

/// Maps years of experience onto the JD seniority scale.
fn candidate_seniority(experience_years: i64) -> Seniority {
    if experience_years >= 5 {
        Seniority::Senior
    } else if experience_years >= 2 {
        Seniority::Mid
    } else {
        Seniority::Junior
    }
}

fn build_rationale(matched: &[&str], missing: &[&str]) -> String {
    let cap = |terms: &[&str]| terms.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
    match (matched.is_empty(), missing.is_empty()) {
        (true, _) => "no requirement signals matched".to_string(),
        (false, true) => format!("matched: {}", cap(matched)),
        (false, false) => format!("matched: {}; missing: {}", cap(matched), cap(missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn row(name: &str, skills: &str, years: i64) -> CandidateRow {
        CandidateRow {
            seq: 0,
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            current_role: "Engineer".to_string(),
            experience_years: years,
            skills: skills.to_string(),
            education: String::new(),
            location: String::new(),
            category: "software_development".to_string(),
            created_at: Utc::now(),
        }
    }

    fn profile(jd: &str) -> RequirementProfile {
        RequirementProfile::from_jd(jd).unwrap()
    }

    #[tokio::test]
    async fn test_better_overlap_ranks_higher() {
        let p = profile("Java microservices kubernetes");
        let strong = row("Strong", "java, microservices, kubernetes", 5);
        let weak = row("Weak", "java", 5);
        let ranked = KeywordRanker
            .rank(&p, &[weak.clone(), strong.clone()])
            .await
            .unwrap();
        assert_eq!(ranked[0].id, strong.id);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[tokio::test]
    async fn test_monotonic_in_signal_overlap() {
        let p = profile("Java microservices");
        let base = row("A", "java", 5);
        let augmented = row("A", "java, microservices", 5);
        let (base_score, _) = KeywordRanker::score_candidate(&p, &base);
        let (aug_score, _) = KeywordRanker::score_candidate(&p, &augmented);
        assert!(aug_score >= base_score);
    }

    #[tokio::test]
    async fn test_deterministic_scores_and_order() {
        let p = profile("Java microservices kubernetes");
        let pool = vec![
            row("A", "java, docker", 3),
            row("B", "microservices", 7),
            row("C", "kubernetes, java", 4),
        ];
        let first = KeywordRanker.rank(&p, &pool).await.unwrap();
        let second = KeywordRanker.rank(&p, &pool).await.unwrap();
        let ids1: Vec<_> = first.iter().map(|r| r.id).collect();
        let ids2: Vec<_> = second.iter().map(|r| r.id).collect();
        assert_eq!(ids1, ids2);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.score, b.score);
        }
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let p = profile("Java");
        let first = row("First", "java", 5);
        let second = row("Second", "java", 5);
        let ranked = KeywordRanker
            .rank(&p, &[first.clone(), second.clone()])
            .await
            .unwrap();
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].id, first.id);
        assert_eq!(ranked[1].id, second.id);
    }

    #[tokio::test]
    async fn test_tag_match_beats_text_match() {
        let p = profile("kubernetes");
        let tagged = row("Tagged", "kubernetes", 5);
        let mut textual = row("Textual", "docker", 5);
        textual.current_role = "Kubernetes platform engineer".to_string();
        let (tag_score, _) = KeywordRanker::score_candidate(&p, &tagged);
        let (text_score, _) = KeywordRanker::score_candidate(&p, &textual);
        assert!(tag_score > text_score);
        assert!(text_score > 0.0);
    }

    #[tokio::test]
    async fn test_seniority_agreement_raises_score() {
        let p = profile("Senior Java engineer");
        let senior = row("Senior", "java", 8);
        let junior = row("Junior", "java", 1);
        let (senior_score, _) = KeywordRanker::score_candidate(&p, &senior);
        let (junior_score, _) = KeywordRanker::score_candidate(&p, &junior);
        assert!(senior_score > junior_score);
    }

    #[tokio::test]
    async fn test_empty_pool_yields_empty_ranking() {
        let p = profile("Java");
        let ranked = KeywordRanker.rank(&p, &[]).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_output_size_equals_pool_size() {
        let p = profile("Java");
        let pool = vec![row("A", "java", 5), row("B", "cobol", 20), row("C", "", 0)];
        let ranked = KeywordRanker.rank(&p, &pool).await.unwrap();
        assert_eq!(ranked.len(), pool.len());
    }

    #[tokio::test]
    async fn test_scores_bounded_0_to_100() {
        let p = profile("Java");
        let pool = vec![row("A", "java", 5), row("B", "cobol", 20)];
        for r in KeywordRanker.rank(&p, &pool).await.unwrap() {
            assert!((0.0..=100.0).contains(&r.score), "score {}", r.score);
        }
    }

    #[tokio::test]
    async fn test_rationale_names_matched_and_missing() {
        let p = profile("Java kubernetes");
        let (_, rationale) = KeywordRanker::score_candidate(&p, &row("A", "java", 5));
        assert!(rationale.contains("matched: java"));
        assert!(rationale.contains("kubernetes"));
    }
}
