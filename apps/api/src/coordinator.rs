//! Coordinator — sequences classifier, candidate store, and ranking engine.
//!
//! One JD query is a single sequential pass: classify the JD, fetch that
//! category's partition, rank it. Batch ingestion classifies and inserts
//! record by record; one bad record never aborts the batch. External
//! capability calls (classify, rank) are bounded by a timeout; the core
//! never retries — retry policy belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::errors::AppError;
use crate::rank::{RankedResult, Ranker, RequirementProfile};
use crate::store::{CandidateStore, NewCandidate};
use crate::taxonomy::Category;

/// Result of ingesting a single candidate.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub id: Uuid,
    pub category: Category,
    pub confidence: f32,
}

/// Per-record outcome of a batch ingestion. Errors carry the stable error
/// code so the driving collaborator can triage without parsing messages.
#[derive(Debug, Serialize)]
pub struct BatchItemOutcome {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchItemError>,
}

#[derive(Debug, Serialize)]
pub struct BatchItemError {
    pub code: &'static str,
    pub message: String,
}

#[derive(Clone)]
pub struct Coordinator {
    store: CandidateStore,
    classifier: Arc<dyn Classifier>,
    ranker: Arc<dyn Ranker>,
    capability_timeout: Duration,
}

impl Coordinator {
    pub fn new(
        store: CandidateStore,
        classifier: Arc<dyn Classifier>,
        ranker: Arc<dyn Ranker>,
        capability_timeout: Duration,
    ) -> Self {
        Self {
            store,
            classifier,
            ranker,
            capability_timeout,
        }
    }

    /// The single query entry point of the core: JD text in, ordered
    /// ranking of the matching partition out.
    ///
    /// `InvalidInput` and `ClassificationFailed` surface before any store
    /// access; an empty partition is a valid empty result.
    pub async fn rank_candidates_for_jd(&self, jd_text: &str) -> Result<RankedResult, AppError> {
        if jd_text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "JD text cannot be empty".to_string(),
            ));
        }

        let profile = RequirementProfile::from_jd(jd_text)?;
        let classification = self
            .bounded("classify", self.classifier.classify(jd_text))
            .await?;

        info!(
            "JD routed to '{}' (confidence {:.2})",
            classification.category.key(),
            classification.confidence
        );

        let partition = self.store.fetch_partition(classification.category).await?;
        let results = self
            .bounded("rank", self.ranker.rank(&profile, &partition))
            .await?;

        Ok(RankedResult {
            category: classification.category,
            classifier_confidence: classification.confidence,
            results,
        })
    }

    /// Classifies one candidate's profile and inserts it into the matching
    /// partition. The category is assigned here, exactly once.
    pub async fn ingest_candidate(
        &self,
        candidate: &NewCandidate,
    ) -> Result<IngestOutcome, AppError> {
        let classification = self
            .bounded("classify", self.classifier.classify(&candidate.profile_text()))
            .await?;

        self.store.insert(candidate, classification.category).await?;

        info!(
            "Ingested candidate {} into '{}' ({})",
            candidate.id,
            classification.category.key(),
            classification.rationale
        );

        Ok(IngestOutcome {
            id: candidate.id,
            category: classification.category,
            confidence: classification.confidence,
        })
    }

    /// Ingests a batch, collecting a per-record outcome for each entry.
    /// Record failures are independent; the batch itself never fails.
    pub async fn ingest_batch(&self, candidates: &[NewCandidate]) -> Vec<BatchItemOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let outcome = match self.ingest_candidate(candidate).await {
                Ok(ok) => BatchItemOutcome {
                    id: candidate.id,
                    category: Some(ok.category),
                    error: None,
                },
                Err(e) => {
                    warn!("Batch ingest: candidate {} failed: {e}", candidate.id);
                    BatchItemOutcome {
                        id: candidate.id,
                        category: None,
                        error: Some(BatchItemError {
                            code: e.code(),
                            message: e.to_string(),
                        }),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Runs an external capability call under the configured time budget.
    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl std::future::Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.capability_timeout, fut)
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{what} exceeded its {}s budget",
                    self.capability_timeout.as_secs()
                ))
            })?
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::classify::{Classification, KeywordClassifier};
    use crate::db::test_pool;
    use crate::rank::{KeywordRanker, RankedCandidate};
    use crate::store::CandidateRow;

    /// Deterministic classifier stub: always answers with a fixed category,
    /// counting invocations.
    struct FixedClassifier {
        category: Category,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(category: Category) -> Self {
            Self {
                category,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(&self, text: &str) -> Result<Classification, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            crate::classify::require_nonempty(text)?;
            Ok(Classification {
                category: self.category,
                confidence: 1.0,
                rationale: "stub".to_string(),
            })
        }
    }

    /// Classifier stub that refuses everything.
    struct RefusingClassifier;

    #[async_trait]
    impl Classifier for RefusingClassifier {
        async fn classify(&self, _text: &str) -> Result<Classification, AppError> {
            Err(AppError::ClassificationFailed("stub refusal".to_string()))
        }
    }

    /// Classifier stub that never answers within any budget.
    struct HangingClassifier;

    #[async_trait]
    impl Classifier for HangingClassifier {
        async fn classify(&self, _text: &str) -> Result<Classification, AppError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("sleep outlives every test budget")
        }
    }

    /// Ranker stub: scores by skills length, descending.
    struct LengthRanker;

    #[async_trait]
    impl Ranker for LengthRanker {
        async fn rank(
            &self,
            _profile: &RequirementProfile,
            candidates: &[CandidateRow],
        ) -> Result<Vec<RankedCandidate>, AppError> {
            let mut ranked: Vec<RankedCandidate> = candidates
                .iter()
                .map(|c| RankedCandidate {
                    id: c.id,
                    name: c.name.clone(),
                    score: c.skills.len() as f32,
                    rationale: String::new(),
                })
                .collect();
            crate::rank::sort_ranked(&mut ranked);
            Ok(ranked)
        }
    }

    fn candidate(skills: &str, years: i64) -> NewCandidate {
        NewCandidate {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            current_role: "Engineer".to_string(),
            experience_years: years,
            skills: skills.to_string(),
            education: String::new(),
            location: String::new(),
        }
    }

    async fn coordinator(
        classifier: Arc<dyn Classifier>,
        ranker: Arc<dyn Ranker>,
    ) -> Coordinator {
        Coordinator::new(
            CandidateStore::new(test_pool().await),
            classifier,
            ranker,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_empty_jd_fails_before_classification_or_store() {
        let classifier = Arc::new(FixedClassifier::new(Category::Banking));
        let coord = coordinator(classifier.clone(), Arc::new(LengthRanker)).await;

        let err = coord.rank_candidates_for_jd("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classification_failure_propagates_without_store_query() {
        let coord = coordinator(Arc::new(RefusingClassifier), Arc::new(LengthRanker)).await;
        let err = coord
            .rank_candidates_for_jd("Senior underwriter, claims")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ClassificationFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_partition_returns_empty_result() {
        let coord = coordinator(
            Arc::new(FixedClassifier::new(Category::Travel)),
            Arc::new(LengthRanker),
        )
        .await;
        let result = coord
            .rank_candidates_for_jd("Tour operations manager")
            .await
            .unwrap();
        assert_eq!(result.category, Category::Travel);
        assert!(result.results.is_empty());
    }

    #[tokio::test]
    async fn test_hanging_classifier_times_out() {
        let coord = Coordinator::new(
            CandidateStore::new(test_pool().await),
            Arc::new(HangingClassifier),
            Arc::new(LengthRanker),
            Duration::from_secs(2),
        );
        let err = coord
            .rank_candidates_for_jd("Senior Java engineer")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_batch_failures_are_independent() {
        let coord = coordinator(
            Arc::new(FixedClassifier::new(Category::Insurance)),
            Arc::new(LengthRanker),
        )
        .await;

        let good = candidate("underwriting", 5);
        let duplicate = NewCandidate {
            id: good.id,
            ..candidate("claims", 3)
        };
        let also_good = candidate("actuarial", 7);

        let outcomes = coord
            .ingest_batch(&[good.clone(), duplicate, also_good.clone()])
            .await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].error.is_none());
        assert_eq!(
            outcomes[1].error.as_ref().unwrap().code,
            "DUPLICATE_IDENTIFIER"
        );
        assert!(outcomes[2].error.is_none());

        // The two distinct records landed despite the failure in between.
        let partition = coord
            .store()
            .fetch_partition(Category::Insurance)
            .await
            .unwrap();
        assert_eq!(partition.len(), 2);
    }

    /// End-to-end with the real keyword backends: Java candidates and a
    /// nurse are partitioned apart, and a backend JD only ever sees the
    /// software pool.
    #[tokio::test]
    async fn test_end_to_end_routing_and_ranking() {
        let coord = Coordinator::new(
            CandidateStore::new(test_pool().await),
            Arc::new(KeywordClassifier::new(0.35)),
            Arc::new(KeywordRanker),
            Duration::from_secs(5),
        );

        let c1 = NewCandidate {
            id: Uuid::new_v4(),
            name: "C1".to_string(),
            email: "c1@example.com".to_string(),
            current_role: "Backend developer".to_string(),
            experience_years: 5,
            skills: "java, spring boot".to_string(),
            education: String::new(),
            location: String::new(),
        };
        let c2 = NewCandidate {
            id: Uuid::new_v4(),
            name: "C2".to_string(),
            email: "c2@example.com".to_string(),
            current_role: "ICU nurse".to_string(),
            experience_years: 10,
            skills: "icu, clinical care".to_string(),
            education: String::new(),
            location: String::new(),
        };

        let out1 = coord.ingest_candidate(&c1).await.unwrap();
        let out2 = coord.ingest_candidate(&c2).await.unwrap();
        assert_eq!(out1.category, Category::SoftwareDevelopment);
        assert_eq!(out2.category, Category::Healthcare);

        let result = coord
            .rank_candidates_for_jd("Senior backend engineer, Java, microservices")
            .await
            .unwrap();
        assert_eq!(result.category, Category::SoftwareDevelopment);
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].id, c1.id);
        assert!(result.results[0].score > 0.0);
    }
}
