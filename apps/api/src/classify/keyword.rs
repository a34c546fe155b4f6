//! Keyword classifier — pure-Rust lexicon scoring. Fast, deterministic, no
//! LLM call. The default backend, and the one the pipeline's correctness
//! tests run against.

use async_trait::async_trait;

use crate::classify::{require_nonempty, Classification, Classifier};
use crate::errors::AppError;
use crate::taxonomy::Category;

/// Distinctive signals per vertical, derived from the routing descriptions.
/// Single words are matched as whole tokens; phrases as substrings.
fn lexicon(category: Category) -> &'static [&'static str] {
    match category {
        Category::SoftwareDevelopment => &[
            "software", "developer", "programming", "engineer", "backend", "frontend",
            "full stack", "microservices", "devops", "qa", "java", "python", "rust",
            "javascript", "typescript", "django", "spring", "react", "api", "git",
            "mobile app", "web development", "kubernetes", "docker",
        ],
        Category::ItServices => &[
            "infrastructure", "network administration", "sysadmin", "cybersecurity",
            "security operations", "cloud computing", "technical support", "helpdesk",
            "help desk", "service desk", "itil", "data analysis", "data analyst",
            "system administrator", "it support", "it project",
        ],
        Category::Banking => &[
            "banking", "bank", "investment", "financial analysis", "financial analyst",
            "wealth management", "loan", "credit", "treasury", "trading", "portfolio",
            "retail banking", "corporate banking", "aml", "kyc",
        ],
        Category::Insurance => &[
            "insurance", "underwriting", "underwriter", "claims", "actuarial",
            "actuary", "policyholder", "premium", "risk assessment", "reinsurance",
        ],
        Category::Healthcare => &[
            "nurse", "nursing", "icu", "doctor", "physician", "medical", "clinical",
            "hospital", "patient", "healthcare", "pharmaceutical", "pharmacy",
            "surgeon", "therapist", "public health",
        ],
        Category::Travel => &[
            "travel", "tour", "tourism", "hospitality", "hotel", "airline", "flight",
            "resort", "booking", "guest services", "concierge", "cruise",
        ],
        Category::RealEstate => &[
            "real estate", "property management", "property manager", "leasing",
            "appraisal", "realtor", "broker", "tenant", "listing", "commercial property",
            "residential", "mortgage",
        ],
    }
}

/// Lexicon-based classifier. Confidence is the share of all lexicon hits won
/// by the best category; anything below `min_confidence` (or with zero hits)
/// is a refusal, never a default.
pub struct KeywordClassifier {
    min_confidence: f32,
}

impl KeywordClassifier {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    fn score(text: &str) -> Vec<(Category, Vec<&'static str>)> {
        let normalized = normalize(text);
        let tokens: std::collections::HashSet<&str> = normalized.split_whitespace().collect();

        Category::ALL
            .into_iter()
            .map(|category| {
                let hits: Vec<&'static str> = lexicon(category)
                    .iter()
                    .copied()
                    .filter(|term| {
                        if term.contains(' ') {
                            normalized.contains(term)
                        } else {
                            tokens.contains(term)
                        }
                    })
                    .collect();
                (category, hits)
            })
            .collect()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, AppError> {
        require_nonempty(text)?;

        let scored = Self::score(text);
        let total_hits: usize = scored.iter().map(|(_, hits)| hits.len()).sum();

        // Ties resolve to the earlier category in routing order, but a tie
        // also halves confidence, so close calls fall below the threshold.
        let mut best: Option<(Category, Vec<&'static str>)> = None;
        for (category, hits) in scored {
            let better = best
                .as_ref()
                .map_or(true, |(_, best_hits)| hits.len() > best_hits.len());
            if better {
                best = Some((category, hits));
            }
        }
        let (category, hits) = best.expect("taxonomy is non-empty");

        if hits.is_empty() {
            return Err(AppError::ClassificationFailed(
                "No taxonomy signals found in text".to_string(),
            ));
        }

        let confidence = hits.len() as f32 / total_hits as f32;
        if confidence < self.min_confidence {
            return Err(AppError::ClassificationFailed(format!(
                "Best category '{}' reached confidence {:.2}, below threshold {:.2}",
                category.key(),
                confidence,
                self.min_confidence
            )));
        }

        Ok(Classification {
            category,
            confidence,
            rationale: format!("matched signals: {}", hits.join(", ")),
        })
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
