//! LLM classifier — delegates the categorical decision to Claude, then
//! validates the answer against the fixed taxonomy.
//!
//! An answer outside the taxonomy or below the confidence threshold is a
//! `ClassificationFailed`, never a silent default: callers own the fallback
//! policy (reject, queue for manual review).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::classify::prompts::{CLASSIFY_PROMPT_TEMPLATE, CLASSIFY_SYSTEM};
use crate::classify::{require_nonempty, Classification, Classifier};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::taxonomy::Category;

/// Raw decision shape returned by the model.
#[derive(Debug, Deserialize)]
pub struct LlmDecision {
    pub category: String,
    pub confidence: f32,
    #[serde(default)]
    pub rationale: String,
}

pub struct LlmClassifier {
    llm: LlmClient,
    min_confidence: f32,
}

impl LlmClassifier {
    pub fn new(llm: LlmClient, min_confidence: f32) -> Self {
        Self {
            llm,
            min_confidence,
        }
    }

    fn build_prompt(text: &str) -> String {
        let categories = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}: {}", i + 1, c.name(), c.description()))
            .collect::<Vec<_>>()
            .join("\n");
        CLASSIFY_PROMPT_TEMPLATE
            .replace("{categories}", &categories)
            .replace("{text}", text)
    }

    /// Validates a raw model decision against the taxonomy and threshold.
    fn validate(&self, decision: LlmDecision) -> Result<Classification, AppError> {
        let category = Category::from_name(&decision.category).ok_or_else(|| {
            AppError::ClassificationFailed(format!(
                "LLM returned a category outside the taxonomy: '{}'",
                decision.category
            ))
        })?;

        if decision.confidence < self.min_confidence {
            return Err(AppError::ClassificationFailed(format!(
                "LLM confidence {:.2} for '{}' is below threshold {:.2}",
                decision.confidence,
                category.key(),
                self.min_confidence
            )));
        }

        Ok(Classification {
            category,
            confidence: decision.confidence.clamp(0.0, 1.0),
            rationale: decision.rationale,
        })
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, AppError> {
        require_nonempty(text)?;

        let prompt = Self::build_prompt(text);
        let decision: LlmDecision = self
            .llm
            .call_json(&prompt, CLASSIFY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Classification call failed: {e}")))?;

        debug!(
            "LLM classification: category='{}' confidence={:.2}",
            decision.category, decision.confidence
        );

        self.validate(decision)
    }
}
