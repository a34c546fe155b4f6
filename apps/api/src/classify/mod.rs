//! Classifier — maps an arbitrary profile or JD text to exactly one taxonomy
//! category, or refuses.
//!
//! Both ingestion and JD queries go through the same `Classifier` instance,
//! so a candidate profile and a JD describing the same role land in the same
//! partition. That consistency is the property the routing pipeline depends
//! on; never wire different backends into the two call sites.

pub mod keyword;
pub mod llm;
mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::taxonomy::Category;

pub use keyword::KeywordClassifier;
pub use llm::LlmClassifier;

/// Outcome of a successful classification. Confidence and rationale are
/// opaque to downstream components beyond logging and API echoes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub confidence: f32,
    pub rationale: String,
}

/// The classification capability. Pure function of the input text and the
/// fixed taxonomy: no state between calls.
///
/// Implementations must return `InvalidInput` for empty text and
/// `ClassificationFailed` when no category is reachable with acceptable
/// confidence — never silently default to one.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, AppError>;
}

/// Shared input guard for all backends.
pub(crate) fn require_nonempty(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Cannot classify empty text".to_string(),
        ));
    }
    Ok(())
}
