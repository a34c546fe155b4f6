//! Requirement profile — deterministic extraction of weighted keywords and
//! seniority from raw JD text.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Position weights by JD section: title lines carry the strongest signal,
/// boilerplate "about us" copy the weakest.
const WEIGHT_TITLE: f32 = 1.0;
const WEIGHT_REQUIREMENTS: f32 = 0.8;
const WEIGHT_RESPONSIBILITIES: f32 = 0.6;
const WEIGHT_ABOUT: f32 = 0.3;

/// A single keyword requirement, weighted by frequency and position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRequirement {
    pub keyword: String,
    pub frequency: u32,
    /// Highest position weight the keyword was seen at.
    pub weight: f32,
    /// frequency * weight
    pub weighted_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
}

/// Structured requirement profile of a JD. Transient: derived per query,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub keywords: Vec<KeywordRequirement>,
    pub seniority: Option<Seniority>,
}

impl RequirementProfile {
    /// Derives a profile from raw JD text. Fails with `InvalidInput` when
    /// the text is empty or yields no usable keywords.
    pub fn from_jd(jd_text: &str) -> Result<Self, AppError> {
        if jd_text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "JD text cannot be empty".to_string(),
            ));
        }

        let mut seen_title = false;
        let mut section_weight = WEIGHT_REQUIREMENTS;
        // keyword -> (frequency, max weight), insertion-ordered
        let mut inventory: Vec<(String, u32, f32)> = Vec::new();

        for line in jd_text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let weight = if !seen_title {
                seen_title = true;
                WEIGHT_TITLE
            } else {
                if let Some(w) = section_weight_for(trimmed) {
                    section_weight = w;
                }
                section_weight
            };

            for token in tokenize(trimmed) {
                match inventory.iter_mut().find(|(k, _, _)| *k == token) {
                    Some((_, freq, max_w)) => {
                        *freq += 1;
                        if weight > *max_w {
                            *max_w = weight;
                        }
                    }
                    None => inventory.push((token, 1, weight)),
                }
            }
        }

        let keywords: Vec<KeywordRequirement> = inventory
            .into_iter()
            .map(|(keyword, frequency, weight)| KeywordRequirement {
                keyword,
                frequency,
                weight,
                weighted_score: frequency as f32 * weight,
            })
            .collect();

        if keywords.is_empty() {
            return Err(AppError::InvalidInput(
                "JD text contains no usable requirement signals".to_string(),
            ));
        }

        let seniority = detect_seniority(jd_text);

        Ok(RequirementProfile {
            keywords,
            seniority,
        })
    }
}

/// Detects a section heading and returns its weight, or None if the line is
/// not a heading.
fn section_weight_for(line: &str) -> Option<f32> {
    let lower = line.to_lowercase();
    if lower.starts_with("required")
        || lower.starts_with("requirements")
        || lower.starts_with("qualifications")
        || lower.starts_with("must have")
    {
        Some(WEIGHT_REQUIREMENTS)
    } else if lower.starts_with("responsibilities") || lower.starts_with("you will") {
        Some(WEIGHT_RESPONSIBILITIES)
    } else if lower.starts_with("about") {
        Some(WEIGHT_ABOUT)
    } else {
        None
    }
}

fn detect_seniority(text: &str) -> Option<Seniority> {
    let lower = text.to_lowercase();
    let has = |needle: &str| {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|t| t == needle)
    };
    if has("senior") || has("staff") || has("principal") || has("lead") {
        Some(Seniority::Senior)
    } else if has("junior") || has("entry") || has("intern") || has("graduate") {
        Some(Seniority::Junior)
    } else if has("mid") || has("intermediate") {
        Some(Seniority::Mid)
    } else {
        None
    }
}

/// Lowercased alphanumeric tokens with stopwords and short noise removed.
fn tokenize(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && !is_stopword(t))
        .map(String::from)
        .collect()
}

fn is_stopword(token: &str) -> bool {
    const STOPWORDS: &[&str] = &[
        "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
        "it", "of", "on", "or", "our", "that", "the", "to", "we", "will", "with", "you", "your",
        "years", "year", "yrs", "experience", "role", "team", "join", "looking", "ideal",
        "candidate", "strong", "ability", "skills", "work", "working", "plus", "etc",
    ];
    STOPWORDS.contains(&token)
}
