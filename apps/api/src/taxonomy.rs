//! Category Taxonomy — the fixed set of industry verticals candidates and
//! JDs are routed into.
//!
//! The set is closed: adding a vertical is a code change plus a partition
//! backfill, never a runtime operation. Every classification and partition
//! site matches exhaustively on `Category`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One of the 7 supported industry verticals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SoftwareDevelopment,
    ItServices,
    Banking,
    Insurance,
    Healthcare,
    Travel,
    RealEstate,
}

impl Category {
    /// All categories, in fixed routing order.
    pub const ALL: [Category; 7] = [
        Category::SoftwareDevelopment,
        Category::ItServices,
        Category::Banking,
        Category::Insurance,
        Category::Healthcare,
        Category::Travel,
        Category::RealEstate,
    ];

    /// Stable snake_case key. Doubles as the partition identifier in the
    /// candidate store and the routing key in the API. Must stay in sync
    /// with the serde representation.
    pub fn key(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "software_development",
            Category::ItServices => "it_services",
            Category::Banking => "banking",
            Category::Insurance => "insurance",
            Category::Healthcare => "healthcare",
            Category::Travel => "travel",
            Category::RealEstate => "real_estate",
        }
    }

    /// Human-readable display name, as used in classifier prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "Software Development",
            Category::ItServices => "IT Services",
            Category::Banking => "Banking",
            Category::Insurance => "Insurance",
            Category::Healthcare => "Healthcare",
            Category::Travel => "Travel",
            Category::RealEstate => "Real Estate",
        }
    }

    /// Routing description: what belongs in this vertical. Fed to the LLM
    /// classifier prompt and exposed on the categories endpoint.
    pub fn description(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => {
                "Software engineering, programming, web and mobile development, \
                 quality assurance, DevOps, and other roles focused on building \
                 and maintaining software"
            }
            Category::ItServices => {
                "IT infrastructure, network administration, cybersecurity, data \
                 analysis, cloud computing, technical support, and IT project \
                 management"
            }
            Category::Banking => {
                "Retail, corporate, and investment banking, financial analysis, \
                 wealth management, risk management, and compliance"
            }
            Category::Insurance => {
                "Underwriting, claims processing, actuarial science, insurance \
                 sales, and risk assessment"
            }
            Category::Healthcare => {
                "Medical professionals, allied health, hospital administration, \
                 public health, pharmaceutical roles, and medical research"
            }
            Category::Travel => {
                "Travel planning, tour operations, hospitality management, \
                 airline staff, hotel management, and tourism marketing"
            }
            Category::RealEstate => {
                "Real estate sales, property management, development, commercial \
                 real estate, appraisal, and leasing"
            }
        }
    }

    /// Resolves a display name as returned by the LLM classifier
    /// (case-insensitive, surrounding whitespace ignored).
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name) || c.key().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown category '{s}'")))
    }
}
