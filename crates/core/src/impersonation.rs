//! Impersonation alert domain logic.
//!
//! Risk buckets derived from the detector's numeric score, plus the verdict
//! vocabulary for reviewed alerts. No database access -- pure domain logic.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Verdict constants
// ---------------------------------------------------------------------------

pub const VERDICT_CONFIRMED: &str = "confirmed";
pub const VERDICT_FALSE_POSITIVE: &str = "false_positive";
pub const VERDICT_IGNORED: &str = "ignored";
pub const VALID_VERDICTS: &[&str] = &[VERDICT_CONFIRMED, VERDICT_FALSE_POSITIVE, VERDICT_IGNORED];

/// Validate that `verdict` is one of the allowed verdicts.
pub fn validate_verdict(verdict: &str) -> Result<(), CoreError> {
    if VALID_VERDICTS.contains(&verdict) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "invalid verdict '{verdict}', expected one of: {}",
            VALID_VERDICTS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

/// Score threshold at or above which an alert is bucketed medium.
pub const MEDIUM_SCORE_THRESHOLD: i32 = 40;
/// Score threshold at or above which an alert is bucketed high.
pub const HIGH_SCORE_THRESHOLD: i32 = 60;
/// Score threshold at or above which an alert is bucketed critical.
pub const CRITICAL_SCORE_THRESHOLD: i32 = 80;

/// Triage bucket derived from an alert's total score.
///
/// The discriminant order matters: pending alerts are triaged most severe
/// first, and the stored rank mirrors this ordering so the database can sort
/// without re-deriving buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a detector score.
    pub fn from_score(total_score: i32) -> Self {
        if total_score >= CRITICAL_SCORE_THRESHOLD {
            RiskLevel::Critical
        } else if total_score >= HIGH_SCORE_THRESHOLD {
            RiskLevel::High
        } else if total_score >= MEDIUM_SCORE_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Stored rank (1 = low .. 4 = critical), used for ORDER BY.
    pub fn rank(self) -> i16 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }

    /// Rebuild a bucket from its stored rank.
    pub fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            1 => Some(RiskLevel::Low),
            2 => Some(RiskLevel::Medium),
            3 => Some(RiskLevel::High),
            4 => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}
