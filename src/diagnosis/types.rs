//! Result types of the pre-generation diagnosis.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStatus {
    /// Nothing blocks schedule generation.
    Ok,
    /// Generation can run but violations are likely.
    Warning,
    /// The configuration itself is broken.
    Error,
}

/// Supply vs demand for one time slot, in staff-days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotBalance {
    pub supply: i64,
    pub demand: i64,
    /// Positive = surplus, negative = shortfall.
    pub balance: i64,
    /// Rounded percent; 100 when nothing is demanded. May exceed 100.
    pub fulfillment_rate: i64,
}

/// Whole-month supply/demand picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyDemandBalance {
    pub total_supply: i64,
    pub total_demand: i64,
    pub balance: i64,
    pub by_time_slot: BTreeMap<String, TimeSlotBalance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueCategory {
    Supply,
    TimeSlot,
    Leave,
    Other,
}

/// A detected configuration problem. Ids are deterministic so identical
/// inputs diagnose identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisIssue {
    pub id: String,
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_staff: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSuggestion {
    pub priority: SuggestionPriority,
    pub action: String,
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_staff: Option<String>,
}

/// Full diagnosis output. Apart from `executed_at` this is a pure function
/// of the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub status: DiagnosisStatus,
    pub summary: String,
    pub supply_demand_balance: SupplyDemandBalance,
    pub issues: Vec<DiagnosisIssue>,
    pub suggestions: Vec<DiagnosisSuggestion>,
    pub executed_at: DateTime<Utc>,
}
