//! Pre-generation diagnosis: estimate supply vs demand for a month,
//! detect configuration problems, and propose fixes before any schedule
//! is generated.

mod issues;
mod suggestions;
mod supply;
mod types;

pub use issues::detect_issues;
pub use suggestions::generate_suggestions;
pub use supply::{
    calculate_business_days, calculate_supply_demand_balance, staff_monthly_days,
    WEEKS_PER_MONTH_SUPPLY,
};
pub use types::{
    DiagnosisIssue, DiagnosisResult, DiagnosisStatus, DiagnosisSuggestion, IssueCategory,
    IssueSeverity, SuggestionPriority, SupplyDemandBalance, TimeSlotBalance,
};

use chrono::Utc;

use crate::model::{LeaveRequests, ShiftRequirement, Staff};

/// Shortfall beyond 30% of total demand makes the whole configuration
/// unschedulable, independent of individual issues.
const CRITICAL_SHORTFALL_RATIO: f64 = 0.3;

/// Run the full diagnosis for one target month.
///
/// Apart from the `executed_at` timestamp, the result is a pure function of
/// its inputs; running it twice on the same data yields identical issues,
/// suggestions and status.
pub fn diagnose(
    staff_list: &[Staff],
    requirements: &ShiftRequirement,
    leave_requests: &LeaveRequests,
) -> DiagnosisResult {
    let business_days = calculate_business_days(requirements);
    let balance = calculate_supply_demand_balance(staff_list, requirements, business_days);
    let issues = detect_issues(staff_list, requirements, leave_requests, &balance);
    let suggestions = generate_suggestions(staff_list, &balance, &issues);
    let status = determine_status(&balance, &issues);
    let summary = generate_summary(status, &balance, &issues);

    DiagnosisResult {
        status,
        summary,
        supply_demand_balance: balance,
        issues,
        suggestions,
        executed_at: Utc::now(),
    }
}

fn determine_status(balance: &SupplyDemandBalance, issues: &[DiagnosisIssue]) -> DiagnosisStatus {
    if (balance.balance as f64) < -(balance.total_demand as f64 * CRITICAL_SHORTFALL_RATIO) {
        return DiagnosisStatus::Error;
    }

    let has_blocking_issue = issues.iter().any(|issue| {
        issue.severity == IssueSeverity::High && issue.category != IssueCategory::TimeSlot
    });
    if has_blocking_issue {
        return DiagnosisStatus::Error;
    }

    if !issues.is_empty() {
        return DiagnosisStatus::Warning;
    }

    DiagnosisStatus::Ok
}

fn generate_summary(
    status: DiagnosisStatus,
    balance: &SupplyDemandBalance,
    issues: &[DiagnosisIssue],
) -> String {
    match status {
        DiagnosisStatus::Ok => format!(
            "Supply covers demand ({} vs {} staff-days); schedule generation can proceed.",
            balance.total_supply, balance.total_demand
        ),
        DiagnosisStatus::Warning => {
            let slot_issues = issues
                .iter()
                .filter(|i| i.category == IssueCategory::TimeSlot)
                .count();
            if slot_issues > 0 {
                format!(
                    "{} issue(s) found, {} affecting time-slot coverage; generation \
                     is possible but some slots will be hard to fill.",
                    issues.len(),
                    slot_issues
                )
            } else {
                format!(
                    "{} issue(s) found; generation is possible but review is recommended.",
                    issues.len()
                )
            }
        }
        DiagnosisStatus::Error => {
            if balance.balance < 0 {
                format!(
                    "Supply falls {} staff-days short of demand ({} vs {}); \
                     fix staffing or requirements before generating.",
                    balance.balance.abs(),
                    balance.total_supply,
                    balance.total_demand
                )
            } else {
                "Critical issues found; fix the configuration before generating.".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        EmploymentType, Month, Role, SlotRequirement, StaffId, TimeSlotDefinition,
        TimeSlotPreference, WeeklyWorkCount,
    };
    use std::collections::BTreeMap;

    fn staff(id: &str, hope: u32, preference: TimeSlotPreference) -> Staff {
        Staff {
            id: StaffId::new(id),
            name: format!("staff-{id}"),
            role: Role::CareWorker,
            qualifications: vec![],
            weekly_work_count: WeeklyWorkCount { hope, must: hope.min(4) },
            max_consecutive_work_days: 5,
            available_weekdays: vec![],
            unavailable_dates: vec![],
            time_slot_preference: preference,
            is_night_shift_only: false,
            employment_type: EmploymentType::A,
            weekly_contract_hours: None,
        }
    }

    fn requirement(slots: &[(&str, u32)]) -> ShiftRequirement {
        let mut requirements = BTreeMap::new();
        for (name, count) in slots {
            requirements.insert((*name).to_owned(), SlotRequirement::total(*count));
        }
        ShiftRequirement {
            target_month: "2025-01".parse::<Month>().unwrap(),
            time_slots: slots
                .iter()
                .map(|(name, _)| TimeSlotDefinition {
                    id: String::new(),
                    name: (*name).to_owned(),
                    start: None,
                    end: None,
                    rest_hours: 0.0,
                })
                .collect(),
            requirements,
        }
    }

    #[test]
    fn lone_staffer_against_six_heads_a_day_is_an_error() {
        let req = requirement(&[("日勤", 2), ("早番", 2), ("遅番", 2)]);
        let staff_list = vec![staff("s1", 5, TimeSlotPreference::Any)];
        let result = diagnose(&staff_list, &req, &LeaveRequests::default());
        assert_eq!(result.status, DiagnosisStatus::Error);
        assert!(result.supply_demand_balance.balance < 0);
        assert!(!result.issues.is_empty());
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn ample_staffing_is_ok() {
        let req = requirement(&[("日勤", 2), ("早番", 2), ("遅番", 2)]);
        let staff_list: Vec<Staff> = (0..10)
            .map(|i| staff(&format!("s{i}"), 5, TimeSlotPreference::Any))
            .collect();
        let result = diagnose(&staff_list, &req, &LeaveRequests::default());
        assert_eq!(result.status, DiagnosisStatus::Ok);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn empty_staff_with_nonzero_demand_is_an_error() {
        let req = requirement(&[("日勤", 1)]);
        let result = diagnose(&[], &req, &LeaveRequests::default());
        assert_eq!(result.status, DiagnosisStatus::Error);
        assert!(result.supply_demand_balance.balance < 0);
    }

    #[test]
    fn slot_only_high_issues_stay_a_warning() {
        // enough total supply, but everyone is day-only
        let req = requirement(&[("日勤", 2), ("早番", 2), ("遅番", 2)]);
        let staff_list: Vec<Staff> = (0..10)
            .map(|i| staff(&format!("s{i}"), 5, TimeSlotPreference::DayOnly))
            .collect();
        let result = diagnose(&staff_list, &req, &LeaveRequests::default());
        assert_ne!(result.status, DiagnosisStatus::Ok);
        assert!(result
            .issues
            .iter()
            .any(|i| i.category == IssueCategory::TimeSlot));
        if result
            .issues
            .iter()
            .all(|i| i.category == IssueCategory::TimeSlot || i.severity != IssueSeverity::High)
            && result.supply_demand_balance.balance >= 0
        {
            assert_eq!(result.status, DiagnosisStatus::Warning);
        }
    }

    #[test]
    fn repeated_runs_agree_except_for_the_timestamp() {
        let req = requirement(&[("日勤", 2), ("早番", 1)]);
        let staff_list: Vec<Staff> = (0..4)
            .map(|i| staff(&format!("s{i}"), 3, TimeSlotPreference::Any))
            .collect();
        let a = diagnose(&staff_list, &req, &LeaveRequests::default());
        let b = diagnose(&staff_list, &req, &LeaveRequests::default());
        assert_eq!(a.status, b.status);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.supply_demand_balance, b.supply_demand_balance);
        assert_eq!(a.issues, b.issues);
        assert_eq!(a.suggestions, b.suggestions);
    }
}
