//! Actionable suggestions derived from the detected issues and the balance.

use crate::model::{
    is_early_slot_name, is_late_slot_name, Staff, TimeSlotPreference,
};

use super::supply::WEEKS_PER_MONTH_SUPPLY;
use super::types::{
    DiagnosisIssue, DiagnosisSuggestion, IssueCategory, SuggestionPriority, SupplyDemandBalance,
};

/// Assumed working days per week when sizing a hire recommendation.
const HIRE_DAYS_PER_WEEK: f64 = 5.0;

pub fn generate_suggestions(
    staff_list: &[Staff],
    balance: &SupplyDemandBalance,
    issues: &[DiagnosisIssue],
) -> Vec<DiagnosisSuggestion> {
    let mut suggestions = Vec::new();

    suggest_preference_relaxation(staff_list, issues, &mut suggestions);
    suggest_hiring(balance, &mut suggestions);
    suggest_leave_adjustments(issues, &mut suggestions);

    // stable, so same-priority suggestions keep detection order
    suggestions.sort_by_key(|s| s.priority);
    suggestions
}

/// When slot coverage is the problem, the cheapest fix is loosening
/// day-only / night-only constraints.
fn suggest_preference_relaxation(
    staff_list: &[Staff],
    issues: &[DiagnosisIssue],
    suggestions: &mut Vec<DiagnosisSuggestion>,
) {
    let has_slot_issue = issues
        .iter()
        .any(|issue| issue.category == IssueCategory::TimeSlot);
    if !has_slot_issue {
        return;
    }

    for staff in staff_list {
        let constraint = match staff.time_slot_preference {
            TimeSlotPreference::DayOnly => "day shifts only",
            TimeSlotPreference::NightOnly => "night shifts only",
            TimeSlotPreference::Any => continue,
        };
        suggestions.push(DiagnosisSuggestion {
            priority: SuggestionPriority::High,
            action: format!(
                "Discuss relaxing {}'s time-slot preference ({constraint})",
                staff.name
            ),
            impact: "Frees up assignments for the under-covered slots".into(),
            target_staff: Some(staff.name.clone()),
        });
    }
}

fn suggest_hiring(balance: &SupplyDemandBalance, suggestions: &mut Vec<DiagnosisSuggestion>) {
    if balance.balance >= 0 {
        return;
    }
    let shortage = balance.balance.abs();
    let additional_staff =
        (shortage as f64 / (HIRE_DAYS_PER_WEEK * WEEKS_PER_MONTH_SUPPLY)).ceil() as i64;

    // an edge-slot deficit makes the shortfall harder to schedule around
    let edge_slot_balance: i64 = balance
        .by_time_slot
        .iter()
        .filter(|(name, _)| is_early_slot_name(name) || is_late_slot_name(name))
        .map(|(_, slot)| slot.balance)
        .sum();
    let priority = if edge_slot_balance < 0 {
        SuggestionPriority::High
    } else {
        SuggestionPriority::Medium
    };

    suggestions.push(DiagnosisSuggestion {
        priority,
        action: format!(
            "Recruit about {additional_staff} additional staff (current shortfall: {shortage} staff-days)"
        ),
        impact: "Closes the monthly supply/demand gap".into(),
        target_staff: None,
    });
}

fn suggest_leave_adjustments(
    issues: &[DiagnosisIssue],
    suggestions: &mut Vec<DiagnosisSuggestion>,
) {
    for issue in issues {
        if issue.category != IssueCategory::Leave {
            continue;
        }
        let Some(date) = issue.affected_dates.first() else {
            continue;
        };
        suggestions.push(DiagnosisSuggestion {
            priority: SuggestionPriority::Low,
            action: format!("Ask the affected staff to stagger their leave around {date}"),
            impact: "Spreads absences so daily coverage stays intact".into(),
            target_staff: None,
        });
    }
}
