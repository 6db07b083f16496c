//! Issue detection over the supply/demand picture and the leave calendar.
//!
//! Every rule is evaluated independently; the union goes to the caller in
//! detection order (overall supply, slot constraints, per-slot shortages,
//! leave concentration by descending head count).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{
    is_day_slot_name, LeaveRequests, ShiftRequirement, Staff, TimeSlotPreference,
};

use super::supply::staff_monthly_days;
use super::types::{DiagnosisIssue, IssueCategory, IssueSeverity, SupplyDemandBalance};

/// A shortfall over 30% of total demand is high severity.
pub const SHORTFALL_HIGH_RATIO: f64 = 0.3;
/// Day-only staff covering more than half the day slot's demand is flagged.
pub const DAY_ONLY_CONCENTRATION_RATIO: f64 = 0.5;
/// Slot fulfillment below 80% is an issue, below 50% a high one.
pub const SLOT_SHORTAGE_RATE: i64 = 80;
pub const SLOT_SHORTAGE_HIGH_RATE: i64 = 50;
/// A date where at least 30% of all staff request leave is concentrated.
pub const LEAVE_CONCENTRATION_RATIO: f64 = 0.3;

pub fn detect_issues(
    staff_list: &[Staff],
    requirements: &ShiftRequirement,
    leave_requests: &LeaveRequests,
    balance: &SupplyDemandBalance,
) -> Vec<DiagnosisIssue> {
    let mut issues = Vec::new();

    detect_total_shortfall(balance, &mut issues);
    detect_day_only_concentration(staff_list, balance, &mut issues);
    detect_slot_shortages(balance, &mut issues);
    detect_leave_concentration(staff_list, requirements, leave_requests, &mut issues);

    issues
}

fn detect_total_shortfall(balance: &SupplyDemandBalance, issues: &mut Vec<DiagnosisIssue>) {
    if balance.balance >= 0 {
        return;
    }
    let shortage = balance.balance.abs();
    let severity = if shortage as f64 > balance.total_demand as f64 * SHORTFALL_HIGH_RATIO {
        IssueSeverity::High
    } else {
        IssueSeverity::Medium
    };
    issues.push(DiagnosisIssue {
        id: "supply-shortage".into(),
        severity,
        category: IssueCategory::Supply,
        title: "Overall staffing shortfall".into(),
        description: format!(
            "total supply is {} staff-days against a demand of {}; {} staff-days short",
            balance.total_supply, balance.total_demand, shortage
        ),
        affected_staff: Vec::new(),
        affected_dates: Vec::new(),
    });
}

/// Staff locked to the day slot can eat most of its demand and leave nobody
/// flexible for early/late slots.
fn detect_day_only_concentration(
    staff_list: &[Staff],
    balance: &SupplyDemandBalance,
    issues: &mut Vec<DiagnosisIssue>,
) {
    let day_only: Vec<&Staff> = staff_list
        .iter()
        .filter(|s| s.time_slot_preference == TimeSlotPreference::DayOnly)
        .collect();
    if day_only.is_empty() {
        return;
    }
    let Some((slot_name, day_slot)) = balance
        .by_time_slot
        .iter()
        .find(|(name, _)| is_day_slot_name(name))
    else {
        return;
    };

    let day_only_supply: i64 = day_only.iter().map(|s| staff_monthly_days(s)).sum();
    if day_only_supply as f64 <= day_slot.demand as f64 * DAY_ONLY_CONCENTRATION_RATIO {
        return;
    }

    let names: Vec<String> = day_only.iter().map(|s| s.name.clone()).collect();
    issues.push(DiagnosisIssue {
        id: "timeslot-constraint".into(),
        severity: IssueSeverity::High,
        category: IssueCategory::TimeSlot,
        title: format!("Day-only staff saturate the {slot_name} slot"),
        description: format!(
            "{} ({} staff) are set to day shifts only and consume most of the \
             {} demand; early and late slots may run short of assignable staff",
            names.join(", "),
            names.len(),
            slot_name
        ),
        affected_staff: names,
        affected_dates: Vec::new(),
    });
}

fn detect_slot_shortages(balance: &SupplyDemandBalance, issues: &mut Vec<DiagnosisIssue>) {
    for (slot_name, slot) in &balance.by_time_slot {
        if slot.balance < 0 && slot.fulfillment_rate < SLOT_SHORTAGE_RATE {
            let severity = if slot.fulfillment_rate < SLOT_SHORTAGE_HIGH_RATE {
                IssueSeverity::High
            } else {
                IssueSeverity::Medium
            };
            issues.push(DiagnosisIssue {
                id: format!("slot-shortage-{slot_name}"),
                severity,
                category: IssueCategory::TimeSlot,
                title: format!("{slot_name} is short-staffed"),
                description: format!(
                    "fulfillment for {} is {}%; {} staff-days short",
                    slot_name,
                    slot.fulfillment_rate,
                    slot.balance.abs()
                ),
                affected_staff: Vec::new(),
                affected_dates: Vec::new(),
            });
        }
    }
}

struct LeaveConcentration {
    date: NaiveDate,
    staff_names: Vec<String>,
}

fn detect_leave_concentration(
    staff_list: &[Staff],
    requirements: &ShiftRequirement,
    leave_requests: &LeaveRequests,
    issues: &mut Vec<DiagnosisIssue>,
) {
    let threshold = (staff_list.len() as f64 * LEAVE_CONCENTRATION_RATIO).ceil() as usize;

    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for (staff_id, requests) in leave_requests.iter() {
        let staff_name = staff_list
            .iter()
            .find(|s| &s.id == staff_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| staff_id.to_string());
        for date in requests.keys() {
            if requirements.target_month.contains(*date) {
                by_date.entry(*date).or_default().push(staff_name.clone());
            }
        }
    }

    let mut concentrations: Vec<LeaveConcentration> = by_date
        .into_iter()
        .map(|(date, staff_names)| LeaveConcentration { date, staff_names })
        .collect();
    // busiest dates first; ties stay in date order
    concentrations.sort_by(|a, b| b.staff_names.len().cmp(&a.staff_names.len()));

    for concentration in concentrations {
        if concentration.staff_names.len() >= threshold {
            issues.push(DiagnosisIssue {
                id: format!("leave-concentration-{}", concentration.date),
                severity: IssueSeverity::Medium,
                category: IssueCategory::Leave,
                title: format!("Leave requests concentrated on {}", concentration.date),
                description: format!(
                    "{} ({} staff) requested leave on the same day",
                    concentration.staff_names.join(", "),
                    concentration.staff_names.len()
                ),
                affected_staff: concentration.staff_names,
                affected_dates: vec![concentration.date],
            });
        }
    }
}
