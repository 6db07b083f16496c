//! Statutory compliance checks over a month of schedules.
//!
//! Two independent rule families run over the same shift stream:
//! break-time sufficiency (labor standards act art. 34 analogue, exact
//! minute boundaries) and the inter-shift rest interval guideline. Results
//! merge into one unordered violation list; display layers sort it.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::fte::{
    calculate_full_time_equivalents, fte_total_by_role, FullTimeEquivalentEntry,
};
use crate::model::{FacilityShiftSettings, Month, Role, Staff, StaffId, StaffSchedule};
use crate::time;

/// Spans strictly over 8h need a 60-minute break, strictly over 6h a
/// 45-minute break. 6h00 and 8h00 themselves sit in the lower tier.
pub const BREAK_REQUIRED_OVER_8H_MIN: u32 = 60;
pub const BREAK_REQUIRED_OVER_6H_MIN: u32 = 45;
const SPAN_8H_MIN: u32 = 8 * 60;
const SPAN_6H_MIN: u32 = 6 * 60;

/// Guideline minimum off-duty gap between consecutive working days.
pub const DEFAULT_MIN_REST_INTERVAL_HOURS: f64 = 8.0;

const LEGAL_BASIS_BREAK_TIME: &str = "労働基準法第34条";
const LEGAL_BASIS_REST_INTERVAL: &str = "労働時間等設定改善法指針";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// What was violated, with the numbers behind the finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    BreakTime {
        work_hours: f64,
        break_minutes: u32,
        required_minutes: u32,
    },
    RestInterval {
        interval_hours: f64,
        min_interval_hours: f64,
    },
}

impl ViolationKind {
    /// Break-time findings are statutory, rest-interval findings guideline
    /// level only.
    pub fn severity(&self) -> Severity {
        match self {
            ViolationKind::BreakTime { .. } => Severity::Error,
            ViolationKind::RestInterval { .. } => Severity::Warning,
        }
    }

    pub fn legal_basis(&self) -> &'static str {
        match self {
            ViolationKind::BreakTime { .. } => LEGAL_BASIS_BREAK_TIME,
            ViolationKind::RestInterval { .. } => LEGAL_BASIS_REST_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceViolationItem {
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub severity: Severity,
    pub staff_id: StaffId,
    pub staff_name: String,
    pub date: NaiveDate,
    pub description: String,
    pub legal_basis: &'static str,
}

impl ComplianceViolationItem {
    fn new(
        kind: ViolationKind,
        staff_id: StaffId,
        staff_name: String,
        date: NaiveDate,
        description: String,
    ) -> Self {
        let severity = kind.severity();
        let legal_basis = kind.legal_basis();
        Self {
            kind,
            severity,
            staff_id,
            staff_name,
            date,
            description,
            legal_basis,
        }
    }
}

/// Sorts a merged violation list the way review screens show it: errors
/// first, then by date and staff.
pub fn sort_violations_for_display(violations: &mut [ComplianceViolationItem]) {
    violations.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then(a.date.cmp(&b.date))
            .then(a.staff_name.cmp(&b.staff_name))
    });
}

/// Break-time rule: every worked shift whose gross span exceeds the legal
/// thresholds must carry the matching minimum break.
pub fn check_break_time_compliance(
    schedules: &[StaffSchedule],
    shift_settings: &FacilityShiftSettings,
    use_actual: bool,
) -> Vec<ComplianceViolationItem> {
    let mut violations = Vec::new();

    for schedule in schedules {
        for shift in &schedule.monthly_shifts {
            let type_name = shift.shift_type(use_actual);
            if shift_settings.is_rest(type_name) {
                continue;
            }
            let Some(config) = shift_settings.find_slot(type_name) else {
                continue;
            };
            let start = shift.start_override(use_actual).or(config.start);
            let end = shift.end_override(use_actual).or(config.end);
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };

            // gross span, before the break is taken out
            let span_min = time::span_minutes(start, end);
            let break_minutes = match (use_actual, shift.break_minutes) {
                (true, Some(minutes)) => minutes,
                _ => (config.rest_hours * 60.0).round() as u32,
            };

            let required = if span_min > SPAN_8H_MIN && break_minutes < BREAK_REQUIRED_OVER_8H_MIN
            {
                Some(BREAK_REQUIRED_OVER_8H_MIN)
            } else if span_min > SPAN_6H_MIN && break_minutes < BREAK_REQUIRED_OVER_6H_MIN {
                Some(BREAK_REQUIRED_OVER_6H_MIN)
            } else {
                None
            };

            if let Some(required_minutes) = required {
                let work_hours = f64::from(span_min) / 60.0;
                let description = format!(
                    "{} {}: {:.1}h worked with a {} min break ({} min or more required)",
                    shift.date, type_name, work_hours, break_minutes, required_minutes
                );
                violations.push(ComplianceViolationItem::new(
                    ViolationKind::BreakTime {
                        work_hours,
                        break_minutes,
                        required_minutes,
                    },
                    schedule.staff_id.clone(),
                    schedule.staff_name.clone(),
                    shift.date,
                    description,
                ));
            }
        }
    }

    violations
}

/// Rest-interval rule: the gap between the end of one worked day and the
/// start of the next must reach the configured minimum. Only adjacent
/// calendar days are compared; a rest day in between resets adjacency.
pub fn check_rest_interval_compliance(
    schedules: &[StaffSchedule],
    shift_settings: &FacilityShiftSettings,
    use_actual: bool,
    min_interval_hours: f64,
) -> Vec<ComplianceViolationItem> {
    let mut violations = Vec::new();

    for schedule in schedules {
        let mut sorted: Vec<_> = schedule.monthly_shifts.iter().collect();
        sorted.sort_by_key(|s| s.date);

        for pair in sorted.windows(2) {
            let &[prev, curr] = pair else { continue };

            let prev_type = prev.shift_type(use_actual);
            let curr_type = curr.shift_type(use_actual);
            if shift_settings.is_rest(prev_type) || shift_settings.is_rest(curr_type) {
                continue;
            }

            // a free day between the two shifts resets adjacency
            if (curr.date - prev.date).num_days() > 1 {
                continue;
            }

            let prev_end = prev
                .end_override(use_actual)
                .or(shift_settings.find_slot(prev_type).and_then(|c| c.end));
            let curr_start = curr
                .start_override(use_actual)
                .or(shift_settings.find_slot(curr_type).and_then(|c| c.start));
            let (Some(prev_end), Some(curr_start)) = (prev_end, curr_start) else {
                continue;
            };

            let interval_hours = time::interval_hours(prev_end, curr_start);
            if interval_hours < min_interval_hours {
                let description = format!(
                    "{} {}: started {:.1}h after the previous {} ended ({}h or more recommended)",
                    curr.date, curr_type, interval_hours, prev_type, min_interval_hours
                );
                violations.push(ComplianceViolationItem::new(
                    ViolationKind::RestInterval {
                        interval_hours,
                        min_interval_hours,
                    },
                    schedule.staff_id.clone(),
                    schedule.staff_name.clone(),
                    curr.date,
                    description,
                ));
            }
        }
    }

    violations
}

/// Combined FTE + compliance run for one month.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceCheckResult {
    pub target_month: Month,
    pub checked_at: DateTime<Utc>,
    pub use_actual: bool,
    pub violations: Vec<ComplianceViolationItem>,
    pub fte_entries: Vec<FullTimeEquivalentEntry>,
    pub fte_total_by_role: BTreeMap<Role, f64>,
}

pub fn run_compliance_check(
    schedules: &[StaffSchedule],
    staff_list: &[Staff],
    shift_settings: &FacilityShiftSettings,
    target_month: Month,
    standard_weekly_hours: f64,
    use_actual: bool,
) -> ComplianceCheckResult {
    let fte_entries = calculate_full_time_equivalents(
        schedules,
        staff_list,
        shift_settings,
        standard_weekly_hours,
        use_actual,
    );
    let totals = fte_total_by_role(&fte_entries);

    let mut violations = check_break_time_compliance(schedules, shift_settings, use_actual);
    violations.extend(check_rest_interval_compliance(
        schedules,
        shift_settings,
        use_actual,
        DEFAULT_MIN_REST_INTERVAL_HOURS,
    ));

    ComplianceCheckResult {
        target_month,
        checked_at: Utc::now(),
        use_actual,
        violations,
        fte_entries,
        fte_total_by_role: totals,
    }
}
