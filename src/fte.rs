//! Full-time-equivalent (FTE) computation.
//!
//! FTE = monthly worked hours / (standard weekly hours × 4.33). Values stay
//! unrounded here; the export layer decides presentation precision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{EmploymentType, FacilityShiftSettings, Role, Staff, StaffId, StaffSchedule};

/// Average weeks per month for hours-based FTE (365 / 12 / 7 ≈ 4.33).
/// Deliberately not the 4.5 the supply estimator uses — the two approximate
/// different things and must not be unified.
pub const WEEKS_PER_MONTH_FTE: f64 = 4.33;

/// One staff member's FTE line for the regulatory report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullTimeEquivalentEntry {
    pub staff_id: StaffId,
    pub staff_name: String,
    /// Missing directory entries fall back to care worker, the facility's
    /// dominant role.
    pub role: Role,
    pub employment_type: EmploymentType,
    pub monthly_hours: f64,
    pub weekly_average_hours: f64,
    pub fte_value: f64,
}

/// FTE for a single staff member's monthly schedule.
pub fn calculate_full_time_equivalent(
    schedule: &StaffSchedule,
    staff: Option<&Staff>,
    shift_settings: &FacilityShiftSettings,
    standard_weekly_hours: f64,
    use_actual: bool,
) -> FullTimeEquivalentEntry {
    let standard_monthly_hours = standard_weekly_hours * WEEKS_PER_MONTH_FTE;

    let monthly_hours: f64 = schedule
        .monthly_shifts
        .iter()
        .map(|shift| shift_settings.shift_work_hours(shift, use_actual))
        .sum();

    let fte_value = if standard_monthly_hours > 0.0 {
        monthly_hours / standard_monthly_hours
    } else {
        0.0
    };

    FullTimeEquivalentEntry {
        staff_id: schedule.staff_id.clone(),
        staff_name: schedule.staff_name.clone(),
        role: staff.map(|s| s.role).unwrap_or(Role::CareWorker),
        employment_type: staff.map(|s| s.employment_type).unwrap_or_default(),
        monthly_hours,
        weekly_average_hours: monthly_hours / WEEKS_PER_MONTH_FTE,
        fte_value,
    }
}

/// FTE entries for every schedule in the batch, in input order.
pub fn calculate_full_time_equivalents(
    schedules: &[StaffSchedule],
    staff_list: &[Staff],
    shift_settings: &FacilityShiftSettings,
    standard_weekly_hours: f64,
    use_actual: bool,
) -> Vec<FullTimeEquivalentEntry> {
    schedules
        .iter()
        .map(|schedule| {
            let staff = staff_list.iter().find(|s| s.id == schedule.staff_id);
            calculate_full_time_equivalent(
                schedule,
                staff,
                shift_settings,
                standard_weekly_hours,
                use_actual,
            )
        })
        .collect()
}

/// Per-role FTE totals. Every entry lands in exactly one bucket, so the
/// grouped total equals the per-staff sum to float tolerance.
pub fn fte_total_by_role(entries: &[FullTimeEquivalentEntry]) -> BTreeMap<Role, f64> {
    let mut totals: BTreeMap<Role, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.role).or_insert(0.0) += entry.fte_value;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        EmploymentType, Role, ShiftRecord, Staff, StaffId, TimeSlotPreference, WeeklyWorkCount,
    };
    use chrono::NaiveDate;

    fn staff(id: &str, role: Role) -> Staff {
        Staff {
            id: StaffId::new(id),
            name: id.to_owned(),
            role,
            qualifications: vec![],
            weekly_work_count: WeeklyWorkCount { hope: 5, must: 4 },
            max_consecutive_work_days: 5,
            available_weekdays: vec![],
            unavailable_dates: vec![],
            time_slot_preference: TimeSlotPreference::Any,
            is_night_shift_only: false,
            employment_type: EmploymentType::A,
            weekly_contract_hours: None,
        }
    }

    fn month_of(shift_type: &str, days: u32) -> Vec<ShiftRecord> {
        (1..=days)
            .map(|d| {
                ShiftRecord::on(NaiveDate::from_ymd_opt(2025, 1, d).unwrap(), shift_type)
            })
            .collect()
    }

    fn schedule(id: &str, shifts: Vec<ShiftRecord>) -> StaffSchedule {
        StaffSchedule {
            staff_id: StaffId::new(id),
            staff_name: id.to_owned(),
            monthly_shifts: shifts,
        }
    }

    #[test]
    fn full_time_month_is_about_one_fte() {
        let settings = crate::model::FacilityShiftSettings::with_default_slots();
        // 22 day shifts × 8h net = 176h against 40 × 4.33 = 173.2h
        let sched = schedule("s1", month_of("日勤", 22));
        let st = staff("s1", Role::CareWorker);
        let entry = calculate_full_time_equivalent(&sched, Some(&st), &settings, 40.0, false);
        assert!((entry.monthly_hours - 176.0).abs() < 1e-9);
        assert!(entry.fte_value > 0.9 && entry.fte_value < 1.1);
    }

    #[test]
    fn all_rest_month_is_zero_fte() {
        let settings = crate::model::FacilityShiftSettings::with_default_slots();
        let sched = schedule("s1", month_of("休", 30));
        let entry = calculate_full_time_equivalent(&sched, None, &settings, 40.0, false);
        assert_eq!(entry.monthly_hours, 0.0);
        assert_eq!(entry.fte_value, 0.0);
    }

    #[test]
    fn empty_schedule_is_zero_not_error() {
        let settings = crate::model::FacilityShiftSettings::with_default_slots();
        let sched = schedule("s1", vec![]);
        let entry = calculate_full_time_equivalent(&sched, None, &settings, 40.0, false);
        assert_eq!(entry.fte_value, 0.0);
    }

    #[test]
    fn role_totals_match_per_staff_sum() {
        let settings = crate::model::FacilityShiftSettings::with_default_slots();
        let staff_list = vec![
            staff("s1", Role::CareWorker),
            staff("s2", Role::CareWorker),
            staff("s3", Role::Nurse),
        ];
        let schedules = vec![
            schedule("s1", month_of("日勤", 22)),
            schedule("s2", month_of("早番", 10)),
            schedule("s3", month_of("夜勤", 8)),
        ];
        let entries =
            calculate_full_time_equivalents(&schedules, &staff_list, &settings, 40.0, false);
        let totals = fte_total_by_role(&entries);
        let grouped: f64 = totals.values().sum();
        let direct: f64 = entries.iter().map(|e| e.fte_value).sum();
        assert!((grouped - direct).abs() < 1e-9);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn unknown_staff_defaults_role_and_employment() {
        let settings = crate::model::FacilityShiftSettings::with_default_slots();
        let entries = calculate_full_time_equivalents(
            &[schedule("ghost", month_of("日勤", 5))],
            &[],
            &settings,
            40.0,
            false,
        );
        assert_eq!(entries[0].role, Role::CareWorker);
        assert_eq!(entries[0].employment_type, EmploymentType::A);
    }
}
