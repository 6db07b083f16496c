#![forbid(unsafe_code)]
use chrono::NaiveDate;
use shiftlens::compliance::{run_compliance_check, Severity, ViolationKind};
use shiftlens::model::{
    EmploymentType, FacilityShiftSettings, Role, ShiftRecord, Staff, StaffId, StaffSchedule,
    TimeSlotPreference, WeeklyWorkCount,
};

fn member(id: &str, name: &str) -> Staff {
    Staff {
        id: StaffId::new(id),
        name: name.to_owned(),
        role: Role::CareWorker,
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

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[test]
fn month_of_day_shifts_with_rest_days_is_compliant() {
    let settings = FacilityShiftSettings::with_default_slots();
    let mut shifts = Vec::new();
    for d in 1..=31 {
        // work five on, two off
        let slot = if d % 7 == 0 || d % 7 == 6 { "休" } else { "日勤" };
        shifts.push(ShiftRecord::on(date(d), slot));
    }
    let schedules = vec![StaffSchedule {
        staff_id: StaffId::new("s1"),
        staff_name: "Tanaka".into(),
        monthly_shifts: shifts,
    }];
    let result = run_compliance_check(
        &schedules,
        &[member("s1", "Tanaka")],
        &settings,
        "2025-01".parse().unwrap(),
        40.0,
        false,
    );

    assert!(result.violations.is_empty());
    // 23 worked days × 8h net ≈ 1.06 FTE
    assert_eq!(result.fte_entries.len(), 1);
    let fte = result.fte_entries[0].fte_value;
    assert!(fte > 1.0 && fte < 1.2, "fte was {fte}");
}

#[test]
fn late_then_early_turnaround_produces_a_rest_warning() {
    let settings = FacilityShiftSettings::with_default_slots();
    // 遅番 ends 20:00, 早番 starts 07:00 next day → 11h gap, fine at 8h
    // but an amended early start at 03:00 leaves only 7h
    let mut early = ShiftRecord::on(date(2), "早番");
    early.actual_start = "03:00".parse().ok();
    early.actual_end = "12:00".parse().ok();
    let schedules = vec![StaffSchedule {
        staff_id: StaffId::new("s1"),
        staff_name: "Tanaka".into(),
        monthly_shifts: vec![ShiftRecord::on(date(1), "遅番"), early],
    }];

    let planned = run_compliance_check(
        &schedules,
        &[member("s1", "Tanaka")],
        &settings,
        "2025-01".parse().unwrap(),
        40.0,
        false,
    );
    assert!(planned.violations.is_empty());

    let actual = run_compliance_check(
        &schedules,
        &[member("s1", "Tanaka")],
        &settings,
        "2025-01".parse().unwrap(),
        40.0,
        true,
    );
    assert_eq!(actual.violations.len(), 1);
    assert_eq!(actual.violations[0].severity, Severity::Warning);
    assert!(matches!(
        actual.violations[0].kind,
        ViolationKind::RestInterval { .. }
    ));
}

#[test]
fn skipped_break_on_a_long_day_is_an_error() {
    let settings = FacilityShiftSettings::with_default_slots();
    // 日勤 09:00-18:00 with the break cut to 30 minutes on the day
    let mut rec = ShiftRecord::on(date(6), "日勤");
    rec.break_minutes = Some(30);
    let schedules = vec![StaffSchedule {
        staff_id: StaffId::new("s1"),
        staff_name: "Tanaka".into(),
        monthly_shifts: vec![rec],
    }];
    let result = run_compliance_check(
        &schedules,
        &[member("s1", "Tanaka")],
        &settings,
        "2025-01".parse().unwrap(),
        40.0,
        true,
    );

    assert_eq!(result.violations.len(), 1);
    let v = &result.violations[0];
    assert_eq!(v.severity, Severity::Error);
    assert_eq!(v.date, date(6));
    match v.kind {
        ViolationKind::BreakTime {
            break_minutes,
            required_minutes,
            ..
        } => {
            assert_eq!(break_minutes, 30);
            assert_eq!(required_minutes, 60);
        }
        _ => panic!("expected a break-time violation"),
    }
}
