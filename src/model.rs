//! Domain model for a care facility's shift planning data.
//!
//! All records here are plain immutable snapshots handed in by the host
//! (persistence, UI and export layers live outside this crate). Dates are
//! `YYYY-MM-DD`, months `YYYY-MM`, clock times `HH:MM` — parsing happens at
//! the serde boundary so the calculators work on typed values only.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::time::{self, ClockTime};

/// Weekly hours of one full-time position unless the facility overrides it.
pub const DEFAULT_STANDARD_WEEKLY_HOURS: f64 = 40.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),
}

/// Strong identifier for a staff member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job role as recorded in the staff directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    CareWorker,
    Nurse,
    CareManager,
    Operator,
    FunctionalTrainer,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::CareWorker => "care worker",
            Role::Nurse => "nurse",
            Role::CareManager => "care manager",
            Role::Operator => "operator",
            Role::FunctionalTrainer => "functional trainer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Qualification {
    CertifiedCareWorker,
    RegisteredNurse,
    LicensedPracticalNurse,
    DriversLicense,
    PhysicalTherapist,
    SocialWorker,
    HomeCareSupportWorker,
}

/// Which time slots a staff member accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSlotPreference {
    DayOnly,
    NightOnly,
    #[default]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeaveType {
    Hope,
    PaidLeave,
    Training,
}

/// Employment category carried through to the regulatory FTE export.
/// `A` is the full-time default when the directory omits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyWorkCount {
    /// Desired shifts per week.
    pub hope: u32,
    /// Contractual minimum shifts per week.
    pub must: u32,
}

/// Staff directory record. Read-only input to every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    pub weekly_work_count: WeeklyWorkCount,
    pub max_consecutive_work_days: u32,
    /// 0 = Sunday .. 6 = Saturday.
    #[serde(default)]
    pub available_weekdays: Vec<u8>,
    #[serde(default)]
    pub unavailable_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub time_slot_preference: TimeSlotPreference,
    #[serde(default)]
    pub is_night_shift_only: bool,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_contract_hours: Option<f64>,
}

impl Staff {
    /// Day/night exclusivity against a slot name. "Any" staff fit everywhere.
    pub fn can_work_in_slot(&self, slot_name: &str) -> bool {
        if self.is_night_shift_only {
            return is_night_slot_name(slot_name);
        }
        match self.time_slot_preference {
            TimeSlotPreference::DayOnly => is_day_slot_name(slot_name),
            TimeSlotPreference::NightOnly => is_night_slot_name(slot_name),
            TimeSlotPreference::Any => true,
        }
    }
}

/// One day in a staff member's monthly schedule. Planned fields are always
/// present; actual fields exist once the day has been worked and amended.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftRecord {
    #[serde(default)]
    pub date: NaiveDate,
    pub planned_shift_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_shift_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end: Option<ClockTime>,
    /// Realized break, minutes. Overrides the slot's `rest_hours` when the
    /// check runs on actuals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ShiftRecord {
    pub fn on(date: NaiveDate, planned_shift_type: &str) -> Self {
        Self {
            date,
            planned_shift_type: planned_shift_type.to_owned(),
            ..Self::default()
        }
    }

    /// Shift-type name, preferring the realized one under `use_actual`.
    pub fn shift_type(&self, use_actual: bool) -> &str {
        if use_actual {
            if let Some(actual) = &self.actual_shift_type {
                return actual;
            }
        }
        &self.planned_shift_type
    }

    pub fn start_override(&self, use_actual: bool) -> Option<ClockTime> {
        if use_actual && self.actual_start.is_some() {
            return self.actual_start;
        }
        self.planned_start
    }

    pub fn end_override(&self, use_actual: bool) -> Option<ClockTime> {
        if use_actual && self.actual_end.is_some() {
            return self.actual_end;
        }
        self.planned_end
    }
}

/// A staff member's shifts for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSchedule {
    pub staff_id: StaffId,
    pub staff_name: String,
    pub monthly_shifts: Vec<ShiftRecord>,
}

/// A configured time slot. Rest-type rows (day off, post-night recovery, …)
/// may omit start/end entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotDefinition {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ClockTime>,
    #[serde(default)]
    pub rest_hours: f64,
}

impl TimeSlotDefinition {
    pub fn span_minutes(&self) -> Option<u32> {
        Some(time::span_minutes(self.start?, self.end?))
    }

    pub fn net_work_hours(&self) -> Option<f64> {
        Some(time::net_work_hours(self.start?, self.end?, self.rest_hours))
    }
}

fn default_rest_shift_names() -> Vec<String> {
    ["休", "明け休み", "有給休暇", "研修", "off", "postnight"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Facility-level shift configuration: the ordered slot list, the default
/// rotation cycle and the set of shift-type names that count as rest days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityShiftSettings {
    pub shift_types: Vec<TimeSlotDefinition>,
    #[serde(default)]
    pub default_shift_cycle: Vec<String>,
    #[serde(default = "default_rest_shift_names")]
    pub rest_shift_names: Vec<String>,
}

impl FacilityShiftSettings {
    /// The stock four-slot configuration new facilities start from.
    pub fn with_default_slots() -> Self {
        let slot = |name: &str, start: &str, end: &str, rest_hours: f64| TimeSlotDefinition {
            id: String::new(),
            name: name.to_owned(),
            start: start.parse().ok(),
            end: end.parse().ok(),
            rest_hours,
        };
        Self {
            shift_types: vec![
                slot("早番", "07:00", "16:00", 1.0),
                slot("日勤", "09:00", "18:00", 1.0),
                slot("遅番", "11:00", "20:00", 1.0),
                slot("夜勤", "16:00", "09:00", 2.0),
            ],
            default_shift_cycle: Vec::new(),
            rest_shift_names: default_rest_shift_names(),
        }
    }

    /// Looks a slot up by name or id.
    pub fn find_slot(&self, type_name: &str) -> Option<&TimeSlotDefinition> {
        self.shift_types
            .iter()
            .find(|t| t.name == type_name || (!t.id.is_empty() && t.id == type_name))
    }

    pub fn is_rest(&self, type_name: &str) -> bool {
        self.rest_shift_names.iter().any(|n| n == type_name)
    }

    /// Net working hours of one schedule record. Rest days and records whose
    /// times cannot be resolved (no override, no slot config) contribute 0.
    pub fn shift_work_hours(&self, record: &ShiftRecord, use_actual: bool) -> f64 {
        let type_name = record.shift_type(use_actual);
        if self.is_rest(type_name) {
            return 0.0;
        }
        let config = self.find_slot(type_name);
        let start = record
            .start_override(use_actual)
            .or(config.and_then(|c| c.start));
        let end = record
            .end_override(use_actual)
            .or(config.and_then(|c| c.end));
        let rest_hours = config.map(|c| c.rest_hours).unwrap_or(0.0);
        match (start, end) {
            (Some(start), Some(end)) => time::net_work_hours(start, end, rest_hours),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationCount {
    pub qualification: Qualification,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: Role,
    pub count: u32,
}

/// Required headcount for one slot on any business day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequirement {
    pub total_staff: u32,
    #[serde(default)]
    pub required_qualifications: Vec<QualificationCount>,
    #[serde(default)]
    pub required_roles: Vec<RoleCount>,
}

impl SlotRequirement {
    pub fn total(total_staff: u32) -> Self {
        Self {
            total_staff,
            required_qualifications: Vec::new(),
            required_roles: Vec::new(),
        }
    }
}

/// Target month plus per-slot headcount requirements, keyed by slot name.
/// Lookup is by name; insertion order never matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRequirement {
    pub target_month: Month,
    pub time_slots: Vec<TimeSlotDefinition>,
    pub requirements: BTreeMap<String, SlotRequirement>,
}

/// Leave requests per staff member per date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveRequests(pub BTreeMap<StaffId, BTreeMap<NaiveDate, LeaveType>>);

impl LeaveRequests {
    pub fn insert(&mut self, staff_id: StaffId, date: NaiveDate, leave_type: LeaveType) {
        self.0.entry(staff_id).or_default().insert(date, leave_type);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StaffId, &BTreeMap<NaiveDate, LeaveType>)> {
        self.0.iter()
    }
}

/// Calendar month, `"YYYY-MM"` at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, ModelError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ModelError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        // both dates exist for any validated Month
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(0)
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let month = *self;
        (1..=self.days()).filter_map(move |day| month.date(day))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for Month {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ModelError::InvalidMonth(s.to_string());
        let (y, m) = s.split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Self::new(year, month).map_err(|_| bad())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// Slot-name classification. Requirements key slots by free-form name, so
// day/night/early/late membership is a marker test on the name (Japanese and
// English markers both recognized).

pub fn is_night_slot_name(name: &str) -> bool {
    name.contains('夜') || name.to_ascii_lowercase().contains("night")
}

pub fn is_day_slot_name(name: &str) -> bool {
    if name.contains("日勤") || name == "日" {
        return true;
    }
    let lower = name.to_ascii_lowercase();
    lower.contains("day") && !lower.contains("night")
}

pub fn is_early_slot_name(name: &str) -> bool {
    name.contains('早') || name.to_ascii_lowercase().contains("early")
}

pub fn is_late_slot_name(name: &str) -> bool {
    name.contains('遅') || name.to_ascii_lowercase().contains("late")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_parse_and_days() {
        let m: Month = "2025-02".parse().unwrap();
        assert_eq!(m.days(), 28);
        assert_eq!("2024-02".parse::<Month>().unwrap().days(), 29);
        assert_eq!(m.to_string(), "2025-02");
        assert!("2025-13".parse::<Month>().is_err());
        assert!("2025".parse::<Month>().is_err());
    }

    #[test]
    fn month_dates_cover_whole_month() {
        let m: Month = "2025-01".parse().unwrap();
        let dates: Vec<_> = m.dates().collect();
        assert_eq!(dates.len(), 31);
        assert_eq!(dates[0], date(2025, 1, 1));
        assert!(m.contains(dates[30]));
        assert!(!m.contains(date(2025, 2, 1)));
    }

    #[test]
    fn slot_name_classification() {
        assert!(is_night_slot_name("夜勤"));
        assert!(is_night_slot_name("Night A"));
        assert!(is_day_slot_name("日勤"));
        assert!(is_day_slot_name("day"));
        assert!(!is_day_slot_name("夜勤"));
        assert!(is_early_slot_name("早番"));
        assert!(is_late_slot_name("遅番"));
    }

    #[test]
    fn rest_names_resolve_to_zero_hours() {
        let settings = FacilityShiftSettings::with_default_slots();
        let record = ShiftRecord::on(date(2025, 1, 1), "休");
        assert_eq!(settings.shift_work_hours(&record, false), 0.0);
    }

    #[test]
    fn day_shift_resolves_from_slot_config() {
        let settings = FacilityShiftSettings::with_default_slots();
        let record = ShiftRecord::on(date(2025, 1, 1), "日勤");
        // 09:00-18:00 minus 1h rest
        assert_eq!(settings.shift_work_hours(&record, false), 8.0);
    }

    #[test]
    fn actual_times_preferred_when_requested() {
        let settings = FacilityShiftSettings::with_default_slots();
        let record = ShiftRecord {
            actual_start: "09:00".parse().ok(),
            actual_end: "14:00".parse().ok(),
            ..ShiftRecord::on(date(2025, 1, 1), "日勤")
        };
        assert_eq!(settings.shift_work_hours(&record, true), 4.0);
        assert_eq!(settings.shift_work_hours(&record, false), 8.0);
    }

    #[test]
    fn night_only_staff_match_night_slots_only() {
        let staff = Staff {
            id: StaffId::new("s1"),
            name: "A".into(),
            role: Role::CareWorker,
            qualifications: vec![],
            weekly_work_count: WeeklyWorkCount { hope: 5, must: 4 },
            max_consecutive_work_days: 5,
            available_weekdays: vec![],
            unavailable_dates: vec![],
            time_slot_preference: TimeSlotPreference::Any,
            is_night_shift_only: true,
            employment_type: EmploymentType::A,
            weekly_contract_hours: None,
        };
        assert!(staff.can_work_in_slot("夜勤"));
        assert!(!staff.can_work_in_slot("日勤"));
    }
}
