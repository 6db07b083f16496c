//! File boundary: JSON dataset snapshots in, CSV imports, JSON/CSV reports
//! out. Everything past this module works on typed values only.

use crate::compliance::ComplianceViolationItem;
use crate::fte::FullTimeEquivalentEntry;
use crate::model::{
    EmploymentType, FacilityShiftSettings, LeaveRequests, Role, ShiftRequirement, Staff,
    StaffId, StaffSchedule, TimeSlotPreference, WeeklyWorkCount,
    DEFAULT_STANDARD_WEEKLY_HOURS,
};
use crate::staffing::StaffingStandardConfig;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// One facility's planning data for one month, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub schedules: Vec<StaffSchedule>,
    #[serde(default = "FacilityShiftSettings::with_default_slots")]
    pub shift_settings: FacilityShiftSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<ShiftRequirement>,
    #[serde(default)]
    pub leave_requests: LeaveRequests,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staffing_standard: Option<StaffingStandardConfig>,
    #[serde(default = "default_standard_weekly_hours")]
    pub standard_weekly_hours: f64,
}

fn default_standard_weekly_hours() -> f64 {
    DEFAULT_STANDARD_WEEKLY_HOURS
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> anyhow::Result<Dataset> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let dataset: Dataset =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(dataset)
}

/// Atomic JSON write: temp file in the target directory, then rename.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(value)?;
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))
        .with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

/// Staff import, header
/// `id,name,role,weekly_hope,weekly_must[,preference][,employment_type]`.
/// Rows without an id get a generated one.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).map(str::trim).unwrap_or("");
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let role = parse_role(rec.get(2).context("missing role")?.trim())
            .with_context(|| format!("invalid role for {name}"))?;
        let hope: u32 = rec
            .get(3)
            .context("missing weekly_hope")?
            .trim()
            .parse()
            .with_context(|| format!("invalid weekly_hope for {name}"))?;
        let must: u32 = rec
            .get(4)
            .context("missing weekly_must")?
            .trim()
            .parse()
            .with_context(|| format!("invalid weekly_must for {name}"))?;

        let mut staff = Staff {
            id: if id.is_empty() { StaffId::random() } else { StaffId::new(id) },
            name: name.to_owned(),
            role,
            qualifications: Vec::new(),
            weekly_work_count: WeeklyWorkCount { hope, must },
            max_consecutive_work_days: 5,
            available_weekdays: Vec::new(),
            unavailable_dates: Vec::new(),
            time_slot_preference: TimeSlotPreference::Any,
            is_night_shift_only: false,
            employment_type: EmploymentType::default(),
            weekly_contract_hours: None,
        };
        if let Some(pref) = rec.get(5) {
            let pref = pref.trim();
            if !pref.is_empty() {
                staff.time_slot_preference = parse_preference(pref)
                    .with_context(|| format!("invalid preference for {name}"))?;
            }
        }
        if let Some(emp) = rec.get(6) {
            let emp = emp.trim();
            if !emp.is_empty() {
                staff.employment_type = parse_employment_type(emp)
                    .with_context(|| format!("invalid employment_type for {name}"))?;
            }
        }
        out.push(staff);
    }
    Ok(out)
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    match s.to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
        "admin" => Ok(Role::Admin),
        "care_worker" => Ok(Role::CareWorker),
        "nurse" => Ok(Role::Nurse),
        "care_manager" => Ok(Role::CareManager),
        "operator" => Ok(Role::Operator),
        "functional_trainer" => Ok(Role::FunctionalTrainer),
        _ => bail!("unknown role: {s}"),
    }
}

fn parse_preference(s: &str) -> anyhow::Result<TimeSlotPreference> {
    match s.to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
        "day" | "day_only" => Ok(TimeSlotPreference::DayOnly),
        "night" | "night_only" => Ok(TimeSlotPreference::NightOnly),
        "any" => Ok(TimeSlotPreference::Any),
        _ => bail!("unknown preference: {s}"),
    }
}

fn parse_employment_type(s: &str) -> anyhow::Result<EmploymentType> {
    match s.to_ascii_uppercase().as_str() {
        "A" => Ok(EmploymentType::A),
        "B" => Ok(EmploymentType::B),
        "C" => Ok(EmploymentType::C),
        "D" => Ok(EmploymentType::D),
        _ => bail!("unknown employment type: {s}"),
    }
}

fn employment_label(e: EmploymentType) -> &'static str {
    match e {
        EmploymentType::A => "A",
        EmploymentType::B => "B",
        EmploymentType::C => "C",
        EmploymentType::D => "D",
    }
}

/// Violation report, header
/// `severity,staff_id,staff_name,date,description,legal_basis`.
pub fn export_violations_csv<P: AsRef<Path>>(
    path: P,
    violations: &[ComplianceViolationItem],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "severity",
        "staff_id",
        "staff_name",
        "date",
        "description",
        "legal_basis",
    ])?;
    for v in violations {
        let severity = match v.severity {
            crate::compliance::Severity::Error => "error",
            crate::compliance::Severity::Warning => "warning",
        };
        let date = v.date.to_string();
        w.write_record([
            severity,
            v.staff_id.as_str(),
            v.staff_name.as_str(),
            date.as_str(),
            v.description.as_str(),
            v.legal_basis,
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Per-staff FTE export for the regulatory filing, header
/// `staff_id,staff_name,role,employment_type,monthly_hours,weekly_average_hours,fte`.
pub fn export_fte_csv<P: AsRef<Path>>(
    path: P,
    entries: &[FullTimeEquivalentEntry],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "staff_id",
        "staff_name",
        "role",
        "employment_type",
        "monthly_hours",
        "weekly_average_hours",
        "fte",
    ])?;
    for e in entries {
        let monthly = format!("{:.2}", e.monthly_hours);
        let weekly = format!("{:.2}", e.weekly_average_hours);
        let fte = format!("{:.4}", e.fte_value);
        w.write_record([
            e.staff_id.as_str(),
            e.staff_name.as_str(),
            e.role.label(),
            employment_label(e.employment_type),
            monthly.as_str(),
            weekly.as_str(),
            fte.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
