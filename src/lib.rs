#![forbid(unsafe_code)]
//! ShiftLens — compliance and diagnosis calculations for care-facility
//! shift schedules (no database, no scheduler).
//!
//! - FTE (full-time equivalent) per staff member and per role.
//! - Statutory break-time and rest-interval checks.
//! - Staffing-standard fulfillment, daily and monthly.
//! - Pre-generation diagnosis: supply/demand balance, issues, suggestions.
//! - File I/O at the edges only (JSON snapshots, CSV import/export).

pub mod compliance;
pub mod diagnosis;
pub mod fte;
pub mod io;
pub mod model;
pub mod staffing;
pub mod time;

pub use compliance::{
    run_compliance_check, ComplianceCheckResult, ComplianceViolationItem, Severity,
    ViolationKind,
};
pub use diagnosis::{diagnose, DiagnosisResult, DiagnosisStatus, SupplyDemandBalance};
pub use fte::{
    calculate_full_time_equivalent, calculate_full_time_equivalents, fte_total_by_role,
    FullTimeEquivalentEntry,
};
pub use model::{
    FacilityShiftSettings, LeaveRequests, Month, Role, ShiftRecord, ShiftRequirement, Staff,
    StaffId, StaffSchedule, TimeSlotDefinition, DEFAULT_STANDARD_WEEKLY_HOURS,
};
pub use staffing::{
    calculate_daily_fulfillment, calculate_monthly_fulfillment_summary, DailyFulfillment,
    FulfillmentStatus, MonthlyFulfillmentSummary, StaffingStandardConfig,
};
pub use time::ClockTime;
