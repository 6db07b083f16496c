//! Daily staffing-standard fulfillment and its monthly rollup.
//!
//! A facility's staffing standard says how many FTEs of each role must be on
//! duty every day, either as a fixed figure or as a ratio of the facility's
//! registered user count. The daily calculation compares that against the
//! FTEs actually scheduled; the monthly summary averages the rates and counts
//! shortfall days.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{FacilityShiftSettings, Month, Role, Staff, StaffSchedule};

/// Fulfillment below this percentage is an outright shortage; between this
/// and 100 it is a warning.
pub const FULFILLMENT_WARNING_THRESHOLD: f64 = 80.0;

/// A full-time day is one fifth of the standard work week.
pub const WORK_DAYS_PER_WEEK: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CareServiceType {
    #[default]
    DayCare,
    ShortStay,
    GroupHome,
    NursingHome,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// `required_fte` is the daily requirement as-is.
    Fixed,
    /// Daily requirement = user count / `ratio_numerator` (e.g. one care
    /// worker per five users).
    Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: Role,
    pub required_fte: f64,
    pub calculation_method: CalculationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_numerator: Option<f64>,
}

/// Facility staffing standard: per-role daily FTE requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingStandardConfig {
    #[serde(default)]
    pub service_type: CareServiceType,
    pub user_count: u32,
    pub requirements: Vec<RoleRequirement>,
}

impl StaffingStandardConfig {
    /// Stock standard for a service type, used until the facility configures
    /// its own.
    pub fn default_for(service_type: CareServiceType) -> Self {
        let requirements = match service_type {
            CareServiceType::DayCare => vec![
                RoleRequirement {
                    role: Role::CareWorker,
                    required_fte: 0.0,
                    calculation_method: CalculationMethod::Ratio,
                    ratio_numerator: Some(5.0),
                },
                RoleRequirement {
                    role: Role::Nurse,
                    required_fte: 1.0,
                    calculation_method: CalculationMethod::Fixed,
                    ratio_numerator: None,
                },
            ],
            CareServiceType::NursingHome => vec![
                RoleRequirement {
                    role: Role::CareWorker,
                    required_fte: 0.0,
                    calculation_method: CalculationMethod::Ratio,
                    ratio_numerator: Some(3.0),
                },
                RoleRequirement {
                    role: Role::Nurse,
                    required_fte: 1.0,
                    calculation_method: CalculationMethod::Fixed,
                    ratio_numerator: None,
                },
            ],
            _ => vec![RoleRequirement {
                role: Role::CareWorker,
                required_fte: 2.0,
                calculation_method: CalculationMethod::Fixed,
                ratio_numerator: None,
            }],
        };
        Self {
            service_type,
            user_count: 20,
            requirements,
        }
    }

    fn resolved_required_fte(&self, requirement: &RoleRequirement) -> f64 {
        match requirement.calculation_method {
            CalculationMethod::Fixed => requirement.required_fte,
            CalculationMethod::Ratio => match requirement.ratio_numerator {
                Some(n) if n > 0.0 => f64::from(self.user_count) / n,
                _ => requirement.required_fte,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Met,
    Warning,
    Shortage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentMeasure {
    pub required_fte: f64,
    pub actual_fte: f64,
    /// Percent; 100 when nothing is required.
    pub fulfillment_rate: f64,
    pub status: FulfillmentStatus,
}

impl FulfillmentMeasure {
    fn of(required_fte: f64, actual_fte: f64) -> Self {
        let fulfillment_rate = if required_fte > 0.0 {
            actual_fte / required_fte * 100.0
        } else {
            100.0
        };
        let status = if fulfillment_rate >= 100.0 {
            FulfillmentStatus::Met
        } else if fulfillment_rate >= FULFILLMENT_WARNING_THRESHOLD {
            FulfillmentStatus::Warning
        } else {
            FulfillmentStatus::Shortage
        };
        Self {
            required_fte,
            actual_fte,
            fulfillment_rate,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleFulfillment {
    pub role: Role,
    #[serde(flatten)]
    pub measure: FulfillmentMeasure,
}

/// One calendar day's standard-vs-actual comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFulfillment {
    pub date: NaiveDate,
    pub overall: FulfillmentMeasure,
    pub by_role: Vec<RoleFulfillment>,
}

/// Compares scheduled FTEs against the staffing standard for every day of
/// the month. Rest shifts count as zero; staff missing from the directory
/// cannot be attributed to a role and are skipped.
pub fn calculate_daily_fulfillment(
    schedules: &[StaffSchedule],
    staff_list: &[Staff],
    shift_settings: &FacilityShiftSettings,
    standard: &StaffingStandardConfig,
    target_month: Month,
    standard_weekly_hours: f64,
    use_actual: bool,
) -> Vec<DailyFulfillment> {
    let full_time_day_hours = standard_weekly_hours / WORK_DAYS_PER_WEEK;

    target_month
        .dates()
        .map(|date| {
            let mut by_role = Vec::with_capacity(standard.requirements.len());
            let mut required_total = 0.0;
            let mut actual_total = 0.0;

            for requirement in &standard.requirements {
                let required = standard.resolved_required_fte(requirement);
                let mut actual = 0.0;

                for schedule in schedules {
                    let Some(staff) = staff_list.iter().find(|s| s.id == schedule.staff_id)
                    else {
                        continue;
                    };
                    if staff.role != requirement.role {
                        continue;
                    }
                    for shift in schedule.monthly_shifts.iter().filter(|s| s.date == date) {
                        let hours = shift_settings.shift_work_hours(shift, use_actual);
                        if full_time_day_hours > 0.0 {
                            actual += hours / full_time_day_hours;
                        }
                    }
                }

                required_total += required;
                actual_total += actual;
                by_role.push(RoleFulfillment {
                    role: requirement.role,
                    measure: FulfillmentMeasure::of(required, actual),
                });
            }

            DailyFulfillment {
                date,
                overall: FulfillmentMeasure::of(required_total, actual_total),
                by_role,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMonthlySummary {
    pub role: Role,
    pub average_fulfillment_rate: f64,
    pub shortfall_days: u32,
}

/// Month-level rollup of the daily comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFulfillmentSummary {
    pub target_month: Month,
    pub total_days: u32,
    pub average_fulfillment_rate: f64,
    pub shortfall_days: u32,
    pub by_role: Vec<RoleMonthlySummary>,
}

pub fn calculate_monthly_fulfillment_summary(
    daily: &[DailyFulfillment],
    target_month: Month,
) -> MonthlyFulfillmentSummary {
    if daily.is_empty() {
        return MonthlyFulfillmentSummary {
            target_month,
            total_days: 0,
            average_fulfillment_rate: 100.0,
            shortfall_days: 0,
            by_role: Vec::new(),
        };
    }

    let total_days = daily.len() as u32;
    let average_fulfillment_rate =
        daily.iter().map(|d| d.overall.fulfillment_rate).sum::<f64>() / f64::from(total_days);
    let shortfall_days = daily
        .iter()
        .filter(|d| d.overall.status == FulfillmentStatus::Shortage)
        .count() as u32;

    let mut per_role: BTreeMap<Role, (f64, u32, u32)> = BTreeMap::new();
    for day in daily {
        for role_entry in &day.by_role {
            let bucket = per_role.entry(role_entry.role).or_insert((0.0, 0, 0));
            bucket.0 += role_entry.measure.fulfillment_rate;
            bucket.1 += 1;
            if role_entry.measure.status == FulfillmentStatus::Shortage {
                bucket.2 += 1;
            }
        }
    }
    let by_role = per_role
        .into_iter()
        .map(|(role, (rate_sum, days, shortfall))| RoleMonthlySummary {
            role,
            average_fulfillment_rate: rate_sum / f64::from(days.max(1)),
            shortfall_days: shortfall,
        })
        .collect();

    MonthlyFulfillmentSummary {
        target_month,
        total_days,
        average_fulfillment_rate,
        shortfall_days,
        by_role,
    }
}
