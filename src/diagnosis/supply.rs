//! Aggregate supply/demand estimation for a not-yet-generated month.
//!
//! Supply is a headcount-day estimate from each staff member's desired
//! weekly shift count; demand is business days × required headcount. The
//! per-slot split divides a staff member's monthly capacity evenly across
//! all slots they are eligible for — day/night exclusivity is modeled, finer
//! preference weighting deliberately is not.

use chrono::{Datelike, Weekday};

use crate::model::{is_night_slot_name, ShiftRequirement, Staff};

use super::types::{SupplyDemandBalance, TimeSlotBalance};

/// Average weeks per month for headcount-day supply estimation. Coarser than
/// the 4.33 used for hours-based FTE on purpose; the two approximations serve
/// different calculations and must stay distinct.
pub const WEEKS_PER_MONTH_SUPPLY: f64 = 4.5;

/// Days counted toward demand: every calendar day when the facility runs a
/// night slot, weekdays only otherwise.
pub fn calculate_business_days(requirements: &ShiftRequirement) -> u32 {
    let has_night_shift = requirements
        .time_slots
        .iter()
        .any(|slot| is_night_slot_name(&slot.name));

    requirements
        .target_month
        .dates()
        .filter(|date| {
            has_night_shift
                || !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        })
        .count() as u32
}

/// Staff-days one member can offer in a month.
pub fn staff_monthly_days(staff: &Staff) -> i64 {
    (f64::from(staff.weekly_work_count.hope) * WEEKS_PER_MONTH_SUPPLY).round() as i64
}

pub fn calculate_supply_demand_balance(
    staff_list: &[Staff],
    requirements: &ShiftRequirement,
    business_days: u32,
) -> SupplyDemandBalance {
    let total_supply: i64 = staff_list.iter().map(staff_monthly_days).sum();

    let daily_required: i64 = requirements
        .requirements
        .values()
        .map(|req| i64::from(req.total_staff))
        .sum();
    let total_demand = i64::from(business_days) * daily_required;

    let by_time_slot = calculate_time_slot_balances(staff_list, requirements, business_days);

    SupplyDemandBalance {
        total_supply,
        total_demand,
        balance: total_supply - total_demand,
        by_time_slot,
    }
}

fn calculate_time_slot_balances(
    staff_list: &[Staff],
    requirements: &ShiftRequirement,
    business_days: u32,
) -> std::collections::BTreeMap<String, TimeSlotBalance> {
    let slot_count = requirements.requirements.len();

    requirements
        .requirements
        .iter()
        .map(|(slot_name, req)| {
            let demand = i64::from(business_days) * i64::from(req.total_staff);

            let mut supply = 0i64;
            for staff in staff_list {
                if staff.can_work_in_slot(slot_name) && slot_count > 0 {
                    // even split of the member's capacity across eligible slots
                    supply +=
                        (staff_monthly_days(staff) as f64 / slot_count as f64).round() as i64;
                }
            }

            let fulfillment_rate = if demand > 0 {
                (supply as f64 / demand as f64 * 100.0).round() as i64
            } else {
                100
            };

            (
                slot_name.clone(),
                TimeSlotBalance {
                    supply,
                    demand,
                    balance: supply - demand,
                    fulfillment_rate,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        EmploymentType, Month, SlotRequirement, StaffId, TimeSlotDefinition, TimeSlotPreference,
        WeeklyWorkCount,
    };
    use std::collections::BTreeMap;

    fn staff(id: &str, hope: u32, preference: TimeSlotPreference) -> crate::model::Staff {
        crate::model::Staff {
            id: StaffId::new(id),
            name: id.to_owned(),
            role: crate::model::Role::CareWorker,
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

    fn slot(name: &str) -> TimeSlotDefinition {
        TimeSlotDefinition {
            id: String::new(),
            name: name.to_owned(),
            start: None,
            end: None,
            rest_hours: 0.0,
        }
    }

    fn requirement(month: &str, slots: &[(&str, u32)]) -> ShiftRequirement {
        let mut requirements = BTreeMap::new();
        for (name, count) in slots {
            requirements.insert((*name).to_owned(), SlotRequirement::total(*count));
        }
        ShiftRequirement {
            target_month: month.parse::<Month>().unwrap(),
            time_slots: slots.iter().map(|(name, _)| slot(name)).collect(),
            requirements,
        }
    }

    #[test]
    fn weekdays_only_without_night_slot() {
        // 2025-01 has 23 weekdays
        let req = requirement("2025-01", &[("日勤", 2)]);
        assert_eq!(calculate_business_days(&req), 23);
    }

    #[test]
    fn every_day_counts_with_night_slot() {
        let req = requirement("2025-01", &[("日勤", 2), ("夜勤", 1)]);
        assert_eq!(calculate_business_days(&req), 31);
    }

    #[test]
    fn supply_uses_four_and_a_half_weeks() {
        let s = staff("s1", 5, TimeSlotPreference::Any);
        assert_eq!(staff_monthly_days(&s), 23); // round(5 × 4.5)
    }

    #[test]
    fn balance_is_supply_minus_demand() {
        let req = requirement("2025-01", &[("日勤", 2), ("早番", 2), ("遅番", 2)]);
        let staff_list = vec![staff("s1", 5, TimeSlotPreference::Any)];
        let business_days = calculate_business_days(&req);
        let balance = calculate_supply_demand_balance(&staff_list, &req, business_days);
        assert_eq!(balance.total_supply, 23);
        assert_eq!(balance.total_demand, i64::from(business_days) * 6);
        assert_eq!(balance.balance, balance.total_supply - balance.total_demand);
        assert!(balance.balance < 0);
    }

    #[test]
    fn day_only_staff_do_not_supply_night_slots() {
        let req = requirement("2025-01", &[("日勤", 1), ("夜勤", 1)]);
        let staff_list = vec![staff("s1", 4, TimeSlotPreference::DayOnly)];
        let balance = calculate_supply_demand_balance(&staff_list, &req, 31);
        assert_eq!(balance.by_time_slot["夜勤"].supply, 0);
        assert!(balance.by_time_slot["日勤"].supply > 0);
    }

    #[test]
    fn fulfillment_rate_rounds_and_handles_zero_demand() {
        let req = requirement("2025-01", &[("日勤", 0)]);
        let staff_list = vec![staff("s1", 5, TimeSlotPreference::Any)];
        let balance = calculate_supply_demand_balance(&staff_list, &req, 23);
        assert_eq!(balance.by_time_slot["日勤"].fulfillment_rate, 100);

        // 20/30 rounds to 67
        let slot = TimeSlotBalance {
            supply: 20,
            demand: 30,
            balance: -10,
            fulfillment_rate: (20f64 / 30f64 * 100.0).round() as i64,
        };
        assert_eq!(slot.fulfillment_rate, 67);
    }
}
