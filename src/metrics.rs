//! Derived metrics computed from local collection data.
//!
//! Every function here is pure: it takes collection slices (plus an explicit
//! `today` where date matching is involved) and produces the same aggregate
//! types the reporting endpoint returns. When a report fetch fails, the view
//! renders these local aggregates instead and the two paths are
//! indistinguishable downstream.
//!
//! All ratios guard division by zero and yield 0, never NaN.

use chrono::NaiveDate;

use crate::models::{
    Customer, CustomerReport, DashboardReport, FleetReport, LoyaltyTier, Rental, RevenueReport,
    UtilizationReport, Vehicle, VehicleCategory, VehicleStatus,
};

/// Round to one decimal place, matching the service's percentage formatting.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places for currency figures.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(part as f64 / whole as f64 * 100.0)
    }
}

/// Sum of `totalCost` over rentals that started on the given date.
fn revenue_on(rentals: &[Rental], date: NaiveDate) -> f64 {
    rentals
        .iter()
        .filter(|r| r.started_on(date))
        .map(|r| r.total_cost)
        .sum()
}

fn active_count(rentals: &[Rental]) -> usize {
    rentals.iter().filter(|r| r.is_active()).count()
}

/// Headline counts for the dashboard tab.
pub fn dashboard_report(
    vehicles: &[Vehicle],
    customers: &[Customer],
    rentals: &[Rental],
    today: NaiveDate,
) -> DashboardReport {
    DashboardReport {
        vehicle_count: vehicles.len(),
        customer_count: customers.len(),
        active_rentals: active_count(rentals),
        today_revenue: round2(revenue_on(rentals, today)),
    }
}

/// Fleet composition and utilization.
pub fn fleet_report(vehicles: &[Vehicle]) -> FleetReport {
    let total = vehicles.len();
    let mut available = 0;
    let mut rented = 0;
    let mut maintenance = 0;
    let mut rating_sum = 0.0;
    for vehicle in vehicles {
        match vehicle.status {
            VehicleStatus::Available => available += 1,
            VehicleStatus::Rented => rented += 1,
            VehicleStatus::Maintenance => maintenance += 1,
        }
        rating_sum += vehicle.rating;
    }
    let avg_rating = if total == 0 {
        0.0
    } else {
        round1(rating_sum / total as f64)
    };
    FleetReport {
        total_vehicles: total,
        available,
        rented,
        maintenance,
        utilization: percentage(rented, total),
        avg_rating,
    }
}

/// Revenue totals and per-rental average.
pub fn revenue_report(rentals: &[Rental], today: NaiveDate) -> RevenueReport {
    let total_rentals = rentals.len();
    let total_revenue: f64 = rentals.iter().map(|r| r.total_cost).sum();
    let avg_per_rental = if total_rentals == 0 {
        0.0
    } else {
        round2(total_revenue / total_rentals as f64)
    };
    RevenueReport {
        total_revenue: round2(total_revenue),
        today_revenue: round2(revenue_on(rentals, today)),
        total_rentals,
        active_rentals: active_count(rentals),
        avg_per_rental,
    }
}

/// Loyalty segmentation and retention.
pub fn customer_report(customers: &[Customer]) -> CustomerReport {
    let total = customers.len();
    let mut gold = 0;
    let mut silver = 0;
    let mut bronze = 0;
    let mut rating_sum = 0.0;
    for customer in customers {
        match customer.loyalty_tier() {
            LoyaltyTier::Gold => gold += 1,
            LoyaltyTier::Silver => silver += 1,
            LoyaltyTier::Bronze => bronze += 1,
        }
        rating_sum += customer.rating;
    }
    let avg_rating = if total == 0 {
        0.0
    } else {
        round1(rating_sum / total as f64)
    };
    CustomerReport {
        total_customers: total,
        gold_members: gold,
        silver_members: silver,
        bronze_members: bronze,
        avg_rating,
        retention_rate: return_customer_rate(customers),
    }
}

/// Rental-duration and demand metrics.
pub fn utilization_report(
    vehicles: &[Vehicle],
    customers: &[Customer],
    rentals: &[Rental],
) -> UtilizationReport {
    let total_rentals = rentals.len();
    let total_rental_days: u64 = rentals.iter().map(|r| u64::from(r.days)).sum();
    let avg_rental_duration = if total_rentals == 0 {
        0.0
    } else {
        round1(total_rental_days as f64 / total_rentals as f64)
    };
    let rented = vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Rented)
        .count();
    let peak_demand_type = most_rented_category(vehicles, rentals)
        .map(|c| c.label().to_string())
        .unwrap_or_else(|| "None".to_string());
    UtilizationReport {
        utilization: percentage(rented, vehicles.len()),
        avg_rental_duration,
        total_rental_days,
        peak_demand_type,
        retention_rate: return_customer_rate(customers),
    }
}

/// The vehicle category with the most rentals.
///
/// Rentals whose vehicle cannot be resolved are skipped. Ties break toward
/// the category encountered first in iteration order. Returns `None` when no
/// rental resolves to a vehicle.
pub fn most_rented_category(vehicles: &[Vehicle], rentals: &[Rental]) -> Option<VehicleCategory> {
    // Encounter-ordered tally so ties resolve deterministically.
    let mut tallies: Vec<(VehicleCategory, usize)> = Vec::new();
    for rental in rentals {
        let Some(vehicle) = vehicles.iter().find(|v| v.id == rental.vehicle_id) else {
            continue;
        };
        match tallies.iter_mut().find(|(c, _)| *c == vehicle.category) {
            Some((_, count)) => *count += 1,
            None => tallies.push((vehicle.category, 1)),
        }
    }
    let mut best: Option<(VehicleCategory, usize)> = None;
    for &(category, count) in &tallies {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((category, count)),
        }
    }
    best.map(|(category, _)| category)
}

/// Percentage of customers with non-zero loyalty points, one decimal place.
/// Used as a retention proxy. 0 when there are no customers.
pub fn return_customer_rate(customers: &[Customer]) -> f64 {
    let returning = customers.iter().filter(|c| c.loyalty_points > 0).count();
    percentage(returning, customers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RentalStatus;
    use crate::store::{sample_customers, sample_vehicles};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    fn rental(id: &str, vehicle_id: &str, days: u32, cost: f64, status: RentalStatus) -> Rental {
        Rental {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            customer_id: "CUST001".to_string(),
            start_date: today(),
            days,
            total_cost: cost,
            status,
        }
    }

    #[test]
    fn test_fleet_counts_sum_to_total() {
        let mut vehicles = sample_vehicles();
        vehicles[0].status = VehicleStatus::Rented;
        vehicles[1].status = VehicleStatus::Maintenance;

        let report = fleet_report(&vehicles);
        assert_eq!(
            report.available + report.rented + report.maintenance,
            report.total_vehicles
        );
        assert_eq!(report.rented, 1);
        assert_eq!(report.utilization, 25.0);
    }

    #[test]
    fn test_fleet_report_empty_is_all_zeros() {
        let report = fleet_report(&[]);
        assert_eq!(report, FleetReport::default());
    }

    #[test]
    fn test_dashboard_today_revenue_matches_start_date() {
        let vehicles = sample_vehicles();
        let customers = sample_customers();
        let mut rentals = vec![
            rental("RENT1", "CAR001", 3, 135.0, RentalStatus::Active),
            rental("RENT2", "CAR002", 2, 80.0, RentalStatus::Completed),
        ];
        // Yesterday's rental does not count toward today's revenue
        rentals[1].start_date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();

        let report = dashboard_report(&vehicles, &customers, &rentals, today());
        assert_eq!(report.vehicle_count, 4);
        assert_eq!(report.customer_count, 3);
        assert_eq!(report.active_rentals, 1);
        assert_eq!(report.today_revenue, 135.0);
    }

    #[test]
    fn test_revenue_report_average() {
        let rentals = vec![
            rental("RENT1", "CAR001", 3, 135.0, RentalStatus::Active),
            rental("RENT2", "CAR002", 1, 40.0, RentalStatus::Completed),
        ];
        let report = revenue_report(&rentals, today());
        assert_eq!(report.total_revenue, 175.0);
        assert_eq!(report.total_rentals, 2);
        assert_eq!(report.active_rentals, 1);
        assert_eq!(report.avg_per_rental, 87.5);
    }

    #[test]
    fn test_revenue_report_empty_is_all_zeros() {
        assert_eq!(revenue_report(&[], today()), RevenueReport::default());
    }

    #[test]
    fn test_customer_report_tiers_and_retention() {
        let mut customers = sample_customers();
        customers[2].loyalty_points = 0;

        let report = customer_report(&customers);
        assert_eq!(report.total_customers, 3);
        assert_eq!(report.gold_members, 1);
        assert_eq!(report.silver_members, 1);
        assert_eq!(report.bronze_members, 1);
        // Two of three customers hold points
        assert_eq!(report.retention_rate, 66.7);
    }

    #[test]
    fn test_return_customer_rate_empty_and_permutation_invariant() {
        assert_eq!(return_customer_rate(&[]), 0.0);

        let mut customers = sample_customers();
        let forward = return_customer_rate(&customers);
        customers.reverse();
        assert_eq!(return_customer_rate(&customers), forward);
    }

    #[test]
    fn test_active_count_is_order_independent() {
        let mut rentals = vec![
            rental("RENT1", "CAR001", 3, 135.0, RentalStatus::Active),
            rental("RENT2", "CAR002", 2, 80.0, RentalStatus::Completed),
            rental("RENT3", "MOTO001", 1, 75.0, RentalStatus::Active),
        ];
        let forward = revenue_report(&rentals, today()).active_rentals;
        rentals.reverse();
        assert_eq!(revenue_report(&rentals, today()).active_rentals, forward);
        assert_eq!(forward, 2);
    }

    #[test]
    fn test_most_rented_category_majority() {
        let vehicles = sample_vehicles();
        let rentals = vec![
            rental("RENT1", "CAR001", 3, 135.0, RentalStatus::Active),
            rental("RENT2", "TRUCK001", 2, 170.0, RentalStatus::Completed),
            rental("RENT3", "CAR002", 1, 40.0, RentalStatus::Completed),
        ];
        assert_eq!(
            most_rented_category(&vehicles, &rentals),
            Some(VehicleCategory::Car)
        );
    }

    #[test]
    fn test_most_rented_category_tie_breaks_to_first_encountered() {
        let vehicles = sample_vehicles();
        let rentals = vec![
            rental("RENT1", "TRUCK001", 2, 170.0, RentalStatus::Active),
            rental("RENT2", "CAR001", 3, 135.0, RentalStatus::Active),
        ];
        assert_eq!(
            most_rented_category(&vehicles, &rentals),
            Some(VehicleCategory::Truck)
        );
    }

    #[test]
    fn test_most_rented_category_skips_unresolved() {
        let vehicles = sample_vehicles();
        let rentals = vec![rental("RENT1", "GONE", 2, 90.0, RentalStatus::Active)];
        assert_eq!(most_rented_category(&vehicles, &rentals), None);
        assert_eq!(most_rented_category(&vehicles, &[]), None);
    }

    #[test]
    fn test_utilization_report_durations() {
        let mut vehicles = sample_vehicles();
        vehicles[0].status = VehicleStatus::Rented;
        let customers = sample_customers();
        let rentals = vec![
            rental("RENT1", "CAR001", 3, 135.0, RentalStatus::Active),
            rental("RENT2", "CAR002", 2, 80.0, RentalStatus::Completed),
        ];

        let report = utilization_report(&vehicles, &customers, &rentals);
        assert_eq!(report.total_rental_days, 5);
        assert_eq!(report.avg_rental_duration, 2.5);
        assert_eq!(report.utilization, 25.0);
        assert_eq!(report.peak_demand_type, "Car");
    }

    #[test]
    fn test_utilization_report_empty_uses_sentinel() {
        let report = utilization_report(&[], &[], &[]);
        assert_eq!(report.peak_demand_type, "None");
        assert_eq!(report.utilization, 0.0);
        assert_eq!(report.avg_rental_duration, 0.0);
    }
}
