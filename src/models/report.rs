//! Report aggregate types.
//!
//! These are the payloads returned by the service's reporting endpoint.
//! The metrics engine produces the exact same types from local data, so
//! the server path and the local fallback path are interchangeable at
//! every render site.

use serde::{Deserialize, Serialize};

/// Dashboard headline counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[serde(default)]
    pub vehicle_count: usize,
    #[serde(default)]
    pub customer_count: usize,
    #[serde(default)]
    pub active_rentals: usize,
    #[serde(default)]
    pub today_revenue: f64,
}

/// Fleet status overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    #[serde(default)]
    pub total_vehicles: usize,
    #[serde(default)]
    pub available: usize,
    #[serde(default)]
    pub rented: usize,
    #[serde(default)]
    pub maintenance: usize,
    /// Percentage of the fleet currently rented, one decimal place.
    #[serde(default)]
    pub utilization: f64,
    #[serde(default)]
    pub avg_rating: f64,
}

/// Revenue analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub today_revenue: f64,
    #[serde(default)]
    pub total_rentals: usize,
    #[serde(default)]
    pub active_rentals: usize,
    #[serde(default)]
    pub avg_per_rental: f64,
}

/// Customer insights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReport {
    #[serde(default)]
    pub total_customers: usize,
    #[serde(default)]
    pub gold_members: usize,
    #[serde(default)]
    pub silver_members: usize,
    #[serde(default)]
    pub bronze_members: usize,
    #[serde(default)]
    pub avg_rating: f64,
    /// Percentage of customers with non-zero loyalty points.
    #[serde(default)]
    pub retention_rate: f64,
}

/// Utilization metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationReport {
    #[serde(default)]
    pub utilization: f64,
    #[serde(default)]
    pub avg_rental_duration: f64,
    #[serde(default)]
    pub total_rental_days: u64,
    /// Category with the most rentals, or "None" when nothing resolves.
    #[serde(default = "default_peak_demand")]
    pub peak_demand_type: String,
    #[serde(default)]
    pub retention_rate: f64,
}

fn default_peak_demand() -> String {
    "None".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_report() {
        let json = r#"{"vehicleCount":4,"customerCount":3,"activeRentals":1,"todayRevenue":135.00}"#;
        let r: DashboardReport = serde_json::from_str(json).expect("Failed to parse dashboard");
        assert_eq!(r.vehicle_count, 4);
        assert_eq!(r.customer_count, 3);
        assert_eq!(r.active_rentals, 1);
        assert_eq!(r.today_revenue, 135.0);
    }

    #[test]
    fn test_parse_fleet_report_with_missing_fields() {
        // Servers may omit fields they consider zero
        let json = r#"{"totalVehicles":2,"available":2,"rented":0}"#;
        let r: FleetReport = serde_json::from_str(json).expect("Failed to parse fleet report");
        assert_eq!(r.total_vehicles, 2);
        assert_eq!(r.maintenance, 0);
        assert_eq!(r.utilization, 0.0);
    }

    #[test]
    fn test_parse_utilization_report_defaults() {
        let r: UtilizationReport = serde_json::from_str("{}").expect("Failed to parse");
        assert_eq!(r.peak_demand_type, "None");
        assert_eq!(r.utilization, 0.0);
    }
}
