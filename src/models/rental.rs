//! Rental domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalStatus {
    Active,
    Completed,
}

impl RentalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RentalStatus::Active => "Active",
            RentalStatus::Completed => "Completed",
        }
    }
}

/// A rental linking a vehicle to a customer for a number of days.
///
/// The vehicle and customer references may dangle if the referenced entity
/// was removed upstream; displays resolve missing references to "Unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub vehicle_id: String,
    pub customer_id: String,
    pub start_date: NaiveDate,
    pub days: u32,
    pub total_cost: f64,
    pub status: RentalStatus,
}

impl Rental {
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }

    /// Whether this rental started on the given calendar date.
    pub fn started_on(&self, date: NaiveDate) -> bool {
        self.start_date == date
    }
}

/// Form fields for processing a new rental.
/// Field names match the service's process endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewRental {
    pub vehicle: String,
    pub customer: String,
    pub days: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rental_wire_format() {
        let json = r#"{"id":"RENT1","vehicleId":"CAR001","customerId":"CUST001","startDate":"2026-08-27","days":3,"totalCost":135.0,"status":"Active"}"#;
        let r: Rental = serde_json::from_str(json).expect("Failed to parse rental");
        assert_eq!(r.id, "RENT1");
        assert_eq!(r.vehicle_id, "CAR001");
        assert_eq!(r.customer_id, "CUST001");
        assert_eq!(r.days, 3);
        assert!(r.is_active());
        assert!(r.started_on(NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()));
        assert!(!r.started_on(NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()));
    }
}
