//! Vehicle domain model.

use serde::{Deserialize, Serialize};

/// Vehicle category as reported by the service.
/// Unknown categories fold into `Other` rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    Car,
    Motorcycle,
    Truck,
    #[serde(other)]
    Other,
}

impl VehicleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "Car",
            VehicleCategory::Motorcycle => "Motorcycle",
            VehicleCategory::Truck => "Truck",
            VehicleCategory::Other => "Other",
        }
    }

    /// All categories a user can pick when adding a vehicle.
    pub const SELECTABLE: [VehicleCategory; 3] = [
        VehicleCategory::Car,
        VehicleCategory::Motorcycle,
        VehicleCategory::Truck,
    ];
}

/// Availability status of a fleet vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
}

impl VehicleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Rented => "Rented",
            VehicleStatus::Maintenance => "Maintenance",
        }
    }
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub category: VehicleCategory,
    pub model: String,
    pub rate: f64,
    pub status: VehicleStatus,
    #[serde(default)]
    pub rating: f64,
}

impl Vehicle {
    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }

    /// Rental cost for a given duration at this vehicle's daily rate.
    pub fn rental_cost(&self, days: u32) -> f64 {
        self.rate * f64::from(days)
    }
}

/// Form fields for registering a new vehicle.
/// Field names match the service's add endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewVehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub category: String,
    pub model: String,
    pub rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vehicle_wire_format() {
        let json = r#"{"id":"CAR001","type":"Car","model":"Toyota Camry","rate":45.0,"status":"Available","rating":4.5}"#;
        let v: Vehicle = serde_json::from_str(json).expect("Failed to parse vehicle");
        assert_eq!(v.id, "CAR001");
        assert_eq!(v.category, VehicleCategory::Car);
        assert_eq!(v.model, "Toyota Camry");
        assert_eq!(v.status, VehicleStatus::Available);
        assert!(v.is_available());
    }

    #[test]
    fn test_unknown_category_folds_to_other() {
        let json = r#"{"id":"VAN001","type":"Van","model":"Sprinter","rate":60.0,"status":"Available","rating":4.0}"#;
        let v: Vehicle = serde_json::from_str(json).expect("Failed to parse vehicle");
        assert_eq!(v.category, VehicleCategory::Other);
    }

    #[test]
    fn test_rental_cost() {
        let v = Vehicle {
            id: "CAR001".to_string(),
            category: VehicleCategory::Car,
            model: "Toyota Camry".to_string(),
            rate: 45.0,
            status: VehicleStatus::Available,
            rating: 4.5,
        };
        assert_eq!(v.rental_cost(3), 135.0);
        assert_eq!(v.rental_cost(0), 0.0);
    }
}
