//! In-memory store for the three synchronized collections.
//!
//! The `Store` is the single owned state container for vehicles, customers,
//! and rentals, threaded explicitly through the sync layer, the metrics
//! engine, and the view layer. All mutation happens on the main loop's
//! logical thread; background fetches only ever hand completed collections
//! back over a channel.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    Customer, Rental, RentalStatus, Vehicle, VehicleCategory, VehicleStatus,
};

/// The three collection kinds the store synchronizes independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Vehicles,
    Customers,
    Rentals,
}

impl CollectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Vehicles => "Vehicles",
            CollectionKind::Customers => "Customers",
            CollectionKind::Rentals => "Rentals",
        }
    }
}

/// Errors from offline store mutations. These mirror the messages the
/// server would produce for the same operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Vehicle not found")]
    VehicleNotFound,
    #[error("Customer not found")]
    CustomerNotFound,
    #[error("Vehicle is not available")]
    VehicleNotAvailable,
    #[error("Rental period must be at least one day")]
    InvalidRentalPeriod,
    #[error("No active rental for this vehicle")]
    NoActiveRental,
}

/// Owned state container for the synchronized collections plus the
/// monotonic rental-id counter used when the gateway cannot assign ids.
#[derive(Debug, Default)]
pub struct Store {
    pub vehicles: Vec<Vehicle>,
    pub customers: Vec<Customer>,
    pub rentals: Vec<Rental>,
    rental_id_counter: u64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            vehicles: Vec::new(),
            customers: Vec::new(),
            rentals: Vec::new(),
            rental_id_counter: 1,
        }
    }

    // ===== Bulk replacement =====

    /// Atomically swap in a freshly synced vehicle collection.
    pub fn replace_vehicles(&mut self, vehicles: Vec<Vehicle>) {
        self.vehicles = vehicles;
    }

    pub fn replace_customers(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
    }

    pub fn replace_rentals(&mut self, rentals: Vec<Rental>) {
        self.rentals = rentals;
    }

    pub fn is_empty(&self, kind: CollectionKind) -> bool {
        match kind {
            CollectionKind::Vehicles => self.vehicles.is_empty(),
            CollectionKind::Customers => self.customers.is_empty(),
            CollectionKind::Rentals => self.rentals.is_empty(),
        }
    }

    // ===== Lookup =====

    pub fn find_vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Resolve a rental's vehicle to its model name, or "Unknown" if the
    /// vehicle was removed upstream.
    pub fn vehicle_display(&self, rental: &Rental) -> &str {
        self.find_vehicle(&rental.vehicle_id)
            .map(|v| v.model.as_str())
            .unwrap_or("Unknown")
    }

    /// Resolve a rental's customer to their name, or "Unknown".
    pub fn customer_display(&self, rental: &Rental) -> &str {
        self.find_customer(&rental.customer_id)
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown")
    }

    // ===== Rental id allocation =====

    /// Return the current counter value and advance it. Only used when the
    /// gateway did not assign an id (offline mode).
    pub fn next_rental_id(&mut self) -> String {
        let id = format!("RENT{}", self.rental_id_counter);
        self.rental_id_counter += 1;
        id
    }

    pub fn rental_id_counter(&self) -> u64 {
        self.rental_id_counter
    }

    /// Restore the counter from a persisted snapshot. Never moves the
    /// counter backwards past ids that may already be in use.
    pub fn restore_rental_id_counter(&mut self, counter: u64) {
        self.rental_id_counter = self.rental_id_counter.max(counter).max(1);
    }

    // ===== Offline mutations =====

    /// Process a rental against local data. Enforces the invariant that a
    /// vehicle has at most one active rental: the vehicle must be Available
    /// going in, and leaves Rented.
    pub fn process_rental(
        &mut self,
        vehicle_id: &str,
        customer_id: &str,
        days: u32,
        start_date: NaiveDate,
    ) -> Result<&Rental, StoreError> {
        if days == 0 {
            return Err(StoreError::InvalidRentalPeriod);
        }
        if self.find_customer(customer_id).is_none() {
            return Err(StoreError::CustomerNotFound);
        }

        let vehicle = self
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id)
            .ok_or(StoreError::VehicleNotFound)?;
        if vehicle.status != VehicleStatus::Available {
            return Err(StoreError::VehicleNotAvailable);
        }

        let total_cost = vehicle.rental_cost(days);
        vehicle.status = VehicleStatus::Rented;
        let vehicle_id = vehicle.id.clone();

        let id = self.next_rental_id();
        debug!(rental_id = %id, vehicle_id = %vehicle_id, days, "Rental processed locally");
        self.rentals.push(Rental {
            id,
            vehicle_id,
            customer_id: customer_id.to_string(),
            start_date,
            days,
            total_cost,
            status: RentalStatus::Active,
        });
        let idx = self.rentals.len() - 1;
        Ok(&self.rentals[idx])
    }

    /// Complete the active rental for a vehicle and make it available
    /// again. Resolution goes through the rental's stored vehicle reference,
    /// never by deriving ids from each other.
    pub fn return_vehicle(&mut self, vehicle_id: &str) -> Result<(), StoreError> {
        let rental = self
            .rentals
            .iter_mut()
            .find(|r| r.vehicle_id == vehicle_id && r.is_active())
            .ok_or(StoreError::NoActiveRental)?;
        rental.status = RentalStatus::Completed;

        if let Some(vehicle) = self.vehicles.iter_mut().find(|v| v.id == vehicle_id) {
            vehicle.status = VehicleStatus::Available;
        }
        debug!(vehicle_id = %vehicle_id, "Vehicle returned locally");
        Ok(())
    }

    /// Apply a local rating in offline mode. Ratings are averaged naively
    /// with the existing value, which matches how short rating histories
    /// behave upstream closely enough for offline display.
    pub fn rate_vehicle(&mut self, id: &str, rating: u8) -> Result<(), StoreError> {
        let vehicle = self
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::VehicleNotFound)?;
        vehicle.rating = if vehicle.rating > 0.0 {
            (vehicle.rating + f64::from(rating)) / 2.0
        } else {
            f64::from(rating)
        };
        Ok(())
    }

    pub fn rate_customer(&mut self, id: &str, rating: u8) -> Result<(), StoreError> {
        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::CustomerNotFound)?;
        customer.rating = if customer.rating > 0.0 {
            (customer.rating + f64::from(rating)) / 2.0
        } else {
            f64::from(rating)
        };
        Ok(())
    }
}

// ============================================================================
// Sample data
// ============================================================================

/// Built-in vehicle samples, loaded only when a sync fails and the local
/// collection is empty.
pub fn sample_vehicles() -> Vec<Vehicle> {
    let mk = |id: &str, category, model: &str, rate, rating| Vehicle {
        id: id.to_string(),
        category,
        model: model.to_string(),
        rate,
        status: VehicleStatus::Available,
        rating,
    };
    vec![
        mk("CAR001", VehicleCategory::Car, "Toyota Camry", 45.00, 4.5),
        mk("CAR002", VehicleCategory::Car, "Honda Civic", 40.00, 4.2),
        mk(
            "MOTO001",
            VehicleCategory::Motorcycle,
            "Harley Davidson",
            75.00,
            4.8,
        ),
        mk("TRUCK001", VehicleCategory::Truck, "Ford F-150", 85.00, 4.3),
    ]
}

/// Built-in customer samples. Same fallback policy as `sample_vehicles`.
pub fn sample_customers() -> Vec<Customer> {
    let mk = |id: &str, name: &str, email: &str, phone: &str, points, rating| Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        loyalty_points: points,
        rating,
    };
    vec![
        mk(
            "CUST001",
            "John Smith",
            "john@example.com",
            "(555) 123-4567",
            120,
            4.5,
        ),
        mk(
            "CUST002",
            "Sarah Johnson",
            "sarah@example.com",
            "(555) 987-6543",
            85,
            4.8,
        ),
        mk(
            "CUST003",
            "Mike Davis",
            "mike@example.com",
            "(555) 456-7890",
            45,
            4.2,
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    fn store_with_samples() -> Store {
        let mut store = Store::new();
        store.replace_vehicles(sample_vehicles());
        store.replace_customers(sample_customers());
        store
    }

    #[test]
    fn test_replace_and_find() {
        let store = store_with_samples();
        assert_eq!(store.find_vehicle("CAR001").unwrap().model, "Toyota Camry");
        assert_eq!(store.find_customer("CUST002").unwrap().name, "Sarah Johnson");
        assert!(store.find_vehicle("NOPE").is_none());
        assert!(store.is_empty(CollectionKind::Rentals));
        assert!(!store.is_empty(CollectionKind::Vehicles));
    }

    #[test]
    fn test_next_rental_id_is_monotonic() {
        let mut store = Store::new();
        assert_eq!(store.next_rental_id(), "RENT1");
        assert_eq!(store.next_rental_id(), "RENT2");
        assert_eq!(store.rental_id_counter(), 3);
    }

    #[test]
    fn test_restore_counter_never_goes_backwards() {
        let mut store = Store::new();
        store.restore_rental_id_counter(7);
        assert_eq!(store.next_rental_id(), "RENT7");
        store.restore_rental_id_counter(3);
        assert_eq!(store.next_rental_id(), "RENT8");
    }

    #[test]
    fn test_process_rental_computes_cost_and_flips_status() {
        let mut store = store_with_samples();
        let rental = store
            .process_rental("CAR001", "CUST001", 3, today())
            .expect("rental should succeed");
        assert_eq!(rental.total_cost, 135.00);
        assert_eq!(rental.status, RentalStatus::Active);
        assert_eq!(rental.vehicle_id, "CAR001");
        assert_eq!(
            store.find_vehicle("CAR001").unwrap().status,
            VehicleStatus::Rented
        );
    }

    #[test]
    fn test_at_most_one_active_rental_per_vehicle() {
        let mut store = store_with_samples();
        store
            .process_rental("CAR001", "CUST001", 3, today())
            .expect("first rental should succeed");
        let err = store
            .process_rental("CAR001", "CUST002", 2, today())
            .unwrap_err();
        assert_eq!(err, StoreError::VehicleNotAvailable);
    }

    #[test]
    fn test_return_vehicle_completes_rental() {
        let mut store = store_with_samples();
        store
            .process_rental("CAR001", "CUST001", 3, today())
            .expect("rental should succeed");

        store.return_vehicle("CAR001").expect("return should succeed");
        let rental = &store.rentals[0];
        assert_eq!(rental.status, RentalStatus::Completed);
        assert_eq!(
            store.find_vehicle("CAR001").unwrap().status,
            VehicleStatus::Available
        );

        // Vehicle can be rented again after the return
        store
            .process_rental("CAR001", "CUST002", 1, today())
            .expect("re-rental should succeed");
    }

    #[test]
    fn test_return_without_active_rental_fails() {
        let mut store = store_with_samples();
        assert_eq!(
            store.return_vehicle("CAR001").unwrap_err(),
            StoreError::NoActiveRental
        );
    }

    #[test]
    fn test_process_rental_validates_inputs() {
        let mut store = store_with_samples();
        assert_eq!(
            store
                .process_rental("NOPE", "CUST001", 3, today())
                .unwrap_err(),
            StoreError::VehicleNotFound
        );
        assert_eq!(
            store
                .process_rental("CAR001", "NOPE", 3, today())
                .unwrap_err(),
            StoreError::CustomerNotFound
        );
        assert_eq!(
            store
                .process_rental("CAR001", "CUST001", 0, today())
                .unwrap_err(),
            StoreError::InvalidRentalPeriod
        );
        // A failed process leaves no trace
        assert!(store.rentals.is_empty());
        assert!(store.find_vehicle("CAR001").unwrap().is_available());
    }

    #[test]
    fn test_dangling_references_resolve_to_unknown() {
        let mut store = store_with_samples();
        store
            .process_rental("CAR001", "CUST001", 2, today())
            .expect("rental should succeed");
        store.vehicles.retain(|v| v.id != "CAR001");
        store.customers.retain(|c| c.id != "CUST001");

        let rental = store.rentals[0].clone();
        assert_eq!(store.vehicle_display(&rental), "Unknown");
        assert_eq!(store.customer_display(&rental), "Unknown");
    }
}
