//! Data models for rental fleet entities.
//!
//! This module contains the data structures used to represent
//! fleet data exchanged with the rental service:
//!
//! - `Vehicle`: fleet inventory with category, rate, and status
//! - `Customer`: renters with loyalty points and derived tier
//! - `Rental`: a vehicle/customer pairing with duration and cost
//! - Report types: server-side aggregates for the dashboard and reports

pub mod customer;
pub mod rental;
pub mod report;
pub mod vehicle;

pub use customer::{Customer, LoyaltyTier, NewCustomer};
pub use rental::{NewRental, Rental, RentalStatus};
pub use report::{CustomerReport, DashboardReport, FleetReport, RevenueReport, UtilizationReport};
pub use vehicle::{NewVehicle, Vehicle, VehicleCategory, VehicleStatus};
