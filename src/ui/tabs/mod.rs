//! Tab-specific content rendering.

pub mod customers;
pub mod dashboard;
pub mod rentals;
pub mod reports;
pub mod vehicles;
