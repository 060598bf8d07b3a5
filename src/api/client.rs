//! API client for communicating with the rental service's REST API.
//!
//! This module provides the `ApiClient` struct for fetching the vehicle,
//! customer, and rental collections, submitting mutations, and pulling
//! pre-aggregated report payloads.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    Customer, CustomerReport, DashboardReport, FleetReport, NewCustomer, NewRental, NewVehicle,
    Rental, RevenueReport, UtilizationReport, Vehicle,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Wire envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
struct VehiclesEnvelope {
    #[serde(default)]
    vehicles: Vec<Vehicle>,
}

#[derive(Debug, Deserialize)]
struct CustomersEnvelope {
    #[serde(default)]
    customers: Vec<Customer>,
}

#[derive(Debug, Deserialize)]
struct RentalsEnvelope {
    #[serde(default)]
    rentals: Vec<Rental>,
}

/// Every mutation endpoint answers with this envelope: `success` plus a
/// human-readable `message`, or `success:false`/absent with an `error`
/// string. `into_result` folds it into a tagged outcome so callers never
/// inspect loose fields.
#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(rename = "rentalId", default)]
    rental_id: Option<String>,
}

impl MutationEnvelope {
    fn into_result(self, default_message: &str) -> Result<String, ApiError> {
        if self.success {
            Ok(self
                .message
                .unwrap_or_else(|| default_message.to_string()))
        } else {
            Err(ApiError::Rejected(
                self.error.unwrap_or_else(|| default_message.to_string()),
            ))
        }
    }
}

/// Confirmation for a processed rental: server message plus the assigned id.
#[derive(Debug, Clone)]
pub struct RentalConfirmation {
    pub message: String,
    pub rental_id: String,
}

// ============================================================================
// Client
// ============================================================================

/// API client for the rental service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// Check if a response is successful, converting the body into a typed
    /// error if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = self.url(path_and_query);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post_form<B: Serialize>(
        &self,
        path_and_query: &str,
        form: &B,
    ) -> Result<MutationEnvelope> {
        let url = self.url(path_and_query);
        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        // Mutation failures come back with error statuses but a parseable
        // envelope body; parse it regardless so the server's message survives.
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse mutation response from {}", url))
    }

    async fn delete(&self, path_and_query: &str) -> Result<MutationEnvelope> {
        let url = self.url(path_and_query);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse delete response from {}", url))
    }

    // ===== Collection listing =====

    /// Fetch the full vehicle collection.
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        let envelope: VehiclesEnvelope = self.get("/api/vehicles?action=list").await?;
        debug!(count = envelope.vehicles.len(), "Vehicles fetched");
        Ok(envelope.vehicles)
    }

    /// Fetch the full customer collection.
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let envelope: CustomersEnvelope = self.get("/api/customers?action=list").await?;
        debug!(count = envelope.customers.len(), "Customers fetched");
        Ok(envelope.customers)
    }

    /// Fetch the full rental collection.
    pub async fn list_rentals(&self) -> Result<Vec<Rental>> {
        let envelope: RentalsEnvelope = self.get("/api/rentals?action=list").await?;
        debug!(count = envelope.rentals.len(), "Rentals fetched");
        Ok(envelope.rentals)
    }

    // ===== Mutations =====

    /// Register a new vehicle. Validation happens server-side; the returned
    /// string is the server's confirmation message.
    pub async fn add_vehicle(&self, vehicle: &NewVehicle) -> Result<String> {
        let envelope = self.post_form("/api/vehicles?action=add", vehicle).await?;
        Ok(envelope.into_result("Vehicle added successfully")?)
    }

    /// Register a new customer.
    pub async fn add_customer(&self, customer: &NewCustomer) -> Result<String> {
        let envelope = self.post_form("/api/customers?action=add", customer).await?;
        Ok(envelope.into_result("Customer registered successfully")?)
    }

    /// Remove a vehicle. Deleting an already-deleted id is reported as a
    /// no-op failure with a message, never a crash.
    pub async fn delete_vehicle(&self, id: &str) -> Result<String> {
        let envelope = self
            .delete(&format!("/api/vehicles?action=delete&id={}", id))
            .await?;
        Ok(envelope.into_result("Vehicle removed successfully")?)
    }

    /// Remove a customer.
    pub async fn delete_customer(&self, id: &str) -> Result<String> {
        let envelope = self
            .delete(&format!("/api/customers?action=delete&id={}", id))
            .await?;
        Ok(envelope.into_result("Customer removed successfully")?)
    }

    /// Rate a vehicle. The rating must already be validated to 1-5 by the
    /// caller; this method only carries it to the server.
    pub async fn rate_vehicle(&self, id: &str, rating: u8) -> Result<String> {
        let form = [
            ("action", "rate".to_string()),
            ("id", id.to_string()),
            ("rating", rating.to_string()),
        ];
        let envelope = self.post_form("/api/vehicles", &form).await?;
        Ok(envelope.into_result("Vehicle rated successfully")?)
    }

    /// Rate a customer. Same precondition as `rate_vehicle`.
    pub async fn rate_customer(&self, id: &str, rating: u8) -> Result<String> {
        let form = [
            ("action", "rate".to_string()),
            ("id", id.to_string()),
            ("rating", rating.to_string()),
        ];
        let envelope = self.post_form("/api/customers", &form).await?;
        Ok(envelope.into_result("Customer rated successfully")?)
    }

    /// Process a new rental. On success the server assigns the rental id.
    pub async fn process_rental(&self, rental: &NewRental) -> Result<RentalConfirmation> {
        let envelope = self.post_form("/api/rentals?action=process", rental).await?;
        let rental_id = envelope.rental_id.clone().unwrap_or_default();
        let message = envelope.into_result("Rental processed successfully")?;
        Ok(RentalConfirmation { message, rental_id })
    }

    /// Return a rented vehicle: the active rental completes and the vehicle
    /// becomes available again.
    pub async fn return_vehicle(&self, vehicle_id: &str) -> Result<String> {
        let form = [
            ("action", "return".to_string()),
            ("vehicleId", vehicle_id.to_string()),
        ];
        let envelope = self.post_form("/api/rentals", &form).await?;
        Ok(envelope.into_result("Vehicle returned successfully")?)
    }

    // ===== Reports =====

    pub async fn fetch_dashboard_report(&self) -> Result<DashboardReport> {
        self.get("/api/reports?type=dashboard").await
    }

    pub async fn fetch_fleet_report(&self) -> Result<FleetReport> {
        self.get("/api/reports?type=fleet").await
    }

    pub async fn fetch_revenue_report(&self) -> Result<RevenueReport> {
        self.get("/api/reports?type=revenue").await
    }

    pub async fn fetch_customer_report(&self) -> Result<CustomerReport> {
        self.get("/api/reports?type=customer").await
    }

    pub async fn fetch_utilization_report(&self) -> Result<UtilizationReport> {
        self.get("/api/reports?type=utilization").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let api = ApiClient::new("http://localhost:8080/").expect("Failed to build client");
        assert_eq!(
            api.url("/api/vehicles?action=list"),
            "http://localhost:8080/api/vehicles?action=list"
        );
    }

    #[test]
    fn test_mutation_envelope_success() {
        let json = r#"{"success":true,"message":"Vehicle added successfully"}"#;
        let envelope: MutationEnvelope = serde_json::from_str(json).expect("Failed to parse");
        let msg = envelope.into_result("fallback").expect("Expected success");
        assert_eq!(msg, "Vehicle added successfully");
    }

    #[test]
    fn test_mutation_envelope_error() {
        let json = r#"{"error":"Vehicle not found"}"#;
        let envelope: MutationEnvelope = serde_json::from_str(json).expect("Failed to parse");
        let err = envelope.into_result("fallback").unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Vehicle not found"));
    }

    #[test]
    fn test_mutation_envelope_missing_message_uses_default() {
        let json = r#"{"success":true}"#;
        let envelope: MutationEnvelope = serde_json::from_str(json).expect("Failed to parse");
        let msg = envelope.into_result("Vehicle removed successfully").unwrap();
        assert_eq!(msg, "Vehicle removed successfully");
    }

    #[test]
    fn test_rental_confirmation_envelope() {
        let json =
            r#"{"success":true,"message":"Rental processed successfully","rentalId":"RENT7"}"#;
        let envelope: MutationEnvelope = serde_json::from_str(json).expect("Failed to parse");
        assert_eq!(envelope.rental_id.as_deref(), Some("RENT7"));
        assert!(envelope.success);
    }
}
