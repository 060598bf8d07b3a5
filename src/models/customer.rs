//! Customer domain model and loyalty tier classification.

use serde::{Deserialize, Serialize};

/// Loyalty points needed for Gold membership.
const GOLD_THRESHOLD: u32 = 100;

/// Loyalty points needed for Silver membership.
const SILVER_THRESHOLD: u32 = 50;

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub loyalty_points: u32,
    #[serde(default)]
    pub rating: f64,
}

impl Customer {
    pub fn loyalty_tier(&self) -> LoyaltyTier {
        LoyaltyTier::from_points(self.loyalty_points)
    }
}

/// Derived loyalty classification. Never stored - always computed from points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoyaltyTier {
    Gold,
    Silver,
    Bronze,
}

impl LoyaltyTier {
    pub fn from_points(points: u32) -> Self {
        if points >= GOLD_THRESHOLD {
            LoyaltyTier::Gold
        } else if points >= SILVER_THRESHOLD {
            LoyaltyTier::Silver
        } else {
            LoyaltyTier::Bronze
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoyaltyTier::Gold => "Gold",
            LoyaltyTier::Silver => "Silver",
            LoyaltyTier::Bronze => "Bronze",
        }
    }
}

/// Form fields for registering a new customer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCustomer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loyalty_tier_thresholds() {
        assert_eq!(LoyaltyTier::from_points(100), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_points(150), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_points(99), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_points(50), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_points(49), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_points(0), LoyaltyTier::Bronze);
    }

    #[test]
    fn test_parse_customer_wire_format() {
        let json = r#"{"id":"CUST001","name":"John Smith","email":"john@example.com","phone":"(555) 123-4567","loyaltyPoints":120,"rating":4.5}"#;
        let c: Customer = serde_json::from_str(json).expect("Failed to parse customer");
        assert_eq!(c.id, "CUST001");
        assert_eq!(c.loyalty_points, 120);
        assert_eq!(c.loyalty_tier(), LoyaltyTier::Gold);
    }
}
