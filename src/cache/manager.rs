use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Customer, Rental, Vehicle};

/// Consider cache stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Persists the collection snapshot under the platform cache directory so
/// the app renders real data immediately on startup, and works fully
/// offline.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Vehicles =====

    pub fn load_vehicles(&self) -> Result<Option<CachedData<Vec<Vehicle>>>> {
        self.load("vehicles")
    }

    pub fn save_vehicles(&self, vehicles: &[Vehicle]) -> Result<()> {
        self.save("vehicles", &vehicles)
    }

    // ===== Customers =====

    pub fn load_customers(&self) -> Result<Option<CachedData<Vec<Customer>>>> {
        self.load("customers")
    }

    pub fn save_customers(&self, customers: &[Customer]) -> Result<()> {
        self.save("customers", &customers)
    }

    // ===== Rentals =====

    pub fn load_rentals(&self) -> Result<Option<CachedData<Vec<Rental>>>> {
        self.load("rentals")
    }

    pub fn save_rentals(&self, rentals: &[Rental]) -> Result<()> {
        self.save("rentals", &rentals)
    }

    // ===== Rental id counter =====

    /// The counter survives restarts so offline-assigned rental ids never
    /// collide with earlier ones.
    pub fn load_rental_id_counter(&self) -> Result<Option<CachedData<u64>>> {
        self.load("rental_id_counter")
    }

    pub fn save_rental_id_counter(&self, counter: u64) -> Result<()> {
        self.save("rental_id_counter", &counter)
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            vehicles: self.load_age("vehicles", || self.load_vehicles()),
            customers: self.load_age("customers", || self.load_customers()),
            rentals: self.load_age("rentals", || self.load_rentals()),
        }
    }

    /// Helper to check staleness and log errors without failing
    fn is_cache_stale<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> bool {
        match loader() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true, // No cache = stale
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true // Error reading = treat as stale
            }
        }
    }

    /// Check if any of the cached collections is stale
    pub fn any_stale(&self) -> bool {
        let stale_checks = [
            self.is_cache_stale("vehicles", || self.load_vehicles()),
            self.is_cache_stale("customers", || self.load_customers()),
            self.is_cache_stale("rentals", || self.load_rentals()),
        ];
        stale_checks.iter().any(|&stale| stale)
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub vehicles: Option<String>,
    pub customers: Option<String>,
    pub rentals: Option<String>,
}

impl CacheAges {
    /// Returns the most recent update time across the collections
    pub fn last_updated(&self) -> String {
        let ages = [&self.vehicles, &self.customers, &self.rentals];

        for a in ages.iter().copied().flatten() {
            return a.clone();
        }

        "never".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_minutes_and_hours() {
        let mut cached = CachedData::new(vec![1]);
        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_cache_ages_last_updated_with_values() {
        let ages = CacheAges {
            vehicles: Some("5m ago".to_string()),
            customers: None,
            rentals: None,
        };
        assert_eq!(ages.last_updated(), "5m ago");
    }

    #[test]
    fn test_cache_ages_last_updated_empty() {
        let ages = CacheAges::default();
        assert_eq!(ages.last_updated(), "never");
    }

    #[test]
    fn test_roundtrip_collections() {
        let dir = std::env::temp_dir().join(format!("fleetdeck-test-{}", std::process::id()));
        let manager = CacheManager::new(dir.clone()).expect("Failed to create cache manager");

        let vehicles = crate::store::sample_vehicles();
        manager.save_vehicles(&vehicles).expect("Failed to save");
        let loaded = manager
            .load_vehicles()
            .expect("Failed to load")
            .expect("Cache should exist");
        assert_eq!(loaded.data.len(), vehicles.len());
        assert_eq!(loaded.data[0].id, "CAR001");
        assert!(!loaded.is_stale());

        manager.save_rental_id_counter(9).expect("Failed to save");
        let counter = manager
            .load_rental_id_counter()
            .expect("Failed to load")
            .expect("Counter should exist");
        assert_eq!(counter.data, 9);

        std::fs::remove_dir_all(dir).ok();
    }
}
