//! Application state management for Fleetdeck.
//!
//! The `App` struct owns the store, the sync machinery, and all UI state.
//! Background fetches run in spawned tasks and report back over an MPSC
//! channel; `check_background_tasks` drains that channel on the main loop so
//! every store mutation happens on one logical thread.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::cache::CacheManager;
use crate::config::Config;
use crate::models::{NewCustomer, NewRental, NewVehicle, VehicleCategory};
use crate::store::{CollectionKind, Store};
use crate::sync::{self, Applied, ReportKind, ReportSet, SyncEvent, SyncStates};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A full refresh produces nine events (three collections, five reports,
/// completion), so 32 leaves plenty of headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for a single form field input.
const MAX_FIELD_LENGTH: usize = 60;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Vehicles,
    Customers,
    Rentals,
    Reports,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Vehicles => "Vehicles",
            Tab::Customers => "Customers",
            Tab::Rentals => "Rentals",
            Tab::Reports => "Reports",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Vehicles,
            Tab::Vehicles => Tab::Customers,
            Tab::Customers => Tab::Rentals,
            Tab::Rentals => Tab::Reports,
            Tab::Reports => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Reports,
            Tab::Vehicles => Tab::Dashboard,
            Tab::Customers => Tab::Vehicles,
            Tab::Rentals => Tab::Customers,
            Tab::Reports => Tab::Rentals,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    AddingVehicle,
    AddingCustomer,
    ProcessingRental,
    Rating,
    ConfirmingDelete,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Which entity a rate or delete prompt targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Vehicle,
    Customer,
}

impl TargetKind {
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Vehicle => "vehicle",
            TargetKind::Customer => "customer",
        }
    }
}

/// Add-vehicle form state
#[derive(Debug, Default)]
pub struct VehicleForm {
    pub id: String,
    pub category_index: usize,
    pub model: String,
    pub rate: String,
    pub focus: usize,
}

impl VehicleForm {
    pub const FIELD_COUNT: usize = 4;

    pub fn category(&self) -> VehicleCategory {
        VehicleCategory::SELECTABLE[self.category_index % VehicleCategory::SELECTABLE.len()]
    }

    pub fn cycle_category(&mut self) {
        self.category_index = (self.category_index + 1) % VehicleCategory::SELECTABLE.len();
    }
}

/// Add-customer form state
#[derive(Debug, Default)]
pub struct CustomerForm {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub focus: usize,
}

impl CustomerForm {
    pub const FIELD_COUNT: usize = 4;
}

/// New-rental form state: picks from the current collections.
#[derive(Debug, Default)]
pub struct RentalForm {
    pub vehicle_index: usize,
    pub customer_index: usize,
    pub days: String,
    pub focus: usize,
}

impl RentalForm {
    pub const FIELD_COUNT: usize = 3;
}

/// Rate prompt state
#[derive(Debug)]
pub struct RatePrompt {
    pub kind: TargetKind,
    pub id: String,
    pub name: String,
}

/// Delete confirmation state
#[derive(Debug)]
pub struct DeletePrompt {
    pub kind: TargetKind,
    pub id: String,
    pub name: String,
}

// ============================================================================
// App
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub cache: CacheManager,

    // Domain state
    pub store: Store,
    pub sync_states: SyncStates,
    pub reports: ReportSet,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub vehicle_selection: usize,
    pub customer_selection: usize,
    pub rental_selection: usize,
    pub report_selection: usize,

    // Form state
    pub vehicle_form: VehicleForm,
    pub customer_form: CustomerForm,
    pub rental_form: RentalForm,
    pub rate_prompt: Option<RatePrompt>,
    pub delete_prompt: Option<DeletePrompt>,

    // Background task channel
    refresh_rx: Option<mpsc::Receiver<SyncEvent>>,
    refresh_tx: mpsc::Sender<SyncEvent>,

    // Status message
    pub status_message: Option<String>,

    // Cache ages for status bar
    pub cache_ages: crate::cache::manager::CacheAges,

    // Offline mode - when true, mutations apply to local data only
    pub offline_mode: bool,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(server_url = %config.server_url, "Config loaded");

        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let api = ApiClient::new(config.server_url.clone())?;
        let cache = CacheManager::new(cache_dir)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let offline_mode = config.offline_mode;

        Ok(Self {
            config,
            api,
            cache,

            store: Store::new(),
            sync_states: SyncStates::default(),
            reports: ReportSet::default(),

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            vehicle_selection: 0,
            customer_selection: 0,
            rental_selection: 0,
            report_selection: 0,

            vehicle_form: VehicleForm::default(),
            customer_form: CustomerForm::default(),
            rental_form: RentalForm::default(),
            rate_prompt: None,
            delete_prompt: None,

            refresh_rx: Some(rx),
            refresh_tx: tx,

            status_message: None,
            cache_ages: Default::default(),
            offline_mode,
        })
    }

    /// The device-local calendar date, used for "today" revenue matching.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Load all collections from the snapshot
    pub fn load_from_cache(&mut self) -> Result<()> {
        if let Ok(Some(cached)) = self.cache.load_vehicles() {
            self.store.replace_vehicles(cached.data);
        }

        if let Ok(Some(cached)) = self.cache.load_customers() {
            self.store.replace_customers(cached.data);
        }

        if let Ok(Some(cached)) = self.cache.load_rentals() {
            self.store.replace_rentals(cached.data);
        }

        if let Ok(Some(cached)) = self.cache.load_rental_id_counter() {
            self.store.restore_rental_id_counter(cached.data);
        }

        self.cache_ages = self.cache.get_cache_ages();
        Ok(())
    }

    /// Check if any cache data is stale
    pub fn is_cache_stale(&self) -> bool {
        self.cache.any_stale()
    }

    /// Persist the full snapshot. Called after offline mutations so local
    /// changes survive a restart.
    fn save_to_cache(&mut self) {
        if let Err(e) = self.cache.save_vehicles(&self.store.vehicles) {
            warn!(error = %e, "Failed to cache vehicles");
        }
        if let Err(e) = self.cache.save_customers(&self.store.customers) {
            warn!(error = %e, "Failed to cache customers");
        }
        if let Err(e) = self.cache.save_rentals(&self.store.rentals) {
            warn!(error = %e, "Failed to cache rentals");
        }
        if let Err(e) = self
            .cache
            .save_rental_id_counter(self.store.rental_id_counter())
        {
            warn!(error = %e, "Failed to cache rental id counter");
        }
        self.cache_ages = self.cache.get_cache_ages();
    }

    fn save_collection(&mut self, kind: CollectionKind) {
        let result = match kind {
            CollectionKind::Vehicles => self.cache.save_vehicles(&self.store.vehicles),
            CollectionKind::Customers => self.cache.save_customers(&self.store.customers),
            CollectionKind::Rentals => self.cache.save_rentals(&self.store.rentals),
        };
        if let Err(e) = result {
            warn!(error = %e, kind = kind.label(), "Failed to cache collection");
        }
        self.cache_ages = self.cache.get_cache_ages();
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all collections and reports
    pub fn refresh_all_background(&mut self) {
        if self.offline_mode {
            self.status_message = Some("Offline mode - showing local data".to_string());
            return;
        }
        if self.sync_states.any_loading() {
            return;
        }

        info!("Starting background refresh of all data");
        self.sync_states.mark_all_loading();

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        // A pending confirmation message stays visible through the refresh;
        // RefreshComplete clears whichever message is showing unless it is
        // an error.
        if self.status_message.is_none() {
            self.status_message = Some("Refreshing data...".to_string());
        }
    }

    /// Helper to send sync events, logging any channel errors
    async fn send_event(tx: &mpsc::Sender<SyncEvent>, event: SyncEvent) {
        if let Err(e) = tx.send(event).await {
            error!(error = %e, "Failed to send sync event - channel closed");
        }
    }

    /// Helper to forward a collection fetch result as the right event
    async fn send_collection_result<T, F>(
        tx: &mpsc::Sender<SyncEvent>,
        kind: CollectionKind,
        result: Result<T>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> SyncEvent,
    {
        match result {
            Ok(data) => {
                debug!(kind = kind.label(), "Collection fetched successfully");
                Self::send_event(tx, wrapper(data)).await;
            }
            Err(e) => {
                error!(kind = kind.label(), error = %e, "Collection fetch failed");
                Self::send_event(
                    tx,
                    SyncEvent::FetchFailed {
                        kind,
                        message: e.to_string(),
                    },
                )
                .await;
            }
        }
    }

    /// Helper to forward a report fetch result as the right event
    async fn send_report_result<T, F>(
        tx: &mpsc::Sender<SyncEvent>,
        kind: ReportKind,
        result: Result<T>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> SyncEvent,
    {
        match result {
            Ok(data) => {
                Self::send_event(tx, wrapper(data)).await;
            }
            Err(e) => {
                debug!(kind = kind.label(), error = %e, "Report fetch failed");
                Self::send_event(
                    tx,
                    SyncEvent::ReportFailed {
                        kind,
                        message: e.to_string(),
                    },
                )
                .await;
            }
        }
    }

    /// Execute the background refresh task.
    ///
    /// Runs in a spawned Tokio task. The three collection fetches run in
    /// parallel, then the five report fetches. Each result is sent back
    /// through the MPSC channel as it becomes available; completion is
    /// signalled with `RefreshComplete`.
    async fn execute_background_refresh(tx: mpsc::Sender<SyncEvent>, api: ApiClient) {
        info!("Background refresh task started");

        // Cloning the client is cheap - it shares the connection pool via Arc.
        let (vehicles_res, customers_res, rentals_res) = tokio::join!(
            api.list_vehicles(),
            api.list_customers(),
            api.list_rentals(),
        );

        Self::send_collection_result(&tx, CollectionKind::Vehicles, vehicles_res, SyncEvent::Vehicles)
            .await;
        Self::send_collection_result(
            &tx,
            CollectionKind::Customers,
            customers_res,
            SyncEvent::Customers,
        )
        .await;
        Self::send_collection_result(&tx, CollectionKind::Rentals, rentals_res, SyncEvent::Rentals)
            .await;

        let (dashboard_res, fleet_res, revenue_res, customer_res, utilization_res) = tokio::join!(
            api.fetch_dashboard_report(),
            api.fetch_fleet_report(),
            api.fetch_revenue_report(),
            api.fetch_customer_report(),
            api.fetch_utilization_report(),
        );

        Self::send_report_result(&tx, ReportKind::Dashboard, dashboard_res, SyncEvent::Dashboard)
            .await;
        Self::send_report_result(&tx, ReportKind::Fleet, fleet_res, SyncEvent::Fleet).await;
        Self::send_report_result(&tx, ReportKind::Revenue, revenue_res, SyncEvent::Revenue).await;
        Self::send_report_result(
            &tx,
            ReportKind::Customer,
            customer_res,
            SyncEvent::CustomerInsights,
        )
        .await;
        Self::send_report_result(
            &tx,
            ReportKind::Utilization,
            utilization_res,
            SyncEvent::Utilization,
        )
        .await;

        info!("Background refresh complete");
        Self::send_event(&tx, SyncEvent::RefreshComplete).await;
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let events: Vec<SyncEvent> = {
            if let Some(ref mut rx) = self.refresh_rx {
                let mut events = Vec::new();
                while let Ok(event) = rx.try_recv() {
                    events.push(event);
                }
                events
            } else {
                Vec::new()
            }
        };

        for event in events {
            self.process_sync_event(event);
        }
    }

    /// Apply a single sync event and handle the side effects (snapshot
    /// persistence, selection clamping, status line).
    fn process_sync_event(&mut self, event: SyncEvent) {
        let applied = sync::apply_event(
            &mut self.store,
            &mut self.sync_states,
            &mut self.reports,
            event,
        );
        match applied {
            Applied::CollectionSynced(kind) => {
                self.save_collection(kind);
                self.clamp_selections();
            }
            Applied::CollectionFailed(kind) => {
                self.clamp_selections();
                self.status_message =
                    Some(format!("Error: failed to sync {} - showing local data", kind.label()));
            }
            Applied::ReportUpdated(_) | Applied::ReportFailed(_) => {}
            Applied::RefreshComplete => {
                // Only clear status if it's a progress message, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
        }
    }

    /// Keep selections inside the current collection bounds.
    fn clamp_selections(&mut self) {
        let clamp = |sel: usize, len: usize| {
            if len == 0 {
                0
            } else {
                sel.min(len - 1)
            }
        };
        self.vehicle_selection = clamp(self.vehicle_selection, self.store.vehicles.len());
        self.customer_selection = clamp(self.customer_selection, self.store.customers.len());
        self.rental_selection = clamp(self.rental_selection, self.store.rentals.len());
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit the add-vehicle form.
    pub async fn submit_vehicle_form(&mut self) {
        let form = &self.vehicle_form;
        if form.id.trim().is_empty() || form.model.trim().is_empty() {
            self.status_message = Some("Error: ID and model are required".to_string());
            return;
        }
        let rate: f64 = match form.rate.trim().parse() {
            Ok(r) if r >= 0.0 => r,
            _ => {
                self.status_message = Some("Error: rate must be a non-negative number".to_string());
                return;
            }
        };

        if self.offline_mode {
            if self.store.find_vehicle(form.id.trim()).is_some() {
                self.status_message = Some("Error: Vehicle ID already exists".to_string());
                return;
            }
            let vehicle = crate::models::Vehicle {
                id: form.id.trim().to_string(),
                category: form.category(),
                model: form.model.trim().to_string(),
                rate,
                status: crate::models::VehicleStatus::Available,
                rating: 0.0,
            };
            self.store.vehicles.push(vehicle);
            self.save_to_cache();
            self.status_message = Some("Vehicle added successfully (offline)".to_string());
            self.close_overlay();
            return;
        }

        let new_vehicle = NewVehicle {
            id: form.id.trim().to_string(),
            category: form.category().label().to_string(),
            model: form.model.trim().to_string(),
            rate: form.rate.trim().to_string(),
        };
        match self.api.add_vehicle(&new_vehicle).await {
            Ok(message) => {
                info!(id = %new_vehicle.id, "Vehicle added");
                self.status_message = Some(message);
                self.close_overlay();
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Add vehicle failed");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    /// Submit the add-customer form.
    pub async fn submit_customer_form(&mut self) {
        let form = &self.customer_form;
        if form.id.trim().is_empty() || form.name.trim().is_empty() {
            self.status_message = Some("Error: ID and name are required".to_string());
            return;
        }

        if self.offline_mode {
            if self.store.find_customer(form.id.trim()).is_some() {
                self.status_message = Some("Error: Customer ID already exists".to_string());
                return;
            }
            let customer = crate::models::Customer {
                id: form.id.trim().to_string(),
                name: form.name.trim().to_string(),
                email: form.email.trim().to_string(),
                phone: form.phone.trim().to_string(),
                loyalty_points: 0,
                rating: 0.0,
            };
            self.store.customers.push(customer);
            self.save_to_cache();
            self.status_message = Some("Customer registered successfully (offline)".to_string());
            self.close_overlay();
            return;
        }

        let new_customer = NewCustomer {
            id: form.id.trim().to_string(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
        };
        match self.api.add_customer(&new_customer).await {
            Ok(message) => {
                info!(id = %new_customer.id, "Customer registered");
                self.status_message = Some(message);
                self.close_overlay();
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Add customer failed");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    /// Submit the new-rental form.
    pub async fn submit_rental_form(&mut self) {
        let days: u32 = match self.rental_form.days.trim().parse() {
            Ok(d) if d >= 1 => d,
            _ => {
                self.status_message = Some("Error: days must be a positive number".to_string());
                return;
            }
        };
        let Some(vehicle) = self.store.vehicles.get(self.rental_form.vehicle_index) else {
            self.status_message = Some("Error: no vehicle selected".to_string());
            return;
        };
        let Some(customer) = self.store.customers.get(self.rental_form.customer_index) else {
            self.status_message = Some("Error: no customer selected".to_string());
            return;
        };
        let vehicle_id = vehicle.id.clone();
        let customer_id = customer.id.clone();

        if self.offline_mode {
            let today = self.today();
            match self
                .store
                .process_rental(&vehicle_id, &customer_id, days, today)
            {
                Ok(rental) => {
                    let id = rental.id.clone();
                    info!(rental_id = %id, "Rental processed offline");
                    self.save_to_cache();
                    self.status_message =
                        Some(format!("Rental processed successfully (offline, {})", id));
                    self.close_overlay();
                }
                Err(e) => {
                    self.status_message = Some(format!("Error: {}", e));
                }
            }
            return;
        }

        let new_rental = NewRental {
            vehicle: vehicle_id,
            customer: customer_id,
            days: days.to_string(),
        };
        match self.api.process_rental(&new_rental).await {
            Ok(confirmation) => {
                info!(rental_id = %confirmation.rental_id, "Rental processed");
                self.status_message = Some(confirmation.message);
                self.close_overlay();
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Process rental failed");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    /// Return the vehicle referenced by the selected rental.
    pub async fn return_selected_vehicle(&mut self) {
        let Some(rental) = self.store.rentals.get(self.rental_selection) else {
            return;
        };
        if !rental.is_active() {
            self.status_message = Some("Error: rental is already completed".to_string());
            return;
        }
        let vehicle_id = rental.vehicle_id.clone();

        if self.offline_mode {
            match self.store.return_vehicle(&vehicle_id) {
                Ok(()) => {
                    info!(vehicle_id = %vehicle_id, "Vehicle returned offline");
                    self.save_to_cache();
                    self.status_message =
                        Some("Vehicle returned successfully (offline)".to_string());
                }
                Err(e) => {
                    self.status_message = Some(format!("Error: {}", e));
                }
            }
            return;
        }

        match self.api.return_vehicle(&vehicle_id).await {
            Ok(message) => {
                info!(vehicle_id = %vehicle_id, "Vehicle returned");
                self.status_message = Some(message);
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Return vehicle failed");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    /// Submit a rating for the current rate prompt target.
    /// The rating arrives pre-validated from the input layer (digit 1-5).
    pub async fn submit_rating(&mut self, rating: u8) {
        let Some(prompt) = self.rate_prompt.take() else {
            return;
        };
        self.state = AppState::Normal;

        if self.offline_mode {
            let result = match prompt.kind {
                TargetKind::Vehicle => self.store.rate_vehicle(&prompt.id, rating),
                TargetKind::Customer => self.store.rate_customer(&prompt.id, rating),
            };
            match result {
                Ok(()) => {
                    self.save_to_cache();
                    self.status_message = Some(format!(
                        "Rated {} {} stars (offline)",
                        prompt.name, rating
                    ));
                }
                Err(e) => {
                    self.status_message = Some(format!("Error: {}", e));
                }
            }
            return;
        }

        let result = match prompt.kind {
            TargetKind::Vehicle => self.api.rate_vehicle(&prompt.id, rating).await,
            TargetKind::Customer => self.api.rate_customer(&prompt.id, rating).await,
        };
        match result {
            Ok(message) => {
                info!(kind = prompt.kind.label(), id = %prompt.id, rating, "Rating submitted");
                self.status_message = Some(message);
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Rating failed");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    /// Delete the entity in the current delete prompt.
    pub async fn confirm_delete(&mut self) {
        let Some(prompt) = self.delete_prompt.take() else {
            return;
        };
        self.state = AppState::Normal;

        if self.offline_mode {
            match prompt.kind {
                TargetKind::Vehicle => self.store.vehicles.retain(|v| v.id != prompt.id),
                TargetKind::Customer => self.store.customers.retain(|c| c.id != prompt.id),
            }
            self.clamp_selections();
            self.save_to_cache();
            self.status_message = Some(format!("Removed {} (offline)", prompt.name));
            return;
        }

        let result = match prompt.kind {
            TargetKind::Vehicle => self.api.delete_vehicle(&prompt.id).await,
            TargetKind::Customer => self.api.delete_customer(&prompt.id).await,
        };
        match result {
            Ok(message) => {
                info!(kind = prompt.kind.label(), id = %prompt.id, "Deleted");
                self.status_message = Some(message);
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Delete failed");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    // =========================================================================
    // Overlay management
    // =========================================================================

    pub fn open_vehicle_form(&mut self) {
        self.vehicle_form = VehicleForm::default();
        self.state = AppState::AddingVehicle;
    }

    pub fn open_customer_form(&mut self) {
        self.customer_form = CustomerForm::default();
        self.state = AppState::AddingCustomer;
    }

    pub fn open_rental_form(&mut self) {
        if self.store.vehicles.is_empty() || self.store.customers.is_empty() {
            self.status_message =
                Some("Error: need at least one vehicle and one customer".to_string());
            return;
        }
        self.rental_form = RentalForm {
            vehicle_index: self.vehicle_selection.min(self.store.vehicles.len() - 1),
            customer_index: 0,
            days: String::new(),
            focus: 0,
        };
        self.state = AppState::ProcessingRental;
    }

    /// Open the rate prompt for the selection on the current tab.
    pub fn open_rate_prompt(&mut self) {
        let prompt = match self.current_tab {
            Tab::Vehicles => self.store.vehicles.get(self.vehicle_selection).map(|v| RatePrompt {
                kind: TargetKind::Vehicle,
                id: v.id.clone(),
                name: v.model.clone(),
            }),
            Tab::Customers => self
                .store
                .customers
                .get(self.customer_selection)
                .map(|c| RatePrompt {
                    kind: TargetKind::Customer,
                    id: c.id.clone(),
                    name: c.name.clone(),
                }),
            _ => None,
        };
        if let Some(prompt) = prompt {
            self.rate_prompt = Some(prompt);
            self.state = AppState::Rating;
        }
    }

    /// Open the delete confirmation for the selection on the current tab.
    pub fn open_delete_prompt(&mut self) {
        let prompt = match self.current_tab {
            Tab::Vehicles => self.store.vehicles.get(self.vehicle_selection).map(|v| DeletePrompt {
                kind: TargetKind::Vehicle,
                id: v.id.clone(),
                name: v.model.clone(),
            }),
            Tab::Customers => self
                .store
                .customers
                .get(self.customer_selection)
                .map(|c| DeletePrompt {
                    kind: TargetKind::Customer,
                    id: c.id.clone(),
                    name: c.name.clone(),
                }),
            _ => None,
        };
        if let Some(prompt) = prompt {
            self.delete_prompt = Some(prompt);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn close_overlay(&mut self) {
        self.state = AppState::Normal;
        self.rate_prompt = None;
        self.delete_prompt = None;
    }

    /// Append a character to the focused field of the active form.
    pub fn form_input(&mut self, c: char) {
        let field = match self.state {
            AppState::AddingVehicle => match self.vehicle_form.focus {
                0 => Some(&mut self.vehicle_form.id),
                2 => Some(&mut self.vehicle_form.model),
                3 => Some(&mut self.vehicle_form.rate),
                _ => None,
            },
            AppState::AddingCustomer => match self.customer_form.focus {
                0 => Some(&mut self.customer_form.id),
                1 => Some(&mut self.customer_form.name),
                2 => Some(&mut self.customer_form.email),
                3 => Some(&mut self.customer_form.phone),
                _ => None,
            },
            AppState::ProcessingRental => match self.rental_form.focus {
                2 => Some(&mut self.rental_form.days),
                _ => None,
            },
            _ => None,
        };
        if let Some(field) = field {
            if field.len() < MAX_FIELD_LENGTH {
                field.push(c);
            }
        }
    }

    /// Delete the last character of the focused field of the active form.
    pub fn form_backspace(&mut self) {
        let field = match self.state {
            AppState::AddingVehicle => match self.vehicle_form.focus {
                0 => Some(&mut self.vehicle_form.id),
                2 => Some(&mut self.vehicle_form.model),
                3 => Some(&mut self.vehicle_form.rate),
                _ => None,
            },
            AppState::AddingCustomer => match self.customer_form.focus {
                0 => Some(&mut self.customer_form.id),
                1 => Some(&mut self.customer_form.name),
                2 => Some(&mut self.customer_form.email),
                3 => Some(&mut self.customer_form.phone),
                _ => None,
            },
            AppState::ProcessingRental => match self.rental_form.focus {
                2 => Some(&mut self.rental_form.days),
                _ => None,
            },
            _ => None,
        };
        if let Some(field) = field {
            field.pop();
        }
    }

    // =========================================================================
    // Offline mode
    // =========================================================================

    /// Toggle offline mode and persist the choice.
    pub fn toggle_offline_mode(&mut self) {
        self.offline_mode = !self.offline_mode;
        self.config.offline_mode = self.offline_mode;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        if self.offline_mode {
            info!("Entering offline mode");
            self.save_to_cache();
            self.status_message = Some("Offline mode - changes stay local".to_string());
        } else {
            info!("Exiting offline mode");
            self.status_message = Some("Online mode".to_string());
            self.refresh_all_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps() {
        let mut tab = Tab::Dashboard;
        for _ in 0..5 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Reports);
        assert_eq!(Tab::Reports.next(), Tab::Dashboard);
    }

    #[test]
    fn test_vehicle_form_category_cycles() {
        let mut form = VehicleForm::default();
        assert_eq!(form.category(), VehicleCategory::Car);
        form.cycle_category();
        assert_eq!(form.category(), VehicleCategory::Motorcycle);
        form.cycle_category();
        assert_eq!(form.category(), VehicleCategory::Truck);
        form.cycle_category();
        assert_eq!(form.category(), VehicleCategory::Car);
    }
}
