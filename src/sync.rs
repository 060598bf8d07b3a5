//! Synchronization state machine.
//!
//! Background fetch tasks send `SyncEvent`s through an MPSC channel; the main
//! loop applies them here, one at a time, against the store and the per-kind
//! sync states. All store mutation funnels through `apply_event`, so no two
//! collection updates can ever interleave.
//!
//! Per-kind lifecycle: `Idle -> Loading -> {Synced, Failed}`. A failed fetch
//! loads built-in sample data only when that kind's collection is empty; real
//! data is never clobbered by a fallback. There is no retry and no
//! cancellation: a slow refresh still applies when it lands, last-writer-wins
//! per kind.

use tracing::{debug, warn};

use crate::models::{
    Customer, CustomerReport, DashboardReport, FleetReport, Rental, RevenueReport,
    UtilizationReport, Vehicle,
};
use crate::store::{self, CollectionKind, Store};

/// Lifecycle of a single collection's synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Synced,
    Failed,
}

/// Per-kind sync states, one per collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStates {
    pub vehicles: SyncState,
    pub customers: SyncState,
    pub rentals: SyncState,
}

impl SyncStates {
    pub fn get(&self, kind: CollectionKind) -> SyncState {
        match kind {
            CollectionKind::Vehicles => self.vehicles,
            CollectionKind::Customers => self.customers,
            CollectionKind::Rentals => self.rentals,
        }
    }

    fn set(&mut self, kind: CollectionKind, state: SyncState) {
        match kind {
            CollectionKind::Vehicles => self.vehicles = state,
            CollectionKind::Customers => self.customers = state,
            CollectionKind::Rentals => self.rentals = state,
        }
    }

    /// Mark every collection as loading at the start of a refresh.
    pub fn mark_all_loading(&mut self) {
        self.vehicles = SyncState::Loading;
        self.customers = SyncState::Loading;
        self.rentals = SyncState::Loading;
    }

    pub fn any_loading(&self) -> bool {
        self.vehicles == SyncState::Loading
            || self.customers == SyncState::Loading
            || self.rentals == SyncState::Loading
    }

    pub fn any_failed(&self) -> bool {
        self.vehicles == SyncState::Failed
            || self.customers == SyncState::Failed
            || self.rentals == SyncState::Failed
    }
}

/// The five report aggregates the reporting endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Dashboard,
    Fleet,
    Revenue,
    Customer,
    Utilization,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Dashboard => "Dashboard",
            ReportKind::Fleet => "Fleet Status",
            ReportKind::Revenue => "Revenue Analysis",
            ReportKind::Customer => "Customer Insights",
            ReportKind::Utilization => "Utilization Metrics",
        }
    }
}

/// Server-supplied report payloads. A `None` slot means the view computes the
/// aggregate locally from the store instead.
#[derive(Debug, Clone, Default)]
pub struct ReportSet {
    pub dashboard: Option<DashboardReport>,
    pub fleet: Option<FleetReport>,
    pub revenue: Option<RevenueReport>,
    pub customer: Option<CustomerReport>,
    pub utilization: Option<UtilizationReport>,
}

/// Results sent from background fetch tasks back to the main loop.
#[derive(Debug)]
pub enum SyncEvent {
    /// A collection fetched successfully.
    Vehicles(Vec<Vehicle>),
    Customers(Vec<Customer>),
    Rentals(Vec<Rental>),
    /// A collection fetch failed with the given message.
    FetchFailed {
        kind: CollectionKind,
        message: String,
    },
    /// A report aggregate fetched successfully.
    Dashboard(DashboardReport),
    Fleet(FleetReport),
    Revenue(RevenueReport),
    CustomerInsights(CustomerReport),
    Utilization(UtilizationReport),
    /// A report fetch failed; the view falls back to local computation.
    ReportFailed {
        kind: ReportKind,
        message: String,
    },
    /// All fetches in a refresh have landed.
    RefreshComplete,
}

/// What applying an event changed, so the caller knows whether to persist
/// the snapshot or update the status line.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    CollectionSynced(CollectionKind),
    CollectionFailed(CollectionKind),
    ReportUpdated(ReportKind),
    ReportFailed(ReportKind),
    RefreshComplete,
}

/// Apply one sync event to the store, states, and report set.
pub fn apply_event(
    store: &mut Store,
    states: &mut SyncStates,
    reports: &mut ReportSet,
    event: SyncEvent,
) -> Applied {
    match event {
        SyncEvent::Vehicles(vehicles) => {
            debug!(count = vehicles.len(), "Vehicles synced");
            store.replace_vehicles(vehicles);
            states.set(CollectionKind::Vehicles, SyncState::Synced);
            Applied::CollectionSynced(CollectionKind::Vehicles)
        }
        SyncEvent::Customers(customers) => {
            debug!(count = customers.len(), "Customers synced");
            store.replace_customers(customers);
            states.set(CollectionKind::Customers, SyncState::Synced);
            Applied::CollectionSynced(CollectionKind::Customers)
        }
        SyncEvent::Rentals(rentals) => {
            debug!(count = rentals.len(), "Rentals synced");
            store.replace_rentals(rentals);
            states.set(CollectionKind::Rentals, SyncState::Synced);
            Applied::CollectionSynced(CollectionKind::Rentals)
        }
        SyncEvent::FetchFailed { kind, message } => {
            warn!(kind = kind.label(), error = %message, "Collection fetch failed");
            states.set(kind, SyncState::Failed);
            load_fallback(store, kind);
            Applied::CollectionFailed(kind)
        }
        SyncEvent::Dashboard(report) => {
            reports.dashboard = Some(report);
            Applied::ReportUpdated(ReportKind::Dashboard)
        }
        SyncEvent::Fleet(report) => {
            reports.fleet = Some(report);
            Applied::ReportUpdated(ReportKind::Fleet)
        }
        SyncEvent::Revenue(report) => {
            reports.revenue = Some(report);
            Applied::ReportUpdated(ReportKind::Revenue)
        }
        SyncEvent::CustomerInsights(report) => {
            reports.customer = Some(report);
            Applied::ReportUpdated(ReportKind::Customer)
        }
        SyncEvent::Utilization(report) => {
            reports.utilization = Some(report);
            Applied::ReportUpdated(ReportKind::Utilization)
        }
        SyncEvent::ReportFailed { kind, message } => {
            debug!(kind = kind.label(), error = %message, "Report fetch failed, using local data");
            clear_report(reports, kind);
            Applied::ReportFailed(kind)
        }
        SyncEvent::RefreshComplete => Applied::RefreshComplete,
    }
}

/// Load built-in sample data for a failed kind, but only into an empty
/// collection. There is no sample rental data.
fn load_fallback(store: &mut Store, kind: CollectionKind) {
    if !store.is_empty(kind) {
        return;
    }
    match kind {
        CollectionKind::Vehicles => {
            warn!("Loading sample vehicles");
            store.replace_vehicles(store::sample_vehicles());
        }
        CollectionKind::Customers => {
            warn!("Loading sample customers");
            store.replace_customers(store::sample_customers());
        }
        CollectionKind::Rentals => {}
    }
}

/// Drop a stale server aggregate so the view recomputes from the store.
fn clear_report(reports: &mut ReportSet, kind: ReportKind) {
    match kind {
        ReportKind::Dashboard => reports.dashboard = None,
        ReportKind::Fleet => reports.fleet = None,
        ReportKind::Revenue => reports.revenue = None,
        ReportKind::Customer => reports.customer = None,
        ReportKind::Utilization => reports.utilization = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{sample_customers, sample_vehicles};

    fn fresh() -> (Store, SyncStates, ReportSet) {
        (Store::new(), SyncStates::default(), ReportSet::default())
    }

    #[test]
    fn test_successful_sync_replaces_and_transitions() {
        let (mut store, mut states, mut reports) = fresh();
        states.mark_all_loading();
        assert!(states.any_loading());

        let applied = apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::Vehicles(sample_vehicles()),
        );
        assert_eq!(applied, Applied::CollectionSynced(CollectionKind::Vehicles));
        assert_eq!(states.vehicles, SyncState::Synced);
        assert_eq!(store.vehicles.len(), 4);
        assert!(states.any_loading()); // customers and rentals still pending
    }

    #[test]
    fn test_applying_same_event_twice_is_idempotent() {
        let (mut store, mut states, mut reports) = fresh();
        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::Customers(sample_customers()),
        );
        let first: Vec<String> = store.customers.iter().map(|c| c.id.clone()).collect();

        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::Customers(sample_customers()),
        );
        let second: Vec<String> = store.customers.iter().map(|c| c.id.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(states.customers, SyncState::Synced);
    }

    #[test]
    fn test_failed_fetch_loads_samples_into_empty_collection() {
        let (mut store, mut states, mut reports) = fresh();
        states.mark_all_loading();

        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::FetchFailed {
                kind: CollectionKind::Vehicles,
                message: "connection refused".to_string(),
            },
        );
        assert_eq!(states.vehicles, SyncState::Failed);
        assert!(states.any_failed());
        assert_eq!(store.vehicles.len(), 4);
        assert_eq!(store.vehicles[0].id, "CAR001");
    }

    #[test]
    fn test_failed_fetch_never_clobbers_real_data() {
        let (mut store, mut states, mut reports) = fresh();
        let mut vehicles = sample_vehicles();
        vehicles.truncate(1);
        vehicles[0].id = "REAL001".to_string();
        store.replace_vehicles(vehicles);

        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::FetchFailed {
                kind: CollectionKind::Vehicles,
                message: "timeout".to_string(),
            },
        );
        assert_eq!(store.vehicles.len(), 1);
        assert_eq!(store.vehicles[0].id, "REAL001");
        assert_eq!(states.vehicles, SyncState::Failed);
    }

    #[test]
    fn test_failed_rental_fetch_has_no_sample_fallback() {
        let (mut store, mut states, mut reports) = fresh();
        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::FetchFailed {
                kind: CollectionKind::Rentals,
                message: "timeout".to_string(),
            },
        );
        assert!(store.rentals.is_empty());
        assert_eq!(states.rentals, SyncState::Failed);
    }

    #[test]
    fn test_report_events_fill_and_clear_slots() {
        let (mut store, mut states, mut reports) = fresh();
        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::Fleet(FleetReport {
                total_vehicles: 4,
                available: 4,
                ..Default::default()
            }),
        );
        assert!(reports.fleet.is_some());

        apply_event(
            &mut store,
            &mut states,
            &mut reports,
            SyncEvent::ReportFailed {
                kind: ReportKind::Fleet,
                message: "500".to_string(),
            },
        );
        assert!(reports.fleet.is_none());
    }
}
