use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::{JwtConfig, JwtService, StaffCredentials};
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::Storage;
use crate::db::repository::{
    CategoryRepository, DailySpecialRepository, DishRepository, FeaturedBlockRepository,
};
use crate::kitchen::{AlertGate, KitchenMonitor};
use crate::orders::{OrderStorage, OrdersManager};

/// Per-resource version counters
///
/// Catalog writes bump the counter of the resource they touched; the
/// customer menu exposes the sum so clients can tell when to refetch.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Bump and return the new version (first bump returns 1)
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// Sum over all resources
    pub fn total(&self) -> u64 {
        self.versions.iter().map(|e| *e.value()).sum()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared server state, cloned into every handler
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | storage | Storage | redb handle for catalog documents |
/// | categories, dishes, featured_blocks, daily_special | repositories | Catalog access |
/// | orders | Arc<OrdersManager> | Tables, orders and items |
/// | alerts | Arc<AlertGate> | Kitchen alert currently surfaced |
/// | jwt_service | Arc<JwtService> | Staff token issue/validation |
/// | staff | StaffCredentials | Configured staff account |
/// | resource_versions | Arc<ResourceVersions> | Catalog change counters |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub storage: Storage,
    pub categories: CategoryRepository,
    pub dishes: DishRepository,
    pub featured_blocks: FeaturedBlockRepository,
    pub daily_special: DailySpecialRepository,
    pub orders: Arc<OrdersManager>,
    pub alerts: Arc<AlertGate>,
    pub jwt_service: Arc<JwtService>,
    pub staff: StaffCredentials,
    pub resource_versions: Arc<ResourceVersions>,
    pub start_time: Instant,
}

impl ServerState {
    /// Wire every service on top of an opened storage
    pub fn new(config: Config, storage: Storage) -> anyhow::Result<Self> {
        let dishes = DishRepository::new(storage.clone());
        let order_storage = OrderStorage::new(storage.database())?;
        let orders = OrdersManager::new(order_storage)?.with_catalog(dishes.clone());

        let jwt_config = JwtConfig::new(config.jwt_secret.clone(), config.jwt_expiration_minutes)?;

        Ok(Self {
            categories: CategoryRepository::new(storage.clone()),
            featured_blocks: FeaturedBlockRepository::new(storage.clone()),
            daily_special: DailySpecialRepository::new(storage.clone()),
            dishes,
            orders: Arc::new(orders),
            alerts: Arc::new(AlertGate::new()),
            jwt_service: Arc::new(JwtService::with_config(jwt_config)),
            staff: StaffCredentials {
                email: config.staff_email.clone(),
                password_hash: config.staff_password_hash.clone(),
            },
            resource_versions: Arc::new(ResourceVersions::new()),
            start_time: Instant::now(),
            storage,
            config,
        })
    }

    /// Open `work_dir/database/menu.redb` and build the state
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let storage = Storage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        Self::new(config.clone(), storage)
    }

    /// State over an in-memory database
    pub fn in_memory(config: Config) -> anyhow::Result<Self> {
        Self::new(config, Storage::open_in_memory()?)
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Record a catalog change
    pub fn bump_catalog(&self, resource: &str) -> u64 {
        let version = self.resource_versions.increment(resource);
        tracing::debug!(resource, version, "Catalog changed");
        version
    }

    /// Register long-running jobs
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let monitor = KitchenMonitor::new(
            self.orders.clone(),
            self.alerts.clone(),
            Duration::from_secs(self.config.kitchen_refresh_secs),
        );
        let shutdown = tasks.shutdown_token();
        tasks.spawn("kitchen_monitor", TaskKind::Periodic, monitor.run(shutdown));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("dish"), 0);
        assert_eq!(versions.increment("dish"), 1);
        assert_eq!(versions.increment("dish"), 2);
        assert_eq!(versions.increment("category"), 1);
        assert_eq!(versions.total(), 3);
    }

    #[test]
    fn test_in_memory_state() {
        let mut config = Config::with_overrides("/tmp/unused", 0);
        config.jwt_secret = Some("s".repeat(40));

        let state = ServerState::in_memory(config).unwrap();
        let order = state.orders.open_or_get_order("7", None).unwrap();
        assert_eq!(state.orders.get_order(order.id).unwrap().id, order.id);
        assert!(state.categories.find_all().unwrap().is_empty());
    }
}
