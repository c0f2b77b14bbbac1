//! Fluent builder for constructing a [`Coordinator`].

use std::sync::Arc;

use fm_catalog::Catalog;
use fm_core::{GeoPoint, PlannerConfig};
use fm_route::{RouteAdapter, RouteSelection, RoutingEngine};

use crate::{Coordinator, NoopObserver, PlanResult, PlannerObserver, PlannerState};

/// Fluent builder for [`Coordinator<E>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                  |
/// |-------------------------|--------------------------|
/// | `.config(c)`            | `PlannerConfig::default()` |
/// | `.observer(o)`          | `NoopObserver`           |
/// | `.device_location(p)`   | no fix                   |
///
/// # Example
///
/// ```rust,ignore
/// let mut planner = PlannerBuilder::new(catalog, GraphEngine::new(network))
///     .config(config)
///     .build()?;
/// planner.set_origin(Some(RouteEndpoint::facility("s1")));
/// ```
pub struct PlannerBuilder<E: RoutingEngine> {
    catalog:  Arc<Catalog>,
    engine:   Arc<E>,
    config:   PlannerConfig,
    observer: Box<dyn PlannerObserver>,
    device:   Option<GeoPoint>,
}

impl<E: RoutingEngine> PlannerBuilder<E> {
    pub fn new(catalog: impl Into<Arc<Catalog>>, engine: E) -> Self {
        Self::with_shared_engine(catalog, Arc::new(engine))
    }

    /// Share one engine between several coordinators.
    pub fn with_shared_engine(catalog: impl Into<Arc<Catalog>>, engine: Arc<E>) -> Self {
        Self {
            catalog:  catalog.into(),
            engine,
            config:   PlannerConfig::default(),
            observer: Box::new(NoopObserver),
            device:   None,
        }
    }

    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn observer(mut self, observer: impl PlannerObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn device_location(mut self, location: GeoPoint) -> Self {
        self.device = Some(location);
        self
    }

    /// Validate the configuration and return an `Idle` coordinator.
    pub fn build(self) -> PlanResult<Coordinator<E>> {
        self.config.validate()?;
        Ok(Coordinator {
            catalog:         self.catalog,
            adapter:         RouteAdapter::from_arc(self.engine, self.config.engine_timeout()),
            config:          self.config,
            device_location: self.device.filter(|p| p.is_valid()),
            selection:       RouteSelection::default(),
            state:           PlannerState::Idle,
            route:           None,
            last_error:      None,
            route_active:    false,
            observer:        self.observer,
        })
    }
}
