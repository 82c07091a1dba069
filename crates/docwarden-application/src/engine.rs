//! Service wiring
//!
//! Builds every service over one entity store, one storage gateway, one clock
//! and one set of windows, so they all agree on what "expiring" means.

use std::sync::Arc;

use docwarden_domain::{
    ports::{Clock, StorageGateway, SystemClock},
    repositories::EntityStore,
};

use crate::errors::ApplicationResult;
use crate::events::{EventPublisher, NoOpEventPublisher};
use crate::services::{Aggregator, DeadlineService, LifecycleManager, RegistryService};
use crate::settings::EngineSettings;

/// The document engine's services, sharing their dependencies
pub struct Engine<S, G>
where
    S: EntityStore,
    G: StorageGateway,
{
    pub registry: RegistryService<S>,
    pub lifecycle: LifecycleManager<S, G>,
    pub aggregator: Aggregator<S>,
    pub deadlines: DeadlineService<S>,
}

impl<S, G> Engine<S, G>
where
    S: EntityStore,
    G: StorageGateway,
{
    pub fn builder(store: Arc<S>, storage: Arc<G>) -> EngineBuilder<S, G> {
        EngineBuilder {
            store,
            storage,
            settings: EngineSettings::default(),
            clock: Arc::new(SystemClock),
            events: Arc::new(NoOpEventPublisher),
        }
    }
}

/// Builder for [`Engine`]
pub struct EngineBuilder<S, G> {
    store: Arc<S>,
    storage: Arc<G>,
    settings: EngineSettings,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher>,
}

impl<S, G> EngineBuilder<S, G>
where
    S: EntityStore,
    G: StorageGateway,
{
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    /// Fails when the configured windows are invalid
    pub fn build(self) -> ApplicationResult<Engine<S, G>> {
        let policy = self.settings.policy()?;

        Ok(Engine {
            registry: RegistryService::new(Arc::clone(&self.store))
                .with_clock(Arc::clone(&self.clock))
                .with_policy(policy)
                .with_events(Arc::clone(&self.events)),
            lifecycle: LifecycleManager::new(Arc::clone(&self.store), self.storage)
                .with_clock(Arc::clone(&self.clock))
                .with_policy(policy)
                .with_events(self.events),
            aggregator: Aggregator::new(Arc::clone(&self.store))
                .with_clock(Arc::clone(&self.clock))
                .with_policy(policy),
            deadlines: DeadlineService::new(self.store)
                .with_clock(self.clock)
                .with_policy(policy),
        })
    }
}
