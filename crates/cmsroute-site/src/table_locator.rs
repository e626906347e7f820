//! Table construction and the model-initialization event
//!
//! `TableLocator` builds table handles from the model registry. Every handle
//! it builds is passed to each registered [`ModelListener`] before `get`
//! returns, so callers only ever see fully initialized tables.

use cmsroute_core::inflector::{plugin_split, underscore};
use cmsroute_core::{ConnectionPool, ModelKey, Result, SiteSymbol};
use cmsroute_locator::ModelRegistry;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use tracing::{debug, trace};

use crate::table::Table;

/// Callback fired for every table handle the locator builds
pub trait ModelListener: Send + Sync {
    /// React to a freshly built table
    ///
    /// An error aborts construction of the table.
    fn on_model_initialize(&self, table: &mut Table) -> Result<()>;
}

/// Handle returned by [`TableLocator::on_model_bound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What to build
#[derive(Debug, Clone)]
pub struct TableRequest {
    /// `Plugin.Alias` identifier
    pub registry_alias: String,
    /// Class keys tried in order; the first registered table class wins
    pub candidates: Vec<ModelKey>,
    /// Overrides the class's default connection
    pub connection_name: Option<String>,
    /// Site asking for the table
    pub requested_by: Option<SiteSymbol>,
}

impl TableRequest {
    pub fn new(registry_alias: impl Into<String>) -> Self {
        Self {
            registry_alias: registry_alias.into(),
            candidates: Vec::new(),
            connection_name: None,
            requested_by: None,
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<ModelKey>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection_name = Some(connection.into());
        self
    }

    pub fn requested_by(mut self, symbol: SiteSymbol) -> Self {
        self.requested_by = Some(symbol);
        self
    }
}

/// Builds table handles and notifies listeners
pub struct TableLocator {
    registry: Arc<ModelRegistry>,
    connections: Arc<dyn ConnectionPool>,
    listeners: RwLock<Vec<(ListenerId, Weak<dyn ModelListener>)>>,
    next_listener_id: AtomicU64,
}

impl TableLocator {
    pub fn new(registry: Arc<ModelRegistry>, connections: Arc<dyn ConnectionPool>) -> Self {
        Self {
            registry,
            connections,
            listeners: RwLock::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn connections(&self) -> &Arc<dyn ConnectionPool> {
        &self.connections
    }

    /// Register a listener for every table built from now on
    ///
    /// Listeners are held weakly; once the listener is dropped it stops
    /// receiving events. Owners remove their entry with [`remove_listener`].
    ///
    /// [`remove_listener`]: TableLocator::remove_listener
    pub fn on_model_bound(&self, listener: Weak<dyn ModelListener>) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, listener));
        debug!(listener = id.0, "Registered model listener");
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|(_, listener)| listener.strong_count() > 0)
            .count()
    }

    /// Build a table and run every listener on it
    ///
    /// Falls back to a generic table named after the alias when none of the
    /// candidates is a registered table class.
    ///
    /// # Errors
    /// Whatever the first failing listener returns.
    pub fn get(&self, request: TableRequest) -> Result<Table> {
        let found = request
            .candidates
            .iter()
            .find_map(|key| self.registry.table(key).map(|class| (key.clone(), class)));

        let mut table = match found {
            Some((key, class)) => {
                trace!(alias = %request.registry_alias, class = %key, "Building table");
                Table::from_class(&request.registry_alias, key, class, self.connections.clone())
            }
            None => {
                let (_, alias) = plugin_split(&request.registry_alias);
                debug!(alias = %request.registry_alias, "No table class found, building generic table");
                Table::generic(
                    &request.registry_alias,
                    underscore(alias),
                    self.connections.clone(),
                )
            }
        };

        if let Some(connection) = request.connection_name {
            table.set_default_connection(connection);
        }
        table.set_requested_by(request.requested_by);

        for listener in self.live_listeners() {
            listener.on_model_initialize(&mut table)?;
        }

        Ok(table)
    }

    /// Listeners that are still alive
    ///
    /// A failed upgrade is skipped, not pruned: the listener may still be under
    /// construction. Entries leave the list through `remove_listener`.
    fn live_listeners(&self) -> Vec<Arc<dyn ModelListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter_map(|(_, listener)| listener.upgrade())
            .collect()
    }
}

impl fmt::Debug for TableLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableLocator")
            .field("registry", &self.registry.len())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
