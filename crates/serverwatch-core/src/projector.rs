//! View-state projector.
//!
//! The projector owns the session: the cached server collection, the
//! selected status filter, the busy flag and the form draft. Each action
//! publishes `Loading` (or a stale `Loaded`) immediately, awaits the gateway,
//! folds the result into the cache and publishes the outcome.
//!
//! The newest action owns the view. A slower, older action still applies its
//! cache update when it completes, but its view state is dropped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::error::{GatewayError, ReportError};
use crate::gateway::ServerGateway;
use crate::notify::Notifier;
use crate::report;
use crate::state::ViewState;
use crate::types::{Server, ServerCollectionResponse, ServerFields, ServerId, StatusFilter};

/// Capacity of the transition broadcast channel.
const TRANSITION_CAPACITY: usize = 256;

/// Message shown after a report export.
const REPORT_MESSAGE: &str = "Report downloaded successfully";

#[derive(Debug, Default)]
struct Session {
    /// Last successfully loaded collection. Replaced, never mutated.
    cache: Option<Arc<ServerCollectionResponse>>,
    selected: StatusFilter,
    form: ServerFields,
    /// Generation of the action that owns the view.
    generation: u64,
}

/// Turns operator actions into a stream of [`ViewState`]s.
pub struct Projector<G, N> {
    gateway: G,
    notifier: N,
    session: Mutex<Session>,
    view_tx: watch::Sender<ViewState>,
    busy_tx: watch::Sender<bool>,
    transitions: broadcast::Sender<ViewState>,
}

impl<G, N> std::fmt::Debug for Projector<G, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("view", &*self.view_tx.borrow())
            .field("busy", &*self.busy_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl<G: ServerGateway, N: Notifier> Projector<G, N> {
    /// Create a projector in the [`ViewState::Idle`] state.
    pub fn new(gateway: G, notifier: N) -> Self {
        let (view_tx, _) = watch::channel(ViewState::Idle);
        let (busy_tx, _) = watch::channel(false);
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            gateway,
            notifier,
            session: Mutex::new(Session::default()),
            view_tx,
            busy_tx,
            transitions,
        }
    }

    /// The gateway this projector drives.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The notifier this projector reports to.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Current view state.
    #[must_use]
    pub fn current(&self) -> ViewState {
        self.view_tx.borrow().clone()
    }

    /// Watch the current view state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ViewState> {
        self.view_tx.subscribe()
    }

    /// Subscribe to every published view state, in publication order.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ViewState> {
        self.transitions.subscribe()
    }

    /// Whether a save is in flight.
    #[must_use]
    pub fn busy(&self) -> bool {
        *self.busy_tx.borrow()
    }

    /// Watch the busy flag.
    #[must_use]
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    /// Snapshot of the cached collection.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<ServerCollectionResponse>> {
        self.session.lock().cache.clone()
    }

    /// Selected status filter.
    #[must_use]
    pub fn selected_status(&self) -> StatusFilter {
        self.session.lock().selected
    }

    /// Current form draft.
    #[must_use]
    pub fn form(&self) -> ServerFields {
        self.session.lock().form.clone()
    }

    /// Edit a copy of the form draft and store it back.
    ///
    /// The session lock is not held while `edit` runs, so the closure may
    /// call back into the projector.
    pub fn edit_form(&self, edit: impl FnOnce(&mut ServerFields)) {
        let mut form = self.form();
        edit(&mut form);
        self.session.lock().form = form;
    }

    /// Load the server list, replacing the cache with it in reverse order.
    pub async fn initial_load(&self) {
        let generation = self.begin();
        self.publish(generation, ViewState::Loading { stale: None });
        info!("loading servers");

        match self.gateway.list_servers().await {
            Ok(response) => {
                self.notifier.on_default(&response.message);
                let mut servers = response.servers;
                servers.reverse();
                dedup_by_id(&mut servers);

                let loaded = ServerCollectionResponse::new(response.message, servers);
                info!(count = loaded.servers.len(), "servers loaded");
                self.session.lock().cache = Some(Arc::new(loaded.clone()));
                self.publish(generation, ViewState::Loaded(loaded));
            }
            Err(err) => self.fail(generation, "list", &err),
        }
    }

    /// Ping the server at `ip_address` and patch the cached entry with the result.
    pub async fn ping(&self, ip_address: &str) {
        let generation = self.begin();
        let stale = self.stale();
        self.publish(generation, ViewState::Loading { stale });
        debug!(ip_address, "pinging server");

        match self.gateway.ping_server(ip_address).await {
            Ok(response) => {
                self.notifier.on_default(&response.message);
                let patched = response
                    .single()
                    .and_then(|server| self.replace_cached(server));
                let state = match patched {
                    Some(servers) => {
                        ViewState::Loaded(ServerCollectionResponse::new(response.message, servers))
                    }
                    None => {
                        debug!(ip_address, "pinged server is not cached");
                        ViewState::Loaded(response)
                    }
                };
                self.publish(generation, state);
            }
            Err(err) => self.fail(generation, "ping", &err),
        }
    }

    /// Select `status` and publish the cached collection narrowed to it.
    ///
    /// Does nothing beyond recording the selection until a collection is cached.
    pub fn filter(&self, status: StatusFilter) {
        let cache = {
            let mut session = self.session.lock();
            session.selected = status;
            session.cache.clone()
        };
        let Some(cache) = cache else {
            debug!(%status, "no cached servers to filter");
            return;
        };

        let generation = self.begin();
        self.publish(generation, ViewState::Loaded((*cache).clone()));

        let filtered = self.gateway.filter_servers(status, &cache);
        self.notifier.on_default(&filtered.message);
        self.publish(generation, ViewState::Loaded(filtered));
    }

    /// Save the current form draft.
    pub async fn save_form(&self) {
        let fields = self.form();
        self.save(fields).await;
    }

    /// Create a server from `fields`.
    ///
    /// The busy flag, not a `Loading` state, marks the request as in flight.
    /// The created server is not inserted into the cache; the cache is
    /// republished as it was with the backend's message.
    pub async fn save(&self, fields: ServerFields) {
        self.busy_tx.send_replace(true);
        let generation = self.begin();
        let current = self.cached().map(|cache| (*cache).clone()).unwrap_or_default();
        self.publish(generation, ViewState::Loaded(current));
        debug!(name = %fields.name, ip_address = %fields.ip_address, "saving server");

        match self.gateway.save_server(&fields).await {
            Ok(response) => {
                self.notifier.on_success(&response.message);
                let rebuilt = {
                    let mut session = self.session.lock();
                    let servers = session
                        .cache
                        .as_ref()
                        .map(|cache| cache.servers.clone())
                        .unwrap_or_default();
                    if let Some(created) = response.single() {
                        if !servers.iter().any(|s| s.id == created.id) {
                            warn!(id = created.id, "created server is not added to the cached collection");
                        }
                    }
                    let rebuilt = ServerCollectionResponse::new(response.message, servers);
                    session.cache = Some(Arc::new(rebuilt.clone()));
                    session.form = ServerFields::default();
                    rebuilt
                };
                self.busy_tx.send_replace(false);
                self.publish(generation, ViewState::Loaded(rebuilt));
            }
            Err(err) => {
                self.busy_tx.send_replace(false);
                self.fail(generation, "save", &err);
            }
        }
    }

    /// Delete `server` and drop it from the cache.
    pub async fn delete(&self, server: &Server) {
        self.delete_id(server.id).await;
    }

    /// Delete by id, whether or not the id is cached.
    pub async fn delete_id(&self, id: ServerId) {
        let generation = self.begin();
        let stale = self.stale();
        self.publish(generation, ViewState::Loading { stale });
        debug!(id, "deleting server");

        match self.gateway.delete_server(id).await {
            Ok(response) => {
                self.notifier.on_success(&response.message);
                let remaining = {
                    let mut session = self.session.lock();
                    let servers: Vec<_> = session
                        .cache
                        .as_ref()
                        .map(|cache| {
                            cache
                                .servers
                                .iter()
                                .filter(|s| s.id != id)
                                .cloned()
                                .collect()
                        })
                        .unwrap_or_default();
                    let remaining = ServerCollectionResponse::new(response.message, servers);
                    session.cache = Some(Arc::new(remaining.clone()));
                    remaining
                };
                self.publish(generation, ViewState::Loaded(remaining));
            }
            Err(err) => self.fail(generation, "delete", &err),
        }
    }

    /// Write the servers currently on screen to `path`.
    ///
    /// Falls back to the cached collection when the view has no payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub fn export_report(&self, path: &Path) -> Result<PathBuf, ReportError> {
        let servers = match self.current().payload() {
            Some(payload) => payload.servers.clone(),
            None => self
                .cached()
                .map(|cache| cache.servers.clone())
                .unwrap_or_default(),
        };
        report::write_report(path, &servers)?;
        self.notifier.on_info(REPORT_MESSAGE);
        Ok(path.to_path_buf())
    }

    /// Start a new action and make it the owner of the view.
    fn begin(&self) -> u64 {
        let mut session = self.session.lock();
        session.generation += 1;
        session.generation
    }

    fn stale(&self) -> Option<ServerCollectionResponse> {
        self.cached().map(|cache| (*cache).clone())
    }

    /// Publish `state` if `generation` still owns the view.
    fn publish(&self, generation: u64, state: ViewState) {
        let session = self.session.lock();
        if session.generation != generation {
            debug!(generation, current = session.generation, state = state.name(), "dropping superseded view state");
            return;
        }
        let _ = self.transitions.send(state.clone());
        self.view_tx.send_replace(state);
    }

    fn fail(&self, generation: u64, operation: &'static str, err: &GatewayError) {
        let message = err.to_string();
        warn!(operation, code = err.code(), "action failed");
        self.notifier.on_error(&message);
        self.publish(generation, ViewState::Error { message });
    }

    /// Replace the cached entry with `server`'s id, keeping its position.
    ///
    /// Returns the updated collection, or `None` when no entry matches.
    fn replace_cached(&self, server: &Server) -> Option<Vec<Server>> {
        let mut session = self.session.lock();
        let cache = session.cache.as_ref()?;
        let index = cache.servers.iter().position(|s| s.id == server.id)?;

        let mut servers = cache.servers.clone();
        servers[index] = server.clone();
        session.cache = Some(Arc::new(ServerCollectionResponse::new(
            cache.message.clone(),
            servers.clone(),
        )));
        Some(servers)
    }
}

/// Keep the first entry for each id.
fn dedup_by_id(servers: &mut Vec<Server>) {
    let before = servers.len();
    let mut seen = HashSet::with_capacity(before);
    servers.retain(|server| seen.insert(server.id));
    if servers.len() != before {
        warn!(dropped = before - servers.len(), "duplicate server ids in list response");
    }
}
