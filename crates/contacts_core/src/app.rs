//! Composition root.
//!
//! # Responsibility
//! - Construct router, store, controller and view stack and wire them.
//! - Dispatch route tokens to controller actions.
//! - Translate list selection into `detail` dispatches.
//!
//! # Invariants
//! - `RouteNotFound` propagates to the caller; `RecordNotFound` never does.
//! - Store contents change only through `load()`.

use crate::config::{AppConfig, ConfigError};
use crate::directory::adapter::DirectoryAdapter;
use crate::directory::source::ContactSource;
use crate::navigation::controller::{
    ActionOutcome, ContactsController, Controller, DispatchError, DispatchOptions,
};
use crate::navigation::presentation::ListRow;
use crate::navigation::view_stack::{Transition, ViewStack};
use crate::routing::router::{RouteError, Router, DETAIL_ROUTE};
use crate::store::contact_store::{ContactStore, StoreError, StoreResult};
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Launch-time failure.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Route(RouteError),
    Dispatch(DispatchError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Route(err) => write!(f, "{err}"),
            Self::Dispatch(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Route(err) => Some(err),
            Self::Dispatch(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RouteError> for AppError {
    fn from(value: RouteError) -> Self {
        Self::Route(value)
    }
}

impl From<DispatchError> for AppError {
    fn from(value: DispatchError) -> Self {
        Self::Dispatch(value)
    }
}

/// The running contacts application.
pub struct ContactsApp {
    config: AppConfig,
    router: Router,
    store: Arc<ContactStore>,
    controllers: BTreeMap<String, Arc<dyn Controller>>,
    views: ViewStack,
    history: Vec<String>,
    last_load_error: Option<StoreError>,
}

impl ContactsApp {
    /// Wires the application, runs the initial load and dispatches the
    /// configured default route.
    ///
    /// A failed initial load does not fail launch; it is kept in
    /// `last_load_error()` so the host can offer a retry.
    ///
    /// # Errors
    /// - Invalid configuration.
    /// - A default route that does not resolve.
    pub async fn launch(
        config: AppConfig,
        source: Arc<dyn ContactSource>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let router = Router::contacts()?;
        router.resolve(&config.default_route)?;

        let mut adapter = DirectoryAdapter::new(source);
        if let Some(timeout) = config.load_timeout() {
            adapter = adapter.with_timeout(timeout);
        }
        let store = Arc::new(ContactStore::new(adapter));

        let mut controllers: BTreeMap<String, Arc<dyn Controller>> = BTreeMap::new();
        let contacts: Arc<dyn Controller> = Arc::new(ContactsController::new(Arc::clone(&store)));
        controllers.insert(contacts.name().to_string(), contacts);

        let (views, initial_load) = ViewStack::mount(&store, config.transition).await;

        let mut app = Self {
            config,
            router,
            store,
            controllers,
            views,
            history: Vec::new(),
            last_load_error: initial_load.err(),
        };

        let default_route = app.config.default_route.clone();
        app.dispatch(&default_route, DispatchOptions::new())?;
        info!(
            "event=app_launched module=app status=ok contacts={} route={}",
            app.store.len(),
            default_route
        );
        Ok(app)
    }

    /// Resolves `token` and runs its controller action.
    ///
    /// # Errors
    /// - `Route(RouteNotFound)` for an unregistered token.
    /// - `ControllerNotFound` / `ActionNotFound` for a route pointing nowhere.
    pub fn dispatch(
        &mut self,
        token: &str,
        options: DispatchOptions,
    ) -> Result<ActionOutcome, DispatchError> {
        let route = match self.router.resolve(token) {
            Ok(route) => route,
            Err(err) => {
                error!(
                    "event=route_not_found module=app status=error token={:?}",
                    token
                );
                return Err(err.into());
            }
        };
        let controller = self
            .controllers
            .get(&route.controller)
            .ok_or_else(|| DispatchError::ControllerNotFound(route.controller.clone()))?;

        let outcome = controller.invoke(&route.action, &options, &mut self.views)?;
        if let ActionOutcome::Activated(_) = outcome {
            self.history.push(token.to_string());
        }
        Ok(outcome)
    }

    /// Handles a tap on list row `index` (or its disclosure button).
    ///
    /// Out-of-range rows are ignored.
    pub fn select_row(
        &mut self,
        index: usize,
        animation: Option<Transition>,
    ) -> Result<ActionOutcome, DispatchError> {
        let Some(contact) = self.store.get_at(index) else {
            warn!("event=row_not_found module=app status=ignored index={index}");
            return Ok(ActionOutcome::Ignored);
        };
        info!("event=row_selected module=app id={}", contact.id());

        let mut options = DispatchOptions::new().with_id(contact.id());
        options.animation = animation;
        self.dispatch(DETAIL_ROUTE, options)
    }

    /// Reloads the store; the outcome is kept for `last_load_error()`.
    pub async fn reload(&mut self) -> StoreResult<usize> {
        let result = self.store.load().await;
        self.last_load_error = result.as_ref().err().cloned();
        result
    }

    /// Rows for the list screen, in store order.
    pub fn list_rows(&self) -> Vec<ListRow> {
        self.store.all().iter().map(ListRow::from).collect()
    }

    pub fn views(&self) -> &ViewStack {
        &self.views
    }

    pub fn store(&self) -> &Arc<ContactStore> {
        &self.store
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Tokens of dispatches that activated a screen, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn last_load_error(&self) -> Option<&StoreError> {
        self.last_load_error.as_ref()
    }
}
