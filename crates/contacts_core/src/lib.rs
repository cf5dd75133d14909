//! Navigation and data-loading core for the contacts application.
//! Screens and markup live in the host; this crate owns what they show.

pub mod app;
pub mod config;
pub mod directory;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod routing;
pub mod store;

pub use app::{AppError, ContactsApp};
pub use config::{AppConfig, ConfigError};
pub use directory::adapter::{
    CompletionHook, DirectoryAdapter, DirectoryError, LoadOperation, LoadStatus,
};
pub use directory::source::{
    ContactSource, ErrorCallback, FindOptions, FixtureError, FixtureSource, SourceError,
    SuccessCallback, CONTACT_FIELDS,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactField, ContactId};
pub use model::raw::{RawContact, RawContactError, RawContactId, RawField, RawName};
pub use navigation::controller::{
    ActionOutcome, ContactsController, Controller, DispatchError, DispatchOptions,
};
pub use navigation::presentation::{DetailPresentation, FieldLink, ListRow};
pub use navigation::view_stack::{
    AppliedTransition, NavigationState, Screen, Transition, ViewStack,
};
pub use routing::router::{Route, RouteError, RouteMap, Router, DETAIL_ROUTE, LIST_ROUTE};
pub use store::contact_store::{ContactStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
