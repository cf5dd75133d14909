//! Controller contract and the contacts controller.
//!
//! # Responsibility
//! - Expose named actions invoked by route dispatch.
//! - `index` shows the list; `show` resolves a record and shows its detail.
//!
//! # Invariants
//! - A `show` for an unknown id changes nothing and is not an error.
//! - Side effects are confined to the view stack passed in.

use crate::model::contact::ContactId;
use crate::navigation::view_stack::{Screen, Transition, ViewStack};
use crate::routing::router::{RouteError, CONTACTS_CONTROLLER, INDEX_ACTION, SHOW_ACTION};
use crate::store::contact_store::ContactStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Out-of-band payload passed with every dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Transition hint; the view stack default applies when absent.
    pub animation: Option<Transition>,
    /// Target contact id in textual form (used by `show`).
    pub id: Option<String>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_animation(mut self, animation: Transition) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Parses `id` as a contact id.
    pub fn contact_id(&self) -> Option<ContactId> {
        self.id.as_deref()?.trim().parse().ok()
    }
}

/// What a controller action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The named screen is now active.
    Activated(Screen),
    /// Nothing changed (e.g. `show` for an unknown record).
    Ignored,
}

/// Dispatch failure surfaced to the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    Route(RouteError),
    ControllerNotFound(String),
    ActionNotFound { controller: String, action: String },
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Route(err) => write!(f, "{err}"),
            Self::ControllerNotFound(name) => write!(f, "controller not found: `{name}`"),
            Self::ActionNotFound { controller, action } => {
                write!(f, "action not found: `{controller}#{action}`")
            }
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Route(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RouteError> for DispatchError {
    fn from(value: RouteError) -> Self {
        Self::Route(value)
    }
}

/// A named set of actions reachable through the router.
pub trait Controller: Send + Sync {
    fn name(&self) -> &str;

    /// Runs `action` against the view stack.
    ///
    /// # Errors
    /// - `ActionNotFound` when this controller has no such action.
    fn invoke(
        &self,
        action: &str,
        options: &DispatchOptions,
        views: &mut ViewStack,
    ) -> Result<ActionOutcome, DispatchError>;
}

/// Controller for the list and detail screens.
pub struct ContactsController {
    store: Arc<ContactStore>,
}

impl ContactsController {
    pub fn new(store: Arc<ContactStore>) -> Self {
        Self { store }
    }

    /// Shows the list screen.
    pub fn index(&self, options: &DispatchOptions, views: &mut ViewStack) -> ActionOutcome {
        info!("event=action module=controller action=contacts#index");
        views.activate(Screen::List, options.animation);
        ActionOutcome::Activated(Screen::List)
    }

    /// Shows the detail screen for `options.id`.
    ///
    /// Returns `Ignored` and leaves the view stack untouched when the id is
    /// missing, not an integer, or not in the store.
    pub fn show(&self, options: &DispatchOptions, views: &mut ViewStack) -> ActionOutcome {
        let Some(id) = options.contact_id() else {
            warn!(
                "event=record_not_found module=controller status=ignored reason=invalid_id raw_id={:?}",
                options.id
            );
            return ActionOutcome::Ignored;
        };
        info!("event=action module=controller action=contacts#show id={id}");

        let Some(contact) = self.store.get_by_id(id) else {
            warn!("event=record_not_found module=controller status=ignored id={id}");
            return ActionOutcome::Ignored;
        };

        views.show_record(contact);
        views.activate(Screen::Detail, options.animation);
        ActionOutcome::Activated(Screen::Detail)
    }
}

impl Controller for ContactsController {
    fn name(&self) -> &str {
        CONTACTS_CONTROLLER
    }

    fn invoke(
        &self,
        action: &str,
        options: &DispatchOptions,
        views: &mut ViewStack,
    ) -> Result<ActionOutcome, DispatchError> {
        match action {
            INDEX_ACTION => Ok(self.index(options, views)),
            SHOW_ACTION => Ok(self.show(options, views)),
            other => Err(DispatchError::ActionNotFound {
                controller: CONTACTS_CONTROLLER.to_string(),
                action: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DispatchOptions;

    #[test]
    fn contact_id_parses_trimmed_integers_only() {
        assert_eq!(DispatchOptions::new().with_id(2).contact_id(), Some(2));
        assert_eq!(DispatchOptions::new().with_id(" 7 ").contact_id(), Some(7));
        assert_eq!(DispatchOptions::new().with_id("abc").contact_id(), None);
        assert_eq!(DispatchOptions::new().contact_id(), None);
    }
}
