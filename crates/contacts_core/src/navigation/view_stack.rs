//! Card-style view stack holding the list and detail screens.
//!
//! # Responsibility
//! - Track which screen is active and which transition was applied.
//! - Hold the navigation state read by the detail screen.
//!
//! # Invariants
//! - Exactly one screen is active at any time; the list starts active.
//! - The detail presentation always matches the active record.
//! - Repeated `show` calls are last-write-wins.

use crate::model::contact::Contact;
use crate::navigation::presentation::DetailPresentation;
use crate::store::contact_store::{ContactStore, StoreResult};
use log::{debug, error};
use serde::{Deserialize, Serialize};

/// The fixed set of screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    List,
    Detail,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

/// Card switch animation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    None,
    #[default]
    Slide,
    Fade,
    Pop,
    Flip,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Slide => "slide",
            Self::Fade => "fade",
            Self::Pop => "pop",
            Self::Flip => "flip",
        }
    }
}

/// A transition the view stack performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTransition {
    pub from: Screen,
    pub to: Screen,
    pub transition: Transition,
}

/// Which record the detail screen displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    active_record: Option<Contact>,
    detail: Option<DetailPresentation>,
}

impl NavigationState {
    pub fn active_record(&self) -> Option<&Contact> {
        self.active_record.as_ref()
    }

    pub fn detail(&self) -> Option<&DetailPresentation> {
        self.detail.as_ref()
    }
}

/// Holds the active screen and the navigation state.
#[derive(Debug, Clone)]
pub struct ViewStack {
    active: Screen,
    state: NavigationState,
    default_transition: Transition,
    last_transition: Option<AppliedTransition>,
}

impl ViewStack {
    /// Creates a stack showing the list screen, without loading anything.
    pub fn new(default_transition: Transition) -> Self {
        Self {
            active: Screen::List,
            state: NavigationState::default(),
            default_transition,
            last_transition: None,
        }
    }

    /// Creates the stack and runs the initial store load.
    ///
    /// A failed initial load is logged and returned; the stack is still usable
    /// and shows an empty list.
    pub async fn mount(
        store: &ContactStore,
        default_transition: Transition,
    ) -> (Self, StoreResult<usize>) {
        let views = Self::new(default_transition);
        let initial_load = store.load().await;
        if let Err(err) = &initial_load {
            error!(
                "event=initial_load_failed module=navigation status=error message={}",
                err
            );
        }
        (views, initial_load)
    }

    /// Makes `screen` active, replaying the transition if it already is.
    pub fn activate(&mut self, screen: Screen, animation: Option<Transition>) -> AppliedTransition {
        let applied = AppliedTransition {
            from: self.active,
            to: screen,
            transition: animation.unwrap_or(self.default_transition),
        };
        self.active = screen;
        self.last_transition = Some(applied);
        debug!(
            "event=screen_activated module=navigation status=ok from={} to={} transition={}",
            applied.from.as_str(),
            applied.to.as_str(),
            applied.transition.as_str()
        );
        applied
    }

    /// Currently active screen.
    pub fn current(&self) -> Screen {
        self.active
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.state
    }

    /// Record shown by the detail screen.
    pub fn active_record(&self) -> Option<&Contact> {
        self.state.active_record()
    }

    pub fn detail(&self) -> Option<&DetailPresentation> {
        self.state.detail()
    }

    pub fn last_transition(&self) -> Option<AppliedTransition> {
        self.last_transition
    }

    pub fn default_transition(&self) -> Transition {
        self.default_transition
    }

    pub(crate) fn show_record(&mut self, contact: Contact) {
        self.state.detail = Some(DetailPresentation::from(&contact));
        self.state.active_record = Some(contact);
    }
}

#[cfg(test)]
mod tests {
    use super::{Screen, Transition, ViewStack};
    use crate::model::contact::Contact;

    #[test]
    fn starts_on_list_without_record() {
        let views = ViewStack::new(Transition::Slide);
        assert_eq!(views.current(), Screen::List);
        assert!(views.active_record().is_none());
        assert!(views.last_transition().is_none());
    }

    #[test]
    fn activate_uses_hint_or_default_transition() {
        let mut views = ViewStack::new(Transition::Slide);
        let applied = views.activate(Screen::Detail, Some(Transition::Fade));
        assert_eq!(applied.from, Screen::List);
        assert_eq!(applied.transition, Transition::Fade);

        let applied = views.activate(Screen::List, None);
        assert_eq!(applied.from, Screen::Detail);
        assert_eq!(applied.transition, Transition::Slide);
        assert_eq!(views.current(), Screen::List);
    }

    #[test]
    fn latest_record_wins() {
        let mut views = ViewStack::new(Transition::None);
        views.show_record(Contact::new(1, "A", "", "", Vec::new(), Vec::new()));
        views.show_record(Contact::new(2, "B", "", "", Vec::new(), Vec::new()));
        assert_eq!(views.active_record().map(Contact::id), Some(2));
        assert_eq!(views.detail().map(|d| d.title.as_str()), Some("B"));
    }
}
