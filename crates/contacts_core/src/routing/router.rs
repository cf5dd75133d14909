//! Route table and token resolution.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Token of the contact list screen.
pub const LIST_ROUTE: &str = "list";
/// Token of the contact detail screen.
pub const DETAIL_ROUTE: &str = "detail";
/// Controller serving both contact routes.
pub const CONTACTS_CONTROLLER: &str = "contacts";
pub const INDEX_ACTION: &str = "index";
pub const SHOW_ACTION: &str = "show";

/// Route registration/resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    InvalidToken(String),
    DuplicateRoute(String),
    RouteNotFound(String),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToken(value) => write!(f, "route token is invalid: `{value}`"),
            Self::DuplicateRoute(value) => write!(f, "route already registered: `{value}`"),
            Self::RouteNotFound(value) => write!(f, "route not found: `{value}`"),
        }
    }
}

impl Error for RouteError {}

/// Dispatch target of one route token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub controller: String,
    pub action: String,
}

/// Mutable route map handed to `Router::draw`.
#[derive(Debug, Default)]
pub struct RouteMap {
    routes: BTreeMap<String, Route>,
}

impl RouteMap {
    /// Registers `token` for `controller#action`.
    pub fn connect(
        &mut self,
        token: &str,
        controller: &str,
        action: &str,
    ) -> Result<(), RouteError> {
        if !is_valid_name(token) {
            return Err(RouteError::InvalidToken(token.to_string()));
        }
        if !is_valid_name(controller) || !is_valid_name(action) {
            return Err(RouteError::InvalidToken(format!(
                "{token} -> {controller}#{action}"
            )));
        }
        if self.routes.contains_key(token) {
            return Err(RouteError::DuplicateRoute(token.to_string()));
        }

        self.routes.insert(
            token.to_string(),
            Route {
                controller: controller.to_string(),
                action: action.to_string(),
            },
        );
        Ok(())
    }
}

/// Immutable token → action table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: BTreeMap<String, Route>,
}

impl Router {
    /// Builds a router from the registrations made by `draw`.
    pub fn draw<F>(draw: F) -> Result<Self, RouteError>
    where
        F: FnOnce(&mut RouteMap) -> Result<(), RouteError>,
    {
        let mut map = RouteMap::default();
        draw(&mut map)?;
        Ok(Self { routes: map.routes })
    }

    /// The application's two routes: `list` and `detail`.
    pub fn contacts() -> Result<Self, RouteError> {
        Self::draw(|map| {
            map.connect(LIST_ROUTE, CONTACTS_CONTROLLER, INDEX_ACTION)?;
            map.connect(DETAIL_ROUTE, CONTACTS_CONTROLLER, SHOW_ACTION)
        })
    }

    /// Resolves a token to its dispatch target.
    ///
    /// # Errors
    /// - `RouteNotFound` when `token` was never connected.
    pub fn resolve(&self, token: &str) -> Result<&Route, RouteError> {
        self.routes
            .get(token)
            .ok_or_else(|| RouteError::RouteNotFound(token.to_string()))
    }

    /// Returns registered tokens in sorted order.
    pub fn tokens(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn is_valid_name(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' || c == '/')
}

#[cfg(test)]
mod tests {
    use super::{Route, RouteError, Router};

    #[test]
    fn resolves_contact_routes() {
        let router = Router::contacts().expect("contact routes should draw");
        assert_eq!(
            router.resolve("list"),
            Ok(&Route {
                controller: "contacts".to_string(),
                action: "index".to_string(),
            })
        );
        assert_eq!(
            router.resolve("detail").map(|route| route.action.as_str()),
            Ok("show")
        );
        assert_eq!(router.tokens(), vec!["detail", "list"]);
    }

    #[test]
    fn unknown_token_is_route_not_found() {
        let router = Router::contacts().expect("contact routes should draw");
        assert_eq!(
            router.resolve("unknown"),
            Err(RouteError::RouteNotFound("unknown".to_string()))
        );
        assert!(matches!(
            router.resolve(" list"),
            Err(RouteError::RouteNotFound(_))
        ));
    }

    #[test]
    fn rejects_duplicate_and_invalid_tokens() {
        let duplicate = Router::draw(|map| {
            map.connect("list", "contacts", "index")?;
            map.connect("list", "contacts", "show")
        });
        assert_eq!(
            duplicate.map(|router| router.len()),
            Err(RouteError::DuplicateRoute("list".to_string()))
        );

        let invalid = Router::draw(|map| map.connect("Contact List", "contacts", "index"));
        assert!(matches!(invalid, Err(RouteError::InvalidToken(_))));

        let blank = Router::draw(|map| map.connect("", "contacts", "index"));
        assert!(matches!(blank, Err(RouteError::InvalidToken(_))));
    }
}
