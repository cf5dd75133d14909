//! Contact source contract and the in-memory fixture source.

use crate::model::raw::RawContact;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Attributes requested from the device on every enumeration.
pub const CONTACT_FIELDS: &[&str] = &["id", "name", "emails", "phoneNumbers"];

/// Invoked with every tuple the device enumerated.
pub type SuccessCallback = Box<dyn FnOnce(Vec<RawContact>) + Send + 'static>;
/// Invoked with the device-reported failure.
pub type ErrorCallback = Box<dyn FnOnce(SourceError) + Send + 'static>;

/// Options passed along with the requested attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    /// Return every match instead of the first one.
    pub multiple: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self { multiple: true }
    }
}

/// Error value reported by the device through the error callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    /// Device-specific numeric code, when the device provides one.
    pub code: Option<i32>,
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for SourceError {}

/// Asynchronous device contact enumeration.
///
/// # Contract
/// - Implementations return immediately and invoke exactly one of
///   `on_success` or `on_error`, now or at any later time.
/// - Callbacks may run on any thread.
pub trait ContactSource: Send + Sync {
    fn find(
        &self,
        fields: &[&str],
        options: &FindOptions,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
    );
}

/// In-memory source that answers synchronously.
///
/// Stands in for the device directory on desktop hosts and in tests.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    outcome: Result<Vec<RawContact>, SourceError>,
}

impl FixtureSource {
    /// Source that always succeeds with `contacts`.
    pub fn new(contacts: Vec<RawContact>) -> Self {
        Self {
            outcome: Ok(contacts),
        }
    }

    /// Source that always reports `error`.
    pub fn failing(error: SourceError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    /// Decodes a JSON array of raw tuples.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads and decodes a JSON fixture file.
    pub fn from_json_file(path: &Path) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path).map_err(FixtureError::Io)?;
        Self::from_json_str(&text).map_err(FixtureError::Parse)
    }

    /// Two-contact fixture used when no device directory is available.
    pub fn desktop_debug() -> Self {
        Self::from_json_or_empty(DESKTOP_DEBUG_FIXTURE)
    }

    fn from_json_or_empty(json: &str) -> Self {
        match Self::from_json_str(json) {
            Ok(source) => source,
            Err(err) => {
                error!(
                    "event=fixture_invalid module=directory status=error message={}",
                    err
                );
                Self::new(Vec::new())
            }
        }
    }
}

impl ContactSource for FixtureSource {
    fn find(
        &self,
        fields: &[&str],
        options: &FindOptions,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
    ) {
        info!(
            "event=fixture_find module=directory status=ok fields={} multiple={}",
            fields.len(),
            options.multiple
        );
        match &self.outcome {
            Ok(contacts) => on_success(contacts.clone()),
            Err(error) => on_error(error.clone()),
        }
    }
}

/// Fixture file failure.
#[derive(Debug)]
pub enum FixtureError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for FixtureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read contact fixture: {err}"),
            Self::Parse(err) => write!(f, "invalid contact fixture: {err}"),
        }
    }
}

impl Error for FixtureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

const DESKTOP_DEBUG_FIXTURE: &str = r#"[
    {
        "id": 0,
        "name": {"formatted": "鈴木 一郎", "givenName": "一郎", "familyName": "鈴木"},
        "phoneNumbers": [{"type": "Home", "value": "000-0000-0000"}],
        "emails": [{"type": "Home", "value": "ichiro_suzuki@example.com"}]
    },
    {
        "id": 1,
        "name": {"formatted": "鈴木 花子", "givenName": "花子", "familyName": "鈴木"},
        "phoneNumbers": ["000-0000-0001"],
        "emails": ["hanako_suzuki@example.com"]
    }
]"#;
