//! Raw device contact tuples.
//!
//! # Responsibility
//! - Decode the tuple shape reported by the device contact source.
//! - Convert one tuple into a `Contact` without reordering anything.
//!
//! # Invariants
//! - Every field present in a tuple is carried into the record unchanged.
//! - Bare-string contact methods decode as entries with an empty `type`.
//! - Decoding a tuple never fails on a bad id or contact-method entry; bad ids
//!   surface from `to_contact`, unusable entries are dropped.

use crate::model::contact::{Contact, ContactField, ContactId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw contact tuple as reported by the device directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContact {
    /// `None` when the device sent `null` or no id at all.
    #[serde(default)]
    pub id: Option<RawContactId>,
    #[serde(default)]
    pub name: Option<RawName>,
    #[serde(default)]
    pub phone_numbers: Option<Vec<RawField>>,
    #[serde(default)]
    pub emails: Option<Vec<RawField>>,
}

/// Device ids arrive either as numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawContactId {
    Number(i64),
    Text(String),
    /// Any other JSON value (floats, booleans, objects).
    Other(serde_json::Value),
}

/// Structured name block of a raw tuple.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawName {
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Contact-method entry: labelled object or bare value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Labelled {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
    Bare(String),
    /// Entry of an unusable shape (`null`, numbers, mistyped labels).
    Other(serde_json::Value),
}

impl RawField {
    /// Converts the entry; `None` for `Other` entries.
    pub fn to_field(&self) -> Option<ContactField> {
        match self {
            Self::Labelled { kind, value } => Some(ContactField::new(
                kind.clone().unwrap_or_default(),
                value.clone().unwrap_or_default(),
            )),
            Self::Bare(value) => Some(ContactField::new("", value.clone())),
            Self::Other(_) => None,
        }
    }
}

/// A raw tuple that cannot become a `Contact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContactError {
    MissingId,
    InvalidId(String),
}

impl Display for RawContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "contact id is missing"),
            Self::InvalidId(value) => write!(f, "contact id is not an integer: `{value}`"),
        }
    }
}

impl Error for RawContactError {}

impl RawContactId {
    /// Interprets the raw id as an integer.
    pub fn to_contact_id(&self) -> Result<ContactId, RawContactError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(value) => value
                .trim()
                .parse::<ContactId>()
                .map_err(|_| RawContactError::InvalidId(value.clone())),
            Self::Other(value) => Err(RawContactError::InvalidId(value.to_string())),
        }
    }
}

impl RawContact {
    /// Maps this tuple into an immutable record.
    ///
    /// `name.formatted` becomes the display name; missing parts become empty.
    pub fn to_contact(&self) -> Result<Contact, RawContactError> {
        let id = self
            .id
            .as_ref()
            .ok_or(RawContactError::MissingId)?
            .to_contact_id()?;
        let name = self.name.clone().unwrap_or_default();
        Ok(Contact::new(
            id,
            name.formatted.unwrap_or_default(),
            name.given_name.unwrap_or_default(),
            name.family_name.unwrap_or_default(),
            convert_fields(self.phone_numbers.as_deref()),
            convert_fields(self.emails.as_deref()),
        ))
    }
}

fn convert_fields(fields: Option<&[RawField]>) -> Vec<ContactField> {
    fields
        .unwrap_or_default()
        .iter()
        .filter_map(RawField::to_field)
        .collect()
}
