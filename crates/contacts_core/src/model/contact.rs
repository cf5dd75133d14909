//! Contact record model.
//!
//! # Responsibility
//! - Hold one contact's identity and contact-method data.
//!
//! # Invariants
//! - `id` is unique within one loaded set and stable for its lifetime.
//! - Fields are private; the record is read-only once constructed.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the device directory.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ContactId = i64;

/// One labelled contact method (phone number or e-mail address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactField {
    /// Serialized as `type` to match the device schema naming.
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ContactField {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Immutable contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    id: ContactId,
    name: String,
    given_name: String,
    family_name: String,
    phone_numbers: Vec<ContactField>,
    emails: Vec<ContactField>,
}

impl Contact {
    /// Builds a record from already-decoded parts.
    pub fn new(
        id: ContactId,
        name: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        phone_numbers: Vec<ContactField>,
        emails: Vec<ContactField>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            given_name: given_name.into(),
            family_name: family_name.into(),
            phone_numbers,
            emails,
        }
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    /// Formatted display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    /// Sort key used by the record store.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn phone_numbers(&self) -> &[ContactField] {
        &self.phone_numbers
    }

    pub fn emails(&self) -> &[ContactField] {
        &self.emails
    }
}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactField};

    #[test]
    fn serializes_with_device_field_names() {
        let contact = Contact::new(
            7,
            "Ichiro Suzuki",
            "Ichiro",
            "Suzuki",
            vec![ContactField::new("home", "000-0000-0000")],
            vec![],
        );
        let json = serde_json::to_value(&contact).expect("contact should serialize");
        assert_eq!(json["familyName"], "Suzuki");
        assert_eq!(json["givenName"], "Ichiro");
        assert_eq!(json["phoneNumbers"][0]["type"], "home");
    }
}
