//! Screen-facing projections of contact records.
//!
//! These are the values handed to the rendering layer; markup is out of scope.

use crate::model::contact::{Contact, ContactField, ContactId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NON_DIAL_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9+*#]").expect("valid dial chars regex"));

/// One row of the contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: ContactId,
    pub name: String,
}

impl From<&Contact> for ListRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id(),
            name: contact.name().to_string(),
        }
    }
}

/// One labelled, linkable contact method on the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLink {
    pub label: String,
    pub value: String,
    pub href: String,
}

/// Data pushed into the detail screen by the `show` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPresentation {
    pub contact_id: ContactId,
    /// Toolbar title; the contact's formatted name.
    pub title: String,
    pub phone_numbers: Vec<FieldLink>,
    pub emails: Vec<FieldLink>,
}

impl From<&Contact> for DetailPresentation {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id(),
            title: contact.name().to_string(),
            phone_numbers: contact.phone_numbers().iter().map(phone_link).collect(),
            emails: contact.emails().iter().map(email_link).collect(),
        }
    }
}

fn phone_link(field: &ContactField) -> FieldLink {
    FieldLink {
        label: field.kind.clone(),
        value: field.value.clone(),
        href: format!("tel:{}", NON_DIAL_CHARS_RE.replace_all(&field.value, "")),
    }
}

fn email_link(field: &ContactField) -> FieldLink {
    FieldLink {
        label: field.kind.clone(),
        value: field.value.clone(),
        href: format!("mailto:{}", field.value.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailPresentation, ListRow};
    use crate::model::contact::{Contact, ContactField};

    fn sample() -> Contact {
        Contact::new(
            2,
            "Taro Abe",
            "Taro",
            "Abe",
            vec![
                ContactField::new("Home", "(03) 1234-5678"),
                ContactField::new("", "+81 90 0000 0000"),
            ],
            vec![ContactField::new("Work", " taro@example.com ")],
        )
    }

    #[test]
    fn detail_links_strip_separators_and_keep_order() {
        let detail = DetailPresentation::from(&sample());
        assert_eq!(detail.title, "Taro Abe");
        assert_eq!(detail.phone_numbers[0].href, "tel:0312345678");
        assert_eq!(detail.phone_numbers[0].value, "(03) 1234-5678");
        assert_eq!(detail.phone_numbers[1].href, "tel:+819000000000");
        assert_eq!(detail.phone_numbers[1].label, "");
        assert_eq!(detail.emails[0].href, "mailto:taro@example.com");
        assert_eq!(detail.emails[0].label, "Work");
    }

    #[test]
    fn list_row_uses_formatted_name() {
        let row = ListRow::from(&sample());
        assert_eq!(row.id, 2);
        assert_eq!(row.name, "Taro Abe");
    }
}
