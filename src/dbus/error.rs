//! Error taxonomy for application lookup and introspection.

use thiserror::Error;

use super::xml::XmlError;

/// Placeholder rendered for fields that were left empty.
const UNSPECIFIED: &str = "unspecified";

fn or_unspecified(field: &str) -> &str {
    if field.is_empty() {
        UNSPECIFIED
    } else {
        field
    }
}

/// Errors raised while resolving an application or walking its objects.
///
/// None of these are retried. They surface unchanged to the caller.
#[derive(Error, Debug)]
pub enum FindError {
    #[error("No such bus {}", or_unspecified(.0))]
    BadBus(String),

    #[error("Couldn't find application {}", or_unspecified(.0))]
    BadApplication(String),

    #[error(
        "Application {} was not specific enough: matches were {}",
        or_unspecified(.requested),
        or_unspecified(.matches)
    )]
    InspecificApplication { requested: String, matches: String },

    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    #[error("D-Bus call failed: {0}")]
    Fdo(#[from] zbus::fdo::Error),

    #[error("Invalid introspection data: {0}")]
    Xml(#[from] XmlError),
}

impl FindError {
    /// Build the ambiguity error from the full list of matching names.
    pub fn inspecific(requested: &str, matches: &[String]) -> Self {
        FindError::InspecificApplication {
            requested: requested.to_string(),
            matches: matches.join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, FindError>;
