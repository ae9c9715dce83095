//! busfind library exports.
//!
//! Finds a D-Bus application by (part of) its name and maps the objects,
//! interfaces, methods, signals and properties it exposes.

pub mod config;
pub mod dbus;
pub mod render;

// Re-export commonly used types for convenience
pub use config::Config;
pub use dbus::{
    get_matching_application, get_objects, Bus, BusSelector, FindError, IntrospectionResult,
    ZbusBus,
};
pub use render::OutputFormat;
