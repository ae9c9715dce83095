//! D-Bus application discovery.
//!
//! Resolves a loosely typed application name to a bus service name and maps
//! the service's object tree via `org.freedesktop.DBus.Introspectable`.
//!
//! # Architecture
//!
//! ```text
//! "Notif" ──> get_matching_application ──> "org.freedesktop.Notifications"
//!                  │ ListNames                        │
//!                  │ ListActivatableNames             v
//!                  v                        get_objects(service, "/")
//!             ┌─────────┐   Introspect (per object)   │
//!             │   Bus   │<────────────────────────────┘
//!             └─────────┘
//!          ZbusBus (live) / FakeBus (tests)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let bus = ZbusBus::connect(&BusSelector::Session).await?;
//! let service = get_matching_application(&bus, "Notifications").await?;
//! let objects = get_objects(&bus, &service, ROOT_PATH).await?;
//! for (path, entry) in &objects {
//!     println!("{}: {} interfaces", path, entry.interfaces.len());
//! }
//! ```

mod bus;
mod error;
mod introspect;
mod resolve;
#[cfg(test)]
mod testing;
pub mod xml;

pub use bus::{Bus, BusSelector, ZbusBus};
pub use error::{FindError, Result};
pub use introspect::{
    child_path, get_objects, normalize_path, ArgDescriptor, InterfaceDescriptor,
    IntrospectionResult, MethodDescriptor, ObjectEntry, ROOT_PATH,
};
pub use resolve::{candidate_names, get_matching_application, match_application};
