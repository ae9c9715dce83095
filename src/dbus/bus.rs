//! Bus access for name listing and introspection.
//!
//! The resolver and the walker only talk to the bus through the [`Bus`]
//! trait, so they can run against a live `zbus` connection or an in-memory
//! tree in tests.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use zbus::fdo::{DBusProxy, IntrospectableProxy};
use zbus::Connection;

use super::error::{FindError, Result};

/// Read-only bus operations used for discovery.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Names currently owned on the bus.
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Names that can be activated but may not be owned yet.
    async fn list_activatable_names(&self) -> Result<Vec<String>>;

    /// Introspection XML of the object at `path` on `service`.
    async fn introspect(&self, service: &str, path: &str) -> Result<String>;
}

/// Which bus to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusSelector {
    Session,
    System,
    /// An explicit D-Bus address, e.g. `unix:path=/run/dbus/system_bus_socket`.
    Address(String),
}

impl FromStr for BusSelector {
    type Err = FindError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("session") {
            Ok(Self::Session)
        } else if s.eq_ignore_ascii_case("system") {
            Ok(Self::System)
        } else if s.contains(':') {
            Ok(Self::Address(s.to_string()))
        } else {
            Err(FindError::BadBus(s.to_string()))
        }
    }
}

impl fmt::Display for BusSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusSelector::Session => f.write_str("session"),
            BusSelector::System => f.write_str("system"),
            BusSelector::Address(addr) => f.write_str(addr),
        }
    }
}

/// [`Bus`] backed by a `zbus` connection.
pub struct ZbusBus {
    connection: Connection,
}

impl ZbusBus {
    /// Connect to the selected bus.
    ///
    /// Any connection failure is reported as [`FindError::BadBus`].
    pub async fn connect(selector: &BusSelector) -> Result<Self> {
        let connection = match selector {
            BusSelector::Session => Connection::session().await,
            BusSelector::System => Connection::system().await,
            BusSelector::Address(addr) => match zbus::connection::Builder::address(addr.as_str())
            {
                Ok(builder) => builder.build().await,
                Err(e) => Err(e),
            },
        }
        .map_err(|e| {
            debug!("Failed to connect to {} bus: {}", selector, e);
            FindError::BadBus(selector.to_string())
        })?;

        info!("Connected to {} bus", selector);
        Ok(Self { connection })
    }
}

#[async_trait]
impl Bus for ZbusBus {
    async fn list_names(&self) -> Result<Vec<String>> {
        let proxy = DBusProxy::new(&self.connection).await?;
        let names = proxy.list_names().await?;
        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }

    async fn list_activatable_names(&self) -> Result<Vec<String>> {
        let proxy = DBusProxy::new(&self.connection).await?;
        let names = proxy.list_activatable_names().await?;
        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }

    async fn introspect(&self, service: &str, path: &str) -> Result<String> {
        let proxy = IntrospectableProxy::builder(&self.connection)
            .destination(service)?
            .path(path)?
            .build()
            .await?;
        Ok(proxy.introspect().await?)
    }
}
