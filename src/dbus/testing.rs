//! In-memory bus for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::bus::Bus;
use super::error::Result;

/// A static bus: fixed name lists and one introspection document per
/// (service, path). Unknown objects fail like a real `UnknownObject` reply.
#[derive(Default)]
pub struct FakeBus {
    names: Vec<String>,
    activatable: Vec<String>,
    objects: HashMap<(String, String), String>,
    introspected: Mutex<Vec<String>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_activatable(mut self, names: &[&str]) -> Self {
        self.activatable = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_object(mut self, service: &str, path: &str, xml: &str) -> Self {
        self.objects
            .insert((service.to_string(), path.to_string()), xml.to_string());
        self
    }

    /// Paths introspected so far, in call order.
    pub fn introspected(&self) -> Vec<String> {
        self.introspected.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bus for FakeBus {
    async fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    async fn list_activatable_names(&self) -> Result<Vec<String>> {
        Ok(self.activatable.clone())
    }

    async fn introspect(&self, service: &str, path: &str) -> Result<String> {
        self.introspected.lock().unwrap().push(path.to_string());
        self.objects
            .get(&(service.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| {
                zbus::fdo::Error::UnknownObject(format!("No such object path '{}'", path)).into()
            })
    }
}
