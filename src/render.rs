//! Output formatting for introspection results.

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

use crate::dbus::IntrospectionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree, one member per line
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Render `objects` in the requested format.
pub fn render(objects: &IntrospectionResult, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(objects)),
        OutputFormat::Json => serde_json::to_string_pretty(objects),
    }
}

/// Paths in sorted order, interfaces indented below, members below those.
pub fn render_text(objects: &IntrospectionResult) -> String {
    let mut out = String::new();
    for (path, entry) in objects {
        let _ = writeln!(out, "{}", path);
        for (name, iface) in &entry.interfaces {
            let _ = writeln!(out, "  {}", name);
            for method in &iface.methods {
                let _ = writeln!(out, "    method {}", method.signature());
            }
            for signal in &iface.signals {
                let _ = writeln!(out, "    signal {}", signal);
            }
            for property in &iface.properties {
                let _ = writeln!(out, "    property {}", property);
            }
        }
    }
    out
}
