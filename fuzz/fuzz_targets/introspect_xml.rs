//! Fuzz target for introspection XML parsing.
//!
//! Services control the XML they return, so no document may cause a panic.

#![no_main]

use busfind::dbus::xml::Node;
use busfind::dbus::ObjectEntry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(node) = Node::parse(s) {
            // Every interface found must end up in the entry.
            let declared = node.interfaces().count();
            match ObjectEntry::from_node("/", &node) {
                Some(entry) => assert!(!entry.interfaces.is_empty() && declared > 0),
                None => assert_eq!(declared, 0),
            }
        }
    }
});
