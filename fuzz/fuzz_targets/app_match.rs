//! Fuzz target for application name matching.
//!
//! Checks that a resolved name really contains the request, and that the
//! error kind agrees with the number of matching names.

#![no_main]

use arbitrary::Arbitrary;
use busfind::dbus::match_application;
use busfind::FindError;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    names: Vec<String>,
    requested: String,
}

fuzz_target!(|input: Input| {
    let lower = input.requested.to_lowercase();
    let matching = input
        .names
        .iter()
        .filter(|n| n.contains(&input.requested) || n.to_lowercase().contains(&lower))
        .count();

    match match_application(&input.names, &input.requested) {
        Ok(name) => {
            assert_eq!(matching, 1);
            assert!(name.contains(&input.requested) || name.to_lowercase().contains(&lower));
        }
        Err(FindError::BadApplication(_)) => assert_eq!(matching, 0),
        Err(FindError::InspecificApplication { .. }) => assert!(matching > 1),
        Err(other) => panic!("unexpected error: {}", other),
    }
});
