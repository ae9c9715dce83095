//! Resolve a loosely typed application name to a bus service name.

use std::collections::HashSet;
use tracing::{debug, info};

use super::bus::Bus;
use super::error::{FindError, Result};

/// All names on the bus: owned names first, then activatable ones, with
/// duplicates removed (first occurrence wins).
pub async fn candidate_names(bus: &dyn Bus) -> Result<Vec<String>> {
    let owned = bus.list_names().await?;
    let activatable = bus.list_activatable_names().await?;
    debug!(
        "Bus lists {} owned and {} activatable names",
        owned.len(),
        activatable.len()
    );

    let mut seen = HashSet::new();
    Ok(owned
        .into_iter()
        .chain(activatable)
        .filter(|name| seen.insert(name.clone()))
        .collect())
}

/// Find the single bus name that contains `requested`.
///
/// A name matches if it contains `requested` as-is, or failing that, if it
/// contains it ignoring case. Each name is counted at most once.
pub async fn get_matching_application(bus: &dyn Bus, requested: &str) -> Result<String> {
    let names = candidate_names(bus).await?;
    let app = match_application(&names, requested)?;
    info!("Resolved application {:?} to {}", requested, app);
    Ok(app)
}

/// Pick the single name in `names` matching `requested`.
///
/// Zero matches is [`FindError::BadApplication`]; more than one is
/// [`FindError::InspecificApplication`] listing every match.
pub fn match_application(names: &[String], requested: &str) -> Result<String> {
    let requested_lower = requested.to_lowercase();

    let matches: Vec<String> = names
        .iter()
        .filter(|name| {
            name.contains(requested) || name.to_lowercase().contains(&requested_lower)
        })
        .cloned()
        .collect();

    match matches.as_slice() {
        [] => Err(FindError::BadApplication(requested.to_string())),
        [single] => Ok(single.clone()),
        _ => {
            debug!("{:?} matched {} names", requested, matches.len());
            Err(FindError::inspecific(requested, &matches))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbus::testing::FakeBus;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_match() {
        let list = names(&["org.freedesktop.Notifications", "org.freedesktop.DBus"]);
        assert_eq!(
            match_application(&list, "Notif").unwrap(),
            "org.freedesktop.Notifications"
        );
    }

    #[test]
    fn test_ambiguous_match_lists_all() {
        let list = names(&["org.freedesktop.Notifications", "org.freedesktop.DBus"]);
        match match_application(&list, "org.freedesktop") {
            Err(FindError::InspecificApplication { requested, matches }) => {
                assert_eq!(requested, "org.freedesktop");
                assert_eq!(
                    matches,
                    "org.freedesktop.Notifications, org.freedesktop.DBus"
                );
            }
            other => panic!("expected InspecificApplication, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match() {
        let list = names(&["org.freedesktop.DBus"]);
        let err = match_application(&list, "Rhythmbox").unwrap_err();
        assert!(matches!(err, FindError::BadApplication(ref r) if r == "Rhythmbox"));
        assert_eq!(err.to_string(), "Couldn't find application Rhythmbox");
    }

    #[test]
    fn test_no_names_at_all() {
        assert!(matches!(
            match_application(&[], "anything"),
            Err(FindError::BadApplication(_))
        ));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let list = names(&["org.gnome.Rhythmbox3", "org.freedesktop.DBus"]);
        assert_eq!(
            match_application(&list, "rhythmbox").unwrap(),
            "org.gnome.Rhythmbox3"
        );
    }

    #[test]
    fn test_name_matching_both_ways_counts_once() {
        // "dbus" matches case-insensitively and "DBus" case-sensitively;
        // either way the name is a single candidate.
        let list = names(&["org.freedesktop.DBus"]);
        assert_eq!(
            match_application(&list, "DBus").unwrap(),
            "org.freedesktop.DBus"
        );
        assert_eq!(
            match_application(&list, "dbus").unwrap(),
            "org.freedesktop.DBus"
        );
    }

    #[test]
    fn test_mixed_case_matches_are_ambiguous() {
        let list = names(&["org.kde.Konsole", "org.example.konsole"]);
        assert!(matches!(
            match_application(&list, "konsole"),
            Err(FindError::InspecificApplication { .. })
        ));
    }

    #[tokio::test]
    async fn test_candidates_deduplicated() {
        let bus = FakeBus::new()
            .with_names(&["org.freedesktop.DBus", "org.freedesktop.Notifications"])
            .with_activatable(&["org.freedesktop.Notifications", "org.gnome.Rhythmbox3"]);

        let candidates = candidate_names(&bus).await.unwrap();
        assert_eq!(
            candidates,
            vec![
                "org.freedesktop.DBus",
                "org.freedesktop.Notifications",
                "org.gnome.Rhythmbox3"
            ]
        );
    }

    #[tokio::test]
    async fn test_owned_and_activatable_duplicate_is_not_ambiguous() {
        let bus = FakeBus::new()
            .with_names(&["org.freedesktop.Notifications"])
            .with_activatable(&["org.freedesktop.Notifications"]);

        assert_eq!(
            get_matching_application(&bus, "Notif").await.unwrap(),
            "org.freedesktop.Notifications"
        );
    }

    #[tokio::test]
    async fn test_activatable_only_name_resolves() {
        let bus = FakeBus::new()
            .with_names(&["org.freedesktop.DBus"])
            .with_activatable(&["org.gnome.Rhythmbox3"]);

        assert_eq!(
            get_matching_application(&bus, "Rhythm").await.unwrap(),
            "org.gnome.Rhythmbox3"
        );
    }
}
