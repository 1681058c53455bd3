use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::types::Resolution;

/// Releaser attribution a show carries per source group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Releaser {
    /// Media designation, e.g. "BD" or "TV".
    #[serde(default)]
    pub media: String,
    /// Subbing designation, e.g. "softsub".
    #[serde(default)]
    pub subbing: String,
}

/// A tracked show and its quality policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Display name; also the needle used by substring lookup.
    pub name: String,
    /// Identifier of the show in the downstream episode store.
    pub group_id: String,
    /// Resolutions the show accepts. A release in any other resolution is
    /// dropped, no matter how well the rest of the name parses.
    pub wanted_resolutions: HashSet<Resolution>,
    /// Releaser attribution keyed by source group key.
    #[serde(default)]
    pub releasers: HashMap<String, Releaser>,
}

impl Show {
    /// Whether `resolution` is on the accepted list.
    #[must_use]
    pub fn wants(&self, resolution: Resolution) -> bool {
        self.wanted_resolutions.contains(&resolution)
    }

    /// Releaser attribution for a group key. Shows without an entry for the
    /// group yield empty attribution rather than failing the parse.
    #[must_use]
    pub fn releaser(&self, group_key: &str) -> Releaser {
        self.releasers.get(group_key).cloned().unwrap_or_default()
    }
}

/// Capability for resolving a filename to the show it names.
///
/// The real implementation lives with whatever owns show state (an index
/// built from configuration, a database, a remote service). The parser only
/// ever calls this one method. A lookup `Err` is a collaborator fault and
/// propagates out of the parse instead of marking the filename unparsable.
pub trait ShowLookup: Send + Sync {
    /// Finds the show a (suffix-stripped) release filename belongs to.
    fn find_show(&self, file_name: &str) -> Result<Option<Arc<Show>>, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show() -> Show {
        Show {
            name: "Some Anime".to_owned(),
            group_id: "show-42".to_owned(),
            wanted_resolutions: [Resolution::HD720, Resolution::FHD1080].into(),
            releasers: HashMap::from([(
                "subs".to_owned(),
                Releaser {
                    media: "BD".to_owned(),
                    subbing: "softsub".to_owned(),
                },
            )]),
        }
    }

    #[test]
    fn wants_checks_the_accepted_list() {
        let show = show();
        assert!(show.wants(Resolution::HD720));
        assert!(!show.wants(Resolution::SD480));
        assert!(!show.wants(Resolution::Dim(848, 480)));
    }

    #[test]
    fn releaser_falls_back_to_empty_attribution() {
        let show = show();
        assert_eq!(show.releaser("subs").media, "BD");
        let missing = show.releaser("other-group");
        assert_eq!(missing, Releaser::default());
    }

    #[test]
    fn show_deserializes_from_config_json() {
        let json = r#"{
            "name": "Some Anime",
            "group_id": "show-42",
            "wanted_resolutions": ["720p", "848x480"],
            "releasers": { "subs": { "media": "BD", "subbing": "softsub" } }
        }"#;
        let show: Show = serde_json::from_str(json).unwrap();
        assert!(show.wants(Resolution::Dim(848, 480)));
        assert_eq!(show.releaser("subs").subbing, "softsub");
    }

    #[test]
    fn releasers_key_is_optional_in_config() {
        let json = r#"{
            "name": "Some Anime",
            "group_id": "show-42",
            "wanted_resolutions": ["1080p"]
        }"#;
        let show: Show = serde_json::from_str(json).unwrap();
        assert!(show.releasers.is_empty());
    }
}
