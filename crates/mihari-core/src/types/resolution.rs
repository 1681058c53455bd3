use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A video resolution as it appears in release names and quality lists.
///
/// Serialized as its canonical string (`"720p"`, `"848x480"`), so JSON
/// config files and filter lists read the way fansub groups write them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    /// 480p, Standard Definition.
    SD480,
    /// 720p, High Definition.
    HD720,
    /// 1080p, Full HD.
    FHD1080,
    /// An explicit width by height pair, e.g. `704x396`.
    Dim(u16, u16),
}

impl Resolution {
    /// Maps a single release-name token to a resolution.
    ///
    /// Matching is case-insensitive and limited to the spellings groups
    /// actually use. `BD720p` and `1280x720` collapse to [`Resolution::HD720`],
    /// while `BD480p` keeps its true frame size of 848x480. A dimension
    /// pair outside this table (say `100x100`) is not treated as a
    /// resolution at all.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "480p" => Some(Self::SD480),
            "720p" | "bd720p" | "1280x720" => Some(Self::HD720),
            "1080p" | "bd1080p" | "1920x1080" => Some(Self::FHD1080),
            "bd480p" | "848x480" => Some(Self::Dim(848, 480)),
            "640x480" => Some(Self::Dim(640, 480)),
            "704x396" => Some(Self::Dim(704, 396)),
            "720x480" => Some(Self::Dim(720, 480)),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SD480 => write!(f, "480p"),
            Self::HD720 => write!(f, "720p"),
            Self::FHD1080 => write!(f, "1080p"),
            Self::Dim(w, h) => write!(f, "{w}x{h}"),
        }
    }
}

/// Error returned when a string is not a recognized resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized resolution: {0:?}")]
pub struct ParseResolutionError(String);

impl FromStr for Resolution {
    type Err = ParseResolutionError;

    /// Parses a configuration-side resolution string.
    ///
    /// Accepts everything [`Resolution::from_token`] does, plus arbitrary
    /// `WxH` pairs so quality lists can name unusual encodes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(res) = Self::from_token(s) {
            return Ok(res);
        }
        s.split_once(['x', 'X'])
            .and_then(|(w, h)| {
                let w: u16 = w.parse().ok()?;
                let h: u16 = h.parse().ok()?;
                Some(Self::Dim(w, h))
            })
            .ok_or_else(|| ParseResolutionError(s.to_owned()))
    }
}

impl TryFrom<String> for Resolution {
    type Error = ParseResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_display() {
        assert_eq!(Resolution::SD480.to_string(), "480p");
        assert_eq!(Resolution::HD720.to_string(), "720p");
        assert_eq!(Resolution::FHD1080.to_string(), "1080p");
        assert_eq!(Resolution::Dim(848, 480).to_string(), "848x480");
    }

    #[test]
    fn token_aliases_collapse() {
        assert_eq!(Resolution::from_token("BD720p"), Some(Resolution::HD720));
        assert_eq!(Resolution::from_token("1280x720"), Some(Resolution::HD720));
        assert_eq!(Resolution::from_token("bd1080p"), Some(Resolution::FHD1080));
        assert_eq!(
            Resolution::from_token("BD480p"),
            Some(Resolution::Dim(848, 480))
        );
        assert_eq!(
            Resolution::from_token("704x396"),
            Some(Resolution::Dim(704, 396))
        );
    }

    #[test]
    fn unknown_tokens_are_not_resolutions() {
        assert_eq!(Resolution::from_token("Hi10P"), None);
        assert_eq!(Resolution::from_token("100x100"), None);
        assert_eq!(Resolution::from_token("48KHz"), None);
        assert_eq!(Resolution::from_token(""), None);
    }

    #[test]
    fn config_strings_parse() {
        assert_eq!("1080p".parse::<Resolution>().unwrap(), Resolution::FHD1080);
        assert_eq!(
            "692x390".parse::<Resolution>().unwrap(),
            Resolution::Dim(692, 390)
        );
        assert!("potato".parse::<Resolution>().is_err());
        assert!("123456x720".parse::<Resolution>().is_err());
    }

    #[test]
    fn serde_uses_canonical_strings() {
        let json = serde_json::to_string(&Resolution::Dim(848, 480)).unwrap();
        assert_eq!(json, "\"848x480\"");
        let back: Resolution = serde_json::from_str("\"BD720p\"").unwrap();
        assert_eq!(back, Resolution::HD720);
        let list: Vec<Resolution> = serde_json::from_str(r#"["720p", "1080p"]"#).unwrap();
        assert_eq!(list, vec![Resolution::HD720, Resolution::FHD1080]);
    }
}
