//! Reconciliation of parsed fields with per-source default metadata.
//!
//! Sources announcing for groups with rigid naming habits often leave
//! resolution or container out of the filename and declare them once in
//! configuration instead. Parsed values always win; defaults only fill
//! holes, and a parsed container that contradicts the declared default
//! disqualifies the release.

use crate::types::{Resolution, SourceDefaults};

/// Final resolution and container for a release, after defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefaults {
    /// Resolution, parsed or defaulted.
    pub resolution: Resolution,
    /// Container, parsed or defaulted.
    pub container: String,
    /// True when the container came from defaults, in which case the save
    /// filename needs the extension appended.
    pub container_defaulted: bool,
}

/// Why parsed fields and source defaults could not be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultsError {
    /// Neither the filename nor the source names a resolution.
    NoResolution,
    /// Neither the filename nor the source names a container.
    NoContainer,
    /// The filename's container contradicts the source default.
    ContainerMismatch,
}

/// Applies source defaults to the parsed resolution and container.
pub fn resolve(
    parsed_resolution: Option<Resolution>,
    parsed_container: Option<&str>,
    defaults: &SourceDefaults,
) -> Result<ResolvedDefaults, DefaultsError> {
    let resolution = parsed_resolution
        .or(defaults.resolution)
        .ok_or(DefaultsError::NoResolution)?;

    let (container, container_defaulted) = match (parsed_container, defaults.container.as_deref()) {
        (Some(parsed), Some(default)) if parsed != default => {
            return Err(DefaultsError::ContainerMismatch);
        }
        (Some(parsed), _) => (parsed.to_owned(), false),
        (None, Some(default)) => (default.to_owned(), true),
        (None, None) => return Err(DefaultsError::NoContainer),
    };

    Ok(ResolvedDefaults {
        resolution,
        container,
        container_defaulted,
    })
}
