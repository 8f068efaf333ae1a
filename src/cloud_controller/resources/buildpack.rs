//! Admin buildpacks.

use serde::Serialize;

/// A buildpack registered with the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buildpack {
    /// Server-assigned GUID, empty for buildpacks not yet created.
    #[serde(skip)]
    pub guid: String,
    /// Buildpack name.
    pub name: String,
    /// Stack the buildpack is bound to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Detection order position, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Whether staging may use the buildpack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Whether the buildpack's bits are frozen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Name of the uploaded bits.
    #[serde(skip)]
    pub filename: Option<String>,
}
