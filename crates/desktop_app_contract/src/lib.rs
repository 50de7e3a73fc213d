//! Shared contract types between the desktop window manager runtime and its application registry.
//!
//! The window manager treats an application as an opaque [`ApplicationId`]. Everything it needs to
//! present a window (title, icon, default size) comes from an [`AppDescriptor`] built out of an
//! [`AppManifest`]. Capability grants are an allow-list filter over the fixed kernel ABI
//! permission table and gate nothing at runtime.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version string of the cosmetic kernel ABI advertised to apps.
pub const KERNEL_ABI_VERSION: &str = "1.0.0";

/// Permissions the kernel ABI knows how to grant.
pub const KERNEL_ABI_PERMISSIONS: [AppCapability; 4] = [
    AppCapability::FsRead,
    AppCapability::FsWrite,
    AppCapability::NetObserve,
    AppCapability::SystemTime,
];

/// Stable identifier for an app package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` is made of lowercase kebab-case segments,
    /// optionally separated by dots (`terminal`, `system.monitor`).
    pub fn new(raw: impl Into<String>) -> Result<Self, ManifestError> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(ManifestError::InvalidApplicationId(raw))
        }
    }

    /// Creates an id without validation for compile-time trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    raw.split('.').all(|part| {
        let bytes = part.as_bytes();
        !part.is_empty()
            && part.len() <= 32
            && bytes[0].is_ascii_lowercase()
            && !part.ends_with('-')
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Permission scopes an app may request from the kernel ABI.
pub enum AppCapability {
    /// Read access to the virtual filesystem.
    #[serde(rename = "fs.read")]
    FsRead,
    /// Write access to the virtual filesystem.
    #[serde(rename = "fs.write")]
    FsWrite,
    /// Observing network status.
    #[serde(rename = "net.observe")]
    NetObserve,
    /// Reading the system clock.
    #[serde(rename = "system.time")]
    SystemTime,
}

impl AppCapability {
    /// Returns the dotted permission name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FsRead => "fs.read",
            Self::FsWrite => "fs.write",
            Self::NetObserve => "net.observe",
            Self::SystemTime => "system.time",
        }
    }

    /// Parses a dotted permission name, returning `None` for anything the ABI does not know.
    pub fn parse(raw: &str) -> Option<Self> {
        KERNEL_ABI_PERMISSIONS
            .into_iter()
            .find(|capability| capability.as_str() == raw)
    }
}

/// Capability set handed to an app after filtering its request against the ABI table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityGrant {
    /// App the grant belongs to.
    pub app_id: ApplicationId,
    /// Granted permissions in request order, without duplicates.
    pub permissions: Vec<AppCapability>,
}

impl CapabilityGrant {
    /// Returns `true` when `capability` survived the filter.
    pub fn allows(&self, capability: AppCapability) -> bool {
        self.permissions.contains(&capability)
    }
}

/// Filters `requested` permission names against [`KERNEL_ABI_PERMISSIONS`].
///
/// Unknown names are dropped silently. This is bookkeeping for display; nothing is enforced.
pub fn sandbox<S: AsRef<str>>(app_id: &ApplicationId, requested: &[S]) -> CapabilityGrant {
    let mut permissions = Vec::new();
    for capability in requested
        .iter()
        .filter_map(|raw| AppCapability::parse(raw.as_ref()))
    {
        if !permissions.contains(&capability) {
            permissions.push(capability);
        }
    }
    CapabilityGrant {
        app_id: app_id.clone(),
        permissions,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Preferred initial window size declared by an app manifest.
pub struct WindowDefaults {
    /// Initial width in px.
    pub width: i32,
    /// Initial height in px.
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Raw app manifest as authored in the app catalogue.
pub struct AppManifest {
    /// Canonical app id.
    pub app_id: String,
    /// Window and launcher title.
    pub title: String,
    /// Icon identifier used by the presentation layer.
    pub icon_id: String,
    /// Requested kernel ABI permissions, by dotted name.
    #[serde(default)]
    pub requested_capabilities: Vec<String>,
    /// Whether opening the app again should focus the existing window.
    #[serde(default)]
    pub single_instance: bool,
    /// Optional initial window size.
    #[serde(default)]
    pub window_defaults: Option<WindowDefaults>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Validated registry entry for one application.
pub struct AppDescriptor {
    /// Canonical app id.
    pub app_id: ApplicationId,
    /// Window and launcher title.
    pub title: String,
    /// Icon identifier used by the presentation layer.
    pub icon_id: String,
    /// Capabilities granted after sandbox filtering.
    pub capabilities: CapabilityGrant,
    /// Whether opening the app again should focus the existing window.
    pub single_instance: bool,
    /// Optional initial window size.
    pub window_defaults: Option<WindowDefaults>,
}

impl TryFrom<AppManifest> for AppDescriptor {
    type Error = ManifestError;

    fn try_from(manifest: AppManifest) -> Result<Self, Self::Error> {
        let app_id = ApplicationId::new(manifest.app_id)?;
        if manifest.title.trim().is_empty() {
            return Err(ManifestError::MissingTitle(app_id));
        }
        let capabilities = sandbox(&app_id, &manifest.requested_capabilities);
        Ok(Self {
            app_id,
            title: manifest.title,
            icon_id: manifest.icon_id,
            capabilities,
            single_instance: manifest.single_instance,
            window_defaults: manifest.window_defaults,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors raised while validating app ids and manifests.
pub enum ManifestError {
    /// The id does not follow the kebab-case segment policy.
    #[error("invalid application id `{0}`")]
    InvalidApplicationId(String),
    /// The manifest has an empty title.
    #[error("app manifest `{0}` is missing a title")]
    MissingTitle(ApplicationId),
}
