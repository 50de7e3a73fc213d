//! Application catalogue compiled from `apps.toml` at build time.

use std::sync::OnceLock;

use desktop_app_contract::{AppDescriptor, AppManifest, ApplicationId};

use crate::model::OpenWindowRequest;

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

/// Returns every catalogued application in declaration order.
///
/// Entries that fail manifest validation are logged and left out.
pub fn app_catalog() -> &'static [AppDescriptor] {
    static CATALOG: OnceLock<Vec<AppDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let manifests: Vec<AppManifest> = match serde_json::from_str(APP_MANIFEST_CATALOG_JSON) {
            Ok(manifests) => manifests,
            Err(err) => {
                tracing::error!("generated app catalog failed to parse: {err}");
                return Vec::new();
            }
        };
        manifests
            .into_iter()
            .filter_map(|manifest| match AppDescriptor::try_from(manifest) {
                Ok(descriptor) => Some(descriptor),
                Err(err) => {
                    tracing::warn!("skipping app manifest: {err}");
                    None
                }
            })
            .collect()
    })
}

/// Returns the generated catalogue JSON payload.
pub fn app_catalog_json() -> &'static str {
    APP_MANIFEST_CATALOG_JSON
}

pub fn app_descriptor(app_id: &ApplicationId) -> Option<&'static AppDescriptor> {
    app_catalog().iter().find(|app| &app.app_id == app_id)
}

/// Builds the window request for a catalogued app: title, icon, and preferred size.
pub fn open_request_for(descriptor: &AppDescriptor) -> OpenWindowRequest {
    OpenWindowRequest {
        app_id: descriptor.app_id.clone(),
        title: Some(descriptor.title.clone()),
        icon_id: Some(descriptor.icon_id.clone()),
        size: descriptor
            .window_defaults
            .map(|defaults| (defaults.width, defaults.height)),
    }
}
