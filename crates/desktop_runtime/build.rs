use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowDefaults {
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppManifest {
    app_id: String,
    title: String,
    icon_id: String,
    #[serde(default)]
    requested_capabilities: Vec<String>,
    #[serde(default)]
    single_instance: bool,
    #[serde(default)]
    window_defaults: Option<WindowDefaults>,
}

#[derive(Debug, Deserialize)]
struct AppCatalogFile {
    schema_version: u32,
    #[serde(rename = "app")]
    apps: Vec<AppManifest>,
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("apps.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: AppCatalogFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if catalog.schema_version != 1 {
        panic!(
            "app catalog schema mismatch in {}: expected 1 found {}",
            path.display(),
            catalog.schema_version
        );
    }

    let mut seen = BTreeSet::new();
    for manifest in &catalog.apps {
        if !seen.insert(manifest.app_id.clone()) {
            panic!("duplicate app id `{}` in {}", manifest.app_id, path.display());
        }
        if let Some(defaults) = &manifest.window_defaults {
            if defaults.width <= 0 || defaults.height <= 0 {
                panic!("app `{}` declares a non-positive window size", manifest.app_id);
            }
        }
    }

    let json = serde_json::to_string_pretty(&catalog.apps).expect("serialize app catalog");
    let generated = format!(
        "/// Build-time generated app manifest catalog JSON.\n\
pub const APP_MANIFEST_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
