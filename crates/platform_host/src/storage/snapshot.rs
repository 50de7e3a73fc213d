//! Versioned whole-store snapshot envelopes and fallback-on-load helpers.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::kv::KeyValueStore;

/// Version for [`SnapshotEnvelope`] metadata serialization.
pub const SNAPSHOT_ENVELOPE_VERSION: u32 = 1;
/// Storage key for the virtual filesystem tree.
pub const FS_STATE_KEY: &str = "quantumflow.vfs.v1";
/// Storage key for the window layout.
pub const WINDOW_LAYOUT_KEY: &str = "quantumflow.windows.v1";
/// Storage key for the selected theme id.
pub const THEME_KEY: &str = "quantumflow.theme.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope wrapping one persisted store snapshot.
pub struct SnapshotEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Storage key the envelope was written under.
    pub key: String,
    /// Store-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized store payload.
    pub payload: Value,
}

impl SnapshotEnvelope {
    /// Creates an envelope stamped with a monotonic timestamp.
    pub fn new(key: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: SNAPSHOT_ENVELOPE_VERSION,
            key: key.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// Serializes `payload` into an envelope and replaces whatever is stored under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub fn save_snapshot_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    let envelope = SnapshotEnvelope::new(key, schema_version, payload);
    let raw = serde_json::to_string(&envelope).map_err(|e| e.to_string())?;
    store.save_raw(key, &raw)
}

/// Loads the snapshot stored under `key`.
///
/// # Errors
///
/// Returns an error when the store fails, the blob is malformed, or its schema version differs
/// from `schema_version`.
pub fn load_snapshot_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
    schema_version: u32,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_raw(key)? else {
        return Ok(None);
    };
    let envelope: SnapshotEnvelope = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    if envelope.schema_version != schema_version {
        return Err(format!(
            "schema mismatch for `{key}`: expected {schema_version} found {}",
            envelope.schema_version
        ));
    }
    serde_json::from_value(envelope.payload)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Loads the snapshot under `key`, treating a missing or unreadable blob as absence.
///
/// Failures are logged and never propagated; `fallback` supplies the default state.
pub fn load_snapshot_or_else<S, T, F>(store: &S, key: &str, schema_version: u32, fallback: F) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match load_snapshot_with(store, key, schema_version) {
        Ok(Some(value)) => value,
        Ok(None) => fallback(),
        Err(err) => {
            tracing::warn!(key, error = %err, "persisted snapshot unreadable, using defaults");
            fallback()
        }
    }
}
