//! Boot hydration and the persistence subscriber that saves store snapshots after reducer runs.
//!
//! Each logical store (filesystem, window layout, theme) lives under its own key as a
//! [`platform_host::SnapshotEnvelope`]. Anything missing or unreadable at boot is treated as
//! absent and replaced by its default.

use platform_host::{
    load_snapshot_or_else, load_snapshot_with, save_snapshot_with, FsSnapshot, KeyValueStore,
    VirtualFs, FS_SNAPSHOT_SCHEMA_VERSION,
};

use crate::config::{DesktopConfig, StorageKeys};
use crate::model::{
    DesktopState, ThemeId, WindowLayoutSnapshot, DESKTOP_LAYOUT_SCHEMA_VERSION,
    THEME_SCHEMA_VERSION,
};
use crate::reducer::RuntimeEffect;
use crate::window_manager::WindowManager;

/// Loads the filesystem, window layout, and theme, falling back per store.
pub fn load_boot_state<S: KeyValueStore + ?Sized>(
    store: &S,
    config: &DesktopConfig,
) -> DesktopState {
    let keys = &config.storage;
    let fs = load_filesystem(store, &keys.filesystem);

    let layout = load_snapshot_or_else(
        store,
        &keys.windows,
        DESKTOP_LAYOUT_SCHEMA_VERSION,
        empty_layout,
    );
    let windows = WindowManager::from_snapshot(layout, config.window, config.viewport);

    let theme = load_snapshot_or_else(store, &keys.theme, THEME_SCHEMA_VERSION, ThemeId::default);

    tracing::info!(
        windows = windows.len(),
        theme = theme.as_str(),
        "hydrated desktop state"
    );
    DesktopState { windows, fs, theme }
}

fn load_filesystem<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> VirtualFs {
    let loaded = load_snapshot_with::<_, FsSnapshot>(store, key, FS_SNAPSHOT_SCHEMA_VERSION);
    let snapshot = match loaded {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return VirtualFs::seeded(),
        Err(err) => {
            tracing::warn!(key, error = %err, "filesystem snapshot unreadable, using seed tree");
            return VirtualFs::seeded();
        }
    };
    VirtualFs::from_snapshot(snapshot).unwrap_or_else(|err| {
        tracing::warn!(key, error = %err, "filesystem snapshot invalid, using seed tree");
        VirtualFs::seeded()
    })
}

fn empty_layout() -> WindowLayoutSnapshot {
    WindowLayoutSnapshot {
        schema_version: DESKTOP_LAYOUT_SCHEMA_VERSION,
        windows: Vec::new(),
    }
}

/// Saves store snapshots in response to [`RuntimeEffect`] persistence intents.
#[derive(Debug, Clone)]
pub struct PersistenceSubscriber<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> PersistenceSubscriber<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies every persistence intent in `effects`. Failures are logged, not returned.
    pub fn handle(&self, state: &DesktopState, effects: &[RuntimeEffect]) {
        for effect in effects {
            if let Err(err) = self.persist(state, effect) {
                tracing::warn!(?effect, error = %err, "persisting desktop state failed");
            }
        }
    }

    /// Saves the snapshot named by one effect. Non-persistence effects are ignored.
    pub fn persist(&self, state: &DesktopState, effect: &RuntimeEffect) -> Result<(), String> {
        match effect {
            RuntimeEffect::PersistFilesystem => save_snapshot_with(
                &self.store,
                &self.keys.filesystem,
                FS_SNAPSHOT_SCHEMA_VERSION,
                &state.fs.snapshot(),
            ),
            RuntimeEffect::PersistLayout => save_snapshot_with(
                &self.store,
                &self.keys.windows,
                DESKTOP_LAYOUT_SCHEMA_VERSION,
                &state.windows.snapshot(),
            ),
            RuntimeEffect::PersistTheme => save_snapshot_with(
                &self.store,
                &self.keys.theme,
                THEME_SCHEMA_VERSION,
                &state.theme,
            ),
            RuntimeEffect::FocusWindowInput(_) => Ok(()),
        }
    }

    /// Deletes every persisted store.
    pub fn clear(&self) -> Result<(), String> {
        for key in [&self.keys.filesystem, &self.keys.windows, &self.keys.theme] {
            self.store.delete(key)?;
        }
        Ok(())
    }
}
