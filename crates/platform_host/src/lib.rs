//! Typed host-domain contracts shared by the desktop runtime and the shell.
//!
//! This crate owns the virtual filesystem tree that backs the terminal and explorer apps, plus
//! the key/value persistence contracts used to flush whole-store snapshots. Nothing here awaits
//! or blocks; every operation is synchronous and total.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::{
    display_path, parse_absolute_path, resolve_session_path, seed_tree, FsEntry, FsError,
    FsSnapshot, VNode, VNodeKind, VirtualFs, DEFAULT_HOME, FS_SNAPSHOT_SCHEMA_VERSION,
};
pub use storage::kv::{
    load_json_with, save_json_with, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore,
};
pub use storage::snapshot::{
    load_snapshot_or_else, load_snapshot_with, save_snapshot_with, SnapshotEnvelope,
    FS_STATE_KEY, SNAPSHOT_ENVELOPE_VERSION, THEME_KEY, WINDOW_LAYOUT_KEY,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
