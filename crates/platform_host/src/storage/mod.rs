//! Persisted key/value storage contracts and snapshot envelopes.

pub mod kv;
pub mod snapshot;
