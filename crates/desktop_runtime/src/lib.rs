//! Desktop runtime: window manager, reducer, app catalogue, persistence, and the runtime store.

pub mod apps;
pub mod config;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime;
pub mod window_manager;

pub use apps::{app_catalog, app_descriptor};
pub use config::{ConfigError, DesktopConfig, StorageKeys, WindowGeometry};
pub use model::*;
pub use persistence::{load_boot_state, PersistenceSubscriber};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime::DesktopRuntime;
pub use window_manager::{WindowError, WindowManager};
