//! Desktop store object: owns all runtime state and routes reducer effects to persistence.

use desktop_app_contract::ApplicationId;
use platform_host::{KeyValueStore, VirtualFs};
use system_shell::ShellSession;
use system_shell_contract::{ShellEffect, ShellError, ShellExit, ShellOutput};

use crate::config::DesktopConfig;
use crate::model::{DesktopState, InteractionState, ThemeId};
use crate::persistence::{load_boot_state, PersistenceSubscriber};
use crate::reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
use crate::window_manager::WindowManager;

/// Desktop runtime constructed once at boot and passed to every consumer by reference.
#[derive(Debug)]
pub struct DesktopRuntime<S: KeyValueStore> {
    state: DesktopState,
    interaction: InteractionState,
    terminal: ShellSession,
    persistence: PersistenceSubscriber<S>,
    config: DesktopConfig,
}

impl<S: KeyValueStore> DesktopRuntime<S> {
    /// Hydrates the runtime from `store`, falling back to defaults for anything unreadable.
    pub fn boot(store: S, config: DesktopConfig) -> Self {
        let state = load_boot_state(&store, &config);
        let terminal = ShellSession::new(config.home_segments(), config.terminal_history_limit);
        Self {
            state,
            interaction: InteractionState::default(),
            terminal,
            persistence: PersistenceSubscriber::new(store, config.storage.clone()),
            config,
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn windows(&self) -> &WindowManager {
        &self.state.windows
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.state.fs
    }

    pub fn theme(&self) -> ThemeId {
        self.state.theme
    }

    pub fn terminal(&self) -> &ShellSession {
        &self.terminal
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Runs one reducer transition and persists whatever it asks for.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let effects = reduce_desktop(&mut self.state, &mut self.interaction, action)?;
        self.persistence.handle(&self.state, &effects);
        Ok(effects)
    }

    /// Runs a terminal line against the runtime filesystem.
    ///
    /// Filesystem changes are persisted, and `open` requests are turned into
    /// [`DesktopAction::OpenApp`] dispatches. A failed open is reported on the terminal.
    pub fn run_terminal(&mut self, line: &str) -> ShellOutput {
        let before = self.state.fs.clone();
        let mut output = self.terminal.run(line, &mut self.state.fs);
        if self.state.fs != before {
            if let Err(err) = self.dispatch(DesktopAction::FilesystemChanged) {
                tracing::warn!(error = %err, "filesystem change was not recorded");
            }
        }

        for effect in output.effects.clone() {
            let ShellEffect::OpenApp { app_id } = effect;
            if let Err(err) = self.open_from_terminal(&app_id) {
                output.lines.push(format!("open: {}", err.message));
                output.exit = ShellExit::failure(&err);
            }
        }
        output
    }

    fn open_from_terminal(&mut self, raw: &str) -> Result<(), ShellError> {
        let app_id = ApplicationId::new(raw).map_err(|err| ShellError::usage(err.to_string()))?;
        self.dispatch(DesktopAction::OpenApp { app_id })
            .map(|_| ())
            .map_err(|err| ShellError::not_found(err.to_string()))
    }

    /// Wipes persisted state and returns every store to its default.
    pub fn factory_reset(&mut self) -> Result<(), String> {
        self.persistence.clear()?;
        self.state = DesktopState {
            windows: WindowManager::new(self.config.window, self.config.viewport),
            fs: VirtualFs::seeded(),
            theme: ThemeId::default(),
        };
        self.interaction = InteractionState::default();
        self.terminal = ShellSession::new(
            self.config.home_segments(),
            self.config.terminal_history_limit,
        );
        tracing::info!("desktop state reset to defaults");
        Ok(())
    }
}
