//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::ApplicationId;
use platform_host::{FsError, FsSnapshot};
use thiserror::Error;

use crate::apps::{app_descriptor, open_request_for};
use crate::model::{
    DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition, ResizeEdge,
    ResizeSession, ThemeId, WindowId, WindowLayoutSnapshot, WindowRect,
};
use crate::window_manager::{resize_rect, WindowError, WindowManager};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a catalogued app, focusing the existing window of a single-instance app.
    OpenApp {
        /// App to open.
        app_id: ApplicationId,
    },
    /// Open a window from an explicit request, bypassing the catalogue.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Move a window's top-left corner.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New x position.
        x: i32,
        /// New y position.
        y: i32,
    },
    /// Resize a window.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// New width.
        w: i32,
        /// New height.
        h: i32,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Maximize a window to the current viewport.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Restore a minimized or maximized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize a floating window or restore a maximized one.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Toggle taskbar behavior for a window (focus, minimize, or restore).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Replace the desktop viewport.
    SetViewport {
        /// New viewport rectangle.
        viewport: WindowRect,
    },
    /// Switch the desktop theme.
    SetTheme {
        /// Theme id such as `emerald`.
        theme_id: String,
    },
    /// Replace the window list with a persisted layout.
    HydrateLayout {
        /// Layout to restore.
        snapshot: WindowLayoutSnapshot,
    },
    /// Replace the filesystem with a snapshot.
    RestoreFilesystem {
        /// Snapshot to restore.
        snapshot: FsSnapshot,
    },
    /// Replace the filesystem with the seed tree.
    ResetFilesystem,
    /// Record that the filesystem was changed outside the reducer, for example by the terminal.
    FilesystemChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the runtime to execute.
pub enum RuntimeEffect {
    /// Persist the current window layout snapshot.
    PersistLayout,
    /// Persist the filesystem snapshot.
    PersistFilesystem,
    /// Persist the theme id.
    PersistTheme,
    /// Move keyboard input into the newly focused window.
    ///
    /// Persistence ignores it. It is returned from [`reduce_desktop`] for the embedding host,
    /// which owns the input surface.
    FocusWindowInput(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// The action referenced a window that is not managed.
    #[error(transparent)]
    Window(#[from] WindowError),
    /// The app id is not in the catalogue.
    #[error("unknown application `{0}`")]
    UnknownApp(ApplicationId),
    /// The theme id is not one of the known themes.
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
    /// A filesystem snapshot failed validation.
    #[error(transparent)]
    Filesystem(#[from] FsError),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Failed actions leave the state unchanged and emit nothing.
///
/// # Errors
///
/// Returns [`ReducerError`] when an action references a missing window or app, an unknown theme,
/// or an invalid filesystem snapshot.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenApp { app_id } => {
            let descriptor =
                app_descriptor(&app_id).ok_or_else(|| ReducerError::UnknownApp(app_id.clone()))?;
            let existing = descriptor
                .single_instance
                .then(|| state.windows.find_by_app(&app_id))
                .flatten();
            let window_id = match existing {
                Some(window_id) => {
                    state.windows.focus(window_id)?;
                    window_id
                }
                None => state.windows.open(open_request_for(descriptor)).id,
            };
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::OpenWindow(request) => {
            let window_id = state.windows.open(request).id;
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            state.windows.close(window_id)?;
            clear_sessions_for(interaction, window_id);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::FocusWindow { window_id } => {
            state.windows.focus(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            state.windows.move_to(window_id, x, y)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ResizeWindow { window_id, w, h } => {
            state.windows.resize(window_id, w, h)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MinimizeWindow { window_id } => {
            state.windows.minimize(window_id)?;
            clear_sessions_for(interaction, window_id);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MaximizeWindow { window_id } => {
            state.windows.maximize(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::RestoreWindow { window_id } => {
            state.windows.restore(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ToggleMaximize { window_id } => {
            state.windows.toggle_maximize(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            state.windows.toggle_taskbar(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
            if state.windows.active_window() == Some(window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            state.windows.focus(window_id)?;
            let rect_start = window_rect(&state.windows, window_id)?;
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let maximized = state
                    .windows
                    .window(session.window_id)
                    .map(|w| w.maximized)
                    .ok_or(WindowError::WindowNotFound(session.window_id))?;
                if !maximized {
                    let target = session.rect_start.offset(dx, dy);
                    state.windows.set_rect(session.window_id, target)?;
                }
            }
        }
        DesktopAction::EndMove => {
            if interaction.dragging.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            state.windows.focus(window_id)?;
            let rect_start = window_rect(&state.windows, window_id)?;
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let maximized = state
                    .windows
                    .window(session.window_id)
                    .map(|w| w.maximized)
                    .ok_or(WindowError::WindowNotFound(session.window_id))?;
                if !maximized {
                    let target = resize_rect(session.rect_start, session.edge, dx, dy);
                    state.windows.set_rect(session.window_id, target)?;
                }
            }
        }
        DesktopAction::EndResize => {
            if interaction.resizing.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::SetViewport { viewport } => {
            state.windows.set_viewport(viewport);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetTheme { theme_id } => {
            let theme = ThemeId::parse(&theme_id).ok_or(ReducerError::UnknownTheme(theme_id))?;
            if theme != state.theme {
                state.theme = theme;
                effects.push(RuntimeEffect::PersistTheme);
            }
        }
        DesktopAction::HydrateLayout { snapshot } => {
            let geometry = *state.windows.geometry();
            let viewport = state.windows.viewport();
            state.windows = WindowManager::from_snapshot(snapshot, geometry, viewport);
            *interaction = InteractionState::default();
        }
        DesktopAction::RestoreFilesystem { snapshot } => {
            state.fs.restore(snapshot)?;
            effects.push(RuntimeEffect::PersistFilesystem);
        }
        DesktopAction::ResetFilesystem => {
            state.fs.reset();
            effects.push(RuntimeEffect::PersistFilesystem);
        }
        DesktopAction::FilesystemChanged => {
            effects.push(RuntimeEffect::PersistFilesystem);
        }
    }

    Ok(effects)
}

fn window_rect(windows: &WindowManager, window_id: WindowId) -> Result<WindowRect, WindowError> {
    windows
        .window(window_id)
        .map(|w| w.rect)
        .ok_or(WindowError::WindowNotFound(window_id))
}

fn clear_sessions_for(interaction: &mut InteractionState, window_id: WindowId) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.resizing = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(state: &mut DesktopState, interaction: &mut InteractionState, app: &str) -> WindowId {
        reduce_desktop(
            state,
            interaction,
            DesktopAction::OpenApp {
                app_id: ApplicationId::trusted(app),
            },
        )
        .expect("open app");
        state.windows.active_window().expect("active window")
    }

    #[test]
    fn open_app_uses_catalog_metadata_and_persists_layout() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::OpenApp {
                app_id: ApplicationId::trusted("terminal"),
            },
        )
        .expect("open");
        let window = &state.windows.windows()[0];
        assert_eq!(window.title, "Terminal");
        assert_eq!((window.rect.w, window.rect.h), (560, 360));
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::PersistLayout,
                RuntimeEffect::FocusWindowInput(window.id)
            ]
        );
    }

    #[test]
    fn single_instance_apps_reuse_their_window() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let monitor = open(&mut state, &mut interaction, "monitor");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: monitor },
        )
        .expect("minimize");
        let again = open(&mut state, &mut interaction, "monitor");

        assert_eq!(again, monitor);
        assert_eq!(state.windows.len(), 1);
        assert!(!state.windows.window(monitor).expect("monitor").minimized);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: monitor },
        )
        .expect("maximize");
        let maximized = state.windows.window(monitor).expect("monitor").rect;
        assert_eq!(open(&mut state, &mut interaction, "monitor"), monitor);
        let reopened = state.windows.window(monitor).expect("monitor");
        assert!(reopened.maximized);
        assert!(reopened.is_focused);
        assert_eq!(reopened.rect, maximized);

        open(&mut state, &mut interaction, "terminal");
        open(&mut state, &mut interaction, "terminal");
        assert_eq!(state.windows.len(), 3);
    }

    #[test]
    fn unknown_app_and_theme_are_rejected_without_effects() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let before = state.clone();

        let err = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::OpenApp {
                app_id: ApplicationId::trusted("solitaire"),
            },
        )
        .expect_err("unknown app");
        assert_eq!(err.to_string(), "unknown application `solitaire`");

        let err = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SetTheme {
                theme_id: "sepia".to_string(),
            },
        )
        .expect_err("unknown theme");
        assert_eq!(err, ReducerError::UnknownTheme("sepia".to_string()));
        assert_eq!(state, before);
    }

    #[test]
    fn set_theme_persists_only_on_change() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SetTheme {
                theme_id: "EMERALD".to_string(),
            },
        )
        .expect("theme");
        assert_eq!(effects, vec![RuntimeEffect::PersistTheme]);
        assert_eq!(state.theme, ThemeId::Emerald);

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SetTheme {
                theme_id: "emerald".to_string(),
            },
        )
        .expect("same theme");
        assert!(effects.is_empty());
    }

    #[test]
    fn missing_window_is_reported() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let err = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow {
                window_id: WindowId(9),
            },
        )
        .expect_err("missing");
        assert_eq!(
            err,
            ReducerError::Window(WindowError::WindowNotFound(WindowId(9)))
        );
    }

    #[test]
    fn moving_window_updates_rect_during_drag_and_persists_on_end() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let win = open(&mut state, &mut interaction, "explorer");
        let original = state.windows.window(win).expect("window").rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 10, y: 10 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 35, y: 50 },
            },
        )
        .expect("update");

        let moved = state.windows.window(win).expect("window").rect;
        assert_eq!(moved.x, original.x + 25);
        assert_eq!(moved.y, original.y + 40);
        let effects =
            reduce_desktop(&mut state, &mut interaction, DesktopAction::EndMove).expect("end");
        assert_eq!(effects, vec![RuntimeEffect::PersistLayout]);
        assert_eq!(interaction.dragging, None);
    }

    #[test]
    fn dragging_a_maximized_window_does_not_move_it() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let win = open(&mut state, &mut interaction, "explorer");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: win },
        )
        .expect("maximize");
        let maximized = state.windows.window(win).expect("window").rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 100, y: 100 },
            },
        )
        .expect("update");
        let window = state.windows.window(win).expect("window");
        assert!(window.maximized);
        assert_eq!(window.rect, maximized);
    }

    #[test]
    fn resize_drag_applies_edge_deltas_with_floor() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let win = open(&mut state, &mut interaction, "explorer");
        let start = state.windows.window(win).expect("window").rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id: win,
                edge: ResizeEdge::SouthEast,
                pointer: PointerPosition { x: 500, y: 400 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: 540, y: 430 },
            },
        )
        .expect("grow");
        let grown = state.windows.window(win).expect("window").rect;
        assert_eq!((grown.w, grown.h), (start.w + 40, start.h + 30));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: -2000, y: -2000 },
            },
        )
        .expect("shrink");
        let shrunk = state.windows.window(win).expect("window").rect;
        assert_eq!((shrunk.w, shrunk.h), (200, 120));

        let effects =
            reduce_desktop(&mut state, &mut interaction, DesktopAction::EndResize).expect("end");
        assert_eq!(effects, vec![RuntimeEffect::PersistLayout]);
    }

    #[test]
    fn closing_dragged_window_clears_the_session() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let win = open(&mut state, &mut interaction, "explorer");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: win },
        )
        .expect("close");
        assert_eq!(interaction, InteractionState::default());
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 5, y: 5 },
            },
        )
        .expect("stale update is ignored");
        assert!(effects.is_empty());
    }

    #[test]
    fn filesystem_actions_emit_persist_filesystem() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        state.fs.write(&["scratch.txt"], "x").expect("write");

        let effects =
            reduce_desktop(&mut state, &mut interaction, DesktopAction::ResetFilesystem)
                .expect("reset");
        assert_eq!(effects, vec![RuntimeEffect::PersistFilesystem]);
        assert!(!state.fs.exists(&["scratch.txt"]));

        let bad = FsSnapshot {
            root: platform_host::VNode::file("", "not a dir"),
        };
        assert!(matches!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::RestoreFilesystem { snapshot: bad }
            ),
            Err(ReducerError::Filesystem(_))
        ));
    }
}
