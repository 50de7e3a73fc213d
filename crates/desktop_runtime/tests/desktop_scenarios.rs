use desktop_app_contract::ApplicationId;
use desktop_runtime::{
    DesktopAction, DesktopConfig, DesktopRuntime, ThemeId, WindowId, WindowRect,
};
use platform_host::{
    save_snapshot_with, KeyValueStore, MemoryKeyValueStore, VirtualFs, FS_STATE_KEY,
    THEME_KEY, WINDOW_LAYOUT_KEY,
};
use pretty_assertions::assert_eq;

fn boot(store: &MemoryKeyValueStore) -> DesktopRuntime<MemoryKeyValueStore> {
    DesktopRuntime::boot(store.clone(), DesktopConfig::default())
}

fn open(runtime: &mut DesktopRuntime<MemoryKeyValueStore>, app: &str) -> WindowId {
    runtime
        .dispatch(DesktopAction::OpenApp {
            app_id: ApplicationId::trusted(app),
        })
        .expect("open app");
    runtime.windows().active_window().expect("opened window is active")
}

#[test]
fn focusing_terminal_raises_it_above_explorer() {
    let store = MemoryKeyValueStore::default();
    let mut runtime = boot(&store);

    let terminal = open(&mut runtime, "terminal");
    let explorer = open(&mut runtime, "explorer");
    runtime
        .dispatch(DesktopAction::FocusWindow {
            window_id: terminal,
        })
        .expect("focus");

    let windows = runtime.windows();
    let terminal = windows.window(terminal).expect("terminal");
    let explorer = windows.window(explorer).expect("explorer");
    assert!(terminal.z_index > explorer.z_index);
    assert!(terminal.is_focused);
    assert!(!explorer.is_focused);
}

#[test]
fn closing_the_only_window_leaves_none_active() {
    let store = MemoryKeyValueStore::default();
    let mut runtime = boot(&store);

    let only = open(&mut runtime, "terminal");
    runtime
        .dispatch(DesktopAction::CloseWindow { window_id: only })
        .expect("close");

    assert!(runtime.windows().is_empty());
    assert_eq!(runtime.windows().active_window(), None);
}

#[test]
fn many_opens_keep_one_active_and_top_z_most_recent() {
    let store = MemoryKeyValueStore::default();
    let mut runtime = boot(&store);
    let ids: Vec<WindowId> = (0..6).map(|_| open(&mut runtime, "terminal")).collect();

    runtime
        .dispatch(DesktopAction::FocusWindow { window_id: ids[2] })
        .expect("focus");
    runtime
        .dispatch(DesktopAction::MinimizeWindow { window_id: ids[4] })
        .expect("minimize");

    let windows = runtime.windows();
    assert_eq!(windows.windows().iter().filter(|w| w.is_focused).count(), 1);
    let top_visible = windows
        .stacking_order()
        .into_iter()
        .filter(|w| !w.minimized)
        .last()
        .map(|w| w.id);
    assert_eq!(top_visible, Some(ids[2]));
}

#[test]
fn maximize_then_restore_returns_exact_geometry() {
    let store = MemoryKeyValueStore::default();
    let mut runtime = boot(&store);
    let id = open(&mut runtime, "explorer");

    runtime
        .dispatch(DesktopAction::MoveWindow {
            window_id: id,
            x: 211,
            y: 133,
        })
        .expect("move");
    runtime
        .dispatch(DesktopAction::ResizeWindow {
            window_id: id,
            w: 640,
            h: 410,
        })
        .expect("resize");
    let before = runtime.windows().window(id).expect("window").rect;
    assert_eq!(
        before,
        WindowRect {
            x: 211,
            y: 133,
            w: 640,
            h: 410
        }
    );

    runtime
        .dispatch(DesktopAction::MaximizeWindow { window_id: id })
        .expect("maximize");
    assert_eq!(
        runtime.windows().window(id).expect("window").rect,
        runtime.config().viewport
    );
    runtime
        .dispatch(DesktopAction::RestoreWindow { window_id: id })
        .expect("restore");
    assert_eq!(runtime.windows().window(id).expect("window").rect, before);
}

#[test]
fn shell_scenarios_over_seed_tree() {
    let store = MemoryKeyValueStore::default();
    let mut runtime = boot(&store);

    runtime.run_terminal("cd desktop");
    let ls = runtime.run_terminal("ls");
    assert!(ls.lines.iter().any(|line| line.contains("todo.md")));

    let cat = runtime.run_terminal("cat todo.md");
    assert_eq!(
        cat.lines,
        vec!["- Upgrade Kernel", "- Fix Null Pointer in Neural Net"]
    );

    let unknown = runtime.run_terminal("sudo rm -rf /");
    assert_eq!(unknown.lines, vec!["command not found: sudo"]);
}

#[test]
fn state_survives_reboot_through_the_store() {
    let store = MemoryKeyValueStore::default();
    {
        let mut runtime = boot(&store);
        runtime.run_terminal("mkdir /home/admin/projects");
        runtime.run_terminal("write /home/admin/projects/plan.md ship it");
        let id = open(&mut runtime, "terminal");
        runtime
            .dispatch(DesktopAction::MaximizeWindow { window_id: id })
            .expect("maximize");
        runtime
            .dispatch(DesktopAction::SetTheme {
                theme_id: "crimson".to_string(),
            })
            .expect("theme");
    }

    let mut runtime = boot(&store);
    assert_eq!(
        runtime
            .fs()
            .read(&["home", "admin", "projects", "plan.md"])
            .expect("plan"),
        "ship it"
    );
    assert_eq!(runtime.theme(), ThemeId::Crimson);
    let restored = runtime.windows().windows()[0].clone();
    assert!(restored.maximized);

    let next = open(&mut runtime, "explorer");
    assert!(next.0 > restored.id.0);
    assert!(runtime.windows().window(next).expect("next").z_index > restored.z_index);
}

#[test]
fn malformed_persisted_blobs_fall_back_to_defaults() {
    let store = MemoryKeyValueStore::default();
    store.save_raw(FS_STATE_KEY, "{\"root\": 12").expect("save");
    store.save_raw(WINDOW_LAYOUT_KEY, "null").expect("save");
    store.save_raw(THEME_KEY, "\"cyan\"").expect("save");

    let runtime = boot(&store);
    assert_eq!(runtime.fs(), &VirtualFs::seeded());
    assert!(runtime.windows().is_empty());
    assert_eq!(runtime.theme(), ThemeId::Cyan);
}

#[test]
fn future_schema_versions_are_ignored() {
    let store = MemoryKeyValueStore::default();
    save_snapshot_with(&store, THEME_KEY, 2, &ThemeId::Emerald).expect("save");

    let runtime = boot(&store);
    assert_eq!(runtime.theme(), ThemeId::Cyan);
}
