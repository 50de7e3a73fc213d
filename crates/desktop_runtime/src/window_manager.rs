//! Window manager state machine: stacking order, focus, and geometry for managed windows.
//!
//! Z values come from a counter that only moves forward, so the most recently focused window
//! always carries the highest z. Closing or minimizing the active window leaves no window
//! active; nothing is promoted implicitly.

use desktop_app_contract::ApplicationId;
use thiserror::Error;

use crate::config::{DesktopConfig, WindowGeometry};
use crate::model::{
    OpenWindowRequest, ResizeEdge, WindowId, WindowLayoutSnapshot, WindowRecord, WindowRect,
    DESKTOP_LAYOUT_SCHEMA_VERSION,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Window manager errors.
pub enum WindowError {
    /// The target window id is not managed.
    #[error("window not found: {0}")]
    WindowNotFound(WindowId),
}

/// Owner of every [`WindowRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    next_window_id: u64,
    next_z: u32,
    viewport: WindowRect,
    geometry: WindowGeometry,
}

impl Default for WindowManager {
    fn default() -> Self {
        let config = DesktopConfig::default();
        Self::new(config.window, config.viewport)
    }
}

impl WindowManager {
    pub fn new(geometry: WindowGeometry, viewport: WindowRect) -> Self {
        Self {
            windows: Vec::new(),
            next_window_id: 1,
            next_z: geometry.z_base,
            viewport,
            geometry,
        }
    }

    /// Managed windows in open order.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Managed windows from bottom to top.
    pub fn stacking_order(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|window| window.z_index);
        ordered
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    /// First window opened for `app_id`, used for single-instance apps.
    pub fn find_by_app(&self, app_id: &ApplicationId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| &w.app_id == app_id)
            .map(|w| w.id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn viewport(&self) -> WindowRect {
        self.viewport
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    /// Replaces the viewport and refits maximized windows to it.
    pub fn set_viewport(&mut self, viewport: WindowRect) {
        self.viewport = viewport;
        let fitted = self.maximized_rect();
        for window in self.windows.iter_mut().filter(|w| w.maximized) {
            window.rect = fitted;
        }
    }

    /// Opens a window at the next cascade slot and makes it the only active window.
    pub fn open(&mut self, request: OpenWindowRequest) -> WindowRecord {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;

        let geometry = self.geometry;
        let slot = (self.windows.len() as i32) % geometry.cascade_slots.max(1);
        let (w, h) = request
            .size
            .unwrap_or((geometry.default_width, geometry.default_height));
        let rect = WindowRect {
            x: geometry.cascade_origin_x + slot * geometry.cascade_step,
            y: geometry.cascade_origin_y + slot * geometry.cascade_step,
            w,
            h,
        }
        .clamped_min(geometry.min_width, geometry.min_height);

        let z_index = self.allocate_z();
        for window in &mut self.windows {
            window.is_focused = false;
        }
        let record = WindowRecord {
            id,
            title: request
                .title
                .unwrap_or_else(|| request.app_id.as_str().to_string()),
            icon_id: request
                .icon_id
                .unwrap_or_else(|| request.app_id.as_str().to_string()),
            app_id: request.app_id,
            rect,
            restore_rect: None,
            z_index,
            is_focused: true,
            minimized: false,
            maximized: false,
        };
        tracing::debug!(window = %id, app = %record.app_id, z = z_index, "opened window");
        self.windows.push(record.clone());
        record
    }

    /// Removes a window. No other window becomes active.
    pub fn close(&mut self, window_id: WindowId) -> Result<WindowRecord, WindowError> {
        let index = self
            .windows
            .iter()
            .position(|w| w.id == window_id)
            .ok_or(WindowError::WindowNotFound(window_id))?;
        tracing::debug!(window = %window_id, "closed window");
        Ok(self.windows.remove(index))
    }

    /// Raises `window_id` above every other window and makes it the only active one.
    ///
    /// Focusing the already-active window still allocates a fresh z.
    pub fn focus(&mut self, window_id: WindowId) -> Result<(), WindowError> {
        self.find(window_id)?;
        let z_index = self.allocate_z();
        for window in &mut self.windows {
            let target = window.id == window_id;
            window.is_focused = target;
            if target {
                window.z_index = z_index;
                window.minimized = false;
            }
        }
        Ok(())
    }

    /// Moves a window, keeping its title bar reachable inside the viewport.
    ///
    /// A maximized window becomes a floating window at the new position.
    pub fn move_to(
        &mut self,
        window_id: WindowId,
        x: i32,
        y: i32,
    ) -> Result<WindowRect, WindowError> {
        let rect = self.find(window_id)?.rect;
        self.set_rect(window_id, WindowRect { x, y, ..rect })
    }

    /// Resizes a window with a floor of the configured minimum size.
    pub fn resize(
        &mut self,
        window_id: WindowId,
        w: i32,
        h: i32,
    ) -> Result<WindowRect, WindowError> {
        let rect = self.find(window_id)?.rect;
        self.set_rect(window_id, WindowRect { w, h, ..rect })
    }

    /// Replaces the whole geometry, applying the size floor and title bar clamping.
    pub fn set_rect(
        &mut self,
        window_id: WindowId,
        rect: WindowRect,
    ) -> Result<WindowRect, WindowError> {
        let rect = self.clamp_rect(rect);
        let window = self.find_mut(window_id)?;
        window.rect = rect;
        window.maximized = false;
        window.restore_rect = None;
        Ok(rect)
    }

    /// Hides a window and clears its active flag.
    ///
    /// A maximized window is restored to its cached geometry first.
    pub fn minimize(&mut self, window_id: WindowId) -> Result<(), WindowError> {
        let window = self.find_mut(window_id)?;
        if window.maximized {
            if let Some(restore_rect) = window.restore_rect.take() {
                window.rect = restore_rect;
            }
            window.maximized = false;
        }
        window.minimized = true;
        window.is_focused = false;
        tracing::debug!(window = %window_id, "minimized window");
        Ok(())
    }

    /// Fills the viewport, caching the floating geometry on the first maximize.
    pub fn maximize(&mut self, window_id: WindowId) -> Result<(), WindowError> {
        let fitted = self.maximized_rect();
        let window = self.find_mut(window_id)?;
        if !window.maximized {
            window.restore_rect = Some(window.rect);
        }
        window.rect = fitted;
        window.maximized = true;
        window.minimized = false;
        self.focus(window_id)
    }

    /// Returns a maximized window to its cached geometry and un-minimizes it, then focuses it.
    pub fn restore(&mut self, window_id: WindowId) -> Result<(), WindowError> {
        let window = self.find_mut(window_id)?;
        if window.maximized {
            if let Some(restore_rect) = window.restore_rect.take() {
                window.rect = restore_rect;
            }
            window.maximized = false;
        }
        window.minimized = false;
        self.focus(window_id)
    }

    pub fn toggle_maximize(&mut self, window_id: WindowId) -> Result<(), WindowError> {
        if self.find(window_id)?.maximized {
            self.restore(window_id)
        } else {
            self.maximize(window_id)
        }
    }

    /// Taskbar button behavior: restore if minimized, minimize if active, focus otherwise.
    pub fn toggle_taskbar(&mut self, window_id: WindowId) -> Result<(), WindowError> {
        let window = self.find(window_id)?;
        if window.minimized {
            self.restore(window_id)
        } else if window.is_focused {
            self.minimize(window_id)
        } else {
            self.focus(window_id)
        }
    }

    pub fn snapshot(&self) -> WindowLayoutSnapshot {
        WindowLayoutSnapshot {
            schema_version: DESKTOP_LAYOUT_SCHEMA_VERSION,
            windows: self.windows.clone(),
        }
    }

    /// Rebuilds a manager from a persisted layout.
    ///
    /// Ids and z values are kept and both counters resume above the restored maxima. Records that
    /// would break the focus or sizing rules are repaired: duplicate ids are dropped, minimized
    /// windows lose focus, only the highest-z focused window stays active, sizes are floored, and
    /// maximized windows are refitted to the current viewport.
    pub fn from_snapshot(
        snapshot: WindowLayoutSnapshot,
        geometry: WindowGeometry,
        viewport: WindowRect,
    ) -> Self {
        let mut manager = Self::new(geometry, viewport);
        for mut window in snapshot.windows {
            if manager.window(window.id).is_some() {
                tracing::warn!(window = %window.id, "dropping duplicate window id from layout");
                continue;
            }
            if window.minimized {
                window.is_focused = false;
                if window.maximized {
                    if let Some(restore_rect) = window.restore_rect.take() {
                        window.rect = restore_rect;
                    }
                    window.maximized = false;
                }
            }
            window.rect = if window.maximized {
                manager.maximized_rect()
            } else {
                window.rect.clamped_min(geometry.min_width, geometry.min_height)
            };
            manager.windows.push(window);
        }

        let keep_active = manager
            .windows
            .iter()
            .filter(|w| w.is_focused)
            .max_by_key(|w| w.z_index)
            .map(|w| w.id);
        for window in &mut manager.windows {
            window.is_focused = Some(window.id) == keep_active;
        }

        manager.next_window_id = manager
            .windows
            .iter()
            .map(|w| w.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        manager.next_z = manager
            .windows
            .iter()
            .map(|w| w.z_index.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(geometry.z_base);
        manager
    }

    fn allocate_z(&mut self) -> u32 {
        let above_existing = self
            .windows
            .iter()
            .map(|w| w.z_index.saturating_add(1))
            .max()
            .unwrap_or(0);
        let z_index = self.next_z.max(above_existing);
        self.next_z = z_index.saturating_add(1);
        z_index
    }

    fn maximized_rect(&self) -> WindowRect {
        self.viewport
            .clamped_min(self.geometry.min_width, self.geometry.min_height)
    }

    fn clamp_rect(&self, rect: WindowRect) -> WindowRect {
        let geometry = &self.geometry;
        let viewport = self.viewport;
        let rect = rect.clamped_min(geometry.min_width, geometry.min_height);
        let visible = geometry.min_visible_title.min(rect.w);
        let min_x = viewport.x - rect.w + visible;
        let max_x = (viewport.x + viewport.w - visible).max(min_x);
        let max_y = (viewport.y + viewport.h - geometry.title_bar_height).max(viewport.y);
        WindowRect {
            x: rect.x.clamp(min_x, max_x),
            y: rect.y.clamp(viewport.y, max_y),
            ..rect
        }
    }

    fn find(&self, window_id: WindowId) -> Result<&WindowRecord, WindowError> {
        self.window(window_id)
            .ok_or(WindowError::WindowNotFound(window_id))
    }

    fn find_mut(&mut self, window_id: WindowId) -> Result<&mut WindowRecord, WindowError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or(WindowError::WindowNotFound(window_id))
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(manager: &mut WindowManager, app: &str) -> WindowId {
        manager
            .open(OpenWindowRequest::new(ApplicationId::trusted(app)))
            .id
    }

    fn active_count(manager: &WindowManager) -> usize {
        manager.windows().iter().filter(|w| w.is_focused).count()
    }

    fn rect(manager: &WindowManager, id: WindowId) -> WindowRect {
        manager.window(id).expect("window").rect
    }

    #[test]
    fn open_cascades_and_keeps_exactly_one_active() {
        let mut manager = WindowManager::default();
        let ids: Vec<WindowId> = (0..10).map(|_| open(&mut manager, "terminal")).collect();

        assert_eq!(active_count(&manager), 1);
        assert_eq!(manager.active_window(), ids.last().copied());
        assert_eq!(
            rect(&manager, ids[0]),
            WindowRect {
                x: 120,
                y: 80,
                w: 420,
                h: 300
            }
        );
        assert_eq!(rect(&manager, ids[1]).x, 150);
        assert_eq!(rect(&manager, ids[8]).x, 120, "cascade wraps after 8 slots");
        assert_eq!(manager.window(ids[0]).expect("first").z_index, 100);
    }

    #[test]
    fn focus_raises_terminal_above_explorer() {
        let mut manager = WindowManager::default();
        let terminal = open(&mut manager, "terminal");
        let explorer = open(&mut manager, "explorer");
        manager.focus(terminal).expect("focus");

        let terminal_rec = manager.window(terminal).expect("terminal");
        let explorer_rec = manager.window(explorer).expect("explorer");
        assert!(terminal_rec.z_index > explorer_rec.z_index);
        assert!(terminal_rec.is_focused);
        assert!(!explorer_rec.is_focused);
        assert_eq!(
            manager.stacking_order().last().map(|w| w.id),
            Some(terminal)
        );
    }

    #[test]
    fn focusing_active_window_still_raises_z() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        let before = manager.window(id).expect("window").z_index;
        manager.focus(id).expect("focus");
        assert!(manager.window(id).expect("window").z_index > before);
        assert_eq!(active_count(&manager), 1);
    }

    #[test]
    fn closing_only_window_leaves_nothing_active() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        manager.close(id).expect("close");
        assert!(manager.is_empty());
        assert_eq!(manager.active_window(), None);
    }

    #[test]
    fn closing_or_minimizing_active_window_does_not_promote() {
        let mut manager = WindowManager::default();
        let first = open(&mut manager, "terminal");
        let second = open(&mut manager, "explorer");
        manager.close(second).expect("close");
        assert_eq!(manager.active_window(), None);

        manager.focus(first).expect("focus");
        let third = open(&mut manager, "monitor");
        manager.minimize(third).expect("minimize");
        assert_eq!(manager.active_window(), None);
        let minimized = manager.window(third).expect("third");
        assert!(minimized.minimized && !minimized.is_focused);
    }

    #[test]
    fn maximize_then_restore_returns_exact_rect() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        manager.set_rect(id, WindowRect { x: 333, y: 77, w: 512, h: 290 }).expect("rect");
        let original = rect(&manager, id);

        manager.maximize(id).expect("maximize");
        assert_eq!(rect(&manager, id), manager.viewport());
        manager.maximize(id).expect("maximize twice");
        manager.restore(id).expect("restore");

        assert_eq!(rect(&manager, id), original);
        let record = manager.window(id).expect("window");
        assert!(!record.maximized);
        assert_eq!(record.restore_rect, None);
    }

    #[test]
    fn toggle_maximize_and_taskbar_cycle() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        let original = rect(&manager, id);
        manager.toggle_maximize(id).expect("max");
        assert!(manager.window(id).expect("w").maximized);
        manager.toggle_maximize(id).expect("restore");
        assert_eq!(rect(&manager, id), original);

        manager.toggle_taskbar(id).expect("minimize");
        assert!(manager.window(id).expect("w").minimized);
        manager.toggle_taskbar(id).expect("restore");
        assert_eq!(manager.active_window(), Some(id));

        let other = open(&mut manager, "explorer");
        manager.toggle_taskbar(id).expect("focus");
        assert_eq!(manager.active_window(), Some(id));
        assert!(!manager.window(other).expect("other").minimized);
    }

    #[test]
    fn minimizing_maximized_window_restores_cached_rect() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        let original = rect(&manager, id);
        manager.maximize(id).expect("maximize");
        manager.minimize(id).expect("minimize");
        let record = manager.window(id).expect("window");
        assert!(record.minimized && !record.maximized);
        assert_eq!(record.rect, original);
    }

    #[test]
    fn move_keeps_title_bar_inside_viewport() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");

        let moved = manager.move_to(id, 10_000, 10_000).expect("move");
        assert_eq!(moved.x, 1280 - 48);
        assert_eq!(moved.y, 720 - 32);

        let moved = manager.move_to(id, -10_000, -50).expect("move");
        assert_eq!(moved.x, 48 - 420);
        assert_eq!(moved.y, 0);

        let moved = manager.move_to(id, 40, 60).expect("move");
        assert_eq!((moved.x, moved.y), (40, 60));
    }

    #[test]
    fn resize_has_a_floor() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        let resized = manager.resize(id, 10, -5).expect("resize");
        assert_eq!((resized.w, resized.h), (200, 120));
        let resized = manager.resize(id, 640, 480).expect("resize");
        assert_eq!((resized.w, resized.h), (640, 480));
    }

    #[test]
    fn unknown_window_ids_are_errors() {
        let mut manager = WindowManager::default();
        let missing = WindowId(42);
        assert_eq!(manager.focus(missing), Err(WindowError::WindowNotFound(missing)));
        assert_eq!(
            manager.close(missing).map(|_| ()),
            Err(WindowError::WindowNotFound(missing))
        );
        assert!(manager.move_to(missing, 0, 0).is_err());
        assert!(manager.maximize(missing).is_err());
        assert!(manager.toggle_taskbar(missing).is_err());
    }

    #[test]
    fn z_values_are_never_reused_after_close() {
        let mut manager = WindowManager::default();
        let a = open(&mut manager, "terminal");
        let b = open(&mut manager, "explorer");
        let top = manager.window(b).expect("b").z_index;
        manager.close(b).expect("close");
        manager.focus(a).expect("focus");
        assert!(manager.window(a).expect("a").z_index > top);
    }

    #[test]
    fn set_viewport_refits_maximized_windows() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        manager.maximize(id).expect("maximize");
        let viewport = WindowRect { x: 0, y: 0, w: 1024, h: 600 };
        manager.set_viewport(viewport);
        assert_eq!(rect(&manager, id), viewport);
    }

    #[test]
    fn snapshot_round_trip_resumes_counters() {
        let mut manager = WindowManager::default();
        let a = open(&mut manager, "terminal");
        open(&mut manager, "explorer");
        manager.focus(a).expect("focus");

        let snapshot = manager.snapshot();
        let mut restored =
            WindowManager::from_snapshot(snapshot.clone(), *manager.geometry(), manager.viewport());
        assert_eq!(restored.snapshot(), snapshot);

        let top = snapshot.windows.iter().map(|w| w.z_index).max().expect("z");
        let c = open(&mut restored, "monitor");
        assert_eq!(c, WindowId(3));
        assert!(restored.window(c).expect("c").z_index > top);
    }

    #[test]
    fn from_snapshot_repairs_focus_and_duplicates() {
        let mut manager = WindowManager::default();
        let a = open(&mut manager, "terminal");
        let b = open(&mut manager, "explorer");
        let mut snapshot = manager.snapshot();
        for window in &mut snapshot.windows {
            window.is_focused = true;
        }
        snapshot.windows[1].minimized = true;
        let duplicate = snapshot.windows[0].clone();
        snapshot.windows.push(duplicate);
        snapshot.windows[0].rect.w = 3;

        let restored =
            WindowManager::from_snapshot(snapshot, *manager.geometry(), manager.viewport());
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.active_window(), Some(a));
        assert!(!restored.window(b).expect("b").is_focused);
        assert_eq!(restored.window(a).expect("a").rect.w, 200);
    }

    #[test]
    fn from_snapshot_refits_maximized_windows_to_new_viewport() {
        let mut manager = WindowManager::default();
        let id = open(&mut manager, "terminal");
        manager.maximize(id).expect("maximize");
        let floating = manager.window(id).expect("window").restore_rect;

        let smaller = WindowRect { x: 0, y: 0, w: 1024, h: 600 };
        let restored = WindowManager::from_snapshot(manager.snapshot(), *manager.geometry(), smaller);
        let window = restored.window(id).expect("window");
        assert!(window.maximized);
        assert_eq!(window.rect, smaller);
        assert_eq!(window.restore_rect, floating);
    }

    #[test]
    fn resize_rect_moves_origin_for_west_and_north_edges() {
        let start = WindowRect { x: 100, y: 100, w: 300, h: 200 };
        assert_eq!(
            resize_rect(start, ResizeEdge::NorthWest, 20, 10),
            WindowRect { x: 120, y: 110, w: 280, h: 190 }
        );
        assert_eq!(
            resize_rect(start, ResizeEdge::SouthEast, 20, 10),
            WindowRect { x: 100, y: 100, w: 320, h: 210 }
        );
    }
}
