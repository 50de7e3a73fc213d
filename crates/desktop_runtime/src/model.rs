use desktop_app_contract::ApplicationId;
use platform_host::VirtualFs;
use serde::{Deserialize, Serialize};

use crate::window_manager::WindowManager;

pub const DESKTOP_LAYOUT_SCHEMA_VERSION: u32 = 1;
pub const THEME_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

/// Runtime and persisted state of one managed window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    pub rect: WindowRect,
    /// Geometry cached by the first maximize, used by restore.
    #[serde(default)]
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    /// The single active window, if any. Never set on a minimized window.
    #[serde(default)]
    pub is_focused: bool,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub maximized: bool,
}

/// Persisted window list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLayoutSnapshot {
    pub schema_version: u32,
    pub windows: Vec<WindowRecord>,
}

/// Parameters for opening one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    pub title: Option<String>,
    pub icon_id: Option<String>,
    /// Initial size; position is always cascaded.
    pub size: Option<(i32, i32)>,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId) -> Self {
        Self {
            app_id,
            title: None,
            icon_id: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    #[default]
    Cyan,
    Purple,
    Emerald,
    Crimson,
}

impl ThemeId {
    pub const ALL: [Self; 4] = [Self::Cyan, Self::Purple, Self::Emerald, Self::Crimson];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cyan => "cyan",
            Self::Purple => "purple",
            Self::Emerald => "emerald",
            Self::Crimson => "crimson",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cyan => "Quantum Blue",
            Self::Purple => "Neural Purple",
            Self::Emerald => "Matrix Green",
            Self::Crimson => "Red Alert",
        }
    }

    /// Parses a theme id case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(raw))
    }
}

/// Everything the reducer owns: window list, filesystem, and theme.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesktopState {
    pub windows: WindowManager,
    pub fs: VirtualFs,
    pub theme: ThemeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}
