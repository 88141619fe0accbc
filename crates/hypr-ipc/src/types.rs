//! Data records carried through the typed decoder
//!
//! These mirror the JSON objects Hyprland emits for its query commands
//! (`hyprctl -j activewindow`, `hyprctl -j monitors`, ...). The transport
//! treats them as opaque payloads; they only take shape once the decoder
//! runs. Field names follow Hyprland's wire spelling via serde renames,
//! and every record tolerates missing fields so newer or older compositor
//! versions decode without errors.

use serde::{Deserialize, Serialize};

/// One protocol command, as raw bytes, ready for the request transport.
///
/// Immutable once built; the transport prepends the output-mode marker
/// itself, so a raw request never contains it.
pub type RawRequest = Vec<u8>;

/// The raw bytes a single request produced, exactly as the peer wrote them.
pub type RawResponse = Vec<u8>;

/// A window (a "client" in Hyprland terms)
///
/// Returned by [`crate::RequestClient::active_window`] and, as a list, by
/// [`crate::RequestClient::clients`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    /// Window address, a hex string unique for the window's lifetime
    pub address: String,
    pub mapped: bool,
    pub hidden: bool,
    /// Top-left corner as `[x, y]`
    pub at: Vec<i32>,
    /// Dimensions as `[width, height]`
    pub size: Vec<i32>,
    pub workspace: WorkspaceRef,
    pub floating: bool,
    pub pseudo: bool,
    pub monitor: i32,
    pub class: String,
    pub title: String,
    #[serde(rename = "initialClass")]
    pub initial_class: String,
    #[serde(rename = "initialTitle")]
    pub initial_title: String,
    pub pid: i32,
    pub xwayland: bool,
    pub pinned: bool,
    pub fullscreen: bool,
    #[serde(rename = "fullscreenMode")]
    pub fullscreen_mode: i32,
    pub grouped: Vec<String>,
    pub tags: Vec<String>,
    pub swallowing: String,
    #[serde(rename = "focusHistoryID")]
    pub focus_history_id: i32,
}

/// The id/name pair embedded wherever another record references a workspace
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceRef {
    pub id: i32,
    pub name: String,
}

/// A workspace, as returned by `activeworkspace` and `workspaces`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub id: i32,
    pub name: String,
    pub monitor: String,
    #[serde(rename = "monitorID")]
    pub monitor_id: i32,
    /// Number of windows currently on the workspace
    pub windows: i32,
    #[serde(rename = "hasfullscreen")]
    pub has_fullscreen: bool,
    #[serde(rename = "lastwindow")]
    pub last_window: String,
    #[serde(rename = "lastwindowtitle")]
    pub last_window_title: String,
}

/// A monitor, as returned by `monitors`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub serial: String,
    pub width: i32,
    pub height: i32,
    #[serde(rename = "refreshRate")]
    pub refresh_rate: f64,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "activeWorkspace")]
    pub active_workspace: WorkspaceRef,
    #[serde(rename = "specialWorkspace")]
    pub special_workspace: WorkspaceRef,
    pub reserved: Vec<i32>,
    pub scale: f64,
    pub transform: i32,
    pub focused: bool,
    #[serde(rename = "dpmsStatus")]
    pub dpms_status: bool,
    pub vrr: bool,
    #[serde(rename = "activelyTearing")]
    pub actively_tearing: bool,
    #[serde(rename = "currentFormat")]
    pub current_format: String,
    #[serde(rename = "availableModes")]
    pub available_modes: Vec<String>,
}

/// A configuration option, as returned by `getoption`
///
/// Named `ConfigOption` rather than Hyprland's `option` to stay clear of
/// `std::option::Option`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOption {
    pub option: String,
    pub int: i64,
    pub set: bool,
}

/// Compositor build information, as returned by `version`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    pub branch: String,
    pub commit: String,
    pub dirty: bool,
    pub commit_message: String,
    pub commit_date: String,
    pub tag: String,
    pub commits: String,
    pub flags: Vec<String>,
}

/// Cursor coordinates, as returned by `cursorpos`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorPos {
    pub x: i32,
    pub y: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_decodes_hyprland_field_spelling() {
        let json = r#"{
            "address": "0x55d4",
            "mapped": true,
            "at": [10, 20],
            "size": [800, 600],
            "workspace": {"id": 3, "name": "3"},
            "class": "kitty",
            "title": "~",
            "initialClass": "kitty",
            "initialTitle": "kitty",
            "pid": 4242,
            "fullscreenMode": 1,
            "focusHistoryID": 0
        }"#;

        let window: Window = serde_json::from_str(json).unwrap();
        assert_eq!(window.address, "0x55d4");
        assert_eq!(window.workspace.id, 3);
        assert_eq!(window.initial_class, "kitty");
        assert_eq!(window.fullscreen_mode, 1);
        // Fields absent from the payload fall back to defaults
        assert!(!window.floating);
        assert!(window.grouped.is_empty());
    }

    #[test]
    fn workspace_decodes_lowercase_tags() {
        let json = r#"{
            "id": 2,
            "name": "web",
            "monitor": "eDP-1",
            "monitorID": 0,
            "windows": 4,
            "hasfullscreen": true,
            "lastwindow": "0x1ead",
            "lastwindowtitle": "Firefox"
        }"#;

        let ws: Workspace = serde_json::from_str(json).unwrap();
        assert_eq!(ws.id, 2);
        assert!(ws.has_fullscreen);
        assert_eq!(ws.last_window_title, "Firefox");
    }

    #[test]
    fn monitor_decodes_nested_workspace_refs() {
        let json = r#"{
            "id": 0,
            "name": "eDP-1",
            "width": 1920,
            "height": 1080,
            "refreshRate": 60.0,
            "activeWorkspace": {"id": 1, "name": "1"},
            "specialWorkspace": {"id": 0, "name": ""},
            "focused": true,
            "dpmsStatus": true,
            "availableModes": ["1920x1080@60.00Hz"]
        }"#;

        let monitor: Monitor = serde_json::from_str(json).unwrap();
        assert_eq!(monitor.active_workspace.id, 1);
        assert!(monitor.focused);
        assert_eq!(monitor.available_modes.len(), 1);
    }

    #[test]
    fn version_tolerates_extra_fields() {
        let json = r#"{
            "branch": "main",
            "commit": "abc123",
            "dirty": false,
            "commit_message": "fix",
            "commit_date": "2024-01-01",
            "tag": "v0.41.0",
            "commits": "5000",
            "flags": [],
            "buildAquamarine": true
        }"#;

        let version: Version = serde_json::from_str(json).unwrap();
        assert_eq!(version.tag, "v0.41.0");
    }
}
