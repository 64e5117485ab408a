use crate::error::{NavError, Result};
use crate::events::{WindowGeometry, WindowId, WindowInfo, WindowLayer};
use serde::Deserialize;
use std::process::Command;

use super::r#trait::WindowBackend;

pub struct SwayBackend;

impl SwayBackend {
    pub fn new() -> Self {
        Self
    }

    fn swaymsg(message_type: &str) -> Result<String> {
        let output = Command::new("swaymsg")
            .args(["-r", "-t", message_type])
            .output()
            .map_err(|e| NavError::ServiceUnavailable(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return Err(NavError::ServiceUnavailable(format!(
                "swaymsg -t {} вернул ошибку: {}",
                message_type,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[derive(Debug, Deserialize)]
struct SwayRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl SwayRect {
    fn geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.x, self.y, self.width.max(0) as u32, self.height.max(0) as u32)
    }
}

#[derive(Debug, Deserialize)]
struct WindowProperties {
    #[serde(default)]
    class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SwayNode {
    id: i64,
    #[serde(rename = "type", default)]
    node_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pid: Option<i64>,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    focused: bool,
    rect: SwayRect,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default)]
    window_properties: Option<WindowProperties>,
    #[serde(default)]
    nodes: Vec<SwayNode>,
    #[serde(default)]
    floating_nodes: Vec<SwayNode>,
}

impl SwayNode {
    /// Лист дерева с процессом-владельцем: окно приложения
    fn is_window(&self) -> bool {
        matches!(self.node_type.as_str(), "con" | "floating_con") && self.pid.is_some()
    }

    fn has_app_identity(&self) -> bool {
        let app_id = self.app_id.as_deref().unwrap_or("");
        let class = self
            .window_properties
            .as_ref()
            .and_then(|p| p.class.as_deref())
            .unwrap_or("");
        !app_id.is_empty() || !class.is_empty()
    }

    fn children(&self) -> impl Iterator<Item = &SwayNode> {
        self.nodes.iter().chain(self.floating_nodes.iter())
    }
}

#[derive(Debug, Deserialize)]
struct SwayOutput {
    #[serde(default)]
    active: bool,
    rect: SwayRect,
}

fn collect_windows(node: &SwayNode, out: &mut Vec<WindowInfo>) {
    if node.is_window() {
        if node.visible.unwrap_or(false) {
            let pid = node.pid.unwrap_or(0);
            let mut window = WindowInfo::new(WindowId::new(node.id.to_string()), node.rect.geometry())
                .with_layer(WindowLayer::Normal)
                .with_regular(pid > 0 && node.has_app_identity())
                .with_title(node.name.clone().unwrap_or_default());
            if pid > 0 {
                window = window.with_pid(pid as u32);
            }
            out.push(window);
        }
        return;
    }

    for child in node.children() {
        collect_windows(child, out);
    }
}

fn find_focused(node: &SwayNode) -> Option<&SwayNode> {
    if node.focused && node.is_window() {
        return Some(node);
    }
    node.children().find_map(find_focused)
}

fn parse_tree(json: &str) -> Result<Vec<WindowInfo>> {
    let root: SwayNode = serde_json::from_str(json)?;
    let mut windows = Vec::new();
    collect_windows(&root, &mut windows);
    Ok(windows)
}

fn parse_focused(json: &str) -> Result<Option<WindowId>> {
    let root: SwayNode = serde_json::from_str(json)?;
    Ok(find_focused(&root).map(|node| WindowId::new(node.id.to_string())))
}

fn parse_outputs(json: &str) -> Result<Option<WindowGeometry>> {
    let outputs: Vec<SwayOutput> = serde_json::from_str(json)?;
    Ok(outputs
        .iter()
        .filter(|o| o.active)
        .map(|o| o.rect.geometry())
        .reduce(|acc, g| acc.union(&g)))
}

impl WindowBackend for SwayBackend {
    fn name(&self) -> &'static str {
        "sway"
    }

    fn probe(&self) -> Result<()> {
        Self::swaymsg("get_version").map(|_| ())
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        parse_tree(&Self::swaymsg("get_tree")?)
    }

    fn focused_window(&self) -> Result<Option<WindowId>> {
        parse_focused(&Self::swaymsg("get_tree")?)
    }

    fn desktop_bounds(&self) -> Result<Option<WindowGeometry>> {
        parse_outputs(&Self::swaymsg("get_outputs")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"{
        "id": 1, "type": "root", "name": "root", "focused": false,
        "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080},
        "nodes": [
            {"id": 3, "type": "output", "name": "eDP-1", "focused": false,
             "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080},
             "nodes": [
                {"id": 4, "type": "workspace", "name": "1", "focused": false,
                 "rect": {"x": 0, "y": 30, "width": 1920, "height": 1050},
                 "nodes": [
                    {"id": 10, "type": "con", "name": "foot", "pid": 111, "visible": true, "focused": true,
                     "app_id": "foot", "rect": {"x": 0, "y": 30, "width": 960, "height": 1050}},
                    {"id": 11, "type": "con", "name": "Firefox", "pid": 222, "visible": true, "focused": false,
                     "app_id": null, "window_properties": {"class": "firefox"},
                     "rect": {"x": 960, "y": 30, "width": 960, "height": 1050}}
                 ],
                 "floating_nodes": [
                    {"id": 12, "type": "floating_con", "name": "popup", "pid": 333, "visible": true, "focused": false,
                     "app_id": "pavucontrol", "rect": {"x": 700, "y": 400, "width": 500, "height": 300}}
                 ]},
                {"id": 5, "type": "workspace", "name": "2", "focused": false,
                 "rect": {"x": 0, "y": 30, "width": 1920, "height": 1050},
                 "nodes": [
                    {"id": 20, "type": "con", "name": "hidden", "pid": 444, "visible": false, "focused": false,
                     "app_id": "foot", "rect": {"x": 0, "y": 30, "width": 1920, "height": 1050}}
                 ]}
             ]}
        ]
    }"#;

    #[test]
    fn test_visible_windows_collected() {
        let windows = parse_tree(TREE).unwrap();
        let ids: Vec<&str> = windows.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "11", "12"]);

        assert_eq!(windows[0].geometry, WindowGeometry::new(0, 30, 960, 1050));
        assert_eq!(windows[0].pid, Some(111));
        // XWayland окно опознаётся по class
        assert!(windows[1].regular);
        assert_eq!(windows[2].title, "popup");
    }

    #[test]
    fn test_focused_window() {
        assert_eq!(parse_focused(TREE).unwrap(), Some(WindowId::new("10")));

        let empty_workspace_focused = r#"{"id": 1, "type": "root", "focused": false,
            "rect": {"x": 0, "y": 0, "width": 10, "height": 10},
            "nodes": [{"id": 4, "type": "workspace", "focused": true,
                       "rect": {"x": 0, "y": 0, "width": 10, "height": 10}}]}"#;
        assert_eq!(parse_focused(empty_workspace_focused).unwrap(), None);
    }

    #[test]
    fn test_outputs_bounds() {
        let outputs = r#"[
            {"name": "eDP-1", "active": true, "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080}},
            {"name": "DP-2", "active": true, "rect": {"x": 1920, "y": -200, "width": 1280, "height": 1024}},
            {"name": "HDMI-1", "active": false, "rect": {"x": 0, "y": 0, "width": 0, "height": 0}}
        ]"#;
        assert_eq!(
            parse_outputs(outputs).unwrap(),
            Some(WindowGeometry::new(0, -200, 3200, 1280))
        );
    }
}
