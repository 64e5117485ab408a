//! Hyprland backend.
//!
//! Talks to Hyprland directly through its command socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! no `hyprctl` child process is spawned.

use crate::error::{NavError, Result};
use crate::events::{WindowGeometry, WindowId, WindowInfo, WindowLayer};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use tracing::debug;

use super::r#trait::WindowBackend;

pub struct HyprlandBackend;

impl HyprlandBackend {
    pub fn new() -> Self {
        Self
    }
}

// Прямой доступ к IPC Hyprland

fn socket_path() -> Result<PathBuf> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| NavError::ServiceUnavailable("XDG_RUNTIME_DIR не задан".to_string()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE").map_err(|_| {
        NavError::ServiceUnavailable("HYPRLAND_INSTANCE_SIGNATURE не задан".to_string())
    })?;
    Ok(PathBuf::from(format!("{}/hypr/{}/.socket.sock", runtime_dir, his)))
}

/// Отправить JSON запрос (`j/<command>`) и вернуть сырой ответ
fn ipc_json(data_command: &str) -> Result<String> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path).map_err(|e| {
        NavError::ServiceUnavailable(format!("подключение к {}: {}", path.display(), e))
    })?;

    stream.write_all(format!("j/{}", data_command).as_bytes())?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    String::from_utf8(response)
        .map_err(|e| NavError::Internal(format!("ответ Hyprland не utf-8: {}", e)))
}

// Минимальные serde структуры для нужных полей

#[derive(Debug, Deserialize)]
struct WorkspaceRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ClientJson {
    address: String,
    #[serde(default = "yes")]
    mapped: bool,
    #[serde(default)]
    hidden: bool,
    at: [i32; 2],
    size: [i32; 2],
    workspace: WorkspaceRef,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    pid: i64,
}

#[derive(Debug, Deserialize)]
struct MonitorJson {
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    #[serde(default = "unit_scale")]
    scale: f64,
    #[serde(rename = "activeWorkspace")]
    active_workspace: WorkspaceRef,
    #[serde(rename = "specialWorkspace", default)]
    special_workspace: Option<WorkspaceRef>,
}

#[derive(Debug, Deserialize)]
struct ActiveWindowJson {
    address: String,
}

fn yes() -> bool {
    true
}

fn unit_scale() -> f64 {
    1.0
}

/// Рабочие столы, которые сейчас показаны хотя бы на одном мониторе
fn visible_workspaces(monitors: &[MonitorJson]) -> HashSet<i64> {
    monitors
        .iter()
        .flat_map(|m| {
            let special = m
                .special_workspace
                .as_ref()
                .map(|w| w.id)
                .filter(|id| *id != 0);
            std::iter::once(m.active_workspace.id).chain(special)
        })
        .collect()
}

fn parse_clients(clients_json: &str, monitors_json: &str) -> Result<Vec<WindowInfo>> {
    let clients: Vec<ClientJson> = serde_json::from_str(clients_json)?;
    let monitors: Vec<MonitorJson> = serde_json::from_str(monitors_json)?;
    let visible = visible_workspaces(&monitors);

    Ok(clients
        .into_iter()
        .filter(|c| c.mapped && !c.hidden)
        .filter(|c| c.pinned || visible.contains(&c.workspace.id))
        .map(|c| {
            let geometry = WindowGeometry::new(
                c.at[0],
                c.at[1],
                c.size[0].max(0) as u32,
                c.size[1].max(0) as u32,
            );
            let mut window = WindowInfo::new(WindowId::new(c.address), geometry)
                .with_layer(WindowLayer::Normal)
                .with_regular(c.pid > 0 && !c.class.is_empty())
                .with_title(c.title);
            if c.pid > 0 {
                window = window.with_pid(c.pid as u32);
            }
            window
        })
        .collect())
}

fn parse_active_window(json: &str) -> Result<Option<WindowId>> {
    // Hyprland возвращает пустой объект `{}`, когда фокуса нет
    if json.trim() == "{}" {
        return Ok(None);
    }
    let active: ActiveWindowJson = serde_json::from_str(json)?;
    Ok(Some(WindowId::new(active.address)))
}

fn parse_bounds(monitors_json: &str) -> Result<Option<WindowGeometry>> {
    let monitors: Vec<MonitorJson> = serde_json::from_str(monitors_json)?;
    Ok(monitors
        .iter()
        .map(|m| {
            // Размеры мониторов в физических пикселях, окна в логических
            let scale = if m.scale > 0.0 { m.scale } else { 1.0 };
            WindowGeometry::new(
                m.x,
                m.y,
                (m.width as f64 / scale).round() as u32,
                (m.height as f64 / scale).round() as u32,
            )
        })
        .reduce(|acc, g| acc.union(&g)))
}

impl WindowBackend for HyprlandBackend {
    fn name(&self) -> &'static str {
        "hyprland"
    }

    fn probe(&self) -> Result<()> {
        let json = ipc_json("version")?;
        debug!("Hyprland отвечает: {} байт", json.len());
        Ok(())
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        let clients = ipc_json("clients")?;
        let monitors = ipc_json("monitors")?;
        parse_clients(&clients, &monitors)
    }

    fn focused_window(&self) -> Result<Option<WindowId>> {
        parse_active_window(&ipc_json("activewindow")?)
    }

    fn desktop_bounds(&self) -> Result<Option<WindowGeometry>> {
        parse_bounds(&ipc_json("monitors")?)
    }
}
