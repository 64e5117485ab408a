use crate::error::{NavError, Result};
use crate::events::{WindowGeometry, WindowId, WindowInfo, WindowLayer};
use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

use super::r#trait::WindowBackend;

/// KDE Plasma на Wayland: kdotool повторяет интерфейс xdotool через скрипты KWin
pub struct KdotoolBackend;

fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);
                    let dbus_address = format!("unix:path={}/bus", user_runtime_dir);

                    debug!("Подставляем переменные окружения для пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert("DBUS_SESSION_BUS_ADDRESS".to_string(), dbus_address);
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    if let Ok(display_var) = std::env::var("DISPLAY") {
        env_vars.insert("DISPLAY".to_string(), display_var);
    }

    env_vars
}

impl KdotoolBackend {
    pub fn new() -> Self {
        Self
    }

    fn create_command(args: &[&str]) -> Command {
        let mut cmd = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            let mut cmd = Command::new("sudo");
            cmd.args(["-E", "-u", &sudo_user, "kdotool"]);
            cmd.args(args);
            cmd
        } else {
            let mut cmd = Command::new("kdotool");
            cmd.args(args);
            cmd
        };

        // Применяем подстановки переменных окружения (строим на лету без глобального кэша)
        for (key, value) in build_env_overrides() {
            cmd.env(key, value);
        }

        cmd
    }

    fn run(args: &[&str]) -> Result<String> {
        let output = Self::create_command(args)
            .output()
            .map_err(|e| NavError::ServiceUnavailable(format!("kdotool не найден: {}", e)))?;

        if !output.status.success() {
            debug!("kdotool {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
            return Err(crate::nav_error!(service_unavailable, "kdotool {} завершился с ошибкой", args.join(" ")));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Три вызова kdotool на окно; окно с другого рабочего стола отсекается после первого
    fn window_info(&self, id: &str, current_desktop: Option<i64>) -> Option<WindowInfo> {
        let desktop = Self::run(&["get_desktop_for_window", id])
            .ok()
            .and_then(|d| d.parse::<i64>().ok());
        let layer = layer_on_desktop(desktop, current_desktop)?;

        let geometry = parse_geometry(&Self::run(&["getwindowgeometry", id]).ok()?)?;

        let pid = Self::run(&["getwindowpid", id])
            .ok()
            .and_then(|p| p.parse::<u32>().ok());

        Some(build_window(id, geometry, layer, pid))
    }
}

/// Слой окна по его рабочему столу; `None`, если окно на другом столе.
/// Отрицательный номер стола у kdotool означает "на всех столах" (панели).
fn layer_on_desktop(desktop: Option<i64>, current_desktop: Option<i64>) -> Option<WindowLayer> {
    match (desktop, current_desktop) {
        (Some(d), _) if d < 0 => Some(WindowLayer::Panel),
        (Some(d), Some(current)) if d != current => None,
        _ => Some(WindowLayer::Normal),
    }
}

fn build_window(id: &str, geometry: WindowGeometry, layer: WindowLayer, pid: Option<u32>) -> WindowInfo {
    let pid = pid.filter(|p| *p != 0);
    let window = WindowInfo::new(WindowId::new(id), geometry)
        .with_layer(layer)
        .with_regular(pid.is_some());
    match pid {
        Some(pid) => window.with_pid(pid),
        None => window,
    }
}

/// Разбор вывода `getwindowgeometry`:
///
/// ```text
/// Window {uuid}
///   Position: 10,20
///   Geometry: 800x600
/// ```
fn parse_geometry(output: &str) -> Option<WindowGeometry> {
    let mut position = None;
    let mut size = None;

    for line in output.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Position:") {
            let (x, y) = value.trim().split_once(',')?;
            position = Some((x.trim().parse::<f64>().ok()?, y.trim().parse::<f64>().ok()?));
        } else if let Some(value) = line.strip_prefix("Geometry:") {
            let (w, h) = value.trim().split_once('x')?;
            size = Some((w.trim().parse::<f64>().ok()?, h.trim().parse::<f64>().ok()?));
        }
    }

    let (x, y) = position?;
    let (width, height) = size?;
    Some(WindowGeometry::new(
        x.round() as i32,
        y.round() as i32,
        width.max(0.0).round() as u32,
        height.max(0.0).round() as u32,
    ))
}

impl WindowBackend for KdotoolBackend {
    fn name(&self) -> &'static str {
        "kdotool"
    }

    fn probe(&self) -> Result<()> {
        debug!("=== Тестируем kdotool ===");
        let window_id = Self::run(&["getactivewindow"])?;
        debug!("kdotool получил window_id: '{}'", window_id);
        Ok(())
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        let ids = Self::run(&["search", "."])?;
        let current_desktop = Self::run(&["get_desktop"])
            .ok()
            .and_then(|d| d.parse::<i64>().ok());

        Ok(ids
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .filter_map(|id| self.window_info(id, current_desktop))
            .collect())
    }

    fn focused_window(&self) -> Result<Option<WindowId>> {
        let window_id = Self::run(&["getactivewindow"])?;
        if window_id.is_empty() {
            return Ok(None);
        }
        Ok(Some(WindowId::new(window_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geometry() {
        let output = "Window {6c5ba2c4-2c1d-4d0b-9d1a-8d9c1b3c9f11}\n  Position: 10,20.5\n  Geometry: 800x600\n";
        assert_eq!(
            parse_geometry(output),
            Some(WindowGeometry::new(10, 21, 800, 600))
        );
    }

    #[test]
    fn test_parse_geometry_incomplete() {
        assert_eq!(parse_geometry("Window {x}\n  Position: 1,2\n"), None);
        assert_eq!(parse_geometry(""), None);
    }

    #[test]
    fn test_layer_on_desktop() {
        assert_eq!(layer_on_desktop(Some(1), Some(1)), Some(WindowLayer::Normal));
        assert_eq!(layer_on_desktop(Some(2), Some(1)), None);
        assert_eq!(layer_on_desktop(Some(-1), Some(1)), Some(WindowLayer::Panel));
        // Стол неизвестен: окно не отбрасываем
        assert_eq!(layer_on_desktop(None, Some(1)), Some(WindowLayer::Normal));
        assert_eq!(layer_on_desktop(Some(3), None), Some(WindowLayer::Normal));
    }

    #[test]
    fn test_build_window_without_pid_is_not_regular() {
        let geometry = WindowGeometry::new(0, 0, 100, 100);

        let window = build_window("{a}", geometry, WindowLayer::Normal, Some(4242));
        assert!(window.regular);
        assert_eq!(window.pid, Some(4242));

        let window = build_window("{b}", geometry, WindowLayer::Normal, Some(0));
        assert!(!window.regular);
        assert_eq!(window.pid, None);

        let window = build_window("{c}", geometry, WindowLayer::Panel, None);
        assert!(!window.regular);
        assert_eq!(window.layer, WindowLayer::Panel);
        assert!(window.title.is_empty());
    }
}
