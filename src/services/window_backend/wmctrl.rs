use crate::error::{NavError, Result};
use crate::events::{WindowGeometry, WindowId, WindowInfo, WindowLayer};
use std::process::Command;

/// Обёртка над `wmctrl`: список окон с геометрией и текущий рабочий стол
pub struct Wmctrl;

impl Wmctrl {
    pub fn new() -> Self {
        Self
    }

    fn run(args: &[&str]) -> Result<String> {
        let output = Command::new("wmctrl")
            .args(args)
            .output()
            .map_err(|e| NavError::ServiceUnavailable(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(NavError::ServiceUnavailable("wmctrl вернул ошибку".to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub fn test(&self) -> Result<()> {
        Self::run(&["-m"]).map(|_| ())
    }

    pub fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        let current_desktop = parse_current_desktop(&Self::run(&["-d"])?);
        Ok(parse_window_list(&Self::run(&["-lpG"])?, current_desktop))
    }
}

/// Привести X11 id окна к единому виду `0x%08x`
pub fn normalize_x11_id(raw: &str) -> Option<WindowId> {
    let raw = raw.trim();
    let value = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok()?,
        None => raw.parse::<u64>().ok()?,
    };
    Some(WindowId::new(format!("0x{:08x}", value)))
}

/// Строка `wmctrl -d`, помеченная `*`, это текущий рабочий стол
fn parse_current_desktop(output: &str) -> Option<i64> {
    output.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let index = parts.next()?.parse::<i64>().ok()?;
        (parts.next()? == "*").then_some(index)
    })
}

/// Разбор `wmctrl -lpG`: `id desktop pid x y w h host title...`
fn parse_window_list(output: &str, current_desktop: Option<i64>) -> Vec<WindowInfo> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 7 {
                return None;
            }

            let id = normalize_x11_id(parts[0])?;
            let desktop = parts[1].parse::<i64>().ok()?;
            let pid = parts[2].parse::<u32>().ok()?;
            let x = parts[3].parse::<i32>().ok()?;
            let y = parts[4].parse::<i32>().ok()?;
            let width = parts[5].parse::<u32>().ok()?;
            let height = parts[6].parse::<u32>().ok()?;

            // Окна "на всех столах" (-1) это панели и доки
            let layer = if desktop < 0 {
                WindowLayer::Panel
            } else {
                WindowLayer::Normal
            };

            // Окна других рабочих столов не видны
            if layer == WindowLayer::Normal
                && current_desktop.is_some_and(|current| current != desktop)
            {
                return None;
            }

            let title = if parts.len() > 8 { parts[8..].join(" ") } else { String::new() };

            let mut window = WindowInfo::new(id, WindowGeometry::new(x, y, width, height))
                .with_layer(layer)
                .with_regular(pid != 0)
                .with_title(title);
            if pid != 0 {
                window = window.with_pid(pid);
            }
            Some(window)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOPS: &str = "\
0  - DG: 1920x1080  VP: N/A  WA: 0,0 1920x1080  Web
1  * DG: 1920x1080  VP: 0,0  WA: 0,32 1920x1048  Code
";

    const WINDOWS: &str = "\
0x02400003 -1 1520   0    0    1920 32   host xfce4-panel
0x03a00003  1 2345   10   40   800  600  host Terminal - ~/src
0x03c00007  0 2400   0    32   1920 1048 host Firefox
0x04000001  1 0      900  40   1000 1000 host
broken line
";

    #[test]
    fn test_current_desktop() {
        assert_eq!(parse_current_desktop(DESKTOPS), Some(1));
        assert_eq!(parse_current_desktop(""), None);
    }

    #[test]
    fn test_window_list_filters_other_desktops() {
        let windows = parse_window_list(WINDOWS, Some(1));
        let ids: Vec<&str> = windows.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["0x02400003", "0x03a00003", "0x04000001"]);

        assert_eq!(windows[0].layer, WindowLayer::Panel);
        assert_eq!(windows[1].title, "Terminal - ~/src");
        assert_eq!(windows[1].geometry, WindowGeometry::new(10, 40, 800, 600));
        assert_eq!(windows[1].pid, Some(2345));
        // pid 0: владелец неизвестен
        assert!(!windows[2].regular);
    }

    #[test]
    fn test_normalize_x11_id() {
        assert_eq!(normalize_x11_id("0x3a00003"), Some(WindowId::new("0x03a00003")));
        assert_eq!(normalize_x11_id("60817411"), Some(WindowId::new("0x03a00003")));
        assert_eq!(normalize_x11_id("window"), None);
    }
}
