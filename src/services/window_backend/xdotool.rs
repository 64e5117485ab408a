use crate::error::{NavError, Result};
use crate::events::{WindowGeometry, WindowId};
use std::process::Command;
use tracing::debug;

use super::wmctrl::normalize_x11_id;

/// Обёртка над `xdotool`: окно в фокусе и размер экрана
pub struct Xdotool;

impl Xdotool {
    pub fn new() -> Self {
        Self
    }

    fn run(args: &[&str]) -> Result<String> {
        let output = Command::new("xdotool").args(args).output().map_err(|e| {
            debug!("xdotool не найден или не работает: {}", e);
            NavError::ServiceUnavailable(format!("xdotool не найден: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool вернул ошибку: {}", stderr);
            return Err(NavError::ServiceUnavailable(format!("xdotool вернул ошибку: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub fn test(&self) -> Result<()> {
        Self::run(&["getdisplaygeometry"]).map(|_| ())
    }

    pub fn get_active_window(&self) -> Result<Option<WindowId>> {
        // Без активного окна xdotool завершается с ошибкой
        match Self::run(&["getactivewindow"]) {
            Ok(stdout) => {
                debug!("xdotool получил id окна: '{}'", stdout.trim());
                Ok(normalize_x11_id(&stdout))
            }
            Err(e) => {
                debug!("Активное окно не найдено: {}", e);
                Ok(None)
            }
        }
    }

    pub fn display_geometry(&self) -> Result<Option<WindowGeometry>> {
        Ok(parse_display_geometry(&Self::run(&["getdisplaygeometry"])?))
    }
}

fn parse_display_geometry(output: &str) -> Option<WindowGeometry> {
    let mut parts = output.split_whitespace();
    let width = parts.next()?.parse::<u32>().ok()?;
    let height = parts.next()?.parse::<u32>().ok()?;
    Some(WindowGeometry::new(0, 0, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_geometry() {
        assert_eq!(
            parse_display_geometry("3840 1080\n"),
            Some(WindowGeometry::new(0, 0, 3840, 1080))
        );
        assert_eq!(parse_display_geometry("garbage"), None);
    }
}
