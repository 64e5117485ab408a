use crate::config::Config;
use crate::error::{NavError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::hyprland::HyprlandBackend;
use super::kdotool::KdotoolBackend;
use super::sway::SwayBackend;
use super::x11::X11Backend;
use super::r#trait::WindowBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DesktopEnvironment {
    Hyprland,
    Sway,
    KdeWayland,
    X11Generic,
    Unknown,
}

/// Снимок переменных окружения сессии, нужных для выбора бэкенда
#[derive(Debug, Default, Clone)]
struct SessionEnv {
    hyprland_signature: Option<String>,
    swaysock: Option<String>,
    current_desktop: Option<String>,
    session_type: Option<String>,
    display: Option<String>,
}

impl SessionEnv {
    fn from_process() -> Self {
        Self {
            hyprland_signature: std::env::var("HYPRLAND_INSTANCE_SIGNATURE").ok(),
            swaysock: std::env::var("SWAYSOCK").ok(),
            current_desktop: std::env::var("XDG_CURRENT_DESKTOP").ok(),
            session_type: std::env::var("XDG_SESSION_TYPE").ok(),
            display: std::env::var("DISPLAY").ok(),
        }
    }
}

fn detect_desktop_environment(env: &SessionEnv) -> DesktopEnvironment {
    if env.hyprland_signature.is_some() {
        return DesktopEnvironment::Hyprland;
    }

    if env.swaysock.is_some() {
        return DesktopEnvironment::Sway;
    }

    let wayland = env.session_type.as_deref() == Some("wayland");

    if let Some(desktop) = &env.current_desktop {
        if wayland && desktop.to_lowercase().contains("kde") {
            return DesktopEnvironment::KdeWayland;
        }
    }

    match env.session_type.as_deref() {
        Some("x11") => return DesktopEnvironment::X11Generic,
        Some("wayland") => return DesktopEnvironment::Unknown,
        _ => {}
    }

    if env.display.is_some() {
        return DesktopEnvironment::X11Generic;
    }

    DesktopEnvironment::Unknown
}

fn backend_for(env: DesktopEnvironment) -> Option<Arc<dyn WindowBackend>> {
    match env {
        DesktopEnvironment::Hyprland => Some(Arc::new(HyprlandBackend::new())),
        DesktopEnvironment::Sway => Some(Arc::new(SwayBackend::new())),
        DesktopEnvironment::KdeWayland => Some(Arc::new(KdotoolBackend::new())),
        DesktopEnvironment::X11Generic => Some(Arc::new(X11Backend::new())),
        DesktopEnvironment::Unknown => None,
    }
}

fn backend_by_name(name: &str) -> Result<Arc<dyn WindowBackend>> {
    match name {
        "hyprland" => Ok(Arc::new(HyprlandBackend::new())),
        "sway" => Ok(Arc::new(SwayBackend::new())),
        "kdotool" => Ok(Arc::new(KdotoolBackend::new())),
        "x11" => Ok(Arc::new(X11Backend::new())),
        other => Err(crate::nav_error!(internal, "Неизвестный бэкенд окон: {}", other)),
    }
}

/// Перебрать все бэкенды и вернуть первый рабочий
fn detect_working_backend() -> Result<Arc<dyn WindowBackend>> {
    info!("Определяем рабочий бэкенд окон...");

    let candidates: [Arc<dyn WindowBackend>; 4] = [
        Arc::new(HyprlandBackend::new()),
        Arc::new(SwayBackend::new()),
        Arc::new(KdotoolBackend::new()),
        Arc::new(X11Backend::new()),
    ];

    for backend in candidates {
        match backend.probe() {
            Ok(()) => {
                info!("Используем {}", backend.name());
                return Ok(backend);
            }
            Err(e) => debug!("Бэкенд {} не работает: {}", backend.name(), e),
        }
    }

    Err(NavError::ServiceUnavailable(
        "Ни один бэкенд окон не работает".to_string(),
    ))
}

/// Factory function to create the window backend selected by config
pub fn create_window_backend(config: &Config) -> Result<Arc<dyn WindowBackend>> {
    let backend = if config.window.backend == "auto" {
        let desktop_env = detect_desktop_environment(&SessionEnv::from_process());
        info!("Обнаружена среда рабочего стола: {:?}", desktop_env);

        match backend_for(desktop_env) {
            Some(backend) if backend.probe().is_ok() => backend,
            Some(backend) => {
                warn!(
                    "Бэкенд {} для {:?} не отвечает, перебираем остальные",
                    backend.name(),
                    desktop_env
                );
                detect_working_backend()?
            }
            None => detect_working_backend()?,
        }
    } else {
        let backend = backend_by_name(&config.window.backend)?;
        backend.probe().map_err(|e| {
            NavError::ServiceUnavailable(format!(
                "Бэкенд {} из конфигурации не работает: {}",
                backend.name(),
                e
            ))
        })?;
        backend
    };

    info!("Бэкенд окон: {}", backend.name());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyprland_wins_over_session_type() {
        let env = SessionEnv {
            hyprland_signature: Some("abc".into()),
            session_type: Some("wayland".into()),
            ..Default::default()
        };
        assert_eq!(detect_desktop_environment(&env), DesktopEnvironment::Hyprland);
    }

    #[test]
    fn test_sway_detected_by_socket() {
        let env = SessionEnv {
            swaysock: Some("/run/user/1000/sway-ipc.sock".into()),
            ..Default::default()
        };
        assert_eq!(detect_desktop_environment(&env), DesktopEnvironment::Sway);
    }

    #[test]
    fn test_kde_wayland_vs_x11() {
        let kde_wayland = SessionEnv {
            current_desktop: Some("KDE".into()),
            session_type: Some("wayland".into()),
            ..Default::default()
        };
        assert_eq!(detect_desktop_environment(&kde_wayland), DesktopEnvironment::KdeWayland);

        let kde_x11 = SessionEnv {
            current_desktop: Some("KDE".into()),
            session_type: Some("x11".into()),
            ..Default::default()
        };
        assert_eq!(detect_desktop_environment(&kde_x11), DesktopEnvironment::X11Generic);
    }

    #[test]
    fn test_display_only_means_x11() {
        let env = SessionEnv {
            display: Some(":0".into()),
            ..Default::default()
        };
        assert_eq!(detect_desktop_environment(&env), DesktopEnvironment::X11Generic);
        assert_eq!(detect_desktop_environment(&SessionEnv::default()), DesktopEnvironment::Unknown);
    }

    #[test]
    fn test_backend_by_name() {
        assert_eq!(backend_by_name("sway").unwrap().name(), "sway");
        assert_eq!(backend_by_name("x11").unwrap().name(), "x11");
        assert!(backend_by_name("mutter").is_err());
    }
}
