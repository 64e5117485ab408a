use crate::config::Config;
use crate::error::Result;
use crate::events::{Point, WindowGeometry};
use crate::services::window_backend::WindowBackend;
use tracing::{info, warn};

/// Trait for pointer actuators that move and click the system pointer.
///
/// Synthetic input failures are not observable to callers: implementations
/// log them and carry on.
pub trait PointerActuator: Send {
    /// Move the pointer to `point`
    fn move_to(&mut self, point: Point);

    /// Press and release the left button at `point` (two discrete events)
    fn click(&mut self, point: Point);
}

const FALLBACK_BOUNDS: WindowGeometry = WindowGeometry {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

/// Границы рабочего стола для абсолютных осей: конфиг > бэкенд > запасной вариант
pub fn resolve_desktop_bounds(config: &Config, detected: Option<WindowGeometry>) -> WindowGeometry {
    let mut bounds = match detected {
        Some(bounds) => bounds,
        None => {
            warn!(
                "Не удалось определить размеры рабочего стола, используем {}x{}",
                FALLBACK_BOUNDS.width, FALLBACK_BOUNDS.height
            );
            FALLBACK_BOUNDS
        }
    };

    if let Some(width) = config.pointer.desktop_width {
        bounds.width = width;
    }
    if let Some(height) = config.pointer.desktop_height {
        bounds.height = height;
    }

    bounds
}

/// Factory function to create a pointer actuator based on the dry_run flag
pub fn create_pointer_actuator(
    config: &Config,
    backend: &dyn WindowBackend,
    dry_run: bool,
) -> Result<Box<dyn PointerActuator>> {
    let detected = backend.desktop_bounds().unwrap_or_else(|e| {
        warn!("Бэкенд {} не отдал размеры рабочего стола: {}", backend.name(), e);
        None
    });
    let bounds = resolve_desktop_bounds(config, detected);
    info!(
        "Рабочий стол: {}x{} от ({}, {})",
        bounds.width, bounds.height, bounds.x, bounds.y
    );

    if dry_run {
        Ok(Box::new(super::dry_run::DryRunPointer::new()))
    } else {
        Ok(Box::new(super::virtual_pointer::VirtualPointer::new(
            "wnav Virtual Pointer",
            bounds,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_bounds_used() {
        let config = Config::default();
        let detected = WindowGeometry::new(-1920, 0, 4480, 1440);
        assert_eq!(resolve_desktop_bounds(&config, Some(detected)), detected);
    }

    #[test]
    fn test_config_overrides_size_only() {
        let mut config = Config::default();
        config.pointer.desktop_width = Some(3840);
        let detected = WindowGeometry::new(-1920, 0, 4480, 1440);
        assert_eq!(
            resolve_desktop_bounds(&config, Some(detected)),
            WindowGeometry::new(-1920, 0, 3840, 1440)
        );
    }

    #[test]
    fn test_fallback_bounds() {
        let config = Config::default();
        assert_eq!(resolve_desktop_bounds(&config, None), FALLBACK_BOUNDS);
    }
}
