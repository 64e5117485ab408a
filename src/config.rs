use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub window: WindowConfig,
    pub pointer: PointerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// "auto" или путь к /dev/input/eventN
    pub keyboard_device: String,
    /// ["auto"] или явные пути; пустой список отключает отслеживание кнопок мыши
    #[serde(default)]
    pub pointer_devices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub backend: String,
}

/// Переопределение размеров рабочего стола для абсолютных осей виртуального указателя
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PointerConfig {
    #[serde(default)]
    pub desktop_width: Option<u32>,
    #[serde(default)]
    pub desktop_height: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            input: InputConfig {
                keyboard_device: "auto".to_string(),
                pointer_devices: vec!["auto".to_string()],
            },
            window: WindowConfig {
                backend: "auto".to_string(),
            },
            pointer: PointerConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Отсутствующий файл не ошибка: остаются значения по умолчанию
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WNAV_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.input.keyboard_device.is_empty() {
            anyhow::bail!("keyboard_device не может быть пустым (используйте \"auto\")");
        }

        // Валидация бэкенда окон
        match self.window.backend.as_str() {
            "auto" | "hyprland" | "sway" | "x11" | "kdotool" => {}
            _ => anyhow::bail!("Неверный бэкенд окон: {}", self.window.backend),
        }

        if self.pointer.desktop_width == Some(0) || self.pointer.desktop_height == Some(0) {
            anyhow::bail!("desktop_width и desktop_height должны быть больше 0");
        }

        Ok(())
    }

    /// Нужно ли искать устройства указателя автоматически
    pub fn auto_pointer_devices(&self) -> bool {
        self.input.pointer_devices.iter().any(|p| p == "auto")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.auto_pointer_devices());
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let mut config = Config::default();
        config.window.backend = "mutter".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_logging_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "json".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_desktop_size_rejected() {
        let mut config = Config::default();
        config.pointer.desktop_width = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = r#"
            [window]
            backend = "sway"

            [input]
            keyboard_device = "/dev/input/event3"
            pointer_devices = []

            [pointer]
            desktop_width = 3840
        "#;

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();

        assert_eq!(config.window.backend, "sway");
        assert_eq!(config.input.keyboard_device, "/dev/input/event3");
        assert!(!config.auto_pointer_devices());
        assert_eq!(config.pointer.desktop_width, Some(3840));
        assert_eq!(config.pointer.desktop_height, None);
        // Не указанные секции берутся из значений по умолчанию
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/non/existent/wnav.toml").unwrap();
        assert_eq!(config.window.backend, "auto");
    }
}
