use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Системная ошибка: {0}")]
    Nix(#[from] nix::Error),

    #[error("Ошибка разбора JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Уже запущен другой экземпляр: {0}")]
    AlreadyRunning(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl NavError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(NavError::DeviceNotFound(msg.into()))
    }

    /// Ошибки, после которых перехват ввода невозможен (нет прав / нет устройства)
    pub fn is_registration_failure(&self) -> bool {
        matches!(
            self,
            NavError::Permission(_)
                | NavError::DeviceNotFound(_)
                | NavError::Uinput(_)
                | NavError::ServiceUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NavError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! nav_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::NavError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::NavError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::NavError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::NavError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_failure_classification() {
        assert!(NavError::Permission("нет доступа".into()).is_registration_failure());
        assert!(NavError::DeviceNotFound("нет клавиатуры".into()).is_registration_failure());
        assert!(!NavError::Internal("сбой".into()).is_registration_failure());
        assert!(!NavError::AlreadyRunning("pid 1".into()).is_registration_failure());
    }

    #[test]
    fn test_macro_builds_variant() {
        let err = nav_error!(internal, "код {}", 42);
        assert_eq!(err.to_string(), "Внутренняя ошибка: код 42");
    }
}
