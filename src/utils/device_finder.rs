use crate::error::{NavError, Result};
use smallvec::SmallVec;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Префикс имён наших собственных виртуальных устройств
const OWN_DEVICE_PREFIX: &str = "wnav ";

/// Пути устройств указателя: обычно их одно-два
pub type PointerPaths = SmallVec<[PathBuf; 4]>;

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящее клавиатурное устройство
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                NavError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        Self::auto_find_keyboard()
    }

    fn auto_find_keyboard() -> Result<PathBuf> {
        info!("Начинаем автопоиск клавиатурного устройства...");

        if let Ok(device) = Self::find_by_id() {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        NavError::device_not_found(
            "Не удалось найти подходящее клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return NavError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| NavError::Permission(format!("Нет доступа к /dev/input/by-id: {}", e)))?;

        let mut keyboards = Vec::new();

        for entry in entries {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();

            if !name.ends_with("event-kbd") && !name.to_lowercase().contains("keyboard") {
                continue;
            }
            if name.to_lowercase().contains("mouse") {
                debug!("Исключаем как мышь: {}", name);
                continue;
            }
            if !Self::is_device_accessible(&path) {
                warn!("Устройство {:?} недоступно", path);
                continue;
            }

            if Self::is_keyboard_device(&path) {
                // -event-kbd надёжнее, чем совпадение по названию
                let priority = if name.ends_with("event-kbd") { 100 } else { 50 };
                info!("Добавлена клавиатура: {} (приоритет: {})", name, priority);
                keyboards.push((path, priority));
            }
        }

        keyboards.sort_by(|a, b| b.1.cmp(&a.1));

        match keyboards.into_iter().next() {
            Some((keyboard, _)) => Ok(keyboard),
            None => NavError::device_not_found("Клавиатурное устройство не найдено в by-id"),
        }
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        for device_path in Self::event_devices()? {
            debug!("Проверяем устройство: {:?}", device_path);

            if Self::is_device_accessible(&device_path) && Self::is_keyboard_device(&device_path) {
                return Ok(device_path);
            }
        }

        NavError::device_not_found("Не найдено доступное клавиатурное устройство среди event устройств")
    }

    /// Все /dev/input/event*, отсортированные по номеру
    fn event_devices() -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir("/dev/input")
            .map_err(|e| NavError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut devices = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(number) = event_number(&path) {
                devices.push((number, path));
            }
        }

        devices.sort_by_key(|(number, _)| *number);
        Ok(devices.into_iter().map(|(_, path)| path).collect())
    }

    fn is_keyboard_device(device_path: &Path) -> bool {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let name = device.name().unwrap_or("Unknown");
                if is_own_device(name) {
                    debug!("Пропускаем собственное виртуальное устройство: {}", name);
                    return false;
                }

                let lower = name.to_lowercase();
                if lower.contains("mouse") || lower.contains("touchpad") || lower.contains("trackpoint") {
                    debug!("Исключаем устройство как мышь/тачпад: {:?} ({})", device_path, name);
                    return false;
                }

                let has_keys = device.supported_keys().is_some_and(|keys| {
                    keys.contains(evdev::KeyCode::KEY_A)
                        && keys.contains(evdev::KeyCode::KEY_ENTER)
                        && keys.contains(evdev::KeyCode::KEY_UP)
                        && keys.contains(evdev::KeyCode::KEY_LEFTCTRL)
                });

                if has_keys {
                    info!("Устройство {:?} подходит как клавиатура ({})", device_path, name);
                } else {
                    debug!("Устройство {:?} не подходит как клавиатура ({})", device_path, name);
                }
                has_keys
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }

    /// Найти устройства указателя по списку из конфигурации.
    ///
    /// `"auto"` в списке включает автопоиск, пустой список отключает
    /// отслеживание кнопок мыши.
    pub fn find_pointer_devices(configured: &[String]) -> Result<PointerPaths> {
        let mut paths = PointerPaths::new();

        for entry in configured {
            if entry == "auto" {
                for path in Self::event_devices()? {
                    if Self::is_pointer_device(&path) && !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            } else {
                let path = PathBuf::from(entry);
                if path.exists() {
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                } else {
                    warn!("Указанное устройство указателя не найдено: {:?}", path);
                }
            }
        }

        info!("Устройств указателя: {}", paths.len());
        Ok(paths)
    }

    fn is_pointer_device(device_path: &Path) -> bool {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let name = device.name().unwrap_or("Unknown");
                if is_own_device(name) {
                    return false;
                }

                let has_buttons = device
                    .supported_keys()
                    .is_some_and(|keys| keys.contains(evdev::KeyCode::BTN_LEFT));
                if has_buttons {
                    debug!("Устройство указателя: {:?} ({})", device_path, name);
                }
                has_buttons
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}

fn is_own_device(name: &str) -> bool {
    name.starts_with(OWN_DEVICE_PREFIX)
}

/// Номер N из /dev/input/eventN
fn event_number(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("event")?
        .parse()
        .ok()
}
