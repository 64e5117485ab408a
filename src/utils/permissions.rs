use crate::error::{NavError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Проверить права доступа к необходимым ресурсам.
///
/// В режиме dry-run uinput не нужен.
pub fn check_permissions(dry_run: bool) -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access(Path::new("/dev/input"))?;

    if !dry_run {
        check_uinput_access(Path::new("/dev/uinput"))?;
    }

    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(NavError::Permission(format!(
            "Директория {} не существует",
            input_dir.display()
        )));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir.display());
            Ok(())
        }
        Err(e) => Err(NavError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir.display(),
            e
        ))),
    }
}

fn check_uinput_access(uinput_device: &Path) -> Result<()> {
    // Без uinput нельзя ни пробросить клавиши, ни двигать указатель
    if !uinput_device.exists() {
        return Err(NavError::Permission(format!(
            "{} не существует, загрузите модуль: sudo modprobe uinput",
            uinput_device.display()
        )));
    }

    let metadata = fs::metadata(uinput_device).map_err(|e| {
        NavError::Permission(format!(
            "Не удалось проверить права доступа к {}: {}",
            uinput_device.display(),
            e
        ))
    })?;

    // Обычно 660 (группа uinput/input) или 666
    if !is_group_or_world_writable(metadata.permissions().mode()) && !is_root() {
        return Err(NavError::Permission(format!(
            "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
            uinput_device.display()
        )));
    }

    info!("Доступ к {} подтвержден", uinput_device.display());
    Ok(())
}

fn is_group_or_world_writable(mode: u32) -> bool {
    mode & 0o020 != 0 || mode & 0o002 != 0
}

fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

fn check_not_root() {
    if is_root() {
        warn!("Приложение запущено от имени root!");
        warn!("Рекомендуется добавить пользователя в группы 'input' и 'uinput'");
        warn!("и запускать приложение от имени обычного пользователя");
    } else if let Ok(user) = std::env::var("USER") {
        info!("Приложение запущено от имени пользователя: {}", user);
    }
}

/// Команды для настройки прав доступа, показываются при ошибке запуска
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "sudo usermod -a -G input,uinput $USER".to_string(),
        "sudo modprobe uinput".to_string(),
        "echo 'uinput' | sudo tee /etc/modules-load.d/uinput.conf".to_string(),
    ]
}
