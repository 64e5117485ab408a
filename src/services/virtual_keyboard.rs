use crate::error::{NavError, Result};
use crate::events::{KeyEvent, KeyState};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Виртуальная клавиатура uinput: через неё пробрасываются события
/// захваченной клавиатуры, которые сессия решила не поглощать.
pub struct VirtualKeyboard {
    device: Option<uinput::Device>,
    device_name: String,
    dry_run: bool,
    /// Проброшенные и ещё не отпущенные клавиши
    held: BTreeSet<u16>,
}

impl VirtualKeyboard {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualKeyboard '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Self::create_virtual_device(device_name)?)
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
            held: BTreeSet::new(),
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуальной клавиатуры uinput '{}'", device_name);

        let device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                NavError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальная клавиатура '{}' создана успешно", device_name);
        Ok(device)
    }

    /// Пробросить событие клавиши в систему
    pub fn forward(&mut self, event: &KeyEvent) -> Result<()> {
        let code = event.key_code.code();
        match event.state {
            KeyState::Released => {
                self.held.remove(&code);
            }
            KeyState::Pressed | KeyState::Repeat => {
                self.held.insert(code);
            }
        }

        if self.dry_run {
            info!("[DRY RUN] Проброс: {}", event);
            return Ok(());
        }

        self.write_key(code, event.state.value())?;
        debug!("Событие {} проброшено", event);
        Ok(())
    }

    fn write_key(&mut self, code: u16, value: i32) -> Result<()> {
        let device = self.device.as_mut().ok_or_else(|| {
            NavError::Internal(format!(
                "Виртуальное устройство '{}' недоступно",
                self.device_name
            ))
        })?;

        device.write(1, code as i32, value).map_err(|e| {
            NavError::Internal(format!("Не удалось отправить событие клавиши {}: {}", code, e))
        })?;
        device
            .write(0, 0, 0)
            .map_err(|e| NavError::Internal(format!("Не удалось синхронизировать события: {}", e)))?;

        Ok(())
    }

    /// Отпустить все проброшенные и ещё зажатые клавиши
    pub fn release_all_keys(&mut self) -> Result<()> {
        let held = std::mem::take(&mut self.held);
        if held.is_empty() || self.dry_run {
            return Ok(());
        }

        info!("Отпускаем зажатые клавиши: {:?}", held);
        for code in held {
            self.write_key(code, KeyState::Released.value())?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn held_keys(&self) -> Vec<u16> {
        self.held.iter().copied().collect()
    }
}

impl Drop for VirtualKeyboard {
    fn drop(&mut self) {
        if let Err(e) = self.release_all_keys() {
            warn!("Не удалось отпустить зажатые клавиши: {}", e);
        }
        if !self.dry_run {
            info!("Закрытие виртуальной клавиатуры");
        }
    }
}
