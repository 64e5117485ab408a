use crate::config::Config;
use crate::error::{NavError, Result};
use crate::events::KeyState;
use crate::mappings::is_pointer_button;
use crate::services::virtual_keyboard::VirtualKeyboard;
use crate::utils::DeviceFinder;
use evdev::{Device, EventType, InputEvent, KeyCode};
use std::io::Error;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::deferred::DeferredChecks;
use super::dispatcher::EventDispatcher;
use super::r#trait::InputInterceptorTrait;

pub const VIRTUAL_KEYBOARD_NAME: &str = "wnav Virtual Keyboard";

/// InputInterceptor захватывает клавиатуру эксклюзивно и пробрасывает
/// дальше только то, что сессия не поглотила. Мыши читаются без захвата,
/// только чтобы заметить нажатия кнопок.
pub struct InputInterceptor {
    keyboard: Option<Device>,
    keyboard_path: PathBuf,
    pointers: Vec<(PathBuf, Device)>,
    pointer_tasks: Vec<JoinHandle<()>>,
    virtual_keyboard: VirtualKeyboard,
    dispatcher: EventDispatcher,
    dry_run: bool,
}

impl InputInterceptor {
    pub fn new(config: &Config, dispatcher: EventDispatcher, dry_run: bool) -> Result<Self> {
        info!("Инициализация InputInterceptor (dry_run: {})", dry_run);

        let keyboard_path = DeviceFinder::find_keyboard_device(&config.input.keyboard_device)?;

        let mut keyboard = Device::open(&keyboard_path).map_err(|e| {
            NavError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                keyboard_path, e
            ))
        })?;

        // Виртуальная клавиатура создаётся до захвата: иначе нечем пробрасывать
        let virtual_keyboard = VirtualKeyboard::new(VIRTUAL_KEYBOARD_NAME, dry_run)?;

        if dry_run {
            info!("[DRY RUN] Клавиатура {:?} читается без захвата", keyboard_path);
        } else {
            match keyboard.grab() {
                Ok(_) => Self::log_grabbed_device(&keyboard),
                Err(e) => {
                    Self::log_grab_error(&keyboard_path, &e);
                    return Err(NavError::Permission(format!(
                        "Не удалось захватить клавиатуру эксклюзивно: {}",
                        e
                    )));
                }
            }
        }

        let pointers = Self::open_pointers(config);

        Ok(Self {
            keyboard: Some(keyboard),
            keyboard_path,
            pointers,
            pointer_tasks: Vec::new(),
            virtual_keyboard,
            dispatcher,
            dry_run,
        })
    }

    fn open_pointers(config: &Config) -> Vec<(PathBuf, Device)> {
        if config.input.pointer_devices.is_empty() {
            info!("Отслеживание кнопок мыши отключено в конфигурации");
            return Vec::new();
        }
        if config.auto_pointer_devices() {
            debug!("Автопоиск устройств указателя");
        }

        let paths = match DeviceFinder::find_pointer_devices(&config.input.pointer_devices) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Кнопки мыши не отслеживаются: {}", e);
                return Vec::new();
            }
        };

        paths
            .into_iter()
            .filter_map(|path| match Device::open(&path) {
                Ok(device) => {
                    info!(
                        "Отслеживаем кнопки: {} ({:?})",
                        device.name().unwrap_or("Unknown"),
                        path
                    );
                    Some((path, device))
                }
                Err(e) => {
                    warn!("Не удалось открыть устройство указателя {:?}: {}", path, e);
                    None
                }
            })
            .collect()
    }

    /// Запустить задачи чтения мышей: они только отправляют коды нажатых кнопок
    fn spawn_pointer_readers(&mut self, tx: &mpsc::UnboundedSender<u16>) {
        for (path, device) in std::mem::take(&mut self.pointers) {
            let mut stream = match device.into_event_stream() {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Не удалось читать устройство указателя {:?}: {}", path, e);
                    continue;
                }
            };

            let tx = tx.clone();
            self.pointer_tasks.push(tokio::spawn(async move {
                loop {
                    match stream.next_event().await {
                        Ok(event) => {
                            if event.event_type() == EventType::KEY
                                && event.value() == 1
                                && is_pointer_button(event.code())
                                && tx.send(event.code()).is_err()
                            {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Устройство указателя {:?} недоступно: {}", path, e);
                            break;
                        }
                    }
                }
            }));
        }
    }

    async fn run_impl(mut self) -> Result<()> {
        let keyboard = self
            .keyboard
            .take()
            .ok_or_else(|| NavError::Internal("Клавиатура уже используется".to_string()))?;
        let mut keyboard_stream = keyboard.into_event_stream()?;

        let (button_tx, mut button_rx) = mpsc::unbounded_channel();
        self.spawn_pointer_readers(&button_tx);

        info!(
            "InputInterceptor запущен: клавиатура {:?}, устройств указателя: {}",
            self.keyboard_path,
            self.pointer_tasks.len()
        );

        let mut deferred = DeferredChecks::new();

        loop {
            tokio::select! {
                event = keyboard_stream.next_event() => {
                    let event = event.map_err(|e| {
                        error!("Ошибка чтения клавиатуры: {}", e);
                        NavError::Io(e)
                    })?;
                    self.handle_keyboard_event(event, &mut deferred);
                }
                Some(button) = button_rx.recv() => {
                    debug!("Кнопка мыши 0x{:x}", button);
                    self.dispatcher.on_pointer_button(button);
                }
                _ = deferred.next_due() => {
                    deferred.fire();
                    self.dispatcher.on_deferred();
                }
            }
        }
    }

    fn handle_keyboard_event(&mut self, event: InputEvent, deferred: &mut DeferredChecks) {
        if event.event_type() != EventType::KEY {
            return;
        }

        let Some(state) = KeyState::from_value(event.value()) else {
            debug!("Неизвестное значение события: {}", event.value());
            return;
        };

        let (key_event, reaction) = self.dispatcher.on_key(KeyCode::new(event.code()), state);

        if let Some(delay) = reaction.defer {
            deferred.schedule(delay);
            debug!("Проверок активации в очереди: {}", deferred.len());
        }

        if reaction.decision.is_swallow() {
            if self.dry_run {
                info!("[DRY RUN] Поглощено: {}", key_event);
            }
            return;
        }

        if let Err(e) = self.virtual_keyboard.forward(&key_event) {
            warn!("Не удалось пробросить {}: {}", key_event, e);
        }
    }

    fn log_grabbed_device(device: &Device) {
        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
        info!("Устройство захвачено эксклюзивно");
    }

    fn log_grab_error(device_path: &Path, e: &Error) {
        warn!(
            "Не удалось захватить устройство {}: {}",
            device_path.display(),
            e
        );
        warn!("Попробуйте:");
        warn!("1. Проверить, что wnav не запущен в другой сессии");
        warn!("2. Добавить пользователя в группу input: sudo usermod -a -G input $USER");
        warn!("3. Перезайти в систему после добавления в группу");
    }
}

#[async_trait::async_trait]
impl InputInterceptorTrait for InputInterceptor {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

impl Drop for InputInterceptor {
    fn drop(&mut self) {
        for task in self.pointer_tasks.drain(..) {
            task.abort();
        }
        if !self.dry_run {
            // Захват снимается ядром при закрытии дескриптора
            info!("Освобождение захваченной клавиатуры {:?}", self.keyboard_path);
        }
    }
}
