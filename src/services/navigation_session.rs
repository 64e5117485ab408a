use crate::debug_if_enabled;
use crate::events::{NavInput, Point, Reaction};
use crate::services::nearest_window;
use crate::services::pointer::PointerActuator;
use crate::services::window_snapshot::{FocusResolver, WindowSnapshotProvider};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Задержка проверки фокуса после аккорда активации.
/// Отпускание клавиш аккорда само может сменить фокус, поэтому ждём его.
pub const ACTIVATION_DELAY: Duration = Duration::from_millis(350);

/// Режим навигации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Active,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "Idle"),
            Mode::Active => write!(f, "Active"),
        }
    }
}

/// Курсор существует только в активном режиме
#[derive(Debug, Clone, Copy, PartialEq)]
enum SessionState {
    Idle,
    Active { cursor: Point },
}

/// NavigationSession владеет режимом и виртуальным курсором.
///
/// Все методы вызываются из одной задачи в порядке поступления событий,
/// отложенная проверка активации тоже.
pub struct NavigationSession {
    snapshot: WindowSnapshotProvider,
    focus: FocusResolver,
    pointer: Box<dyn PointerActuator>,
    state: SessionState,
}

impl NavigationSession {
    pub fn new(
        snapshot: WindowSnapshotProvider,
        focus: FocusResolver,
        pointer: Box<dyn PointerActuator>,
    ) -> Self {
        Self {
            snapshot,
            focus,
            pointer,
            state: SessionState::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            SessionState::Idle => Mode::Idle,
            SessionState::Active { .. } => Mode::Active,
        }
    }

    pub fn cursor_position(&self) -> Option<Point> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Active { cursor } => Some(cursor),
        }
    }

    /// Обработать одно входное событие и решить, пропускать ли его дальше
    pub fn intercept(&mut self, input: NavInput) -> Reaction {
        debug_if_enabled!("Сессия {}: {:?}", self.mode(), input);

        match (self.state, input) {
            (_, NavInput::ActivationChord) => {
                debug!("Аккорд активации, проверка фокуса через {:?}", ACTIVATION_DELAY);
                Reaction::forward().with_deferred(ACTIVATION_DELAY)
            }
            (SessionState::Idle, _) => Reaction::forward(),
            (SessionState::Active { cursor }, NavInput::DirectionKey(direction)) => {
                let windows = self.snapshot.list();
                match nearest_window::select(cursor, direction, &windows) {
                    Some(target) => {
                        debug!("{} -> {} ({})", cursor, target, direction);
                        self.state = SessionState::Active { cursor: target };
                        self.pointer.move_to(target);
                    }
                    None => {
                        debug!("Нет окна {} от {}", direction, cursor);
                    }
                }
                Reaction::swallow()
            }
            (SessionState::Active { cursor }, NavInput::ConfirmKey) => {
                info!("Клик в {}, выход из режима навигации", cursor);
                self.pointer.click(cursor);
                self.state = SessionState::Idle;
                Reaction::swallow()
            }
            (SessionState::Active { .. }, NavInput::CancelKey) => {
                info!("Отмена навигации");
                self.state = SessionState::Idle;
                Reaction::forward()
            }
            (SessionState::Active { .. }, NavInput::OtherKey) => {
                debug!("Посторонняя клавиша, выход из режима навигации");
                self.state = SessionState::Idle;
                Reaction::forward()
            }
            (SessionState::Active { .. }, NavInput::PointerButtonDown(button)) => {
                debug!("Кнопка мыши 0x{:x}, выход из режима навигации", button);
                self.state = SessionState::Idle;
                Reaction::forward()
            }
        }
    }

    /// Отложенная проверка активации: окно в фокусе становится курсором.
    /// Если фокус или окно не найдены, состояние не меняется.
    pub fn on_deferred(&mut self) {
        let Some(focused) = self.focus.focused_window_id() else {
            debug!("Окно в фокусе не определено, активации нет");
            return;
        };

        let Some(window) = self.snapshot.find(&focused) else {
            debug!("Окно {} не найдено среди подходящих, активации нет", focused);
            return;
        };

        info!("Режим навигации: окно {} в {}", window.id, window.center);
        self.state = SessionState::Active {
            cursor: window.center,
        };
        self.pointer.move_to(window.center);
    }
}
