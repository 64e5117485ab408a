use evdev::KeyCode;

use crate::events::{Direction, Modifiers, NavInput};

/// Клавиша аккорда активации (вместе с зажатым Ctrl)
pub const ACTIVATION_KEY: KeyCode = KeyCode::KEY_UP;

/// Диапазон кодов кнопок мыши: BTN_LEFT..=BTN_TASK
const POINTER_BUTTON_FIRST: u16 = 0x110;
const POINTER_BUTTON_LAST: u16 = 0x117;

/// Чистые модификаторы не являются входом сессии: только обновляют состояние
pub fn is_modifier_key(key: KeyCode) -> bool {
    matches!(
        key,
        KeyCode::KEY_LEFTCTRL
            | KeyCode::KEY_RIGHTCTRL
            | KeyCode::KEY_LEFTALT
            | KeyCode::KEY_RIGHTALT
            | KeyCode::KEY_LEFTSHIFT
            | KeyCode::KEY_RIGHTSHIFT
            | KeyCode::KEY_LEFTMETA
            | KeyCode::KEY_RIGHTMETA
    )
}

pub fn is_pointer_button(code: u16) -> bool {
    (POINTER_BUTTON_FIRST..=POINTER_BUTTON_LAST).contains(&code)
}

fn direction_of(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::KEY_LEFT => Some(Direction::Left),
        KeyCode::KEY_RIGHT => Some(Direction::Right),
        KeyCode::KEY_UP => Some(Direction::Up),
        KeyCode::KEY_DOWN => Some(Direction::Down),
        _ => None,
    }
}

/// Классифицировать нажатие клавиши (key-down) для сессии навигации.
///
/// Возвращает `None` для модификаторов: их пробрасывают без участия сессии.
pub fn classify_key(key: KeyCode, modifiers: Modifiers) -> Option<NavInput> {
    if is_modifier_key(key) {
        return None;
    }

    if key == ACTIVATION_KEY && modifiers.ctrl {
        return Some(NavInput::ActivationChord);
    }

    let input = if let Some(direction) = direction_of(key) {
        NavInput::DirectionKey(direction)
    } else {
        match key {
            KeyCode::KEY_ENTER | KeyCode::KEY_KPENTER => NavInput::ConfirmKey,
            KeyCode::KEY_ESC => NavInput::CancelKey,
            _ => NavInput::OtherKey,
        }
    };

    Some(input)
}
