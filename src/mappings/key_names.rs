use evdev::KeyCode;

/// Имя клавиши для логов. Отвечает только за трансляцию evdev кода в строку
pub fn key_name(key: KeyCode) -> Option<&'static str> {
    let name = match key {
        // Навигационные клавиши
        KeyCode::KEY_UP => "up",
        KeyCode::KEY_DOWN => "down",
        KeyCode::KEY_LEFT => "left",
        KeyCode::KEY_RIGHT => "right",
        KeyCode::KEY_ENTER => "enter",
        KeyCode::KEY_KPENTER => "kp_enter",
        KeyCode::KEY_ESC => "esc",

        // Модификаторы
        KeyCode::KEY_LEFTCTRL => "left_ctrl",
        KeyCode::KEY_RIGHTCTRL => "right_ctrl",
        KeyCode::KEY_LEFTALT => "left_alt",
        KeyCode::KEY_RIGHTALT => "right_alt",
        KeyCode::KEY_LEFTSHIFT => "left_shift",
        KeyCode::KEY_RIGHTSHIFT => "right_shift",
        KeyCode::KEY_LEFTMETA => "left_super",
        KeyCode::KEY_RIGHTMETA => "right_super",

        // Специальные клавиши
        KeyCode::KEY_SPACE => "space",
        KeyCode::KEY_TAB => "tab",
        KeyCode::KEY_BACKSPACE => "backspace",
        KeyCode::KEY_HOME => "home",
        KeyCode::KEY_END => "end",
        KeyCode::KEY_PAGEUP => "page_up",
        KeyCode::KEY_PAGEDOWN => "page_down",

        // Кнопки мыши
        KeyCode::BTN_LEFT => "btn_left",
        KeyCode::BTN_RIGHT => "btn_right",
        KeyCode::BTN_MIDDLE => "btn_middle",
        KeyCode::BTN_SIDE => "btn_side",
        KeyCode::BTN_EXTRA => "btn_extra",
        _ => return None,
    };

    Some(name)
}
