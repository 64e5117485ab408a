use evdev::KeyCode;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mappings::key_name;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    /// Значение поля value у evdev события EV_KEY
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            KeyState::Released => 0,
            KeyState::Pressed => 1,
            KeyState::Repeat => 2,
        }
    }

    /// Нажатие или автоповтор: для сессии оба считаются key-down
    pub fn is_down(&self) -> bool {
        !matches!(self, KeyState::Released)
    }
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    pub fn to_vec(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.ctrl { result.push("ctrl"); }
        if self.alt { result.push("alt"); }
        if self.shift { result.push("shift"); }
        if self.super_key { result.push("super"); }
        result
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Событие клавиатуры, снятое с захваченного устройства
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            state,
            modifiers,
        }
    }

    /// Получить читаемый идентификатор комбинации клавиш
    pub fn combination_id(&self) -> String {
        let name = key_name(self.key_code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}", self.key_code.code()));
        if self.modifiers.is_empty() {
            name
        } else {
            format!("{}+{}", self.modifiers, name)
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.combination_id(), self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state_from_value() {
        assert_eq!(KeyState::from_value(0), Some(KeyState::Released));
        assert_eq!(KeyState::from_value(1), Some(KeyState::Pressed));
        assert_eq!(KeyState::from_value(2), Some(KeyState::Repeat));
        assert_eq!(KeyState::from_value(7), None);

        assert!(KeyState::Pressed.is_down());
        assert!(KeyState::Repeat.is_down());
        assert!(!KeyState::Released.is_down());
    }

    #[test]
    fn test_modifiers_display() {
        assert_eq!(Modifiers::new().to_string(), "none");
        assert_eq!(
            Modifiers::new().with_ctrl(true).with_alt(true).to_string(),
            "ctrl+alt"
        );
    }

    #[test]
    fn test_key_event_combination_id() {
        let plain = KeyEvent::new(KeyCode::KEY_LEFT, KeyState::Pressed, Modifiers::new());
        let chord = KeyEvent::new(
            KeyCode::KEY_UP,
            KeyState::Pressed,
            Modifiers::new().with_ctrl(true),
        );

        assert_eq!(plain.combination_id(), "left");
        assert_eq!(chord.combination_id(), "ctrl+up");
    }
}
