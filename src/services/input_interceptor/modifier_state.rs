use crate::events::Modifiers;
use evdev::KeyCode;

#[derive(Debug, Default)]
pub struct ModifierState {
    ctrl_left: bool,
    ctrl_right: bool,
    alt: bool,
    shift: bool,
    super_key: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl_left || self.ctrl_right,
            alt: self.alt,
            shift: self.shift,
            super_key: self.super_key,
        }
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KEY_LEFTCTRL => self.ctrl_left = pressed,
            KeyCode::KEY_RIGHTCTRL => self.ctrl_right = pressed,
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => self.alt = pressed,
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => self.shift = pressed,
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => self.super_key = pressed,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_ctrl_keys_tracked_separately() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_LEFTCTRL, true);
        state.update_key(KeyCode::KEY_RIGHTCTRL, true);
        state.update_key(KeyCode::KEY_LEFTCTRL, false);
        assert!(state.to_modifiers().ctrl);

        state.update_key(KeyCode::KEY_RIGHTCTRL, false);
        assert!(state.to_modifiers().is_empty());
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_A, true);
        assert!(state.to_modifiers().is_empty());
    }
}
