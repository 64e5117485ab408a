use crate::debug_if_enabled;
use crate::events::{Decision, KeyEvent, KeyState, NavInput, Reaction};
use crate::mappings::{classify_key, is_modifier_key};
use crate::services::navigation_session::{Mode, NavigationSession};
use evdev::KeyCode;
use std::collections::HashSet;

use super::modifier_state::ModifierState;

/// EventDispatcher переводит сырые события устройств во входы сессии.
///
/// Автоповтор и отпускание клавиши поглощаются ровно тогда, когда было
/// поглощено её нажатие, даже если режим сессии с тех пор сменился.
pub struct EventDispatcher {
    session: NavigationSession,
    modifier_state: ModifierState,
    swallowed: HashSet<u16>,
}

impl EventDispatcher {
    pub fn new(session: NavigationSession) -> Self {
        Self {
            session,
            modifier_state: ModifierState::new(),
            swallowed: HashSet::new(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    /// Событие клавиатуры: решение и, возможно, отложенная проверка
    pub fn on_key(&mut self, key_code: KeyCode, state: KeyState) -> (KeyEvent, Reaction) {
        self.modifier_state.update_key(key_code, state.is_down());
        let event = KeyEvent::new(key_code, state, self.modifier_state.to_modifiers());
        let code = key_code.code();

        if !state.is_down() {
            let decision = if self.swallowed.remove(&code) {
                Decision::Swallow
            } else {
                Decision::Forward
            };
            debug_if_enabled!("Отпускание {}: {:?}", event, decision);
            return (event, Reaction { decision, defer: None });
        }

        if is_modifier_key(key_code) {
            return (event, Reaction::forward());
        }

        if state == KeyState::Repeat {
            return self.on_repeat(key_code, event);
        }

        let reaction = match classify_key(key_code, event.modifiers) {
            Some(input) => self.session.intercept(input),
            None => Reaction::forward(),
        };

        if reaction.decision.is_swallow() {
            self.swallowed.insert(code);
        } else {
            self.swallowed.remove(&code);
        }

        debug_if_enabled!("Нажатие {}: {:?}", event, reaction.decision);
        (event, reaction)
    }

    /// Автоповтор наследует решение своего нажатия
    fn on_repeat(&mut self, key_code: KeyCode, event: KeyEvent) -> (KeyEvent, Reaction) {
        let held_swallowed = self.swallowed.contains(&key_code.code());

        let reaction = match classify_key(key_code, event.modifiers) {
            // Поглощённая стрелка двигает курсор, пока режим активен
            Some(input @ NavInput::DirectionKey(_))
                if held_swallowed && self.session.mode() == Mode::Active =>
            {
                self.session.intercept(input)
            }
            _ if held_swallowed => Reaction::swallow(),
            Some(NavInput::DirectionKey(_) | NavInput::ConfirmKey) | None => Reaction::forward(),
            Some(input) => self.session.intercept(input),
        };

        debug_if_enabled!("Повтор {}: {:?}", event, reaction.decision);
        (event, reaction)
    }

    /// Нажатие кнопки мыши: события указателя всегда проходят дальше
    pub fn on_pointer_button(&mut self, button: u16) -> Reaction {
        self.session.intercept(NavInput::PointerButtonDown(button))
    }

    pub fn on_deferred(&mut self) {
        self.session.on_deferred();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Point, WindowInfo};
    use crate::services::pointer::PointerActuator;
    use crate::services::window_snapshot::test_support::MockBackend;
    use crate::services::window_snapshot::{FocusResolver, WindowSnapshotProvider};
    use std::sync::Arc;

    struct NullPointer;

    impl PointerActuator for NullPointer {
        fn move_to(&mut self, _point: Point) {}
        fn click(&mut self, _point: Point) {}
    }

    fn dispatcher() -> EventDispatcher {
        dispatcher_with(vec![
            MockBackend::centered("a", 100, 100),
            MockBackend::centered("b", 300, 100),
        ])
    }

    fn dispatcher_with(windows: Vec<WindowInfo>) -> EventDispatcher {
        let backend = Arc::new(MockBackend::with_windows(windows));
        backend.focus(Some("a"));
        let session = NavigationSession::new(
            WindowSnapshotProvider::new(backend.clone()),
            FocusResolver::new(backend),
            Box::new(NullPointer),
        );
        EventDispatcher::new(session)
    }

    fn decision(d: &mut EventDispatcher, key: KeyCode, state: KeyState) -> Decision {
        d.on_key(key, state).1.decision
    }

    /// Ctrl+Up, отпускание клавиш и срабатывание отложенной проверки
    fn activate(d: &mut EventDispatcher) {
        assert_eq!(decision(d, KeyCode::KEY_LEFTCTRL, KeyState::Pressed), Decision::Forward);
        let (event, reaction) = d.on_key(KeyCode::KEY_UP, KeyState::Pressed);
        assert!(event.modifiers.ctrl);
        assert_eq!(reaction.decision, Decision::Forward);
        assert!(reaction.defer.is_some());
        assert_eq!(decision(d, KeyCode::KEY_UP, KeyState::Released), Decision::Forward);
        assert_eq!(decision(d, KeyCode::KEY_LEFTCTRL, KeyState::Released), Decision::Forward);
        d.on_deferred();
        assert_eq!(d.session().mode(), Mode::Active);
    }

    #[test]
    fn test_up_without_ctrl_is_plain_direction() {
        let mut d = dispatcher();
        let (_, reaction) = d.on_key(KeyCode::KEY_UP, KeyState::Pressed);
        assert_eq!(reaction, Reaction::forward());
    }

    #[test]
    fn test_swallowed_press_swallows_release() {
        let mut d = dispatcher();
        activate(&mut d);

        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Pressed), Decision::Swallow);
        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Repeat), Decision::Swallow);
        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Released), Decision::Swallow);
        assert_eq!(d.session().cursor_position(), Some(Point::new(300.0, 100.0)));

        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Pressed), Decision::Swallow);
        assert_eq!(d.session().mode(), Mode::Idle);
        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Released), Decision::Swallow);
    }

    #[test]
    fn test_forwarded_press_forwards_release() {
        let mut d = dispatcher();
        activate(&mut d);

        // Esc выходит из режима и сам проходит дальше
        assert_eq!(decision(&mut d, KeyCode::KEY_ESC, KeyState::Pressed), Decision::Forward);
        assert_eq!(decision(&mut d, KeyCode::KEY_ESC, KeyState::Released), Decision::Forward);
        assert_eq!(d.session().mode(), Mode::Idle);
    }

    #[test]
    fn test_release_after_mode_change_stays_paired() {
        let mut d = dispatcher();
        activate(&mut d);

        // Стрелка поглощена в активном режиме, затем Esc, затем отпускание стрелки
        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Pressed), Decision::Swallow);
        assert_eq!(decision(&mut d, KeyCode::KEY_ESC, KeyState::Pressed), Decision::Forward);
        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Released), Decision::Swallow);
        // Повторное нажатие в Idle проходит, и отпускание тоже
        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Pressed), Decision::Forward);
        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Released), Decision::Forward);
    }

    #[test]
    fn test_modifiers_do_not_end_navigation() {
        let mut d = dispatcher();
        activate(&mut d);

        assert_eq!(decision(&mut d, KeyCode::KEY_LEFTSHIFT, KeyState::Pressed), Decision::Forward);
        assert_eq!(decision(&mut d, KeyCode::KEY_LEFTSHIFT, KeyState::Released), Decision::Forward);
        assert_eq!(d.session().mode(), Mode::Active);

        assert_eq!(decision(&mut d, KeyCode::KEY_A, KeyState::Pressed), Decision::Forward);
        assert_eq!(d.session().mode(), Mode::Idle);
    }

    #[test]
    fn test_pointer_button_forwarded_and_ends_navigation() {
        let mut d = dispatcher();
        activate(&mut d);

        assert_eq!(d.on_pointer_button(0x111), Reaction::forward());
        assert_eq!(d.session().mode(), Mode::Idle);
    }

    #[test]
    fn test_held_confirm_key_stays_swallowed() {
        let mut d = dispatcher();
        activate(&mut d);

        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Pressed), Decision::Swallow);
        assert_eq!(d.session().mode(), Mode::Idle);
        // Enter удерживается после клика: повторы и отпускание не доходят до окна
        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Repeat), Decision::Swallow);
        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Repeat), Decision::Swallow);
        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Released), Decision::Swallow);
        assert_eq!(d.session().mode(), Mode::Idle);

        // Следующее нажатие уже обычное
        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Pressed), Decision::Forward);
        assert_eq!(decision(&mut d, KeyCode::KEY_ENTER, KeyState::Released), Decision::Forward);
    }

    #[test]
    fn test_held_arrow_after_pointer_button_stays_swallowed() {
        let mut d = dispatcher();
        activate(&mut d);

        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Pressed), Decision::Swallow);
        assert_eq!(d.on_pointer_button(0x110), Reaction::forward());
        assert_eq!(d.session().mode(), Mode::Idle);

        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Repeat), Decision::Swallow);
        assert_eq!(decision(&mut d, KeyCode::KEY_LEFT, KeyState::Released), Decision::Swallow);
    }

    #[test]
    fn test_held_arrow_keeps_jumping() {
        let mut d = dispatcher_with(vec![
            MockBackend::centered("a", 100, 100),
            MockBackend::centered("b", 300, 100),
            MockBackend::centered("c", 500, 100),
        ]);
        activate(&mut d);

        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Pressed), Decision::Swallow);
        assert_eq!(d.session().cursor_position(), Some(Point::new(300.0, 100.0)));
        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Repeat), Decision::Swallow);
        assert_eq!(d.session().cursor_position(), Some(Point::new(500.0, 100.0)));
        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Released), Decision::Swallow);
    }

    #[test]
    fn test_forwarded_arrow_repeat_stays_forwarded() {
        let mut d = dispatcher();

        // Стрелка нажата до активации и удерживается
        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Pressed), Decision::Forward);
        activate(&mut d);

        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Repeat), Decision::Forward);
        assert_eq!(d.session().cursor_position(), Some(Point::new(100.0, 100.0)));
        assert_eq!(decision(&mut d, KeyCode::KEY_RIGHT, KeyState::Released), Decision::Forward);
        assert_eq!(d.session().mode(), Mode::Active);
    }
}
