use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Направление перемещения виртуального курсора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Перехваченное событие, уже классифицированное для сессии навигации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    ActivationChord,
    DirectionKey(Direction),
    ConfirmKey,
    CancelKey,
    OtherKey,
    /// Нажатие любой кнопки мыши (код кнопки evdev)
    PointerButtonDown(u16),
}

/// Решение перехватчика по событию
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forward,
    Swallow,
}

impl Decision {
    pub fn is_swallow(self) -> bool {
        self == Decision::Swallow
    }
}

/// Ответ сессии: решение по событию и, возможно, отложенная проверка активации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    pub decision: Decision,
    pub defer: Option<Duration>,
}

impl Reaction {
    pub fn forward() -> Self {
        Self {
            decision: Decision::Forward,
            defer: None,
        }
    }

    pub fn swallow() -> Self {
        Self {
            decision: Decision::Swallow,
            defer: None,
        }
    }

    pub fn with_deferred(mut self, delay: Duration) -> Self {
        self.defer = Some(delay);
        self
    }
}
