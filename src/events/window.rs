use serde::{Deserialize, Serialize};
use std::fmt;

/// Точка в экранных координатах
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Непрозрачный идентификатор окна.
///
/// Бэкенд нормализует формат так, чтобы id из списка окон и id окна
/// в фокусе совпадали посимвольно.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Геометрия окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Наименьший прямоугольник, содержащий оба
    pub fn union(&self, other: &WindowGeometry) -> WindowGeometry {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x as i64 + self.width as i64).max(other.x as i64 + other.width as i64);
        let bottom = (self.y as i64 + self.height as i64).max(other.y as i64 + other.height as i64);
        WindowGeometry {
            x: left,
            y: top,
            width: (right - left as i64) as u32,
            height: (bottom - top as i64) as u32,
        }
    }
}

/// Слой, на котором отрисовано окно
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowLayer {
    /// Обычные окна приложений
    Normal,
    /// Панели, доки, окна "на всех рабочих столах"
    Panel,
    /// Меню, всплывающие подсказки, оверлеи
    Overlay,
}

/// Сырая запись об окне, как её отдаёт бэкенд
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub pid: Option<u32>,
    pub layer: WindowLayer,
    /// Окно принадлежит обычному приложению (не служебному процессу)
    pub regular: bool,
    pub geometry: WindowGeometry,
    pub title: String,
}

impl WindowInfo {
    pub fn new(id: WindowId, geometry: WindowGeometry) -> Self {
        Self {
            id,
            pid: None,
            layer: WindowLayer::Normal,
            regular: true,
            geometry,
            title: String::new(),
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_layer(mut self, layer: WindowLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_regular(mut self, regular: bool) -> Self {
        self.regular = regular;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} \"{}\"", self.id, self.title)
        }
    }
}

/// Подходящее для навигации окно: только id и центр
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub center: Point,
}

impl Window {
    pub fn new(id: WindowId, center: Point) -> Self {
        Self { id, center }
    }
}
