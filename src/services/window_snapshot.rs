use crate::events::{Window, WindowId, WindowInfo, WindowLayer};
use crate::services::window_backend::WindowBackend;
use std::sync::Arc;
use tracing::{debug, warn};

/// Минимальная ширина и высота подходящего окна (отсекает служебные полоски)
pub const MIN_WINDOW_DIMENSION: u32 = 50;

/// Окно обычного приложения, на обычном слое и не слишком маленькое
pub fn is_eligible(window: &WindowInfo) -> bool {
    window.layer == WindowLayer::Normal
        && window.regular
        && window.geometry.width > MIN_WINDOW_DIMENSION
        && window.geometry.height > MIN_WINDOW_DIMENSION
}

/// WindowSnapshotProvider отдаёт свежий список подходящих окон.
///
/// Каждый вызов заново спрашивает бэкенд: ничего не кэшируется между шагами
/// навигации. Ошибки бэкенда превращаются в пустой список.
#[derive(Clone)]
pub struct WindowSnapshotProvider {
    backend: Arc<dyn WindowBackend>,
}

impl WindowSnapshotProvider {
    pub fn new(backend: Arc<dyn WindowBackend>) -> Self {
        Self { backend }
    }

    /// Подходящие окна, отсортированные по id
    pub fn list(&self) -> Vec<Window> {
        let raw = match self.backend.list_windows() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Не удалось получить список окон ({}): {}", self.backend.name(), e);
                return Vec::new();
            }
        };

        let total = raw.len();
        let mut windows: Vec<Window> = raw
            .into_iter()
            .filter(is_eligible)
            .map(|w| Window::new(w.id, w.geometry.center()))
            .collect();

        // Порядок перечисления у ОС не стабилен; сортировка делает выбор при равенстве детерминированным
        windows.sort_by(|a, b| a.id.cmp(&b.id));

        debug!("Подходящих окон: {} из {}", windows.len(), total);
        windows
    }

    /// Текущий центр окна с данным id, если оно всё ещё подходит
    pub fn find(&self, id: &WindowId) -> Option<Window> {
        self.list().into_iter().find(|w| &w.id == id)
    }
}

/// FocusResolver: id окна в фокусе или `None`, если определить нельзя
#[derive(Clone)]
pub struct FocusResolver {
    backend: Arc<dyn WindowBackend>,
}

impl FocusResolver {
    pub fn new(backend: Arc<dyn WindowBackend>) -> Self {
        Self { backend }
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        match self.backend.focused_window() {
            Ok(id) => id,
            Err(e) => {
                warn!("Не удалось определить окно в фокусе ({}): {}", self.backend.name(), e);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::error::{NavError, Result};
    use crate::events::{WindowGeometry, WindowId, WindowInfo};
    use crate::services::window_backend::WindowBackend;
    use std::sync::Mutex;

    /// Тестовый бэкенд с заранее заданными окнами
    #[derive(Default)]
    pub struct MockBackend {
        pub windows: Mutex<Vec<WindowInfo>>,
        pub focused: Mutex<Option<WindowId>>,
        pub fail: bool,
    }

    impl MockBackend {
        /// Окно 200x200 с центром в (cx, cy)
        pub fn centered(id: &str, cx: i32, cy: i32) -> WindowInfo {
            WindowInfo::new(WindowId::new(id), WindowGeometry::new(cx - 100, cy - 100, 200, 200))
                .with_pid(1000)
        }

        pub fn with_windows(windows: Vec<WindowInfo>) -> Self {
            Self {
                windows: Mutex::new(windows),
                ..Default::default()
            }
        }

        pub fn focus(&self, id: Option<&str>) {
            *self.focused.lock().unwrap() = id.map(WindowId::new);
        }
    }

    impl WindowBackend for MockBackend {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn probe(&self) -> Result<()> {
            Ok(())
        }

        fn list_windows(&self) -> Result<Vec<WindowInfo>> {
            if self.fail {
                return Err(NavError::ServiceUnavailable("mock".into()));
            }
            Ok(self.windows.lock().unwrap().clone())
        }

        fn focused_window(&self) -> Result<Option<WindowId>> {
            if self.fail {
                return Err(NavError::ServiceUnavailable("mock".into()));
            }
            Ok(self.focused.lock().unwrap().clone())
        }
    }
}
