use crate::events::Point;
use tracing::info;

use super::r#trait::PointerActuator;

pub struct DryRunPointer;

impl DryRunPointer {
    pub fn new() -> Self {
        info!("Инициализация DryRunPointer");
        Self
    }
}

impl PointerActuator for DryRunPointer {
    fn move_to(&mut self, point: Point) {
        info!("[DRY RUN] Перемещение указателя в {}", point);
    }

    fn click(&mut self, point: Point) {
        info!("[DRY RUN] Клик в {}", point);
    }
}
