use crate::error::{NavError, Result};
use crate::events::{Point, WindowGeometry};
use tracing::{debug, info, warn};
use uinput::event::absolute::Position;
use uinput::event::controller::Mouse;
use uinput::event::{Absolute, Controller};

use super::r#trait::PointerActuator;

// Коды событий linux/input-event-codes.h
const EV_SYN: i32 = 0x00;
const EV_KEY: i32 = 0x01;
const EV_ABS: i32 = 0x03;
const SYN_REPORT: i32 = 0x00;
const ABS_X: i32 = 0x00;
const ABS_Y: i32 = 0x01;
const BTN_LEFT: i32 = 0x110;

/// Виртуальный указатель uinput с абсолютными осями на весь рабочий стол
pub struct VirtualPointer {
    device: uinput::Device,
    bounds: WindowGeometry,
}

impl VirtualPointer {
    pub fn new(device_name: &str, bounds: WindowGeometry) -> Result<Self> {
        info!("Создание виртуального указателя uinput '{}'", device_name);

        let (min_x, max_x) = axis_range(bounds.x, bounds.width);
        let (min_y, max_y) = axis_range(bounds.y, bounds.height);

        let device = uinput::default()?
            .name(device_name)?
            .event(Controller::Mouse(Mouse::Left))?
            .event(Absolute::Position(Position::X))?
            .min(min_x)
            .max(max_x)
            .event(Absolute::Position(Position::Y))?
            .min(min_y)
            .max(max_y)
            .create()
            .map_err(|e| {
                NavError::Internal(format!(
                    "Не удалось создать виртуальный указатель '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальный указатель '{}' создан успешно", device_name);
        Ok(Self { device, bounds })
    }

    fn clamp(&self, point: Point) -> (i32, i32) {
        let (min_x, max_x) = axis_range(self.bounds.x, self.bounds.width);
        let (min_y, max_y) = axis_range(self.bounds.y, self.bounds.height);
        (
            (point.x.round() as i32).clamp(min_x, max_x),
            (point.y.round() as i32).clamp(min_y, max_y),
        )
    }

    fn write_position(&mut self, point: Point) -> Result<()> {
        let (x, y) = self.clamp(point);
        self.device.write(EV_ABS, ABS_X, x)?;
        self.device.write(EV_ABS, ABS_Y, y)?;
        self.device.write(EV_SYN, SYN_REPORT, 0)?;
        debug!("Указатель перемещён в ({}, {})", x, y);
        Ok(())
    }

    fn write_button(&mut self, value: i32) -> Result<()> {
        self.device.write(EV_KEY, BTN_LEFT, value)?;
        self.device.write(EV_SYN, SYN_REPORT, 0)?;
        Ok(())
    }

    fn try_click(&mut self, point: Point) -> Result<()> {
        self.write_position(point)?;
        self.write_button(1)?;
        self.write_button(0)?;
        Ok(())
    }
}

/// Диапазон значений оси: [origin, origin + size - 1]
fn axis_range(origin: i32, size: u32) -> (i32, i32) {
    let size = size.max(1).min(i32::MAX as u32) as i32;
    (origin, origin.saturating_add(size - 1))
}

impl PointerActuator for VirtualPointer {
    fn move_to(&mut self, point: Point) {
        if let Err(e) = self.write_position(point) {
            warn!("Не удалось переместить указатель в {}: {}", point, e);
        }
    }

    fn click(&mut self, point: Point) {
        if let Err(e) = self.try_click(point) {
            warn!("Не удалось кликнуть в {}: {}", point, e);
        }
    }
}

impl Drop for VirtualPointer {
    fn drop(&mut self) {
        info!("Закрытие виртуального указателя");
    }
}
