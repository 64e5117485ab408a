use crate::error::Result;
use crate::events::{WindowGeometry, WindowId, WindowInfo};

use super::r#trait::WindowBackend;
use super::wmctrl::Wmctrl;
use super::xdotool::Xdotool;

/// X11 (в том числе KDE/GNOME на X11): список окон через wmctrl, фокус через xdotool
pub struct X11Backend {
    wmctrl: Wmctrl,
    xdotool: Xdotool,
}

impl X11Backend {
    pub fn new() -> Self {
        Self {
            wmctrl: Wmctrl::new(),
            xdotool: Xdotool::new(),
        }
    }
}

impl WindowBackend for X11Backend {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn probe(&self) -> Result<()> {
        self.wmctrl.test()?;
        self.xdotool.test()
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        self.wmctrl.list_windows()
    }

    fn focused_window(&self) -> Result<Option<WindowId>> {
        self.xdotool.get_active_window()
    }

    fn desktop_bounds(&self) -> Result<Option<WindowGeometry>> {
        self.xdotool.display_geometry()
    }
}
