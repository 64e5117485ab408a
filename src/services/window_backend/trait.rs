use crate::error::Result;
use crate::events::{WindowGeometry, WindowId, WindowInfo};

/// Trait for window backends that query the compositor / X server on demand.
///
/// Every call reflects the current OS state; implementations never cache.
pub trait WindowBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Cheap check that the backend works in the current session
    fn probe(&self) -> Result<()>;

    /// Visible top-level windows on the currently shown workspaces
    fn list_windows(&self) -> Result<Vec<WindowInfo>>;

    /// Id of the window holding input focus, `None` when nothing is focused
    fn focused_window(&self) -> Result<Option<WindowId>>;

    /// Bounding box of all outputs
    fn desktop_bounds(&self) -> Result<Option<WindowGeometry>> {
        Ok(None)
    }
}
