pub mod keyboard;
pub mod navigation;
pub mod window;

pub use keyboard::{KeyEvent, KeyState, Modifiers};
pub use navigation::{Decision, Direction, NavInput, Reaction};
pub use window::{Point, Window, WindowGeometry, WindowId, WindowInfo, WindowLayer};
