pub mod input_interceptor;
pub mod navigation_session;
pub mod nearest_window;
pub mod pointer;
pub mod virtual_keyboard;
pub mod window_backend;
pub mod window_snapshot;

pub use input_interceptor::{create_input_interceptor, EventDispatcher};
pub use navigation_session::NavigationSession;
pub use pointer::create_pointer_actuator;
pub use window_backend::create_window_backend;
pub use window_snapshot::{FocusResolver, WindowSnapshotProvider};
