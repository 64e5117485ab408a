//! WindowBackend: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for querying the
//! compositor / X server: visible windows with geometry, the focused window
//! and the desktop bounds. They MUST NOT filter windows for navigation or
//! make any navigation decisions. Eligibility lives in WindowSnapshotProvider,
//! movement decisions in NavigationSession.

mod detect;
mod hyprland;
mod kdotool;
mod sway;
mod wmctrl;
mod x11;
mod xdotool;
mod r#trait;

pub use self::detect::create_window_backend;
pub use self::r#trait::WindowBackend;
