pub mod device_finder;
pub mod notify;
pub mod permissions;
pub mod single_instance;

pub use device_finder::DeviceFinder;

// Условное логирование на горячем пути: аргументы не форматируются, если DEBUG выключен
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
