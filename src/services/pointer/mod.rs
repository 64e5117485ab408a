mod dry_run;
mod r#trait;
mod virtual_pointer;

pub use self::r#trait::{create_pointer_actuator, PointerActuator};
