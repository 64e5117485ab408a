pub mod key_names;
pub mod nav_keys;

pub use key_names::key_name;
pub use nav_keys::{classify_key, is_modifier_key, is_pointer_button};
