mod deferred;
mod dispatcher;
mod interceptor;
mod modifier_state;
mod r#trait;

pub use self::dispatcher::EventDispatcher;
pub use self::r#trait::{create_input_interceptor, InputInterceptorTrait};
