use crate::config::Config;
use crate::error::Result;

use super::dispatcher::EventDispatcher;
use super::interceptor::InputInterceptor;

/// Trait for input interceptors that feed device events into the navigation session
#[async_trait::async_trait]
pub trait InputInterceptorTrait {
    /// Run the interception loop until the task is aborted or the keyboard goes away
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create the input interceptor based on the dry_run flag.
///
/// In dry-run mode the keyboard is read without an exclusive grab and no
/// uinput devices are created.
pub fn create_input_interceptor(
    config: &Config,
    dispatcher: EventDispatcher,
    dry_run: bool,
) -> Result<Box<dyn InputInterceptorTrait + Send>> {
    Ok(Box::new(InputInterceptor::new(config, dispatcher, dry_run)?))
}
