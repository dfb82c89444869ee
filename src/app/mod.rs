pub mod config;
pub mod error;

use crate::window::glfw_runtime;

use config::HostConfig;
use error::AppError;

/// The program takes no arguments; everything comes from the defaults.
pub fn run_from_env() -> Result<(), AppError> {
    run(HostConfig::default())
}

pub fn run(config: HostConfig) -> Result<(), AppError> {
    config.validate()?;
    glfw_runtime::run(&config.window, config.render_settings())
}
