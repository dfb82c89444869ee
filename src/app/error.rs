use thiserror::Error;

use crate::app::config::ConfigError;
use crate::renderer::render_host::HostError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Window(String),
    #[error(transparent)]
    Host(#[from] HostError),
}
