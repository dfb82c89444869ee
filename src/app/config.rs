use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::renderer::render_host::RenderSettings;
use crate::window::WindowConfig;

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_TITLE: &str = "Small Engine CS";
pub const DEFAULT_VERTEX_SHADER: &str = "resources/shaders/triangle.vert";
pub const DEFAULT_FRAGMENT_SHADER: &str = "resources/shaders/triangle.frag";
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.1, 0.2, 0.3, 1.0];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("window title must not be empty")]
    EmptyTitle,
    #[error("{label} file does not exist: {path}")]
    Missing { label: &'static str, path: String },
    #[error("{label} path is not a file: {path}")]
    NotAFile { label: &'static str, path: String },
    #[error("{label} file must have .{expected} extension: {path}")]
    Extension {
        label: &'static str,
        expected: &'static str,
        path: String,
    },
    #[error("Failed to open {label} file '{path}': {reason}")]
    Unreadable {
        label: &'static str,
        path: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub window: WindowConfig,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub clear_color: [f32; 4],
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig {
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                title: DEFAULT_TITLE.to_string(),
            },
            vertex_shader: PathBuf::from(DEFAULT_VERTEX_SHADER),
            fragment_shader: PathBuf::from(DEFAULT_FRAGMENT_SHADER),
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

impl HostConfig {
    /// Checks everything that would otherwise fail after the window is up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height, .. } = self.window;
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroSize { width, height });
        }
        if self.window.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        validate_path(&self.vertex_shader, "vert", "vertex shader")?;
        validate_path(&self.fragment_shader, "frag", "fragment shader")?;
        Ok(())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_color: self.clear_color,
            vertex_shader: self.vertex_shader.clone(),
            fragment_shader: self.fragment_shader.clone(),
        }
    }
}

fn validate_path(
    file_path: &Path,
    expected: &'static str,
    label: &'static str,
) -> Result<(), ConfigError> {
    let path = file_path.display().to_string();
    if !file_path.exists() {
        return Err(ConfigError::Missing { label, path });
    }
    if !file_path.is_file() {
        return Err(ConfigError::NotAFile { label, path });
    }

    let has_extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected));
    if !has_extension {
        return Err(ConfigError::Extension {
            label,
            expected,
            path,
        });
    }

    File::open(file_path)
        .map(|_| ())
        .map_err(|error| ConfigError::Unreadable {
            label,
            path,
            reason: error.to_string(),
        })
}
