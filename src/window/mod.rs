//! Contracts between the render host and the platform event loop.

pub mod glfw_runtime;
pub mod input;

/// Keys the host reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F11,
}

/// Display mode of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

impl WindowState {
    /// Fullscreen goes back to `Normal`, every other state goes fullscreen.
    pub fn toggled_fullscreen(self) -> Self {
        match self {
            WindowState::Fullscreen => WindowState::Normal,
            _ => WindowState::Fullscreen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

/// Keyboard queries available during an update.
pub trait Input {
    /// Level-triggered: true for every frame the key is held.
    fn is_key_down(&self, key: Key) -> bool;
    /// Edge-triggered: true only on the frame the key went down.
    fn is_key_pressed(&self, key: Key) -> bool;
}

/// Window operations the host may request.
pub trait WindowControl {
    fn request_close(&mut self);
    fn window_state(&self) -> WindowState;
    fn set_window_state(&mut self, state: WindowState);
    /// Shows the frame rendered since the previous call.
    fn present(&mut self);
}

/// Callbacks an event loop drives, strictly in this order:
/// `on_load` once, then any number of update/render/resize calls, then
/// `on_unload` once.
pub trait Lifecycle {
    type Error: std::error::Error + 'static;

    fn on_load(&mut self) -> Result<(), Self::Error>;
    fn on_update_frame(&mut self, input: &dyn Input, window: &mut dyn WindowControl);
    fn on_render_frame(&mut self, window: &mut dyn WindowControl);
    fn on_framebuffer_resize(&mut self, width: i32, height: i32);
    fn on_unload(&mut self);
}
