extern crate glfw;

use glfw::fail_on_errors;
use glfw::{Action, Context, WindowEvent, WindowMode};

use crate::app::error::AppError;
use crate::renderer::gl_device::GlDevice;
use crate::renderer::registry;
use crate::renderer::render_host::{RenderHost, RenderSettings};
use crate::window::input::KeyboardState;
use crate::window::{Key, Lifecycle, WindowConfig, WindowControl, WindowState};

/// Bridges [`WindowControl`] requests onto a GLFW window.
struct GlfwWindowControl<'a> {
    glfw: &'a mut glfw::Glfw,
    window: &'a mut glfw::PWindow,
    state: &'a mut WindowState,
    windowed: &'a mut WindowedGeometry,
}

/// Position and size to come back to when leaving fullscreen.
#[derive(Debug, Clone, Copy)]
struct WindowedGeometry {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl WindowControl for GlfwWindowControl<'_> {
    fn request_close(&mut self) {
        self.window.set_should_close(true);
    }

    fn window_state(&self) -> WindowState {
        *self.state
    }

    fn set_window_state(&mut self, state: WindowState) {
        if *self.state == state {
            return;
        }
        if *self.state == WindowState::Fullscreen {
            leave_fullscreen(self.window, *self.windowed);
        }

        match state {
            WindowState::Normal => self.window.restore(),
            WindowState::Minimized => self.window.iconify(),
            WindowState::Maximized => self.window.maximize(),
            WindowState::Fullscreen => {
                let (x, y) = self.window.get_pos();
                let (width, height) = self.window.get_size();
                *self.windowed = WindowedGeometry {
                    x,
                    y,
                    width: width.max(1) as u32,
                    height: height.max(1) as u32,
                };
                if !enter_fullscreen(self.glfw, self.window) {
                    log::warn!("no primary monitor available, staying windowed");
                    return;
                }
            }
        }
        *self.state = state;
    }

    fn present(&mut self) {
        self.window.swap_buffers();
    }
}

fn enter_fullscreen(glfw: &mut glfw::Glfw, window: &mut glfw::PWindow) -> bool {
    glfw.with_primary_monitor(|_, monitor| {
        let Some(monitor) = monitor else {
            return false;
        };
        let Some(mode) = monitor.get_video_mode() else {
            return false;
        };
        window.set_monitor(
            WindowMode::FullScreen(monitor),
            0,
            0,
            mode.width,
            mode.height,
            Some(mode.refresh_rate),
        );
        true
    })
}

fn leave_fullscreen(window: &mut glfw::PWindow, windowed: WindowedGeometry) {
    window.set_monitor(
        WindowMode::Windowed,
        windowed.x,
        windowed.y,
        windowed.width,
        windowed.height,
        None,
    );
}

fn map_key(key: glfw::Key) -> Option<Key> {
    match key {
        glfw::Key::Escape => Some(Key::Escape),
        glfw::Key::F11 => Some(Key::F11),
        _ => None,
    }
}

/// Opens the window, loads GL, and drives a [`RenderHost`] until the window
/// closes.
pub fn run(window_config: &WindowConfig, settings: RenderSettings) -> Result<(), AppError> {
    let mut glfw = glfw::init(fail_on_errors!())
        .map_err(|e| AppError::Window(format!("Failed to initialize GLFW: {}", e)))?;
    glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
        glfw::OpenGlProfileHint::Core,
    ));
    #[cfg(target_os = "macos")]
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));

    let (mut window, events) = glfw
        .create_window(
            window_config.width,
            window_config.height,
            &window_config.title,
            WindowMode::Windowed,
        )
        .ok_or_else(|| AppError::Window("Failed to create GLFW window".to_string()))?;

    window.make_current();
    window.set_key_polling(true);
    window.set_focus_polling(true);
    window.set_framebuffer_size_polling(true);

    let device = GlDevice::load_with(|symbol| {
        glfw.get_proc_address_raw(symbol) as *const _
    });
    log::info!(
        "opened {}x{} window '{}'",
        window_config.width,
        window_config.height,
        window_config.title
    );

    let mut host = RenderHost::new(device, settings);
    host.on_load()?;

    let (framebuffer_width, framebuffer_height) = window.get_framebuffer_size();
    host.on_framebuffer_resize(framebuffer_width, framebuffer_height);

    let mut keyboard = KeyboardState::default();
    let mut state = WindowState::Normal;
    let mut windowed = WindowedGeometry {
        x: 0,
        y: 0,
        width: window_config.width,
        height: window_config.height,
    };

    while !window.should_close() {
        keyboard.begin_frame();
        glfw.poll_events();
        for (_, event) in glfw::flush_messages(&events) {
            match event {
                WindowEvent::Key(key, _, action, _) => {
                    let Some(key) = map_key(key) else {
                        continue;
                    };
                    match action {
                        Action::Press => keyboard.press(key),
                        Action::Release => keyboard.release(key),
                        Action::Repeat => {}
                    }
                }
                WindowEvent::Focus(false) => keyboard.clear(),
                WindowEvent::FramebufferSize(width, height) => {
                    host.on_framebuffer_resize(width, height)
                }
                _ => {}
            }
        }

        let mut control = GlfwWindowControl {
            glfw: &mut glfw,
            window: &mut window,
            state: &mut state,
            windowed: &mut windowed,
        };
        host.on_update_frame(&keyboard, &mut control);
        host.on_render_frame(&mut control);
    }

    host.on_unload();
    let leaked = registry::audit_live_programs();
    if leaked > 0 {
        log::warn!("{} GPU program(s) outlived the render host", leaked);
    }
    Ok(())
}
