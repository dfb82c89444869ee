use std::path::PathBuf;

use thiserror::Error;

use crate::renderer::device::{BufferUsage, GpuDevice};
use crate::renderer::geometry::{AttributeLayout, GeometryBuffer, TRIANGLE_VERTICES};
use crate::renderer::shader_program::{ShaderError, ShaderProgram};
use crate::window::{Input, Key, Lifecycle, WindowControl};

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub clear_color: [f32; 4],
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

/// Owns the triangle's GPU resources and answers the event loop's
/// lifecycle callbacks.
pub struct RenderHost<D: GpuDevice> {
    device: D,
    settings: RenderSettings,
    geometry: Option<GeometryBuffer>,
    layout: Option<AttributeLayout>,
    program: Option<ShaderProgram>,
    close_requested: bool,
}

impl<D: GpuDevice> RenderHost<D> {
    pub fn new(device: D, settings: RenderSettings) -> Self {
        Self {
            device,
            settings,
            geometry: None,
            layout: None,
            program: None,
            close_requested: false,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn program(&self) -> Option<&ShaderProgram> {
        self.program.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.program.is_some()
    }
}

impl<D: GpuDevice> Lifecycle for RenderHost<D> {
    type Error = HostError;

    fn on_load(&mut self) -> Result<(), HostError> {
        if self.is_loaded() {
            log::warn!("render host already loaded, ignoring");
            return Ok(());
        }

        let [r, g, b, a] = self.settings.clear_color;
        self.device.clear_color(r, g, b, a);

        let mut geometry =
            GeometryBuffer::upload(&self.device, &TRIANGLE_VERTICES, BufferUsage::StaticDraw);

        let program = match ShaderProgram::from_files(
            &self.device,
            &self.settings.vertex_shader,
            &self.settings.fragment_shader,
        ) {
            Ok(program) => program,
            Err(error) => {
                geometry.release(&self.device);
                return Err(error.into());
            }
        };

        let layout = AttributeLayout::bind_positions(&self.device, &geometry);
        program.activate(&self.device);

        if !program.is_usable() {
            log::warn!(
                "shader program is not usable; frames will render without geometry output"
            );
        }
        log::info!(
            "loaded {} vertices with {}",
            geometry.vertex_count(),
            program.handle()
        );

        self.geometry = Some(geometry);
        self.layout = Some(layout);
        self.program = Some(program);
        Ok(())
    }

    fn on_update_frame(&mut self, input: &dyn Input, window: &mut dyn WindowControl) {
        if input.is_key_down(Key::Escape) && !self.close_requested {
            log::info!("close requested");
            window.request_close();
            self.close_requested = true;
        }

        if input.is_key_pressed(Key::F11) {
            let state = window.window_state().toggled_fullscreen();
            log::debug!("switching window to {:?}", state);
            window.set_window_state(state);
        }
    }

    fn on_render_frame(&mut self, window: &mut dyn WindowControl) {
        self.device.clear_color_buffer();

        if let (Some(program), Some(layout), Some(geometry)) =
            (&self.program, &self.layout, &self.geometry)
        {
            program.activate(&self.device);
            layout.bind(&self.device);
            self.device.draw_triangles(0, geometry.vertex_count());
        }

        window.present();
    }

    fn on_framebuffer_resize(&mut self, width: i32, height: i32) {
        self.device.viewport(0, 0, width, height);
    }

    fn on_unload(&mut self) {
        if let Some(mut program) = self.program.take() {
            program.dispose(&self.device);
        }
        if let Some(mut layout) = self.layout.take() {
            layout.release(&self.device);
        }
        if let Some(mut geometry) = self.geometry.take() {
            geometry.release(&self.device);
        }
        log::info!("render host unloaded");
    }
}
