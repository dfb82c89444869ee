pub mod device;
pub mod geometry;
pub mod gl_device;
pub mod registry;
pub mod render_host;
pub mod shader_program;

#[cfg(test)]
pub(crate) mod testing;

pub use device::GpuDevice;
pub use render_host::{RenderHost, RenderSettings};
pub use shader_program::{ScopedProgram, ShaderProgram};
