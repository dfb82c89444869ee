use std::mem::size_of_val;
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;

use crate::renderer::device::{
    BufferHandle, BufferUsage, GpuDevice, ProgramHandle, ShaderHandle, ShaderStage,
    VertexArrayHandle,
};

/// OpenGL 3.3 core implementation of [`GpuDevice`].
///
/// Function pointers are process-global in the `gl` crate, so this type only
/// exists as proof that `load_with` ran against a current context.
pub struct GlDevice {
    _loaded: (),
}

impl GlDevice {
    /// Loads GL entry points through `loader`. The context the loader belongs
    /// to must be current on the calling thread.
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self { _loaded: () }
    }
}

fn usage_hint(usage: BufferUsage) -> GLenum {
    match usage {
        BufferUsage::StaticDraw => gl::STATIC_DRAW,
        BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
    }
}

fn stage_kind(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn info_log_to_string(mut info_log: Vec<u8>, written: GLsizei) -> String {
    info_log.truncate(written.max(0) as usize);
    let message = String::from_utf8_lossy(&info_log);
    message.trim_matches('\0').trim_end().to_string()
}

impl GpuDevice for GlDevice {
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn create_buffer(&self) -> BufferHandle {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        BufferHandle(id)
    }

    fn bind_array_buffer(&self, buffer: BufferHandle) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer.0) }
    }

    fn buffer_data_f32(&self, data: &[f32], usage: BufferUsage) {
        let size = size_of_val(data) as GLsizeiptr;
        let data_ptr = if data.is_empty() {
            ptr::null()
        } else {
            data.as_ptr() as *const c_void
        };

        unsafe { gl::BufferData(gl::ARRAY_BUFFER, size, data_ptr, usage_hint(usage)) }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) }
    }

    fn create_vertex_array(&self) -> VertexArrayHandle {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        VertexArrayHandle(id)
    }

    fn bind_vertex_array(&self, vao: VertexArrayHandle) {
        unsafe { gl::BindVertexArray(vao.0) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn delete_vertex_array(&self, vao: VertexArrayHandle) {
        unsafe { gl::DeleteVertexArrays(1, &vao.0) }
    }

    fn create_shader(&self, stage: ShaderStage) -> ShaderHandle {
        ShaderHandle(unsafe { gl::CreateShader(stage_kind(stage)) })
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        // Explicit length, so the source does not need a trailing NUL.
        let source_ptr = source.as_ptr() as *const GLchar;
        let length = source.len() as GLint;
        unsafe { gl::ShaderSource(shader.0, 1, &source_ptr, &length) }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        unsafe { gl::CompileShader(shader.0) }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        let mut length: GLint = 0;
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut length);
            let mut info_log = vec![0_u8; length.max(1) as usize];
            gl::GetShaderInfoLog(
                shader.0,
                info_log.len() as GLsizei,
                &mut written,
                info_log.as_mut_ptr() as *mut GLchar,
            );
            info_log_to_string(info_log, written)
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { gl::DeleteShader(shader.0) }
    }

    fn create_program(&self) -> ProgramHandle {
        ProgramHandle(unsafe { gl::CreateProgram() })
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { gl::AttachShader(program.0, shader.0) }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { gl::DetachShader(program.0, shader.0) }
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe { gl::LinkProgram(program.0) }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        let mut length: GLint = 0;
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut length);
            let mut info_log = vec![0_u8; length.max(1) as usize];
            gl::GetProgramInfoLog(
                program.0,
                info_log.len() as GLsizei,
                &mut written,
                info_log.as_mut_ptr() as *mut GLchar,
            );
            info_log_to_string(info_log, written)
        }
    }

    fn use_program(&self, program: ProgramHandle) {
        unsafe { gl::UseProgram(program.0) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { gl::DeleteProgram(program.0) }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) }
    }
}
