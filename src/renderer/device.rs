use std::fmt;

/// Driver-issued buffer object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Driver-issued vertex array object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexArrayHandle(pub u32);

/// Driver-issued shader stage object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// Driver-issued program object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

impl fmt::Display for ProgramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

/// Upload frequency hint forwarded to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
}

/// The GPU command surface the renderer consumes.
///
/// The model is bind-then-operate: `buffer_data_f32` writes into the buffer
/// last passed to `bind_array_buffer`, and `vertex_attrib_pointer_f32`
/// records that buffer into the vertex array last passed to
/// `bind_vertex_array`. Every call must happen on the thread that owns the
/// context.
pub trait GpuDevice {
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_color_buffer(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    fn create_buffer(&self) -> BufferHandle;
    fn bind_array_buffer(&self, buffer: BufferHandle);
    fn buffer_data_f32(&self, data: &[f32], usage: BufferUsage);
    fn delete_buffer(&self, buffer: BufferHandle);

    fn create_vertex_array(&self) -> VertexArrayHandle;
    fn bind_vertex_array(&self, vao: VertexArrayHandle);
    /// `stride` and `offset` are in bytes.
    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: usize);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn delete_vertex_array(&self, vao: VertexArrayHandle);

    fn create_shader(&self, stage: ShaderStage) -> ShaderHandle;
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    fn compile_shader(&self, shader: ShaderHandle);
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;
    fn shader_info_log(&self, shader: ShaderHandle) -> String;
    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> ProgramHandle;
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&self, program: ProgramHandle);
    fn program_link_status(&self, program: ProgramHandle) -> bool;
    fn program_info_log(&self, program: ProgramHandle) -> String;
    fn use_program(&self, program: ProgramHandle);
    fn delete_program(&self, program: ProgramHandle);

    fn draw_triangles(&self, first: i32, count: i32);
}
