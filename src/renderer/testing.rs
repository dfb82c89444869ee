//! Recording doubles for the GPU and the window.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::renderer::device::{
    BufferHandle, BufferUsage, GpuDevice, ProgramHandle, ShaderHandle, ShaderStage,
    VertexArrayHandle,
};
use crate::window::{WindowControl, WindowState};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ClearColor([f32; 4]),
    Clear,
    Viewport(i32, i32, i32, i32),
    CreateBuffer(BufferHandle),
    BindArrayBuffer(BufferHandle),
    BufferData { floats: usize, usage: BufferUsage },
    DeleteBuffer(BufferHandle),
    CreateVertexArray(VertexArrayHandle),
    BindVertexArray(VertexArrayHandle),
    VertexAttribPointer { index: u32, components: i32, stride: i32, offset: usize },
    EnableVertexAttribArray(u32),
    DeleteVertexArray(VertexArrayHandle),
    CreateShader(ShaderStage, ShaderHandle),
    CompileShader(ShaderHandle),
    DeleteShader(ShaderHandle),
    CreateProgram(ProgramHandle),
    AttachShader(ProgramHandle, ShaderHandle),
    DetachShader(ProgramHandle, ShaderHandle),
    LinkProgram(ProgramHandle),
    UseProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    DrawTriangles { first: i32, count: i32 },
    Present,
    RequestClose,
    SetWindowState(WindowState),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

struct StageObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<ShaderHandle>,
    linked: bool,
    log: String,
}

/// In-memory driver with a toy compiler.
///
/// A stage compiles when it has a `main` entry point and balanced braces.
/// Linking fails when a stage failed to compile or when a fragment `in`
/// has no vertex `out` of the same name.
#[derive(Default)]
pub struct RecordingDevice {
    calls: CallLog,
    next_name: Cell<u32>,
    shaders: RefCell<HashMap<ShaderHandle, StageObject>>,
    programs: RefCell<HashMap<ProgramHandle, ProgramObject>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self {
            calls,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn live_shader_objects(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_program_objects(&self) -> usize {
        self.programs.borrow().len()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> u32 {
        let name = self.next_name.get() + 1;
        self.next_name.set(name);
        name
    }
}

fn toy_compile(source: &str) -> Result<(), String> {
    if !source.contains("void main") {
        return Err("0:1(1): error: missing entry point `main`".to_string());
    }
    let opened = source.matches('{').count();
    let closed = source.matches('}').count();
    if opened != closed {
        return Err("0:1(1): error: syntax error, unexpected end of file".to_string());
    }
    Ok(())
}

fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = match line.trim().find(')') {
                Some(end) if line.trim().starts_with("layout") => &line.trim()[end + 1..],
                _ => line.trim(),
            };
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some(qualifier) {
                return None;
            }
            tokens.last().map(|name| name.trim_end_matches(';').to_string())
        })
        .collect()
}

impl GpuDevice for RecordingDevice {
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn create_buffer(&self) -> BufferHandle {
        let handle = BufferHandle(self.next());
        self.record(Call::CreateBuffer(handle));
        handle
    }

    fn bind_array_buffer(&self, buffer: BufferHandle) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn buffer_data_f32(&self, data: &[f32], usage: BufferUsage) {
        self.record(Call::BufferData {
            floats: data.len(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> VertexArrayHandle {
        let handle = VertexArrayHandle(self.next());
        self.record(Call::CreateVertexArray(handle));
        handle
    }

    fn bind_vertex_array(&self, vao: VertexArrayHandle) {
        self.record(Call::BindVertexArray(vao));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: usize) {
        self.record(Call::VertexAttribPointer {
            index,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn delete_vertex_array(&self, vao: VertexArrayHandle) {
        self.record(Call::DeleteVertexArray(vao));
    }

    fn create_shader(&self, stage: ShaderStage) -> ShaderHandle {
        let handle = ShaderHandle(self.next());
        self.shaders.borrow_mut().insert(
            handle,
            StageObject {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        self.record(Call::CreateShader(stage, handle));
        handle
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        if let Some(object) = self.shaders.borrow_mut().get_mut(&shader) {
            object.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        if let Some(object) = self.shaders.borrow_mut().get_mut(&shader) {
            match toy_compile(&object.source) {
                Ok(()) => {
                    object.compiled = true;
                    object.log.clear();
                }
                Err(log) => {
                    object.compiled = false;
                    object.log = log;
                }
            }
        }
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .map(|object| object.compiled)
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.shaders
            .borrow()
            .get(&shader)
            .map(|object| object.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.shaders.borrow_mut().remove(&shader);
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> ProgramHandle {
        let handle = ProgramHandle(self.next());
        self.programs
            .borrow_mut()
            .insert(handle, ProgramObject::default());
        self.record(Call::CreateProgram(handle));
        handle
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(object) = self.programs.borrow_mut().get_mut(&program) {
            object.attached.push(shader);
        }
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(object) = self.programs.borrow_mut().get_mut(&program) {
            object.attached.retain(|attached| *attached != shader);
        }
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: ProgramHandle) {
        let shaders = self.shaders.borrow();
        if let Some(object) = self.programs.borrow_mut().get_mut(&program) {
            let stages: Vec<&StageObject> = object
                .attached
                .iter()
                .filter_map(|handle| shaders.get(handle))
                .collect();

            let result = if stages.iter().any(|stage| !stage.compiled) {
                Err("error: linking with uncompiled shader".to_string())
            } else {
                let outputs: Vec<String> = stages
                    .iter()
                    .filter(|stage| stage.stage == ShaderStage::Vertex)
                    .flat_map(|stage| declared(&stage.source, "out"))
                    .collect();
                let missing = stages
                    .iter()
                    .filter(|stage| stage.stage == ShaderStage::Fragment)
                    .flat_map(|stage| declared(&stage.source, "in"))
                    .find(|input| !outputs.contains(input));
                match missing {
                    Some(name) => Err(format!(
                        "error: fragment shader input `{}` has no matching vertex shader output",
                        name
                    )),
                    None => Ok(()),
                }
            };

            object.linked = result.is_ok();
            object.log = result.err().unwrap_or_default();
        }
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .map(|object| object.linked)
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.programs
            .borrow()
            .get(&program)
            .map(|object| object.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: ProgramHandle) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.programs.borrow_mut().remove(&program);
        self.record(Call::DeleteProgram(program));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangles { first, count });
    }
}

/// Window double sharing the device's call log, so GPU and window calls
/// interleave in one timeline.
pub struct RecordingWindow {
    calls: CallLog,
    state: WindowState,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl RecordingWindow {
    pub fn new(calls: CallLog, width: u32, height: u32, title: &str) -> Self {
        Self {
            calls,
            state: WindowState::Normal,
            width,
            height,
            title: title.to_string(),
        }
    }
}

impl WindowControl for RecordingWindow {
    fn request_close(&mut self) {
        self.calls.borrow_mut().push(Call::RequestClose);
    }

    fn window_state(&self) -> WindowState {
        self.state
    }

    fn set_window_state(&mut self, state: WindowState) {
        self.state = state;
        self.calls.borrow_mut().push(Call::SetWindowState(state));
    }

    fn present(&mut self) {
        self.calls.borrow_mut().push(Call::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::{declared, toy_compile};

    #[test]
    fn toy_compiler_rejects_unbalanced_braces() {
        assert!(toy_compile("void main() { ").is_err());
        assert!(toy_compile("void main() { }").is_ok());
    }

    #[test]
    fn declarations_skip_layout_prefix() {
        let source = "layout (location = 0) in vec3 aPos;\nout vec3 vColor;\n";
        assert_eq!(declared(source, "in"), vec!["aPos".to_string()]);
        assert_eq!(declared(source, "out"), vec!["vColor".to_string()]);
    }
}
