use std::fmt;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::renderer::device::{GpuDevice, ProgramHandle, ShaderHandle, ShaderStage};
use crate::renderer::registry;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader '{}': {source}", path.display())]
    Read {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which pipeline step produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSource {
    Compile(ShaderStage),
    Link,
}

/// Driver log captured from a failed compile or link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDiagnostic {
    pub source: DiagnosticSource,
    pub log: String,
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            DiagnosticSource::Compile(stage) => {
                write!(f, "Shader compilation error ({}): {}", stage.label(), self.log)
            }
            DiagnosticSource::Link => write!(f, "Program linking error (PROGRAM): {}", self.log),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Linked,
    Disposed,
}

/// A linked two-stage GPU program.
///
/// Construction never fails on bad shader code: compile and link errors are
/// logged and kept in [`diagnostics`](Self::diagnostics), and the program is
/// still returned. [`is_usable`](Self::is_usable) tells whether drawing with
/// it means anything.
///
/// The program must be released with [`dispose`](Self::dispose) (or by
/// wrapping it in [`ScopedProgram`]) while the context is current. Dropping
/// it undisposed only logs a leak warning; the GPU object is not touched.
#[derive(Debug)]
pub struct ShaderProgram {
    handle: ProgramHandle,
    diagnostics: Vec<ShaderDiagnostic>,
    linked: bool,
    disposed: bool,
}

impl ShaderProgram {
    /// Reads both stage sources from disk, then compiles and links them.
    ///
    /// Only the file reads can fail.
    pub fn from_files<D>(
        device: &D,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError>
    where
        D: GpuDevice + ?Sized,
    {
        let vertex_code = read_source(ShaderStage::Vertex, vertex_path.as_ref())?;
        let fragment_code = read_source(ShaderStage::Fragment, fragment_path.as_ref())?;
        Ok(Self::from_sources(device, &vertex_code, &fragment_code))
    }

    pub fn from_sources<D>(device: &D, vertex_code: &str, fragment_code: &str) -> Self
    where
        D: GpuDevice + ?Sized,
    {
        let mut diagnostics = Vec::new();

        let vertex = device.create_shader(ShaderStage::Vertex);
        device.shader_source(vertex, vertex_code);
        let fragment = device.create_shader(ShaderStage::Fragment);
        device.shader_source(fragment, fragment_code);

        let vertex_ok = compile_stage(device, vertex, ShaderStage::Vertex, &mut diagnostics);
        let fragment_ok = compile_stage(device, fragment, ShaderStage::Fragment, &mut diagnostics);

        let handle = device.create_program();
        device.attach_shader(handle, vertex);
        device.attach_shader(handle, fragment);
        device.link_program(handle);

        let link_ok = device.program_link_status(handle);
        if !link_ok {
            report(
                &mut diagnostics,
                DiagnosticSource::Link,
                device.program_info_log(handle),
            );
        }

        // Stage objects are baked into the program after linking.
        device.detach_shader(handle, vertex);
        device.detach_shader(handle, fragment);
        device.delete_shader(vertex);
        device.delete_shader(fragment);

        registry::track(handle);
        let linked = vertex_ok && fragment_ok && link_ok;
        if linked {
            log::debug!("linked shader {}", handle);
        } else {
            log::warn!("{} linked with {} diagnostic(s)", handle, diagnostics.len());
        }

        Self {
            handle,
            diagnostics,
            linked,
            disposed: false,
        }
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    pub fn state(&self) -> ProgramState {
        if self.disposed {
            ProgramState::Disposed
        } else {
            ProgramState::Linked
        }
    }

    /// Both stages compiled, the link succeeded, and the program is not
    /// disposed.
    pub fn is_usable(&self) -> bool {
        self.linked && !self.disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Makes this the program used by subsequent draw calls.
    ///
    /// Not checked against disposal; callers own that contract.
    pub fn activate<D>(&self, device: &D)
    where
        D: GpuDevice + ?Sized,
    {
        device.use_program(self.handle);
    }

    /// Deletes the GPU program. Later calls do nothing.
    pub fn dispose<D>(&mut self, device: &D)
    where
        D: GpuDevice + ?Sized,
    {
        if self.disposed {
            return;
        }
        device.delete_program(self.handle);
        registry::untrack(self.handle);
        self.disposed = true;
        log::debug!("disposed shader {}", self.handle);
    }

    /// Ties the program's release to the returned guard's scope.
    pub fn scoped<D>(self, device: &D) -> ScopedProgram<'_, D>
    where
        D: GpuDevice + ?Sized,
    {
        ScopedProgram {
            program: self,
            device,
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if !self.disposed {
            log::warn!(
                "GPU resource leak! {} dropped without dispose()",
                self.handle
            );
            registry::record_leak();
        }
    }
}

/// Disposes the wrapped program when it goes out of scope.
pub struct ScopedProgram<'d, D>
where
    D: GpuDevice + ?Sized,
{
    program: ShaderProgram,
    device: &'d D,
}

impl<D> Deref for ScopedProgram<'_, D>
where
    D: GpuDevice + ?Sized,
{
    type Target = ShaderProgram;

    fn deref(&self) -> &ShaderProgram {
        &self.program
    }
}

impl<D> DerefMut for ScopedProgram<'_, D>
where
    D: GpuDevice + ?Sized,
{
    fn deref_mut(&mut self) -> &mut ShaderProgram {
        &mut self.program
    }
}

impl<D> Drop for ScopedProgram<'_, D>
where
    D: GpuDevice + ?Sized,
{
    fn drop(&mut self) {
        self.program.dispose(self.device);
    }
}

fn read_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Read {
        stage: stage.label(),
        path: path.to_path_buf(),
        source,
    })
}

fn compile_stage<D>(
    device: &D,
    shader: ShaderHandle,
    stage: ShaderStage,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> bool
where
    D: GpuDevice + ?Sized,
{
    device.compile_shader(shader);
    let compiled = device.shader_compile_status(shader);
    if !compiled {
        report(
            diagnostics,
            DiagnosticSource::Compile(stage),
            device.shader_info_log(shader),
        );
    }
    compiled
}

fn report(diagnostics: &mut Vec<ShaderDiagnostic>, source: DiagnosticSource, log: String) {
    let diagnostic = ShaderDiagnostic { source, log };
    log::error!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
