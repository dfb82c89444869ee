use std::mem::size_of;

use crate::renderer::device::{BufferHandle, BufferUsage, GpuDevice, VertexArrayHandle};

pub const POSITION_COMPONENTS: i32 = 3;
pub const POSITION_ATTRIBUTE: u32 = 0;

/// One triangle in normalized device coordinates.
#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [f32; 9] = [
     0.0,  0.5, 0.0, // top middle
     0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
];

/// Vertex positions resident in a GPU buffer object.
#[derive(Debug)]
pub struct GeometryBuffer {
    buffer: BufferHandle,
    vertex_count: i32,
    released: bool,
}

impl GeometryBuffer {
    /// Creates a buffer and uploads tightly packed xyz positions into it.
    ///
    /// Leaves the buffer bound to the array-buffer target.
    pub fn upload<D>(device: &D, positions: &[f32], usage: BufferUsage) -> Self
    where
        D: GpuDevice + ?Sized,
    {
        let buffer = device.create_buffer();
        device.bind_array_buffer(buffer);
        device.buffer_data_f32(positions, usage);

        Self {
            buffer,
            vertex_count: (positions.len() / POSITION_COMPONENTS as usize) as i32,
            released: false,
        }
    }

    pub fn handle(&self) -> BufferHandle {
        self.buffer
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    pub fn release<D>(&mut self, device: &D)
    where
        D: GpuDevice + ?Sized,
    {
        if !self.released {
            device.delete_buffer(self.buffer);
            self.released = true;
        }
    }
}

/// Maps a [`GeometryBuffer`] onto shader input slot 0.
#[derive(Debug)]
pub struct AttributeLayout {
    vao: VertexArrayHandle,
    released: bool,
}

impl AttributeLayout {
    /// Creates the layout object and records `geometry` as tightly packed
    /// float triples in slot 0.
    ///
    /// Bind order is buffer, layout object, attribute pointer, enable. The
    /// buffer binding has to be made again while the layout object is
    /// current, or the attribute pointer captures nothing.
    pub fn bind_positions<D>(device: &D, geometry: &GeometryBuffer) -> Self
    where
        D: GpuDevice + ?Sized,
    {
        let vao = device.create_vertex_array();
        device.bind_vertex_array(vao);
        device.bind_array_buffer(geometry.handle());

        let stride = POSITION_COMPONENTS * size_of::<f32>() as i32;
        device.vertex_attrib_pointer_f32(POSITION_ATTRIBUTE, POSITION_COMPONENTS, stride, 0);
        device.enable_vertex_attrib_array(POSITION_ATTRIBUTE);

        Self {
            vao,
            released: false,
        }
    }

    pub fn handle(&self) -> VertexArrayHandle {
        self.vao
    }

    pub fn bind<D>(&self, device: &D)
    where
        D: GpuDevice + ?Sized,
    {
        device.bind_vertex_array(self.vao);
    }

    pub fn release<D>(&mut self, device: &D)
    where
        D: GpuDevice + ?Sized,
    {
        if !self.released {
            device.delete_vertex_array(self.vao);
            self.released = true;
        }
    }
}
