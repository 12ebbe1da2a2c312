//! Box geometry accumulated into four shared attribute buffers.
//!
//! All objects of the scene live in one set of buffers. Every object is a
//! contiguous [`DrawRange`] of that triangle list; there is no index buffer, so
//! each quad duplicates its shared corners and costs six vertices.

use std::ops::Range;

/// Vertices emitted per face (two triangles).
pub const VERTICES_PER_FACE: u32 = 6;
/// Vertices emitted per box (six faces).
pub const VERTICES_PER_BOX: u32 = 6 * VERTICES_PER_FACE;

const FACE_TEX_COORDS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

/// A contiguous slice of the shared vertex buffers that belongs to one object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub start: u32,
    pub count: u32,
}

impl DrawRange {
    pub fn end(&self) -> u32 {
        self.start + self.count
    }

    pub fn vertices(&self) -> Range<u32> {
        self.start..self.end()
    }
}

/// Four parallel attribute sequences, always of equal length.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// The range covered by everything appended since `start` was taken from
    /// [`vertex_count`](Self::vertex_count).
    pub fn range_since(&self, start: u32) -> DrawRange {
        DrawRange {
            start,
            count: self.vertex_count() - start,
        }
    }

    /**
     * Appends one quad as the triangles (v1, v2, v3) and (v1, v3, v4).
     *
     * The winding is kept exactly as given; the caller decides which corner order
     * faces outwards.
     */
    fn add_face(
        &mut self,
        v1: [f32; 3],
        v2: [f32; 3],
        v3: [f32; 3],
        v4: [f32; 3],
        normal: [f32; 3],
        color: [f32; 4],
    ) {
        let rgb = [color[0], color[1], color[2]];
        self.positions.extend_from_slice(&[v1, v2, v3, v1, v3, v4]);
        for _ in 0..VERTICES_PER_FACE {
            self.normals.push(normal);
            self.colors.push(rgb);
        }
        self.tex_coords.extend_from_slice(&FACE_TEX_COORDS);
    }

    /// Appends an axis-aligned box with flat per-face normals.
    ///
    /// The bounds are trusted: `min > max` simply produces flipped geometry.
    #[allow(clippy::too_many_arguments)]
    pub fn add_box(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
        min_z: f32,
        max_z: f32,
        color: [f32; 4],
    ) {
        let p = [
            [min_x, min_y, max_z],
            [max_x, min_y, max_z],
            [max_x, max_y, max_z],
            [min_x, max_y, max_z],
            [min_x, min_y, min_z],
            [min_x, max_y, min_z],
            [max_x, max_y, min_z],
            [max_x, min_y, min_z],
        ];
        // front, back, right, left, top, bottom
        self.add_face(p[0], p[1], p[2], p[3], [0.0, 0.0, 1.0], color);
        self.add_face(p[7], p[6], p[5], p[4], [0.0, 0.0, -1.0], color);
        self.add_face(p[1], p[7], p[6], p[2], [1.0, 0.0, 0.0], color);
        self.add_face(p[4], p[0], p[3], p[5], [-1.0, 0.0, 0.0], color);
        self.add_face(p[3], p[2], p[6], p[5], [0.0, 1.0, 0.0], color);
        self.add_face(p[0], p[4], p[7], p[1], [0.0, -1.0, 0.0], color);
    }

    /// Runs `build` and returns the range of everything it appended.
    pub fn object(&mut self, build: impl FnOnce(&mut Self)) -> DrawRange {
        let start = self.vertex_count();
        build(self);
        self.range_since(start)
    }
}

/// Vertex buffer layouts for the four attribute buffers, in shader location
/// order: position, color, normal, tex_coords.
pub fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 4] {
    const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    const NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];
    const TEX_COORDS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x2];

    let layout = |stride: usize, attributes: &'static [wgpu::VertexAttribute]| {
        wgpu::VertexBufferLayout {
            array_stride: stride as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    };
    [
        layout(std::mem::size_of::<[f32; 3]>(), &POSITION),
        layout(std::mem::size_of::<[f32; 3]>(), &COLOR),
        layout(std::mem::size_of::<[f32; 3]>(), &NORMAL),
        layout(std::mem::size_of::<[f32; 2]>(), &TEX_COORDS),
    ]
}
