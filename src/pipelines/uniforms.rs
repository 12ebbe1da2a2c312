use wgpu::util::DeviceExt;

use crate::{
    math,
    render::{DrawCall, FramePlan},
};

/// Per-frame shader inputs (group 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    projection: [[f32; 4]; 4],
    light_position: [f32; 4],
    // The colours are vec3 in spirit; the fourth component keeps 16 byte alignment.
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    use_texture: u32,
    _padding: [u32; 3],
}

impl From<&FramePlan> for FrameUniform {
    fn from(plan: &FramePlan) -> Self {
        let rgba = |rgb: [f32; 3]| [rgb[0], rgb[1], rgb[2], 1.0];
        Self {
            projection: math::flatten4(&(math::OPENGL_TO_WGPU_MATRIX * plan.projection)),
            light_position: plan.light_position.into(),
            ambient: rgba(plan.ambient),
            diffuse: rgba(plan.diffuse),
            specular: rgba(plan.specular),
            use_texture: plan.textured as u32,
            _padding: [0; 3],
        }
    }
}

/// Per-node shader inputs (group 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    model_view: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
}

impl From<&DrawCall> for NodeUniform {
    fn from(draw: &DrawCall) -> Self {
        Self {
            model_view: math::flatten4(&draw.model_view),
            normal: math::flatten3_padded(&draw.normal),
        }
    }
}

pub fn mk_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, uniform: T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some(label),
    })
}

/// A uniform buffer and the bind group that exposes it.
#[derive(Debug)]
pub struct UniformBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    pub fn new<T: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        uniform: T,
    ) -> Self {
        let buffer = mk_buffer(device, label, uniform);
        let bind_group = mk_bind_group(device, layout, &buffer, label);
        Self { buffer, bind_group }
    }

    pub fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, uniform: T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}
