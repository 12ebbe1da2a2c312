//! GPU context: device, surface, the scene pipeline and every GPU resource the
//! coffee-machine scene draws with.

use std::{iter, sync::Arc};

use anyhow::Context as _;
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    config::SceneConfig,
    data_structures::{geometry::Geometry, texture::Texture},
    pipelines::{
        basic::{SceneLayouts, mk_scene_pipeline},
        uniforms::{FrameUniform, NodeUniform, UniformBinding, mk_bind_group_layout},
    },
    render::FramePlan,
    resources::texture::{ActiveTexture, ImageLoad, TextureState, texture_layout},
};

/// The four attribute buffers shared by all scene objects.
#[derive(Debug)]
pub struct VertexBuffers {
    pub positions: wgpu::Buffer,
    pub colors: wgpu::Buffer,
    pub normals: wgpu::Buffer,
    pub tex_coords: wgpu::Buffer,
}

impl VertexBuffers {
    pub fn new(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let mk = |label: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        Self {
            positions: mk("Position Buffer", bytemuck::cast_slice(&geometry.positions)),
            colors: mk("Color Buffer", bytemuck::cast_slice(&geometry.colors)),
            normals: mk("Normal Buffer", bytemuck::cast_slice(&geometry.normals)),
            tex_coords: mk("TexCoord Buffer", bytemuck::cast_slice(&geometry.tex_coords)),
        }
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    pipeline: wgpu::RenderPipeline,
    vertices: VertexBuffers,
    frame: UniformBinding,
    nodes: Vec<UniformBinding>,
    texture_layout: wgpu::BindGroupLayout,
    checker: wgpu::BindGroup,
    image: ImageLoad,
    image_bind_group: Option<wgpu::BindGroup>,
}

impl Context {
    /**
     * Sets up the GPU for `window` and uploads the scene.
     *
     * `node_count` uniform slots are allocated, one per drawable scene node. The
     * image texture starts loading in the background; on native this must be
     * called from within a tokio runtime.
     */
    pub async fn new(
        window: Arc<Window>,
        scene: &SceneConfig,
        geometry: &Geometry,
        node_count: usize,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("the window offers no rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can render to this window")?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("the graphics device could not be opened")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Vertex colours are authored as display values, so prefer a surface
        // that does not sRGB-encode them a second time.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let frame_layout = mk_bind_group_layout(&device, "frame_bind_group_layout");
        let node_layout = mk_bind_group_layout(&device, "node_bind_group_layout");
        let texture_layout = texture_layout(&device);

        let pipeline = mk_scene_pipeline(
            &device,
            &config,
            SceneLayouts {
                frame: &frame_layout,
                node: &node_layout,
                texture: &texture_layout,
            },
        );

        let vertices = VertexBuffers::new(&device, geometry);
        let frame = UniformBinding::new(
            &device,
            &frame_layout,
            "frame uniform",
            FrameUniform::zeroed(),
        );
        let nodes = (0..node_count)
            .map(|i| {
                UniformBinding::new(
                    &device,
                    &node_layout,
                    &format!("node uniform {i}"),
                    NodeUniform::zeroed(),
                )
            })
            .collect();

        let checker = Texture::create_checker(
            &device,
            &queue,
            scene.checker_size,
            scene.checker_squares,
        )
        .bind_group(&device, &texture_layout, "checker_bind_group")?;

        let image = ImageLoad::spawn(scene.image_asset.clone());

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            clear_colour: scene.clear_colour,
            pipeline,
            vertices,
            frame,
            nodes,
            texture_layout,
            checker,
            image,
            image_bind_group: None,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    pub fn image_state(&self) -> TextureState {
        self.image.state()
    }

    /// Uploads the image texture once its load has finished. Cheap to call every
    /// frame.
    pub fn poll_image(&mut self) {
        let Some(img) = self.image.poll() else {
            return;
        };
        let texture = Texture::from_image(
            &self.device,
            &self.queue,
            &img,
            Some("image texture"),
            wgpu::AddressMode::ClampToEdge,
        );
        match texture.bind_group(&self.device, &self.texture_layout, "image_bind_group") {
            Ok(bind_group) => {
                log::info!("image texture ready ({}x{})", img.width(), img.height());
                self.image_bind_group = Some(bind_group);
            }
            Err(e) => log::error!("image texture could not be bound: {e:#}"),
        }
    }

    fn texture_bind_group(&self, active: ActiveTexture) -> &wgpu::BindGroup {
        match (active, &self.image_bind_group) {
            (ActiveTexture::Image, Some(image)) => image,
            _ => &self.checker,
        }
    }

    /// Uploads `plan` and draws it: clear, then one draw per draw call.
    pub fn submit(&self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if plan.draws.len() > self.nodes.len() {
            log::warn!(
                "You tried to draw {} nodes, but there are only {} node uniforms.",
                plan.draws.len(),
                self.nodes.len()
            );
        }
        self.frame.write(&self.queue, FrameUniform::from(plan));
        for (binding, draw) in self.nodes.iter().zip(plan.draws.iter()) {
            binding.write(&self.queue, NodeUniform::from(draw));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertices.positions.slice(..));
            render_pass.set_vertex_buffer(1, self.vertices.colors.slice(..));
            render_pass.set_vertex_buffer(2, self.vertices.normals.slice(..));
            render_pass.set_vertex_buffer(3, self.vertices.tex_coords.slice(..));
            render_pass.set_bind_group(0, &self.frame.bind_group, &[]);
            render_pass.set_bind_group(2, self.texture_bind_group(plan.texture), &[]);

            for (binding, draw) in self.nodes.iter().zip(plan.draws.iter()) {
                if draw.range.count == 0 {
                    log::warn!("you attempted to render {} with zero vertices", draw.name);
                    continue;
                }
                render_pass.set_bind_group(1, &binding.bind_group, &[]);
                render_pass.draw(draw.range.vertices(), 0..1);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
