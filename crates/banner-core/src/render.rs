//! wgpu renderer for banner planes, shared by the web and native front-ends.

mod helpers;
mod textures;

use crate::animator::Renderer;
use crate::error::{BannerError, BannerResult};
use crate::scene::{Camera, PlaneId, Scene, TextureId};
use textures::TextureRegistry;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PlaneInstance {
    model: [[f32; 4]; 4],
    tint_opacity: [f32; 4],
}

// Unit quad, two triangles; geometry size comes from the model matrix
const QUAD: [QuadVertex; 6] = [
    QuadVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { pos: [0.5, -0.5], uv: [1.0, 1.0] },
    QuadVertex { pos: [0.5, 0.5], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { pos: [0.5, 0.5], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5, 0.5], uv: [0.0, 0.0] },
];

const INITIAL_INSTANCE_CAPACITY: usize = 32;

/// Device-side state; dropped as a whole on `dispose`.
struct GpuInner {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    image_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    white: wgpu::Texture,
    white_bind_group: wgpu::BindGroup,
    textures: TextureRegistry,
}

pub struct GpuRenderer {
    inner: Option<GpuInner>,
    width: u32,
    height: u32,
    instances: Vec<PlaneInstance>,
}

impl GpuRenderer {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let width = width.max(1);
        let height = height.max(1);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plane_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::PLANE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plane_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane_uniform_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane_uniform_bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let image_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane_image_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        // Linear min/mag filtering, no mipmaps
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("plane_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plane_pl"),
            bind_group_layouts: &[&uniform_bgl, &image_bgl],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
            },
            // slot 1: per-plane model matrix + tint/opacity
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PlaneInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    2 => Float32x4,
                    3 => Float32x4,
                    4 => Float32x4,
                    5 => Float32x4,
                    6 => Float32x4
                ],
            },
        ];
        let pipeline =
            helpers::make_plane_pipeline(&device, &pipeline_layout, &shader, &vertex_buffers, format);

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        // Solid-color planes sample a 1x1 white texture so the tint shows as-is
        let (white, white_view) =
            helpers::create_rgba_texture(&device, &queue, "white", 1, 1, &[255, 255, 255, 255]);
        let white_bind_group =
            helpers::create_image_bind_group(&device, &image_bgl, &white_view, &sampler);

        Ok(Self {
            inner: Some(GpuInner {
                surface,
                device,
                queue,
                config,
                pipeline,
                uniform_buffer,
                uniform_bind_group,
                image_bgl,
                sampler,
                quad_vb,
                instance_vb,
                instance_capacity: INITIAL_INSTANCE_CAPACITY,
                white,
                white_bind_group,
                textures: TextureRegistry::default(),
            }),
            width,
            height,
            instances: Vec::with_capacity(INITIAL_INSTANCE_CAPACITY),
        })
    }

    /// Upload tightly packed RGBA8 pixels as a new plane texture.
    pub fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> BannerResult<TextureId> {
        let g = self
            .inner
            .as_mut()
            .ok_or_else(|| BannerError::render("renderer disposed"))?;
        if width == 0 || height == 0 || rgba.len() != (width * height * 4) as usize {
            return Err(BannerError::texture(format!(
                "bad pixel buffer: {}x{} with {} bytes",
                width,
                height,
                rgba.len()
            )));
        }
        let max = g.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(BannerError::texture(format!(
                "{}x{} exceeds the {}px texture limit",
                width, height, max
            )));
        }
        Ok(g.textures.upload(
            &g.device,
            &g.queue,
            &g.image_bgl,
            &g.sampler,
            width,
            height,
            rgba,
        ))
    }

    pub fn live_textures(&self) -> usize {
        self.inner.as_ref().map(|g| g.textures.len()).unwrap_or(0)
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_none()
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("plane_instances"),
        size: (std::mem::size_of::<PlaneInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl Renderer for GpuRenderer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        if let Some(g) = &mut self.inner {
            g.config.width = width;
            g.config.height = height;
            g.surface.configure(&g.device, &g.config);
        }
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> BannerResult<()> {
        let Some(g) = &mut self.inner else {
            return Ok(());
        };
        let frame = match g.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                g.surface.configure(&g.device, &g.config);
                return Ok(());
            }
            Err(e) => return Err(BannerError::render(format!("{e:?}"))),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        g.queue.write_buffer(
            &g.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
            }),
        );

        // Far planes first so alpha blending composes correctly
        let mut order: Vec<usize> = (0..scene.planes().len()).collect();
        order.sort_by(|&a, &b| {
            scene.planes()[a]
                .position
                .z
                .total_cmp(&scene.planes()[b].position.z)
        });
        self.instances.clear();
        for &i in &order {
            let p = &scene.planes()[i];
            self.instances.push(PlaneInstance {
                model: p.model_matrix().to_cols_array_2d(),
                tint_opacity: [p.tint[0], p.tint[1], p.tint[2], p.opacity.clamp(0.0, 1.0)],
            });
        }
        if self.instances.len() > g.instance_capacity {
            g.instance_capacity = self.instances.len().next_power_of_two();
            g.instance_vb.destroy();
            g.instance_vb = create_instance_buffer(&g.device, g.instance_capacity);
        }
        if !self.instances.is_empty() {
            g.queue
                .write_buffer(&g.instance_vb, 0, bytemuck::cast_slice(&self.instances));
        }

        let mut encoder = g
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("plane_encoder"),
            });
        {
            let [r, gr, b] = scene.background;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plane_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: gr as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&g.pipeline);
            rpass.set_bind_group(0, &g.uniform_bind_group, &[]);
            rpass.set_vertex_buffer(0, g.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, g.instance_vb.slice(..));
            for (slot, &i) in order.iter().enumerate() {
                let bind_group = scene.planes()[i]
                    .texture
                    .and_then(|t| g.textures.get(t))
                    .map(|e| &e.bind_group)
                    .unwrap_or(&g.white_bind_group);
                rpass.set_bind_group(1, bind_group, &[]);
                let slot = slot as u32;
                rpass.draw(0..6, slot..slot + 1);
            }
        }
        g.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn release(&mut self, plane: PlaneId, texture: Option<TextureId>) {
        // Geometry is the shared quad; only the plane's texture is owned
        if let (Some(g), Some(tex)) = (&mut self.inner, texture) {
            if !g.textures.remove(tex) {
                log::warn!("[render] plane {} released unknown texture {}", plane.0, tex.0);
            }
        }
    }

    fn release_texture(&mut self, texture: TextureId) {
        if let Some(g) = &mut self.inner {
            g.textures.remove(texture);
        }
    }

    fn dispose(&mut self) {
        if let Some(mut g) = self.inner.take() {
            g.textures.clear();
            g.white.destroy();
            g.instance_vb.destroy();
            g.quad_vb.destroy();
            g.uniform_buffer.destroy();
            log::info!("[render] disposed");
        }
    }
}
