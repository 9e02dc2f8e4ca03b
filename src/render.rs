//! WebGPU forward renderer for the card scene.
//!
//! One pass into the canvas with a depth buffer. Opaque draws go first,
//! then transparent ones sorted back to front. GPU resources for a node are
//! created the first time it is drawn; the scene's geometry never changes
//! after build, only transforms, visibility and the glow time do.

use crate::frame::{FrameRenderer, RenderView};
use crate::scene::{LightKind, MaterialKind, MeshData, NodeId, Scene, Side, TextureSource, Visual};
use crate::textures::{self, Rgba};
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;

use helpers::PipelineKey;

pub const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub fn pack_vertices(mesh: &MeshData) -> Vec<Vertex> {
    (0..mesh.positions.len())
        .map(|i| {
            let color = mesh.colors.get(i).copied().unwrap_or(Vec3::ONE);
            Vertex {
                pos: mesh.positions[i].to_array(),
                normal: mesh.normals.get(i).copied().unwrap_or(Vec3::Z).to_array(),
                uv: mesh.uvs.get(i).map(|uv| uv.to_array()).unwrap_or([0.0, 0.0]),
                color: color.extend(1.0).to_array(),
            }
        })
        .collect()
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LightPacked {
    position_kind: [f32; 4],
    color_intensity: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_count: [u32; 4],
    lights: [LightPacked; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    color: [f32; 4],
    color2: [f32; 4],
    params: [f32; 4],
    surface: [f32; 4],
}

struct GpuDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    key: PipelineKey,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Keeps the uploaded texture alive for the bind group.
    _texture: Option<wgpu::Texture>,
}

/// Decoded images waiting for the next frame to upload them.
pub type PendingUploads = Rc<RefCell<Vec<(NodeId, Rgba)>>>;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    draw_bgl: wgpu::BindGroupLayout,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,
    _white: wgpu::Texture,
    pipelines: FnvHashMap<PipelineKey, wgpu::RenderPipeline>,
    draws: FnvHashMap<NodeId, GpuDraw>,
    pending: PendingUploads,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        // Colours are authored in display space, so write them unconverted.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("card_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/card.wgsl").into()),
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("card_pl"),
            bind_group_layouts: &[&globals_bgl, &draw_bgl],
            push_constant_ranges: &[],
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let (white, white_view) =
            helpers::create_rgba_texture(&device, &queue, "white", 1, 1, &[255, 255, 255, 255]);

        log::info!("[gpu] ready {}x{} {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            shader,
            pipeline_layout,
            draw_bgl,
            globals_buffer,
            globals_bind_group,
            sampler,
            white_view,
            _white: white,
            pipelines: FnvHashMap::default(),
            draws: FnvHashMap::default(),
            pending: Rc::new(RefCell::new(Vec::new())),
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    fn bind_group(&self, uniform: &wgpu::Buffer, view: &wgpu::TextureView) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bg"),
            layout: &self.draw_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) {
        if !self.pipelines.contains_key(&key) {
            let pipeline = helpers::make_card_pipeline(
                &self.device,
                &self.pipeline_layout,
                &self.shader,
                self.config.format,
                key,
            );
            self.pipelines.insert(key, pipeline);
        }
    }

    fn create_draw(&mut self, id: NodeId, visual: &Visual) -> GpuDraw {
        let vertices = pack_vertices(&visual.mesh);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("indices"),
                contents: bytemuck::cast_slice(&visual.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: std::mem::size_of::<DrawUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let material = &visual.material;
        let texture = match &material.texture {
            Some(TextureSource::Image { url }) => {
                self.load_image_later(id, url.clone());
                None
            }
            Some(source) => match textures::rasterize(source) {
                Ok(Some(rgba)) => Some(helpers::create_rgba_texture(
                    &self.device,
                    &self.queue,
                    "canvas_texture",
                    rgba.width,
                    rgba.height,
                    &rgba.pixels,
                )),
                Ok(None) => None,
                Err(e) => {
                    log::warn!("[asset] rasterise failed for {:?}: {}", id, e);
                    None
                }
            },
            None => None,
        };
        let bind_group = match &texture {
            Some((_, view)) => self.bind_group(&uniform_buffer, view),
            None => self.bind_group(&uniform_buffer, &self.white_view),
        };

        let double_sided = material.side == Side::Double
            || matches!(material.kind, MaterialKind::Points | MaterialKind::Line);
        GpuDraw {
            vertex_buffer,
            index_buffer,
            index_count: visual.mesh.indices.len() as u32,
            key: PipelineKey {
                topology: visual.mesh.topology,
                depth_write: material.depth_write,
                cull_back: !double_sided,
            },
            uniform_buffer,
            bind_group,
            _texture: texture.map(|(t, _)| t),
        }
    }

    fn load_image_later(&self, id: NodeId, url: String) {
        let pending = self.pending.clone();
        spawn_local(async move {
            match textures::load_image(&url).await {
                Ok(rgba) => {
                    log::info!("[asset] loaded {} ({}x{})", url, rgba.width, rgba.height);
                    pending.borrow_mut().push((id, rgba));
                }
                Err(e) => log::warn!("[asset] {}", e),
            }
        });
    }

    fn upload_pending(&mut self) {
        let uploads: Vec<(NodeId, Rgba)> = self.pending.borrow_mut().drain(..).collect();
        for (id, rgba) in uploads {
            let (texture, view) = helpers::create_rgba_texture(
                &self.device,
                &self.queue,
                "image_texture",
                rgba.width,
                rgba.height,
                &rgba.pixels,
            );
            let Some(draw) = self.draws.get(&id) else {
                continue;
            };
            let bind_group = self.bind_group(&draw.uniform_buffer, &view);
            if let Some(draw) = self.draws.get_mut(&id) {
                draw.bind_group = bind_group;
                draw._texture = Some(texture);
            }
        }
    }

    fn write_globals(&self, scene: &Scene, view: &RenderView) {
        let mut lights = [LightPacked {
            position_kind: [0.0; 4],
            color_intensity: [0.0; 4],
            params: [0.0; 4],
        }; MAX_LIGHTS];
        let count = scene.lights.len().min(MAX_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(&scene.lights) {
            let (kind, range) = match light.kind {
                LightKind::Ambient => (0.0, 0.0),
                LightKind::Directional => (1.0, 0.0),
                LightKind::Point { range } => (2.0, range),
            };
            *slot = LightPacked {
                position_kind: light.position.extend(kind).to_array(),
                color_intensity: light.color.extend(light.intensity).to_array(),
                params: [range, 0.0, 0.0, 0.0],
            };
        }
        let globals = Globals {
            view_proj: (view.projection * view.view).to_cols_array_2d(),
            camera_pos: view.eye.extend(1.0).to_array(),
            light_count: [count as u32, 0, 0, 0],
            lights,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    pub fn draw_scene(&mut self, scene: &Scene, view: &RenderView) -> Result<(), wgpu::SurfaceError> {
        self.upload_pending();
        self.write_globals(scene, view);

        let mut opaque: Vec<NodeId> = Vec::new();
        let mut transparent: Vec<(f32, NodeId)> = Vec::new();
        for id in scene.walk() {
            let Some(node) = scene.get(id) else {
                continue;
            };
            let Some(visual) = &node.visual else {
                continue;
            };
            if visual.mesh.indices.is_empty() || !scene.is_effectively_visible(id) {
                continue;
            }
            if !self.draws.contains_key(&id) {
                let draw = self.create_draw(id, visual);
                self.draws.insert(id, draw);
            }
            let model = scene.world_matrix(id);
            self.write_draw_uniforms(id, visual, model);
            if visual.material.transparent {
                let depth = view.view.transform_point3(model.w_axis.truncate()).z;
                transparent.push((depth, id));
            } else {
                opaque.push(id);
            }
        }
        // Most negative view-space z is farthest: draw it first.
        transparent.sort_by(|a, b| a.0.total_cmp(&b.0));

        let order: Vec<NodeId> = opaque
            .into_iter()
            .chain(transparent.into_iter().map(|(_, id)| id))
            .collect();
        for id in &order {
            if let Some(key) = self.draws.get(id).map(|d| d.key) {
                self.ensure_pipeline(key);
            }
        }

        let frame = self.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let clear = match scene.background {
            Some(c) => wgpu::Color {
                r: c.x as f64,
                g: c.y as f64,
                b: c.z as f64,
                a: 1.0,
            },
            None => wgpu::Color::TRANSPARENT,
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("card_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            for id in &order {
                let Some(draw) = self.draws.get(id) else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.get(&draw.key) else {
                    continue;
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(1, &draw.bind_group, &[]);
                rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                rpass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn write_draw_uniforms(&self, id: NodeId, visual: &Visual, model: Mat4) {
        let Some(draw) = self.draws.get(&id) else {
            return;
        };
        let material = &visual.material;
        let (kind, color2, time, surface) = match material.kind {
            MaterialKind::Basic => (0.0, Vec3::ZERO, 0.0, [0.0; 4]),
            MaterialKind::Physical {
                metalness,
                roughness,
                clearcoat,
            } => (1.0, Vec3::ZERO, 0.0, [metalness, roughness, clearcoat, 0.0]),
            MaterialKind::Line => (2.0, Vec3::ZERO, 0.0, [0.0; 4]),
            MaterialKind::Points => (3.0, Vec3::ZERO, 0.0, [0.0; 4]),
            MaterialKind::Glow { color2, time } => (4.0, color2, time, [0.0; 4]),
        };
        let has_texture = if material.texture.is_some() { 1.0 } else { 0.0 };
        let uniforms = DrawUniforms {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            color: material.color.extend(material.opacity).to_array(),
            color2: color2.extend(1.0).to_array(),
            params: [kind, has_texture, time, 0.0],
            surface,
        };
        self.queue
            .write_buffer(&draw.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

impl FrameRenderer for GpuState<'_> {
    fn render(&mut self, scene: &Scene, view: &RenderView) {
        if let Err(e) = self.draw_scene(scene, view) {
            log::error!("[gpu] render error: {:?}", e);
        }
    }
}
