use crate::core::{hex_to_linear, LightKind, LightingRig, ModelInstance, OrbitCamera, Vertex};
use glam::Mat4;
use web_sys as web;

mod helpers;
mod mesh;
mod targets;
use mesh::GpuModel;
use targets::{DepthTarget, DEPTH_FORMAT};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    hemi_up: [f32; 4],
    point_pos: [[f32; 4]; 2],
    point_color: [[f32; 4]; 2],
    dir_dir: [f32; 4],
    dir_color: [f32; 4],
}

impl FrameUniforms {
    fn new(view_proj: Mat4, lighting: &LightingRig) -> Self {
        let mut u: FrameUniforms = bytemuck::Zeroable::zeroed();
        u.view_proj = view_proj.to_cols_array_2d();
        let mut point_slot = 0;
        for light in lighting.lights() {
            let [r, g, b] = light.radiance();
            match light.kind {
                LightKind::Ambient => u.ambient = [r, g, b, 0.0],
                LightKind::Hemisphere { ground_color, up } => {
                    let [gr, gg, gb] = hex_to_linear(ground_color);
                    let k = light.intensity;
                    u.hemi_sky = [r, g, b, 0.0];
                    u.hemi_ground = [gr * k, gg * k, gb * k, 0.0];
                    u.hemi_up = up.extend(0.0).to_array();
                }
                LightKind::Point { position, range } if point_slot < u.point_pos.len() => {
                    u.point_pos[point_slot] = position.extend(range).to_array();
                    u.point_color[point_slot] = [r, g, b, 0.0];
                    point_slot += 1;
                }
                LightKind::Point { .. } => {}
                LightKind::Directional { position } => {
                    u.dir_dir = position.normalize_or_zero().extend(0.0).to_array();
                    u.dir_color = [r, g, b, 0.0];
                }
            }
        }
        u
    }
}

/// The single displayed model and its GPU resources.
///
/// GPU upload is deferred to the next rendered frame so that a model can be
/// attached before (or without) a WebGPU device.
#[derive(Default)]
pub struct SceneSlot {
    instance: Option<ModelInstance>,
    gpu: Option<GpuModel>,
}

impl SceneSlot {
    pub fn attach(&mut self, instance: ModelInstance) {
        self.detach();
        self.instance = Some(instance);
    }

    /// Stop animation, release GPU buffers and textures, drop the model.
    pub fn detach(&mut self) {
        if let Some(mut instance) = self.instance.take() {
            instance.stop_animation();
            log::info!("[scene] detached {}", instance.id());
        }
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
    }

    /// Step animation; returns `true` if the model pose changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.instance.as_mut().is_some_and(|i| i.advance(dt))
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthTarget,

    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    _white_tex: wgpu::Texture,
    white_view: wgpu::TextureView,

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
        let depth = DepthTarget::new(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("model_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::MODEL_WGSL.into()),
        });
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bgl"),
            entries: &[
                helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_pl"),
            bind_group_layouts: &[&frame_bgl, &material_bgl],
            push_constant_ranges: &[],
        });
        let vertex_attrs = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &vertex_attrs,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // Both faces are drawn; the fragment shader flips back-face normals.
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("base_color_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let (white_tex, white_view) =
            helpers::upload_rgba8(&device, &queue, "white_tex", 1, 1, &[255, 255, 255, 255]);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            pipeline,
            frame_buffer,
            frame_bind_group,
            material_bgl,
            sampler,
            _white_tex: white_tex,
            white_view,
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
            self.depth.recreate(&self.device, width, height);
        }
    }

    pub fn render(
        &mut self,
        camera: &OrbitCamera,
        lighting: &LightingRig,
        scene: &mut SceneSlot,
        pose_changed: bool,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_scene(scene, pose_changed);

        let uniforms = FrameUniforms::new(camera.view_proj(), lighting);
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));
        let [r, g, b] = hex_to_linear(lighting.background());
        let clear = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(gpu) = &scene.gpu {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.frame_bind_group, &[]);
                gpu.draw(&mut rpass);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Upload a freshly attached model, or push its animated state.
    fn sync_scene(&self, scene: &mut SceneSlot, pose_changed: bool) {
        let Some(instance) = &scene.instance else {
            return;
        };
        let uploaded = scene.gpu.as_ref().is_some_and(|g| g.id() == instance.id());
        if uploaded {
            if let (true, Some(gpu)) = (pose_changed, &scene.gpu) {
                gpu.sync(&self.queue, instance);
            }
            return;
        }
        if let Some(stale) = scene.gpu.take() {
            stale.destroy();
        }
        scene.gpu = Some(GpuModel::upload(
            &self.device,
            &self.queue,
            &self.material_bgl,
            &self.sampler,
            &self.white_view,
            instance,
        ));
    }
}
