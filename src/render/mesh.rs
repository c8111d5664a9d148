use super::helpers;
use crate::core::constants::ALPHA_CUTOFF;
use crate::core::{ModelId, ModelInstance};
use fnv::FnvHashMap;
use glam::Mat4;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    base_color: [f32; 4],
    params: [f32; 4],
}

impl DrawUniforms {
    fn new(model: Mat4, base_color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            base_color,
            params: [ALPHA_CUTOFF, 0.0, 0.0, 0.0],
        }
    }
}

struct GpuPrimitive {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    base_color: [f32; 4],
    skinned: bool,
}

/// GPU copies of one model instance's geometry, materials and textures.
pub(crate) struct GpuModel {
    id: ModelId,
    primitives: Vec<GpuPrimitive>,
    textures: Vec<wgpu::Texture>,
}

impl GpuModel {
    pub(crate) fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_bgl: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        fallback_view: &wgpu::TextureView,
        instance: &ModelInstance,
    ) -> Self {
        let data = instance.data();
        let mut textures = Vec::new();
        let mut views: FnvHashMap<usize, wgpu::TextureView> = FnvHashMap::default();
        for (i, tex) in data.textures.iter().enumerate() {
            let Some(tex) = tex else {
                continue;
            };
            let (texture, view) = helpers::upload_rgba8(
                device,
                queue,
                "base_color_tex",
                tex.width,
                tex.height,
                &tex.rgba,
            );
            textures.push(texture);
            views.insert(i, view);
        }

        let primitives = data
            .primitives
            .iter()
            .enumerate()
            .map(|(i, prim)| {
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("model_vertices"),
                    contents: bytemuck::cast_slice(instance.vertices(i)),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("model_indices"),
                    contents: bytemuck::cast_slice(&prim.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let uniforms = DrawUniforms::new(instance.model_matrix(i), prim.material.base_color);
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("draw_uniforms"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let view = prim
                    .material
                    .texture
                    .and_then(|t| views.get(&t))
                    .unwrap_or(fallback_view);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("material_bg"),
                    layout: material_bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                });
                GpuPrimitive {
                    vertex_buffer,
                    index_buffer,
                    index_count: prim.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                    base_color: prim.material.base_color,
                    skinned: instance.is_skinned(i),
                }
            })
            .collect();

        log::info!(
            "[gpu] uploaded {} ({} primitives, {} textures)",
            instance.id(),
            data.primitives.len(),
            textures.len()
        );
        Self {
            id: instance.id(),
            primitives,
            textures,
        }
    }

    pub(crate) fn id(&self) -> ModelId {
        self.id
    }

    /// Push animated state: skinned vertices and node transforms.
    pub(crate) fn sync(&self, queue: &wgpu::Queue, instance: &ModelInstance) {
        for (i, p) in self.primitives.iter().enumerate() {
            if p.skinned {
                queue.write_buffer(&p.vertex_buffer, 0, bytemuck::cast_slice(instance.vertices(i)));
            }
            let uniforms = DrawUniforms::new(instance.model_matrix(i), p.base_color);
            queue.write_buffer(&p.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        for p in &self.primitives {
            rpass.set_bind_group(1, &p.bind_group, &[]);
            rpass.set_vertex_buffer(0, p.vertex_buffer.slice(..));
            rpass.set_index_buffer(p.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..p.index_count, 0, 0..1);
        }
    }

    /// Release every GPU allocation now rather than waiting for the JS GC.
    pub(crate) fn destroy(self) {
        for p in &self.primitives {
            p.vertex_buffer.destroy();
            p.index_buffer.destroy();
            p.uniform_buffer.destroy();
        }
        for t in &self.textures {
            t.destroy();
        }
        log::info!("[gpu] released {}", self.id);
    }
}
