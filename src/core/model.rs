// glTF binary import and the per-asset model instance.
//
// `parse_glb` flattens a glTF document into plain vectors that the renderer
// can upload directly. `ModelInstance` places the model according to its
// asset entry, runs its animation mixer and performs CPU skinning.

use super::animation::{
    AnimationClip, AnimationMixer, Channel, ChannelValues, Interpolation, Transform,
};
use super::catalog::{ModelAsset, ModelId};
use super::error::AssetLoadError;
use glam::{Mat4, Quat, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    /// Index into [`ModelData::textures`].
    pub texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct SkinWeights {
    pub skin: usize,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
}

#[derive(Clone, Debug)]
pub struct Primitive {
    pub node: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
    pub skin: Option<SkinWeights>,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub parent: Option<usize>,
    pub rest: Transform,
}

#[derive(Clone, Debug)]
pub struct Skin {
    pub joints: Vec<usize>,
    pub inverse_bind: Vec<Mat4>,
}

#[derive(Clone, Debug)]
pub struct ModelData {
    pub nodes: Vec<Node>,
    /// Scene nodes, parents before children.
    pub order: Vec<usize>,
    pub primitives: Vec<Primitive>,
    pub skins: Vec<Skin>,
    /// Indexed by glTF image; `None` for pixel formats we do not decode.
    pub textures: Vec<Option<TextureData>>,
    pub clips: Vec<AnimationClip>,
}

pub fn parse_glb(bytes: &[u8]) -> Result<ModelData, AssetLoadError> {
    let (doc, buffers, images) =
        gltf::import_slice(bytes).map_err(|e| AssetLoadError::Parse(e.to_string()))?;

    let mut nodes: Vec<Node> = doc
        .nodes()
        .map(|n| {
            let (t, r, s) = n.transform().decomposed();
            Node {
                parent: None,
                rest: Transform {
                    translation: Vec3::from(t),
                    rotation: Quat::from_array(r),
                    scale: Vec3::from(s),
                },
            }
        })
        .collect();
    for n in doc.nodes() {
        for c in n.children() {
            nodes[c.index()].parent = Some(n.index());
        }
    }

    let scene = doc
        .default_scene()
        .or_else(|| doc.scenes().next())
        .ok_or(AssetLoadError::Empty)?;
    let mut order = Vec::new();
    let mut visited = vec![false; nodes.len()];
    let mut stack: Vec<gltf::Node> = scene.nodes().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        if std::mem::replace(&mut visited[node.index()], true) {
            continue;
        }
        order.push(node.index());
        let mut children: Vec<gltf::Node> = node.children().collect();
        children.reverse();
        stack.extend(children);
    }

    let gltf_nodes: Vec<gltf::Node> = doc.nodes().collect();
    let mut primitives = Vec::new();
    for &index in &order {
        let node = &gltf_nodes[index];
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let skin_index = node.skin().map(|s| s.index());
        for prim in mesh.primitives() {
            if prim.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let n = positions.len();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(i) => i.into_u32().collect(),
                None if n % 3 == 0 => (0..n as u32).collect(),
                None => continue,
            };
            if indices.is_empty() || indices.iter().any(|&i| i as usize >= n) {
                continue;
            }
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(it) => it.collect(),
                None => compute_normals(&positions, &indices),
            };
            let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
                Some(it) => it.into_f32().collect(),
                None => vec![[0.0, 0.0]; n],
            };
            if normals.len() != n || uvs.len() != n {
                continue;
            }
            let vertices = (0..n)
                .map(|i| Vertex {
                    position: positions[i],
                    normal: normals[i],
                    uv: uvs[i],
                })
                .collect();

            let skin = match (skin_index, reader.read_joints(0), reader.read_weights(0)) {
                (Some(skin), Some(j), Some(w)) => {
                    let joints: Vec<[u16; 4]> = j.into_u16().collect();
                    let weights: Vec<[f32; 4]> = w.into_f32().collect();
                    (joints.len() == n && weights.len() == n).then_some(SkinWeights {
                        skin,
                        joints,
                        weights,
                    })
                }
                _ => None,
            };

            let pbr = prim.material().pbr_metallic_roughness();
            primitives.push(Primitive {
                node: index,
                vertices,
                indices,
                material: Material {
                    base_color: pbr.base_color_factor(),
                    texture: pbr
                        .base_color_texture()
                        .map(|info| info.texture().source().index()),
                },
                skin,
            });
        }
    }
    if primitives.is_empty() {
        return Err(AssetLoadError::Empty);
    }

    let skins = doc
        .skins()
        .map(|skin| {
            let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
            let reader = skin.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let mut inverse_bind: Vec<Mat4> = match reader.read_inverse_bind_matrices() {
                Some(it) => it.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
                None => Vec::new(),
            };
            inverse_bind.resize(joints.len(), Mat4::IDENTITY);
            Skin {
                joints,
                inverse_bind,
            }
        })
        .collect();

    let textures = images.iter().map(to_rgba8).collect();
    let clips = read_clips(&doc, &buffers);

    Ok(ModelData {
        nodes,
        order,
        primitives,
        skins,
        textures,
        clips,
    })
}

fn read_clips(doc: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<AnimationClip> {
    use gltf::animation::util::ReadOutputs;

    let mut clips = Vec::new();
    for anim in doc.animations() {
        let mut channels = Vec::new();
        for ch in anim.channels() {
            let reader = ch.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            let interpolation = match ch.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };
            let values = match reader.read_outputs() {
                Some(ReadOutputs::Translations(it)) => {
                    ChannelValues::Translation(it.map(Vec3::from).collect())
                }
                Some(ReadOutputs::Rotations(r)) => {
                    ChannelValues::Rotation(r.into_f32().map(Quat::from_array).collect())
                }
                Some(ReadOutputs::Scales(it)) => ChannelValues::Scale(it.map(Vec3::from).collect()),
                // morph target weights are not animated
                _ => continue,
            };
            match Channel::new(ch.target().node().index(), interpolation, times, values) {
                Some(c) => channels.push(c),
                None => log::warn!("[load] skipping malformed animation channel"),
            }
        }
        if !channels.is_empty() {
            clips.push(AnimationClip::new(anim.name().map(str::to_owned), channels));
        }
    }
    clips
}

/// Expand an imported image to tightly packed RGBA8. `None` for formats we
/// do not decode or when the pixel count does not match the dimensions.
pub fn to_rgba8(image: &gltf::image::Data) -> Option<TextureData> {
    use gltf::image::Format;

    let rgba: Vec<u8> = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => image
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => image.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        _ => return None,
    };
    let expected = image.width as usize * image.height as usize * 4;
    (rgba.len() == expected).then_some(TextureData {
        width: image.width,
        height: image.height,
        rgba,
    })
}

/// Area-weighted smooth normals for primitives that ship without them.
pub fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// A loaded model placed in the scene.
pub struct ModelInstance {
    id: ModelId,
    data: ModelData,
    root: Mat4,
    poses: Vec<Transform>,
    world: Vec<Mat4>,
    mixer: Option<AnimationMixer>,
    skinned: Vec<Option<Vec<Vertex>>>,
}

impl ModelInstance {
    /// Applies the asset's placement and starts every clip at its speed factor.
    pub fn new(data: ModelData, asset: &ModelAsset) -> Self {
        let root = Mat4::from_scale_rotation_translation(
            Vec3::splat(asset.scale),
            Quat::IDENTITY,
            asset.position,
        );
        let poses = data.nodes.iter().map(|n| n.rest).collect();
        let world = vec![Mat4::IDENTITY; data.nodes.len()];
        let mixer = (!data.clips.is_empty())
            .then(|| AnimationMixer::play_all(data.clips.len(), asset.animation_speed));
        let skinned = vec![None; data.primitives.len()];
        let mut instance = Self {
            id: asset.id,
            data,
            root,
            poses,
            world,
            mixer,
            skinned,
        };
        instance.refresh();
        instance
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn data(&self) -> &ModelData {
        &self.data
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    pub fn stop_animation(&mut self) {
        if let Some(m) = &mut self.mixer {
            m.stop_all();
        }
    }

    /// Step the animation. Returns `true` if poses changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(mixer) = self.mixer.as_mut().filter(|m| m.is_playing()) else {
            return false;
        };
        mixer.update(dt, &self.data.clips, &mut self.poses);
        self.refresh();
        true
    }

    /// Current vertices of primitive `i`, skinned if it has a skin.
    pub fn vertices(&self, i: usize) -> &[Vertex] {
        match self.skinned.get(i) {
            Some(Some(v)) => v,
            _ => &self.data.primitives[i].vertices,
        }
    }

    pub fn is_skinned(&self, i: usize) -> bool {
        self.skinned.get(i).is_some_and(Option::is_some)
    }

    /// Object-to-world matrix for primitive `i`. Skinned vertices are already
    /// in scene space, so only the root placement applies to them.
    pub fn model_matrix(&self, i: usize) -> Mat4 {
        let prim = &self.data.primitives[i];
        if self.is_skinned(i) {
            self.root
        } else {
            self.root * self.world.get(prim.node).copied().unwrap_or(Mat4::IDENTITY)
        }
    }

    fn refresh(&mut self) {
        for &i in &self.data.order {
            let local = self.poses[i].matrix();
            self.world[i] = match self.data.nodes[i].parent {
                Some(p) => self.world[p] * local,
                None => local,
            };
        }
        for (i, prim) in self.data.primitives.iter().enumerate() {
            let Some(weights) = &prim.skin else {
                continue;
            };
            let Some(skin) = self.data.skins.get(weights.skin) else {
                continue;
            };
            let out = self.skinned[i].get_or_insert_with(Vec::new);
            skin_vertices(&prim.vertices, weights, skin, &self.world, out);
        }
    }
}

fn skin_vertices(
    vertices: &[Vertex],
    weights: &SkinWeights,
    skin: &Skin,
    world: &[Mat4],
    out: &mut Vec<Vertex>,
) {
    let joint_matrices: Vec<Mat4> = skin
        .joints
        .iter()
        .zip(&skin.inverse_bind)
        .map(|(&j, ib)| world.get(j).copied().unwrap_or(Mat4::IDENTITY) * *ib)
        .collect();
    out.clear();
    for (i, v) in vertices.iter().enumerate() {
        let mut m = Mat4::ZERO;
        let mut total = 0.0;
        for k in 0..4 {
            let w = weights.weights[i][k];
            if w <= 0.0 {
                continue;
            }
            if let Some(jm) = joint_matrices.get(weights.joints[i][k] as usize) {
                m += *jm * w;
                total += w;
            }
        }
        let m = if total > 0.0 { m * (1.0 / total) } else { Mat4::IDENTITY };
        let position = m.transform_point3(Vec3::from(v.position));
        let normal = m
            .transform_vector3(Vec3::from(v.normal))
            .try_normalize()
            .unwrap_or(Vec3::Y);
        out.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: v.uv,
        });
    }
}
