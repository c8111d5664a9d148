// Host-side tests for glTF import and model instances.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]

mod core {
    pub mod animation {
        include!("../src/core/animation.rs");
    }
    pub mod catalog {
        include!("../src/core/catalog.rs");
    }
    pub mod error {
        include!("../src/core/error.rs");
    }
    pub mod model {
        include!("../src/core/model.rs");
    }
}

use crate::core::catalog::ModelId;
use crate::core::error::AssetLoadError;
use crate::core::model::*;
use glam::{Mat4, Quat, Vec3};

// One triangle on a child node, plus a clip that slides the parent up by one
// unit over one second.
const TRIANGLE_JSON: &str = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0]}],
  "nodes": [
    {"children": [1]},
    {"mesh": 0, "translation": [0.0, 1.0, 0.0]}
  ],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
  "animations": [{
    "name": "bob",
    "channels": [{"sampler": 0, "target": {"node": 0, "path": "translation"}}],
    "samplers": [{"input": 2, "output": 3}]
  }],
  "buffers": [{"byteLength": 76}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 6},
    {"buffer": 0, "byteOffset": 44, "byteLength": 8},
    {"buffer": 0, "byteOffset": 52, "byteLength": 24}
  ],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
     "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
    {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"},
    {"bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR",
     "min": [0.0], "max": [1.0]},
    {"bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC3"}
  ]
}"#;

fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for f in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        bin.extend_from_slice(&f.to_le_bytes());
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    for f in [0.0f32, 1.0] {
        bin.extend_from_slice(&f.to_le_bytes());
    }
    for f in [0.0f32, 1.0, 0.0, 0.0, 2.0, 0.0] {
        bin.extend_from_slice(&f.to_le_bytes());
    }
    assert_eq!(bin.len(), 76);
    bin
}

fn chunk(out: &mut Vec<u8>, kind: u32, mut data: Vec<u8>, pad: u8) {
    while data.len() % 4 != 0 {
        data.push(pad);
    }
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&data);
}

fn glb(json: &str, bin: Option<Vec<u8>>) -> Vec<u8> {
    let mut body = Vec::new();
    chunk(&mut body, 0x4E4F_534A, json.as_bytes().to_vec(), b' ');
    if let Some(bin) = bin {
        chunk(&mut body, 0x004E_4942, bin, 0);
    }
    let mut out = Vec::new();
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&((12 + body.len()) as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

fn triangle() -> ModelData {
    parse_glb(&glb(TRIANGLE_JSON, Some(triangle_bin()))).expect("valid glb")
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

#[test]
fn parses_triangle_geometry() {
    let data = triangle();
    assert_eq!(data.primitives.len(), 1);
    let prim = &data.primitives[0];
    assert_eq!(prim.node, 1);
    assert_eq!(prim.indices, vec![0, 1, 2]);
    assert_eq!(prim.vertices.len(), 3);
    assert_eq!(prim.vertices[1].position, [1.0, 0.0, 0.0]);
    // No NORMAL attribute: face normal is computed.
    for v in &prim.vertices {
        assert!(approx(Vec3::from(v.normal), Vec3::Z));
        assert_eq!(v.uv, [0.0, 0.0]);
    }
    assert_eq!(prim.material, Material::default());
    assert!(prim.skin.is_none());
    assert!(data.textures.is_empty());
}

#[test]
fn parses_hierarchy_and_clips() {
    let data = triangle();
    assert_eq!(data.nodes.len(), 2);
    assert_eq!(data.order, vec![0, 1]);
    assert_eq!(data.nodes[0].parent, None);
    assert_eq!(data.nodes[1].parent, Some(0));
    assert!(approx(data.nodes[1].rest.translation, Vec3::Y));

    assert_eq!(data.clips.len(), 1);
    let clip = &data.clips[0];
    assert_eq!(clip.name.as_deref(), Some("bob"));
    assert_eq!(clip.duration, 1.0);
    assert_eq!(clip.channels[0].node, 0);
}

#[test]
fn rejects_garbage() {
    match parse_glb(b"not a gltf file") {
        Err(AssetLoadError::Parse(_)) => {}
        other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn rejects_scene_without_meshes() {
    let json = r#"{"asset": {"version": "2.0"}, "scene": 0,
        "scenes": [{"nodes": [0]}], "nodes": [{}]}"#;
    match parse_glb(&glb(json, None)) {
        Err(AssetLoadError::Empty) => {}
        other => panic!("expected empty error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn instance_applies_asset_placement() {
    let instance = ModelInstance::new(triangle(), ModelId::Lucario.asset());
    assert_eq!(instance.id(), ModelId::Lucario);
    // Lucario sits half a unit lower at unit scale; the mesh node is one unit up.
    let origin = instance.model_matrix(0).transform_point3(Vec3::ZERO);
    assert!(approx(origin, Vec3::new(0.0, 0.5, 0.0)));
    assert!(instance.mixer().is_some_and(|m| m.is_playing()));
    assert!(!instance.is_skinned(0));
}

#[test]
fn advance_plays_clip_at_asset_speed() {
    // Gengar: scale 0.7, speed 0.7.
    let mut instance = ModelInstance::new(triangle(), ModelId::Gengar.asset());
    let action = instance.mixer().expect("mixer").actions()[0];
    assert_eq!(action.time_scale, 0.7);

    assert!(instance.advance(0.5));
    // Clip time 0.35: parent at y = 1.35, child one unit above, all scaled by 0.7.
    let origin = instance.model_matrix(0).transform_point3(Vec3::ZERO);
    assert!(approx(origin, Vec3::new(0.0, 2.35 * 0.7, 0.0)), "{origin:?}");
}

#[test]
fn stopped_instance_no_longer_advances() {
    let mut instance = ModelInstance::new(triangle(), ModelId::Meloetta.asset());
    instance.stop_animation();
    assert!(!instance.mixer().is_some_and(|m| m.is_playing()));
    assert!(!instance.advance(0.1));
}

#[test]
fn unskinned_vertices_are_the_parsed_ones() {
    let data = triangle();
    let expected = data.primitives[0].vertices.clone();
    let instance = ModelInstance::new(data, ModelId::Gengar.asset());
    assert_eq!(instance.data().primitives.len(), 1);
    assert_eq!(instance.vertices(0), expected.as_slice());
}

#[test]
fn computed_normals_are_unit_length() {
    let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [2.0, 0.0, 0.0], [5.0, 5.0, 5.0]];
    let normals = compute_normals(&positions, &[0, 1, 2]);
    for n in &normals[..3] {
        assert!(approx(Vec3::from(*n), Vec3::Y));
    }
    // Unreferenced vertices fall back to +Y.
    assert_eq!(normals[3], [0.0, 1.0, 0.0]);
}

// A triangle bound to a single joint at x = 2. The inverse bind matrix undoes
// the joint's rest translation, and the clip holds the joint rotated a quarter
// turn about +Z. The mesh node sits at z = 5, which skinning must ignore.
const SKINNED_JSON: &str = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0, 1]}],
  "nodes": [
    {"mesh": 0, "skin": 0, "translation": [0.0, 0.0, 5.0]},
    {"translation": [2.0, 0.0, 0.0]}
  ],
  "meshes": [{"primitives": [{
    "attributes": {"POSITION": 0, "JOINTS_0": 2, "WEIGHTS_0": 3},
    "indices": 1
  }]}],
  "skins": [{"joints": [1], "inverseBindMatrices": 4}],
  "animations": [{
    "name": "turn",
    "channels": [{"sampler": 0, "target": {"node": 1, "path": "rotation"}}],
    "samplers": [{"input": 5, "output": 6}]
  }],
  "buffers": [{"byteLength": 220}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 6},
    {"buffer": 0, "byteOffset": 44, "byteLength": 24},
    {"buffer": 0, "byteOffset": 68, "byteLength": 48},
    {"buffer": 0, "byteOffset": 116, "byteLength": 64},
    {"buffer": 0, "byteOffset": 180, "byteLength": 8},
    {"buffer": 0, "byteOffset": 188, "byteLength": 32}
  ],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
     "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
    {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"},
    {"bufferView": 2, "componentType": 5123, "count": 3, "type": "VEC4"},
    {"bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC4"},
    {"bufferView": 4, "componentType": 5126, "count": 1, "type": "MAT4"},
    {"bufferView": 5, "componentType": 5126, "count": 2, "type": "SCALAR",
     "min": [0.0], "max": [1.0]},
    {"bufferView": 6, "componentType": 5126, "count": 2, "type": "VEC4"}
  ]
}"#;

fn floats(bin: &mut Vec<u8>, values: &[f32]) {
    for f in values {
        bin.extend_from_slice(&f.to_le_bytes());
    }
}

fn skinned_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    floats(&mut bin, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    // Every vertex fully weighted to joint 0.
    for _ in 0..3 {
        for j in [0u16, 0, 0, 0] {
            bin.extend_from_slice(&j.to_le_bytes());
        }
    }
    for _ in 0..3 {
        floats(&mut bin, &[1.0, 0.0, 0.0, 0.0]);
    }
    floats(
        &mut bin,
        &Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)).to_cols_array(),
    );
    floats(&mut bin, &[0.0, 1.0]);
    let quarter = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2).to_array();
    floats(&mut bin, &quarter);
    floats(&mut bin, &quarter);
    assert_eq!(bin.len(), 220);
    bin
}

#[test]
fn skinned_vertices_follow_the_joint() {
    let data = parse_glb(&glb(SKINNED_JSON, Some(skinned_bin()))).expect("valid glb");
    assert_eq!(data.skins.len(), 1);
    assert_eq!(data.skins[0].joints, vec![1]);
    let weights = data.primitives[0].skin.as_ref().expect("skin weights");
    assert_eq!(weights.joints[2], [0, 0, 0, 0]);

    let asset = ModelId::Lucario.asset();
    let mut instance = ModelInstance::new(data, asset);
    assert!(instance.is_skinned(0));
    // At rest the inverse bind cancels the joint transform.
    let rest: Vec<Vec3> = instance
        .vertices(0)
        .iter()
        .map(|v| Vec3::from(v.position))
        .collect();
    assert!(approx(rest[0], Vec3::X));
    assert!(approx(rest[1], Vec3::Y));
    assert!(approx(rest[2], Vec3::new(1.0, 1.0, 0.0)));

    assert!(instance.advance(0.1));
    let posed = instance.vertices(0);
    // Quarter turn about the joint at (2, 0, 0).
    assert!(approx(Vec3::from(posed[0].position), Vec3::new(2.0, -1.0, 0.0)));
    assert!(approx(Vec3::from(posed[1].position), Vec3::new(1.0, -2.0, 0.0)));
    assert!(approx(Vec3::from(posed[2].position), Vec3::new(1.0, -1.0, 0.0)));
    assert!(approx(Vec3::from(posed[0].normal), Vec3::NEG_Z));

    // Only the asset placement applies; the mesh node's own offset does not.
    let expected = Mat4::from_scale_rotation_translation(
        Vec3::splat(asset.scale),
        Quat::IDENTITY,
        asset.position,
    );
    assert!(instance.model_matrix(0).abs_diff_eq(expected, 1e-5));
}

fn image(
    format: gltf::image::Format,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
) -> gltf::image::Data {
    gltf::image::Data {
        pixels,
        format,
        width,
        height,
    }
}

#[test]
fn rgb_and_grey_images_expand_to_opaque_rgba() {
    use gltf::image::Format;

    let rgb = to_rgba8(&image(Format::R8G8B8, 2, 1, vec![10, 20, 30, 40, 50, 60]))
        .expect("rgb decodes");
    assert_eq!((rgb.width, rgb.height), (2, 1));
    assert_eq!(rgb.rgba, vec![10, 20, 30, 255, 40, 50, 60, 255]);

    let grey = to_rgba8(&image(Format::R8, 1, 2, vec![7, 200])).expect("grey decodes");
    assert_eq!(grey.rgba, vec![7, 7, 7, 255, 200, 200, 200, 255]);

    let rgba = vec![1, 2, 3, 4];
    let same = to_rgba8(&image(Format::R8G8B8A8, 1, 1, rgba.clone())).expect("rgba decodes");
    assert_eq!(same.rgba, rgba);
}

#[test]
fn image_with_wrong_pixel_count_is_dropped() {
    use gltf::image::Format;

    // 2x2 RGB needs 12 bytes.
    assert!(to_rgba8(&image(Format::R8G8B8, 2, 2, vec![0; 9])).is_none());
    assert!(to_rgba8(&image(Format::R8, 3, 1, vec![0; 2])).is_none());
    // 16-bit channels are not decoded.
    assert!(to_rgba8(&image(Format::R16G16B16, 1, 1, vec![0; 6])).is_none());
}
