pub mod animation;
pub mod catalog;
pub mod constants;
pub mod controller;
pub mod error;
pub mod lighting;
pub mod model;
pub mod orbit;

pub use catalog::*;
pub use controller::*;
pub use error::AssetLoadError;
pub use lighting::*;
pub use model::{parse_glb, ModelData, ModelInstance, Vertex};
pub use orbit::OrbitCamera;

// Shaders bundled as string constants
pub static MODEL_WGSL: &str = include_str!("../../shaders/model.wgsl");
