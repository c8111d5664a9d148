use crate::constants::ASSET_BASE;
use crate::core::{parse_glb, AssetLoadError, ModelAsset, ModelData};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub fn asset_url(path: &str) -> String {
    format!("{}{}", ASSET_BASE, path)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetLoadError> {
    let fetch_err = |reason: String| AssetLoadError::Fetch {
        url: url.to_string(),
        reason,
    };
    let window = web::window().ok_or_else(|| fetch_err("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?
        .dyn_into::<web::Response>()
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(AssetLoadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    let promise = resp
        .array_buffer()
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let buf = JsFuture::from(promise)
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Fetch and decode a model's mesh.
pub async fn load_model(asset: &ModelAsset) -> Result<ModelData, AssetLoadError> {
    let url = asset_url(asset.mesh_path);
    let bytes = fetch_bytes(&url).await?;
    log::info!("[load] {} fetched ({} bytes)", asset.name, bytes.len());
    parse_glb(&bytes)
}
