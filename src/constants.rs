// Page wiring and render tuning for the web front-end.
//
// Viewer policy (party period, camera, lights) lives in `core::constants`;
// this module only holds what depends on the hosting page and the GPU.
// DOM hooks
pub const CANVAS_SELECTOR: &str = "canvas.webgl";
pub const NEXT_BUTTON_SELECTOR: &str = ".right-button";
pub const PREVIOUS_BUTTON_SELECTOR: &str = ".left-button";
pub const PARTY_BUTTON_SELECTOR: &str = ".party-button";
pub const THUMBNAIL_SELECTOR: &str = ".image-overlay.bottom img";

// Assets are fetched relative to the page.
pub const ASSET_BASE: &str = "";
pub const PARTY_AUDIO_PATH: &str = "rolita.mp3";

// Output surface
pub const MAX_PIXEL_RATIO: f64 = 2.0; // cap devicePixelRatio for the backing store

