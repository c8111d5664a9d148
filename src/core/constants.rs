// Viewer policy shared by the controller and the frame loop.

// Party mode
pub const PARTY_TICK_MS: u32 = 500; // light/background re-randomisation period

// Animation
pub const ANIMATION_STEP_SEC: f32 = 0.01; // fixed mixer step per rendered frame

// Materials
pub const ALPHA_CUTOFF: f32 = 0.5;

// Colours are 24-bit sRGB hex values, as authored.
pub const BACKGROUND_RESTORED: u32 = 0x000000;
pub const AMBIENT_COLOR: u32 = 0x404040;
pub const HEMISPHERE_COLOR: u32 = 0x444444;
pub const HEMISPHERE_GROUND_COLOR: u32 = 0x444444;
pub const POINT1_COLOR: u32 = 0xffffff;
pub const POINT2_COLOR: u32 = 0xffffff;
pub const DIRECTIONAL_COLOR: u32 = 0xffffff;

// Camera
pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_EYE: [f32; 3] = [0.0, 2.0, 6.0];

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.05; // fraction of pending motion applied per update
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // radius multiplier per wheel notch
pub const ORBIT_MIN_RADIUS: f32 = 0.5;
pub const ORBIT_MAX_RADIUS: f32 = 50.0;
pub const ORBIT_POLAR_EPS: f32 = 1e-3;
