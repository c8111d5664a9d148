// Five-light rig with a fixed "restored" palette and a randomised party palette.

use super::constants::{
    AMBIENT_COLOR, BACKGROUND_RESTORED, DIRECTIONAL_COLOR, HEMISPHERE_COLOR,
    HEMISPHERE_GROUND_COLOR, POINT1_COLOR, POINT2_COLOR,
};
use glam::Vec3;
use rand::Rng;

/// Largest 24-bit colour value.
pub const MAX_HEX: u32 = 0xffffff;

/// Convert a 24-bit sRGB hex colour to linear RGB in `[0, 1]`.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    Hemisphere { ground_color: u32, up: Vec3 },
    Point { position: Vec3, range: f32 },
    /// Shines from `position` towards the origin.
    Directional { position: Vec3 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightDescriptor {
    pub name: &'static str,
    pub kind: LightKind,
    pub base_color: u32,
    pub color: u32,
    pub intensity: f32,
}

impl LightDescriptor {
    fn new(name: &'static str, kind: LightKind, base_color: u32, intensity: f32) -> Self {
        Self {
            name,
            kind,
            base_color,
            color: base_color,
            intensity,
        }
    }

    /// Linear RGB premultiplied by intensity, as consumed by the shader.
    pub fn radiance(&self) -> [f32; 3] {
        let [r, g, b] = hex_to_linear(self.color);
        [r * self.intensity, g * self.intensity, b * self.intensity]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightingMode {
    Restored,
    Party,
}

#[derive(Clone, Debug)]
pub struct LightingRig {
    lights: Vec<LightDescriptor>,
    background: u32,
    mode: LightingMode,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self::new()
    }
}

impl LightingRig {
    pub fn new() -> Self {
        let lights = vec![
            LightDescriptor::new("ambient", LightKind::Ambient, AMBIENT_COLOR, 2.0),
            LightDescriptor::new(
                "hemisphere",
                LightKind::Hemisphere {
                    ground_color: HEMISPHERE_GROUND_COLOR,
                    up: Vec3::Y,
                },
                HEMISPHERE_COLOR,
                1.5,
            ),
            LightDescriptor::new(
                "point1",
                LightKind::Point {
                    position: Vec3::new(3.0, 3.0, 3.0),
                    range: 10.0,
                },
                POINT1_COLOR,
                1.0,
            ),
            LightDescriptor::new(
                "point2",
                LightKind::Point {
                    position: Vec3::new(-3.0, 3.0, -3.0),
                    range: 10.0,
                },
                POINT2_COLOR,
                1.0,
            ),
            LightDescriptor::new(
                "directional",
                LightKind::Directional {
                    position: Vec3::new(5.0, 5.0, 5.0),
                },
                DIRECTIONAL_COLOR,
                1.5,
            ),
        ];
        Self {
            lights,
            background: BACKGROUND_RESTORED,
            mode: LightingMode::Restored,
        }
    }

    pub fn lights(&self) -> &[LightDescriptor] {
        &self.lights
    }

    pub fn light(&self, name: &str) -> Option<&LightDescriptor> {
        self.lights.iter().find(|l| l.name == name)
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn mode(&self) -> LightingMode {
        self.mode
    }

    /// Draw a new random colour for every light. The background follows the
    /// ambient light's colour.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for light in &mut self.lights {
            light.color = rng.gen_range(0..=MAX_HEX);
        }
        self.background = self
            .lights
            .iter()
            .find(|l| matches!(l.kind, LightKind::Ambient))
            .map(|l| l.color)
            .unwrap_or(BACKGROUND_RESTORED);
        self.mode = LightingMode::Party;
    }

    pub fn restore(&mut self) {
        for light in &mut self.lights {
            light.color = light.base_color;
        }
        self.background = BACKGROUND_RESTORED;
        self.mode = LightingMode::Restored;
    }
}
