// Keyframe animation clips and a looping mixer.
//
// Clips animate node translation, rotation and scale. The mixer plays every
// clip in loop-repeat mode and writes sampled values into a per-node pose
// array owned by the model instance.

use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;
use std::ops::{Add, Mul};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    /// Values are stored as `[in_tangent, value, out_tangent]` triplets.
    CubicSpline,
}

#[derive(Clone, Debug)]
pub enum ChannelValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl ChannelValues {
    fn len(&self) -> usize {
        match self {
            ChannelValues::Translation(v) | ChannelValues::Scale(v) => v.len(),
            ChannelValues::Rotation(v) => v.len(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Channel {
    pub node: usize,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub values: ChannelValues,
}

impl Channel {
    /// Returns `None` when the key and value counts disagree.
    pub fn new(
        node: usize,
        interpolation: Interpolation,
        times: Vec<f32>,
        values: ChannelValues,
    ) -> Option<Self> {
        let per_key = match interpolation {
            Interpolation::CubicSpline => 3,
            _ => 1,
        };
        if times.is_empty() || values.len() != times.len() * per_key {
            return None;
        }
        Some(Self {
            node,
            interpolation,
            times,
            values,
        })
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn apply(&self, t: f32, pose: &mut Transform) {
        match &self.values {
            ChannelValues::Translation(v) => {
                pose.translation = sample(self.interpolation, &self.times, v, t, Vec3::lerp);
            }
            ChannelValues::Rotation(v) => {
                pose.rotation =
                    sample(self.interpolation, &self.times, v, t, Quat::slerp).normalize();
            }
            ChannelValues::Scale(v) => {
                pose.scale = sample(self.interpolation, &self.times, v, t, Vec3::lerp);
            }
        }
    }
}

/// Keyframe pair bracketing `t`: `(i0, i1, u, dt)`. Clamps outside the range.
fn segment(times: &[f32], t: f32) -> (usize, usize, f32, f32) {
    let last = times.len() - 1;
    if t <= times[0] {
        return (0, 0, 0.0, 0.0);
    }
    if t >= times[last] {
        return (last, last, 0.0, 0.0);
    }
    let i1 = times.partition_point(|&k| k <= t);
    let i0 = i1 - 1;
    let dt = times[i1] - times[i0];
    let u = if dt > 0.0 { (t - times[i0]) / dt } else { 0.0 };
    (i0, i1, u, dt)
}

fn sample<T>(
    interpolation: Interpolation,
    times: &[f32],
    values: &[T],
    t: f32,
    lerp: impl Fn(T, T, f32) -> T,
) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let (i0, i1, u, dt) = segment(times, t);
    match interpolation {
        Interpolation::Step => values[i0],
        Interpolation::Linear => {
            if i0 == i1 {
                values[i0]
            } else {
                lerp(values[i0], values[i1], u)
            }
        }
        Interpolation::CubicSpline => {
            let value = |k: usize| values[3 * k + 1];
            if i0 == i1 {
                return value(i0);
            }
            let out0 = values[3 * i0 + 2];
            let in1 = values[3 * i1];
            let u2 = u * u;
            let u3 = u2 * u;
            value(i0) * (2.0 * u3 - 3.0 * u2 + 1.0)
                + out0 * ((u3 - 2.0 * u2 + u) * dt)
                + value(i1) * (-2.0 * u3 + 3.0 * u2)
                + in1 * ((u3 - u2) * dt)
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: Option<String>,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    pub fn new(name: Option<String>, channels: Vec<Channel>) -> Self {
        let duration = channels.iter().map(Channel::end_time).fold(0.0, f32::max);
        Self {
            name,
            duration,
            channels,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipAction {
    pub clip: usize,
    pub time: f32,
    pub time_scale: f32,
}

/// Plays a set of clips in loop-repeat mode at a shared time scale.
#[derive(Clone, Debug, Default)]
pub struct AnimationMixer {
    actions: SmallVec<[ClipAction; 4]>,
}

impl AnimationMixer {
    /// One running action per clip.
    pub fn play_all(clip_count: usize, time_scale: f32) -> Self {
        let actions = (0..clip_count)
            .map(|clip| ClipAction {
                clip,
                time: 0.0,
                time_scale,
            })
            .collect();
        Self { actions }
    }

    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    pub fn is_playing(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn stop_all(&mut self) {
        self.actions.clear();
    }

    /// Advance every action by `dt` seconds (scaled) and write the sampled
    /// values into `poses`, indexed by node.
    pub fn update(&mut self, dt: f32, clips: &[AnimationClip], poses: &mut [Transform]) {
        for action in &mut self.actions {
            let Some(clip) = clips.get(action.clip) else {
                continue;
            };
            action.time += dt * action.time_scale;
            if clip.duration > 0.0 {
                action.time = action.time.rem_euclid(clip.duration);
            }
            for channel in &clip.channels {
                if let Some(pose) = poses.get_mut(channel.node) {
                    channel.apply(action.time, pose);
                }
            }
        }
    }
}
