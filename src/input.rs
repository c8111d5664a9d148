use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Primary button orbits, secondary (or shift + primary) pans.
#[inline]
pub fn drag_mode_for(button: i16, shift: bool) -> Option<DragMode> {
    match button {
        0 if shift => Some(DragMode::Pan),
        0 => Some(DragMode::Rotate),
        2 => Some(DragMode::Pan),
        _ => None,
    }
}

#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub mode: Option<DragMode>,
    pub pointer_id: i32,
    pub last: Vec2,
}

impl DragState {
    pub fn begin(&mut self, mode: DragMode, pointer_id: i32, pos: Vec2) {
        self.mode = Some(mode);
        self.pointer_id = pointer_id;
        self.last = pos;
    }

    /// Movement since the last event for the captured pointer.
    pub fn moved(&mut self, pointer_id: i32, pos: Vec2) -> Option<(DragMode, Vec2)> {
        let mode = self.mode?;
        if pointer_id != self.pointer_id {
            return None;
        }
        let delta = pos - self.last;
        self.last = pos;
        Some((mode, delta))
    }

    pub fn end(&mut self, pointer_id: i32) -> bool {
        if self.mode.is_some() && pointer_id == self.pointer_id {
            self.mode = None;
            true
        } else {
            false
        }
    }
}
