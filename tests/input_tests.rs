// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn buttons_map_to_drag_modes() {
    assert_eq!(drag_mode_for(0, false), Some(DragMode::Rotate));
    assert_eq!(drag_mode_for(0, true), Some(DragMode::Pan));
    assert_eq!(drag_mode_for(2, false), Some(DragMode::Pan));
    assert_eq!(drag_mode_for(1, false), None);
    assert_eq!(drag_mode_for(3, true), None);
}

#[test]
fn drag_reports_incremental_deltas() {
    let mut drag = DragState::default();
    assert_eq!(drag.moved(1, Vec2::new(5.0, 5.0)), None);

    drag.begin(DragMode::Rotate, 1, Vec2::new(10.0, 10.0));
    assert_eq!(
        drag.moved(1, Vec2::new(15.0, 8.0)),
        Some((DragMode::Rotate, Vec2::new(5.0, -2.0)))
    );
    assert_eq!(
        drag.moved(1, Vec2::new(16.0, 8.0)),
        Some((DragMode::Rotate, Vec2::new(1.0, 0.0)))
    );
}

#[test]
fn other_pointers_are_ignored() {
    let mut drag = DragState::default();
    drag.begin(DragMode::Pan, 7, Vec2::ZERO);
    assert_eq!(drag.moved(8, Vec2::new(3.0, 3.0)), None);
    assert!(!drag.end(8));
    assert!(drag.mode.is_some());
    assert!(drag.end(7));
    assert!(drag.mode.is_none());
    assert!(!drag.end(7));
}
