// Host-side tests for keyboard shortcuts.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]

mod core {
    pub mod catalog {
        include!("../src/core/catalog.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod controller {
        include!("../src/core/controller.rs");
    }
    pub mod error {
        include!("../src/core/error.rs");
    }
    pub mod lighting {
        include!("../src/core/lighting.rs");
    }
}

use crate::core::controller::ViewerCommand;

#[test]
fn arrows_navigate() {
    assert_eq!(ViewerCommand::for_key("ArrowRight"), Some(ViewerCommand::Next));
    assert_eq!(ViewerCommand::for_key("ArrowLeft"), Some(ViewerCommand::Previous));
}

#[test]
fn party_keys() {
    for key in ["p", "P", " "] {
        assert_eq!(
            ViewerCommand::for_key(key),
            Some(ViewerCommand::ToggleParty),
            "{key:?}"
        );
    }
}

#[test]
fn other_keys_are_ignored() {
    for key in ["", "ArrowUp", "ArrowDown", "Enter", "Escape", "q", "Spacebar", "right"] {
        assert_eq!(ViewerCommand::for_key(key), None, "{key:?}");
    }
}
