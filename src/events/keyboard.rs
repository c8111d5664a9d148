use crate::core::ViewerCommand;
use crate::host::SharedController;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, controller: &SharedController) {
    // Leave browser shortcuts and auto-repeat alone.
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() || ev.repeat() {
        return;
    }
    if let Some(command) = ViewerCommand::for_key(&ev.key()) {
        log::info!("[keys] {:?}", command);
        controller.borrow_mut().dispatch(command);
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(controller: SharedController) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &controller);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
