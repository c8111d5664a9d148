#![cfg(target_arch = "wasm32")]
use crate::constants::{
    CANVAS_SELECTOR, NEXT_BUTTON_SELECTOR, PARTY_BUTTON_SELECTOR, PREVIOUS_BUTTON_SELECTOR,
};
use crate::core::constants::CAMERA_EYE;
use crate::core::{OrbitCamera, ViewerCommand};
use crate::host::{SharedController, WebHost};
use glam::Vec3;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod host;
mod input;
mod loader;
mod render;
mod timer;

// Maintain canvas internal pixel size to match CSS size * devicePixelRatio
fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, orbit: &Rc<RefCell<OrbitCamera>>) {
    let (w, h) = dom::sync_canvas_backing_size(canvas);
    orbit.borrow_mut().set_viewport(w, h);
    let canvas_resize = canvas.clone();
    let orbit_resize = orbit.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        let (w, h) = dom::sync_canvas_backing_size(&canvas_resize);
        orbit_resize.borrow_mut().set_viewport(w, h);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_buttons(document: &web::Document, controller: &SharedController) {
    let bindings = [
        (NEXT_BUTTON_SELECTOR, ViewerCommand::Next),
        (PREVIOUS_BUTTON_SELECTOR, ViewerCommand::Previous),
        (PARTY_BUTTON_SELECTOR, ViewerCommand::ToggleParty),
    ];
    for (selector, command) in bindings {
        let controller = controller.clone();
        dom::add_click_listener(document, selector, move || {
            controller.borrow_mut().dispatch(command);
        });
    }
}

// Stop the party and release the model when the page is unloaded. A page
// entering the back/forward cache is kept intact so it resumes as it was.
fn wire_teardown(controller: &SharedController) {
    let controller = controller.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        if ev.persisted() {
            log::info!("[viewer] page cached, keeping scene");
            return;
        }
        controller.borrow_mut().dispose();
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("viewer-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = dom::query(&document, CANVAS_SELECTOR)
        .ok_or_else(|| anyhow::anyhow!("missing {}", CANVAS_SELECTOR))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let orbit = Rc::new(RefCell::new(OrbitCamera::new(
        Vec3::from(CAMERA_EYE),
        Vec3::ZERO,
        1.0,
    )));
    wire_canvas_resize(&canvas, &orbit);

    let scene = Rc::new(RefCell::new(render::SceneSlot::default()));
    let seed = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
    let controller = WebHost::create_controller(scene.clone(), document.clone(), seed);

    wire_buttons(&document, &controller);
    events::wire_global_keydown(controller.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        orbit: orbit.clone(),
        drag_state: Rc::new(RefCell::new(input::DragState::default())),
    });
    wire_teardown(&controller);

    // The model starts loading while the GPU initialises; it is uploaded on the first frame.
    controller.borrow_mut().start();

    let gpu: Option<render::GpuState> = frame::init_gpu(&canvas).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        controller,
        scene,
        orbit,
        canvas,
        gpu,
        last_instant: Instant::now(),
        stats_elapsed: Duration::ZERO,
        stats_frames: 0,
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}
