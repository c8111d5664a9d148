use crate::core::constants::ANIMATION_STEP_SEC;
use crate::core::OrbitCamera;
use crate::host::SharedController;
use crate::render::{self, SceneSlot};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const STATS_WINDOW: Duration = Duration::from_secs(5);

pub struct FrameContext<'a> {
    pub controller: SharedController,
    pub scene: Rc<RefCell<SceneSlot>>,
    pub orbit: Rc<RefCell<OrbitCamera>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,

    pub last_instant: Instant,
    pub stats_elapsed: Duration,
    pub stats_frames: u32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        self.track_rate(now - self.last_instant);
        self.last_instant = now;

        self.orbit.borrow_mut().update();
        let mut scene = self.scene.borrow_mut();
        // Fixed step per frame, independent of the display refresh rate.
        let pose_changed = scene.advance(ANIMATION_STEP_SEC);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            let controller = self.controller.borrow();
            let orbit = self.orbit.borrow();
            if let Err(e) = g.render(&orbit, controller.lighting(), &mut scene, pose_changed) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    fn track_rate(&mut self, dt: Duration) {
        self.stats_elapsed += dt;
        self.stats_frames += 1;
        if self.stats_elapsed >= STATS_WINDOW {
            let fps = self.stats_frames as f32 / self.stats_elapsed.as_secs_f32();
            log::debug!("[frame] {:.1} fps", fps);
            self.stats_elapsed = Duration::ZERO;
            self.stats_frames = 0;
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
