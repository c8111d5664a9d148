use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A `setInterval` registration; cleared when dropped.
pub struct IntervalTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn start(period_ms: u32, callback: impl FnMut() + 'static) -> Result<Self, ()> {
        let window = web::window().ok_or(())?;
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .map_err(|e| {
                log::error!("[timer] setInterval error: {:?}", e);
            })?;
        Ok(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        if let Some(window) = web::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}
