use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Looping party track backed by an `<audio>` element.
pub struct PartyAudio {
    element: web::HtmlAudioElement,
}

impl PartyAudio {
    pub fn new(src: &str) -> Result<Self, ()> {
        let element = web::HtmlAudioElement::new_with_src(src).map_err(|e| {
            log::error!("[audio] HtmlAudioElement error: {:?}", e);
        })?;
        element.set_loop(true);
        Ok(Self { element })
    }

    pub fn play(&self) {
        match self.element.play() {
            // Browsers reject play() until the page has seen a user gesture.
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] play rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] play error: {:?}", e),
        }
    }

    /// Pause and rewind to the start.
    pub fn stop(&self) {
        _ = self.element.pause();
        self.element.set_current_time(0.0);
    }
}
