use crate::audio::PartyAudio;
use crate::constants::{PARTY_AUDIO_PATH, THUMBNAIL_SELECTOR};
use crate::core::{LoadTicket, ModelAsset, ModelData, ModelInstance, ViewerController, ViewerHost};
use crate::dom;
use crate::loader;
use crate::render::SceneSlot;
use crate::timer::IntervalTimer;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type WebController = ViewerController<WebHost>;
pub type SharedController = Rc<RefCell<WebController>>;

/// Browser side of the viewer: fetches models, owns the party timer and
/// audio element, and hands loaded models to the shared scene slot.
pub struct WebHost {
    controller: Weak<RefCell<WebController>>,
    scene: Rc<RefCell<SceneSlot>>,
    document: web::Document,
    party_timer: Option<IntervalTimer>,
    party_audio: Option<PartyAudio>,
}

impl WebHost {
    /// Build the controller together with its host; the host keeps a weak
    /// handle back so timer ticks and load completions can reach it.
    pub fn create_controller(
        scene: Rc<RefCell<SceneSlot>>,
        document: web::Document,
        seed: u64,
    ) -> SharedController {
        Rc::new_cyclic(|weak| {
            let host = WebHost {
                controller: weak.clone(),
                scene,
                document,
                party_timer: None,
                party_audio: None,
            };
            RefCell::new(ViewerController::new(host, seed))
        })
    }
}

impl ViewerHost for WebHost {
    type Model = ModelData;

    fn detach_model(&mut self) {
        self.scene.borrow_mut().detach();
    }

    fn request_model(&mut self, ticket: LoadTicket, asset: &'static ModelAsset) {
        let controller = self.controller.clone();
        spawn_local(async move {
            let result = loader::load_model(asset).await;
            match controller.upgrade() {
                Some(c) => {
                    c.borrow_mut().finish_load(ticket, result);
                }
                None => log::warn!("[load] viewer gone before {} finished", ticket.model),
            }
        });
    }

    fn attach_model(&mut self, asset: &'static ModelAsset, model: ModelData) {
        let instance = ModelInstance::new(model, asset);
        self.scene.borrow_mut().attach(instance);
    }

    fn show_thumbnail(&mut self, path: &str) {
        dom::set_image_src(&self.document, THUMBNAIL_SELECTOR, &loader::asset_url(path));
    }

    fn start_party_timer(&mut self, period_ms: u32) {
        // Clear the old interval before installing a new one.
        self.party_timer = None;
        let controller = self.controller.clone();
        self.party_timer = IntervalTimer::start(period_ms, move || {
            if let Some(c) = controller.upgrade() {
                c.borrow_mut().party_tick();
            }
        })
        .map_err(|_| log::warn!("[party] could not start the light timer"))
        .ok();
    }

    fn stop_party_timer(&mut self) {
        self.party_timer = None;
    }

    fn play_party_audio(&mut self) {
        if self.party_audio.is_none() {
            self.party_audio = PartyAudio::new(&loader::asset_url(PARTY_AUDIO_PATH)).ok();
        }
        if let Some(audio) = &self.party_audio {
            audio.play();
        }
    }

    fn stop_party_audio(&mut self) {
        if let Some(audio) = &self.party_audio {
            audio.stop();
        }
    }
}
