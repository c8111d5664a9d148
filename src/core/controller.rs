// Viewer state machine: (family × party flag) driven by three UI commands.
//
// The controller owns every piece of mutable viewer state and talks to the
// outside world only through [`ViewerHost`], so the same code runs against
// the browser and against a recording host in tests.

use super::catalog::{Family, ModelAsset, ModelId};
use super::constants::PARTY_TICK_MS;
use super::error::AssetLoadError;
use super::lighting::LightingRig;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerState {
    pub current: ModelId,
    pub party_active: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            current: ModelId::Gengar,
            party_active: false,
        }
    }
}

impl ViewerState {
    pub fn family(&self) -> Family {
        self.current.family()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Previous,
    ToggleParty,
}

impl ViewerCommand {
    /// Keyboard shortcut for a `KeyboardEvent.key` value.
    pub fn for_key(key: &str) -> Option<ViewerCommand> {
        match key {
            "ArrowRight" => Some(ViewerCommand::Next),
            "ArrowLeft" => Some(ViewerCommand::Previous),
            "p" | "P" | " " => Some(ViewerCommand::ToggleParty),
            _ => None,
        }
    }
}

/// Identifies one load request. Only the most recent ticket may attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub model: ModelId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Attached,
    Failed,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

/// Side effects the controller asks its environment to perform.
pub trait ViewerHost {
    /// Decoded model handed back by a completed load.
    type Model;

    /// Release the displayed model's resources and remove it from the scene.
    fn detach_model(&mut self);
    /// Start fetching `asset`; the result must come back via
    /// [`ViewerController::finish_load`] with the same ticket.
    fn request_model(&mut self, ticket: LoadTicket, asset: &'static ModelAsset);
    fn attach_model(&mut self, asset: &'static ModelAsset, model: Self::Model);
    fn show_thumbnail(&mut self, path: &str);
    /// Install the repeating party timer, replacing any existing one.
    fn start_party_timer(&mut self, period_ms: u32);
    fn stop_party_timer(&mut self);
    fn play_party_audio(&mut self);
    /// Pause and rewind to the start.
    fn stop_party_audio(&mut self);
}

pub struct ViewerController<H: ViewerHost> {
    host: H,
    state: ViewerState,
    lighting: LightingRig,
    rng: StdRng,
    generation: u64,
    pending: Option<LoadTicket>,
    displayed: Option<ModelId>,
}

impl<H: ViewerHost> ViewerController<H> {
    pub fn new(host: H, seed: u64) -> Self {
        Self {
            host,
            state: ViewerState::default(),
            lighting: LightingRig::new(),
            rng: StdRng::seed_from_u64(seed),
            generation: 0,
            pending: None,
            displayed: None,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }

    /// Model currently attached to the scene, if any.
    pub fn displayed(&self) -> Option<ModelId> {
        self.displayed
    }

    pub fn pending(&self) -> Option<LoadTicket> {
        self.pending
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Show the initial model.
    pub fn start(&mut self) {
        log::info!("[viewer] start with {}", self.state.current);
        self.switch_to(self.state.current);
    }

    /// Stop party mode, drop the displayed model and invalidate any load in flight.
    pub fn dispose(&mut self) {
        if self.state.party_active {
            self.exit_party();
            self.state.current = self.state.family().base();
        }
        self.host.detach_model();
        self.displayed = None;
        self.generation += 1;
        self.pending = None;
        log::info!("[viewer] disposed");
    }

    pub fn dispatch(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::Next => self.select_next(),
            ViewerCommand::Previous => self.select_previous(),
            ViewerCommand::ToggleParty => self.toggle_party_mode(),
        }
    }

    pub fn select_next(&mut self) {
        self.navigate(self.state.family().next());
    }

    pub fn select_previous(&mut self) {
        self.navigate(self.state.family().previous());
    }

    pub fn toggle_party_mode(&mut self) {
        let family = self.state.family();
        if self.state.party_active {
            self.exit_party();
            self.switch_to(family.base());
        } else {
            self.host.start_party_timer(PARTY_TICK_MS);
            self.host.play_party_audio();
            self.state.party_active = true;
            log::info!("[party] on");
            self.switch_to(family.party());
        }
    }

    /// Timer callback: re-randomise the rig while party mode is on.
    pub fn party_tick(&mut self) {
        if self.state.party_active {
            self.lighting.randomize(&mut self.rng);
        }
    }

    /// Detach whatever is displayed and request `id`.
    pub fn load_asset(&mut self, id: ModelId) -> LoadTicket {
        self.host.detach_model();
        self.displayed = None;
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            model: id,
        };
        self.pending = Some(ticket);
        let asset = id.asset();
        log::info!("[load] requesting {} ({})", id, asset.mesh_path);
        self.host.request_model(ticket, asset);
        ticket
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<H::Model, AssetLoadError>,
    ) -> LoadOutcome {
        if self.pending != Some(ticket) {
            log::info!(
                "[load] discarding stale {} (generation {})",
                ticket.model,
                ticket.generation
            );
            return LoadOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(model) => {
                self.host.attach_model(ticket.model.asset(), model);
                self.displayed = Some(ticket.model);
                log::info!("[load] attached {}", ticket.model);
                LoadOutcome::Attached
            }
            Err(e) => {
                log::error!("[load] {} failed: {}", ticket.model, e);
                LoadOutcome::Failed
            }
        }
    }

    fn navigate(&mut self, family: Family) {
        if self.state.party_active {
            self.exit_party();
        }
        self.switch_to(family.base());
    }

    fn exit_party(&mut self) {
        self.host.stop_party_timer();
        self.lighting.restore();
        self.host.stop_party_audio();
        self.state.party_active = false;
        log::info!("[party] off");
    }

    fn switch_to(&mut self, id: ModelId) {
        self.state.current = id;
        self.host.show_thumbnail(id.asset().thumbnail_path);
        self.load_asset(id);
    }
}
