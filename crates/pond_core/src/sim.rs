//! The pond simulation.
//!
//! `Simulation` owns every population and advances them with `step`, in a
//! fixed order: queued commands, wave field, fish, nitrates (advance,
//! convert, recycle), bubbles, then ammonium and flagella while bacteria
//! are enabled. Time is injected by the caller; nothing here reads a clock.

use std::collections::VecDeque;

use pond_metrics::{time_scope, Counter, SystemProfiler};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ammonium::{self, AmmoniumIon};
use crate::bacteria::BacteriaRing;
use crate::config::PondConfig;
use crate::error::PondError;
use crate::fish::{self, Fish};
use crate::highlight::HighlightState;
use crate::landscape::{self, Plants};
use crate::math::{PondRng, Vec2, Vec3};
use crate::picking::{
    pick_nearest, InfoPanelView, PickHit, PickTarget, PointerUi, RayCaster, TooltipView, Viewport,
};
use crate::scene::{Category, EntityId, IdAllocator, MaterialSlot, SceneObject};
use crate::snapshot::{collider_scale, FrameSnapshot, RenderItem, RenderKind};
use crate::time::SimulationTime;
use crate::timescale::{AlgaeState, TimescaleController};
use crate::transport::{self, Bubble, BubbleSource, NitrateIon};
use crate::wave::WaveField;

/// User-facing controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimCommand {
    /// Clamped into `[0, 1]` when applied.
    SetTimescale(f32),
    ToggleBacteria,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoggedCommand {
    /// Frame count at the moment the command was applied.
    pub frame: u64,
    pub command: SimCommand,
}

/// Every applied command in order. Replaying it against the same seed
/// reproduces the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandLog {
    entries: Vec<LoggedCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, frame: u64, command: SimCommand) {
        self.entries.push(LoggedCommand { frame, command });
    }

    pub fn entries(&self) -> &[LoggedCommand] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What happened during one `step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub frame: u64,
    pub commands_applied: usize,
    pub conversions: usize,
    pub attached: usize,
    pub absorbed: usize,
    pub decayed: usize,
    pub nitrates_recycled: usize,
    pub bubbles_recycled: usize,
}

/// Everything `Reset` rebuilds.
struct PondScene {
    wave: WaveField,
    terrain: Vec<SceneObject>,
    algae: SceneObject,
    plants: Plants,
    fish: Vec<Fish>,
    nitrates: Vec<NitrateIon>,
    bubbles: Vec<Bubble>,
}

impl PondScene {
    fn build(
        config: &PondConfig,
        bubble_source: &BubbleSource,
        algae_state: AlgaeState,
        ids: &mut IdAllocator,
        rng: &mut PondRng,
    ) -> Self {
        let water = &config.water;
        let wave = WaveField::new(water, noise_seed(config.seed));
        let terrain = landscape::build_terrain(water, ids);
        let algae = landscape::build_algae(water, &config.algae, algae_state, ids);
        let plants = Plants::grow(&config.plants, water.radius, ids, rng);
        let fish = fish::spawn_school(&config.fish, water.radius, water.surface_y, ids, rng);
        let nitrates = transport::spawn_nitrates(&config.nitrate, ids, rng);
        let bubbles = transport::spawn_bubbles(bubble_source, ids, rng);
        Self {
            wave,
            terrain,
            algae,
            plants,
            fish,
            nitrates,
            bubbles,
        }
    }
}

fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

pub struct Simulation {
    config: PondConfig,
    ids: IdAllocator,
    rng: PondRng,
    time: SimulationTime,
    scene: PondScene,
    bubble_source: BubbleSource,
    bacteria: BacteriaRing,
    ammonium: Vec<AmmoniumIon>,
    timescale: TimescaleController,
    highlight: HighlightState,
    pointer: PointerUi,
    pending: VecDeque<SimCommand>,
    log: CommandLog,
    counter: Counter,
    profiler: SystemProfiler,
}

impl Simulation {
    pub fn new(config: PondConfig) -> Result<Self, PondError> {
        config.validate()?;
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(config.seed);
        let timescale = TimescaleController::new(&config.algae);
        let bubble_source = BubbleSource {
            config: config.bubble.clone(),
            water_radius: config.water.radius,
            surface_y: config.water.surface_y,
        };
        let scene = PondScene::build(
            &config,
            &bubble_source,
            timescale.algae(),
            &mut ids,
            &mut rng,
        );
        info!(
            seed = config.seed,
            fish = scene.fish.len(),
            plants = scene.plants.plants.len(),
            nitrates = scene.nitrates.len(),
            bubbles = scene.bubbles.len(),
            "pond built"
        );

        Ok(Self {
            config,
            ids,
            rng,
            time: SimulationTime::new(),
            scene,
            bubble_source,
            bacteria: BacteriaRing::new(),
            ammonium: Vec::new(),
            timescale,
            highlight: HighlightState::new(),
            pointer: PointerUi::default(),
            pending: VecDeque::new(),
            log: CommandLog::new(),
            counter: Counter::new(),
            profiler: SystemProfiler::new(),
        })
    }

    /// Build a fresh simulation and re-run `frames` steps of `delta_secs`,
    /// applying each logged command at the frame it was recorded.
    pub fn replay(
        config: PondConfig,
        log: &CommandLog,
        frames: u64,
        delta_secs: f32,
    ) -> Result<Self, PondError> {
        let mut sim = Self::new(config)?;
        let mut entries = log.entries().iter().peekable();
        for _ in 0..frames {
            let frame = sim.frame();
            while let Some(entry) = entries.next_if(|e| e.frame <= frame) {
                sim.apply(entry.command);
            }
            sim.step(delta_secs);
        }
        let frame = sim.frame();
        while let Some(entry) = entries.next_if(|e| e.frame <= frame) {
            sim.apply(entry.command);
        }
        Ok(sim)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Defer `command` to the start of the next `step`.
    pub fn queue(&mut self, command: SimCommand) {
        self.pending.push_back(command);
    }

    /// Apply `command` now and record it in the log.
    pub fn apply(&mut self, command: SimCommand) {
        let frame = self.frame();
        self.log.record(frame, command);
        match command {
            SimCommand::SetTimescale(value) => self.set_timescale(value),
            SimCommand::ToggleBacteria => self.toggle_bacteria(),
            SimCommand::Reset => self.reset(),
        }
    }

    fn set_timescale(&mut self, value: f32) {
        let hovered_alive_fish = self
            .highlight
            .hovered()
            .filter(|id| self.scene.fish.iter().any(|f| f.id == *id && !f.is_dead()));
        let deaths = self.timescale.set(
            value,
            &mut self.scene.fish,
            &self.config.algae,
            &self.config.fish,
        );
        landscape::apply_algae_state(
            &mut self.scene.algae,
            &self.config.algae,
            self.timescale.algae(),
        );
        self.counter.increment("fish_deaths", deaths as u64);
        // Death swaps the fish's materials; glow the new ones and save them
        // as the restore point.
        if let Some(id) = hovered_alive_fish {
            if self.scene.fish.iter().any(|f| f.id == id && f.is_dead()) {
                self.highlight.forget();
                self.highlight_entity(id);
            }
        }
        debug!(
            timescale = self.timescale.timescale().value(),
            deaths, "timescale set"
        );
    }

    fn toggle_bacteria(&mut self) {
        if self.bacteria.is_enabled() {
            self.bacteria.clear();
            let cleared = self.ammonium.len();
            self.ammonium.clear();
            info!(cleared_ammonium = cleared, "bacteria removed");
        } else {
            self.bacteria
                .populate(&self.config.bacteria, &mut self.ids, &mut self.rng);
            info!(count = self.bacteria.members().len(), "bacteria created");
        }
        self.drop_stale_highlight();
    }

    fn reset(&mut self) {
        self.highlight.forget();
        self.pointer.tooltip = None;
        self.timescale = TimescaleController::new(&self.config.algae);
        self.scene = PondScene::build(
            &self.config,
            &self.bubble_source,
            self.timescale.algae(),
            &mut self.ids,
            &mut self.rng,
        );
        self.bacteria.clear();
        self.ammonium.clear();
        info!(frame = self.frame(), "pond reset");
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advance one frame by `delta_secs`. Negative or NaN deltas count as 0.
    pub fn step(&mut self, delta_secs: f32) -> StepReport {
        let dt = if delta_secs.is_finite() && delta_secs > 0.0 {
            delta_secs
        } else {
            0.0
        };
        let mut report = StepReport {
            frame: self.frame(),
            ..StepReport::default()
        };

        while let Some(command) = self.pending.pop_front() {
            self.apply(command);
            report.commands_applied += 1;
        }

        let elapsed = self.time.elapsed_secs();
        let scene = &mut self.scene;
        let config = &self.config;

        time_scope!(self.profiler, "wave", {
            scene.wave.update(dt);
        });

        time_scope!(self.profiler, "fish", {
            for f in scene.fish.iter_mut() {
                f.update(elapsed, &config.fish, config.water.radius);
            }
        });

        let mut converted = Vec::new();
        time_scope!(self.profiler, "nitrates", {
            transport::advance_all(&mut scene.nitrates);
            converted = self.bacteria.convert_nitrates(
                &mut scene.nitrates,
                &config.bacteria,
                &mut self.rng,
            );
            report.nitrates_recycled =
                transport::recycle_expired(&mut scene.nitrates, &config.nitrate, &mut self.rng);
        });
        for position in converted {
            let id = self.ids.allocate();
            debug!(ammonium = %id, x = position.x, y = position.y, z = position.z, "nitrate converted");
            self.ammonium
                .push(AmmoniumIon::spawn(id, position, &config.ammonium, &mut self.rng));
            report.conversions += 1;
        }

        time_scope!(self.profiler, "bubbles", {
            report.bubbles_recycled =
                transport::integrate(&mut scene.bubbles, &self.bubble_source, &mut self.rng);
            for bubble in scene.bubbles.iter_mut() {
                bubble.twinkle(elapsed);
            }
        });

        if self.bacteria.is_enabled() {
            time_scope!(self.profiler, "ammonium", {
                let tally = ammonium::update_all(
                    &mut self.ammonium,
                    &scene.plants.roots,
                    &config.ammonium,
                    &mut self.rng,
                );
                report.attached = tally.attached;
                report.absorbed = tally.absorbed;
                report.decayed = tally.decayed;
            });
            time_scope!(self.profiler, "bacteria", {
                self.bacteria.animate(dt, &config.bacteria);
            });
        }

        self.time.advance(dt);
        self.drop_stale_highlight();

        self.counter.increment("conversions", report.conversions as u64);
        self.counter.increment("attachments", report.attached as u64);
        self.counter.increment("absorptions", report.absorbed as u64);
        self.counter.increment("expirations", report.decayed as u64);
        report
    }

    /// Forget a hover target whose entity no longer exists.
    fn drop_stale_highlight(&mut self) {
        if let Some(id) = self.highlight.hovered() {
            if self.materials(id).is_none() {
                self.highlight.forget();
                self.pointer.tooltip = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    /// Every pickable object with its category and collider.
    pub fn pick_targets(&self) -> impl Iterator<Item = PickTarget> + '_ {
        let target = |id: EntityId, category: Category, collider| PickTarget {
            id,
            category,
            collider,
        };
        let scene = &self.scene;
        let statics = scene
            .terrain
            .iter()
            .chain(std::iter::once(&scene.algae))
            .chain(scene.plants.parts())
            .map(move |o| target(o.id, o.category, o.collider));
        statics
            .chain(
                scene
                    .fish
                    .iter()
                    .map(move |f| target(f.id, Category::Fish, f.collider())),
            )
            .chain(
                self.bacteria
                    .members()
                    .iter()
                    .map(move |b| target(b.id, Category::Bacteria, b.collider())),
            )
            .chain(
                self.ammonium
                    .iter()
                    .map(move |a| target(a.id, Category::Ammonium, a.collider())),
            )
            .chain(
                scene
                    .nitrates
                    .iter()
                    .map(move |n| target(n.id, Category::Nitrate, n.collider())),
            )
    }

    pub fn pick(
        &self,
        caster: &dyn RayCaster,
        pointer: Vec2,
        viewport: &Viewport,
    ) -> Option<PickHit> {
        let ray = caster.ray_from_pointer(pointer, viewport)?;
        pick_nearest(&ray, self.pick_targets())
    }

    /// Hover handling: move the highlight to the hit object and show its
    /// tooltip, or clear both on a miss.
    pub fn pointer_moved(
        &mut self,
        caster: &dyn RayCaster,
        pointer: Vec2,
        viewport: &Viewport,
    ) -> Option<TooltipView> {
        match self.pick(caster, pointer, viewport) {
            Some(hit) => {
                if self.highlight.hovered() != Some(hit.id) {
                    self.clear_highlight();
                    self.highlight_entity(hit.id);
                    debug!(entity = %hit.id, category = %hit.category, "hover");
                }
                self.pointer.tooltip = Some(TooltipView::new(hit.category, pointer));
            }
            None => {
                self.clear_highlight();
                self.pointer.tooltip = None;
            }
        }
        self.pointer.tooltip.clone()
    }

    /// Click handling: open the info panel for the hit object, hide it on a
    /// miss.
    pub fn clicked(
        &mut self,
        caster: &dyn RayCaster,
        pointer: Vec2,
        viewport: &Viewport,
    ) -> Option<InfoPanelView> {
        self.pointer.info_panel = self
            .pick(caster, pointer, viewport)
            .map(|hit| InfoPanelView::new(hit.category));
        self.pointer.info_panel.clone()
    }

    /// Pointer left the view: same as hovering empty space.
    pub fn pointer_left(&mut self) {
        self.clear_highlight();
        self.pointer.tooltip = None;
    }

    pub fn pointer_ui(&self) -> &PointerUi {
        &self.pointer
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.highlight.hovered()
    }

    fn highlight_entity(&mut self, id: EntityId) {
        let mut highlight = std::mem::take(&mut self.highlight);
        let config = self.config.highlight.clone();
        if let Some(slot) = self.materials_mut(id) {
            highlight.apply(id, slot, &config);
        }
        self.highlight = highlight;
    }

    fn clear_highlight(&mut self) {
        let Some(id) = self.highlight.hovered() else {
            return;
        };
        let mut highlight = std::mem::take(&mut self.highlight);
        highlight.clear(self.materials_mut(id));
        self.highlight = highlight;
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn materials(&self, id: EntityId) -> Option<&MaterialSlot> {
        let scene = &self.scene;
        if let Some(o) = scene
            .terrain
            .iter()
            .chain(std::iter::once(&scene.algae))
            .chain(scene.plants.parts())
            .find(|o| o.id == id)
        {
            return Some(&o.materials);
        }
        if let Some(f) = scene.fish.iter().find(|f| f.id == id) {
            return Some(&f.materials);
        }
        if let Some(b) = self.bacteria.members().iter().find(|b| b.id == id) {
            return Some(&b.materials);
        }
        if let Some(a) = self.ammonium.iter().find(|a| a.id == id) {
            return Some(&a.materials);
        }
        scene
            .nitrates
            .iter()
            .find(|n| n.id == id)
            .map(|n| &n.materials)
    }

    pub fn materials_mut(&mut self, id: EntityId) -> Option<&mut MaterialSlot> {
        let scene = &mut self.scene;
        if let Some(o) = scene
            .terrain
            .iter_mut()
            .chain(std::iter::once(&mut scene.algae))
            .chain(scene.plants.parts_mut())
            .find(|o| o.id == id)
        {
            return Some(&mut o.materials);
        }
        if let Some(f) = scene.fish.iter_mut().find(|f| f.id == id) {
            return Some(&mut f.materials);
        }
        if let Some(b) = self.bacteria.members_mut().iter_mut().find(|b| b.id == id) {
            return Some(&mut b.materials);
        }
        if let Some(a) = self.ammonium.iter_mut().find(|a| a.id == id) {
            return Some(&mut a.materials);
        }
        scene
            .nitrates
            .iter_mut()
            .find(|n| n.id == id)
            .map(|n| &mut n.materials)
    }

    // ------------------------------------------------------------------
    // Scenario setup
    // ------------------------------------------------------------------

    /// Add a nitrate with a fixed velocity. Returns its handle.
    pub fn insert_nitrate(&mut self, position: Vec3, velocity: Vec3) -> EntityId {
        let id = self.ids.allocate();
        self.scene
            .nitrates
            .push(NitrateIon::at(id, position, velocity));
        id
    }

    /// Add a free ammonium ion. Returns its handle.
    pub fn insert_ammonium(&mut self, position: Vec3) -> EntityId {
        let id = self.ids.allocate();
        self.ammonium.push(AmmoniumIon::spawn(
            id,
            position,
            &self.config.ammonium,
            &mut self.rng,
        ));
        id
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &PondConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.time.frame_count()
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }

    pub fn timescale(&self) -> f32 {
        self.timescale.timescale().value()
    }

    pub fn algae_state(&self) -> AlgaeState {
        self.timescale.algae()
    }

    pub fn bacteria_enabled(&self) -> bool {
        self.bacteria.is_enabled()
    }

    pub fn wave(&self) -> &WaveField {
        &self.scene.wave
    }

    pub fn terrain(&self) -> &[SceneObject] {
        &self.scene.terrain
    }

    pub fn algae(&self) -> &SceneObject {
        &self.scene.algae
    }

    pub fn plants(&self) -> &Plants {
        &self.scene.plants
    }

    pub fn fish(&self) -> &[Fish] {
        &self.scene.fish
    }

    pub fn nitrates(&self) -> &[NitrateIon] {
        &self.scene.nitrates
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.scene.bubbles
    }

    pub fn bacteria(&self) -> &BacteriaRing {
        &self.bacteria
    }

    pub fn ammonium(&self) -> &[AmmoniumIon] {
        &self.ammonium
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.log
    }

    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    pub fn profiler(&self) -> &SystemProfiler {
        &self.profiler
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> FrameSnapshot {
        let hovered = self.highlight.hovered();
        let scene = &self.scene;
        let mut items = Vec::with_capacity(
            scene.terrain.len()
                + 1
                + scene.plants.plants.len() * 3
                + scene.fish.len()
                + scene.nitrates.len()
                + scene.bubbles.len()
                + self.bacteria.members().len()
                + self.ammonium.len(),
        );

        let mut push_static = |object: &SceneObject, kind: RenderKind| {
            items.push(RenderItem {
                id: object.id,
                kind,
                category: Some(object.category),
                position: object.position,
                scale: collider_scale(&object.collider),
                heading: 0.0,
                opacity: object.materials.max_opacity(),
                highlighted: hovered == Some(object.id),
            });
        };
        for object in &scene.terrain {
            let kind = match object.category {
                Category::Topsoil => RenderKind::Topsoil,
                Category::Subsoil => RenderKind::Subsoil,
                Category::Bedrock => RenderKind::Bedrock,
                _ => RenderKind::Water,
            };
            push_static(object, kind);
        }
        push_static(&scene.algae, RenderKind::Algae);
        for plant in &scene.plants.plants {
            push_static(&plant.stem, RenderKind::Stem);
            push_static(&plant.leaves, RenderKind::Leaves);
            push_static(&plant.root, RenderKind::Root);
        }

        let mut push = |id: EntityId,
                        kind: RenderKind,
                        category: Option<Category>,
                        position: Vec3,
                        scale: Vec3,
                        heading: f32,
                        opacity: f32| {
            items.push(RenderItem {
                id,
                kind,
                category,
                position,
                scale,
                heading,
                opacity,
                highlighted: hovered == Some(id),
            });
        };
        for f in &scene.fish {
            push(
                f.id,
                RenderKind::Fish,
                Some(Category::Fish),
                f.position,
                Vec3::ONE,
                f.heading,
                f.opacity(),
            );
        }
        for n in &scene.nitrates {
            push(
                n.id,
                RenderKind::Nitrate,
                Some(Category::Nitrate),
                n.position,
                Vec3::ONE,
                0.0,
                n.materials.max_opacity(),
            );
        }
        for b in &scene.bubbles {
            push(
                b.id,
                RenderKind::Bubble,
                None,
                b.position,
                Vec3::splat(b.scale),
                0.0,
                b.opacity,
            );
        }
        for b in self.bacteria.members() {
            push(
                b.id,
                RenderKind::Bacterium,
                Some(Category::Bacteria),
                b.position,
                Vec3::ONE,
                b.phase,
                b.materials.max_opacity(),
            );
        }
        for a in &self.ammonium {
            push(
                a.id,
                RenderKind::Ammonium,
                Some(Category::Ammonium),
                a.position,
                Vec3::ONE,
                0.0,
                a.opacity(),
            );
        }

        FrameSnapshot {
            frame: self.frame(),
            elapsed_secs: self.time.elapsed_secs(),
            timescale: self.timescale(),
            bacteria_enabled: self.bacteria.is_enabled(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Ray;

    /// Casts every pointer straight down from above the pond, with the
    /// pointer mapped 1:1 onto world x/z.
    struct TopDown;

    impl RayCaster for TopDown {
        fn ray_from_pointer(&self, pointer: Vec2, viewport: &Viewport) -> Option<Ray> {
            if viewport.is_empty() {
                return None;
            }
            Ray::new(Vec3::new(pointer.x, 20.0, pointer.y), Vec3::NEG_Y)
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn small_config() -> PondConfig {
        let mut config = PondConfig::default();
        config.water.rings = 4;
        config.water.segments = 16;
        config
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = small_config();
        config.water.radius = 0.0;
        assert!(matches!(
            Simulation::new(config),
            Err(PondError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_initial_populations() {
        let sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.fish().len(), 14);
        assert_eq!(sim.nitrates().len(), 30);
        assert_eq!(sim.bubbles().len(), 60);
        assert_eq!(sim.plants().roots.len(), 25);
        assert!(!sim.bacteria_enabled());
        assert!(sim.ammonium().is_empty());
        assert_eq!(sim.timescale(), 0.0);
    }

    #[test]
    fn test_toggle_bacteria_round_trip() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.apply(SimCommand::ToggleBacteria);
        assert!(sim.bacteria_enabled());
        assert_eq!(sim.bacteria().members().len(), 10);

        sim.insert_ammonium(Vec3::new(0.0, -1.0, 0.0));
        sim.apply(SimCommand::ToggleBacteria);
        assert!(!sim.bacteria_enabled());
        assert!(sim.bacteria().is_empty());
        assert!(sim.ammonium().is_empty());
    }

    #[test]
    fn test_ammonium_frozen_while_bacteria_off() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let id = sim.insert_ammonium(Vec3::new(0.0, -1.0, 0.0));
        let before = sim.ammonium()[0].clone();
        for _ in 0..10 {
            sim.step(1.0 / 60.0);
        }
        assert_eq!(sim.ammonium()[0].id, id);
        assert_eq!(sim.ammonium()[0].position, before.position);
        assert_eq!(sim.ammonium()[0].life(), before.life());
    }

    #[test]
    fn test_hover_highlights_and_miss_clears() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let vp = viewport();

        // Outside the plant ring, only the topsoil rim is under the pointer
        let tooltip = sim
            .pointer_moved(&TopDown, Vec2::new(5.0, 0.0), &vp)
            .unwrap();
        assert_eq!(tooltip.label, "Topsoil");
        assert_eq!(tooltip.position, Vec2::new(5.0, -10.0));
        let hovered = sim.hovered().unwrap();
        let slot = sim.materials(hovered).unwrap();
        assert_eq!(slot.as_slice()[0].emissive, Vec3::ONE);
        assert_eq!(slot.as_slice()[0].emissive_intensity, 0.1);

        // Far outside the bowl
        assert!(sim
            .pointer_moved(&TopDown, Vec2::new(50.0, 50.0), &vp)
            .is_none());
        assert!(sim.hovered().is_none());
        let slot = sim.materials(hovered).unwrap();
        assert_eq!(slot.as_slice()[0].emissive, Vec3::ZERO);
        assert_eq!(slot.as_slice()[0].emissive_intensity, 0.0);
    }

    #[test]
    fn test_pointer_left_clears_hover() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let vp = viewport();
        sim.pointer_moved(&TopDown, Vec2::new(5.0, 0.0), &vp);
        let hovered = sim.hovered().unwrap();
        sim.pointer_left();
        assert!(sim.hovered().is_none());
        assert!(sim.pointer_ui().tooltip.is_none());
        let slot = sim.materials(hovered).unwrap();
        assert_eq!(slot.as_slice()[0].emissive_intensity, 0.0);
    }

    #[test]
    fn test_hovered_fish_keeps_glow_through_death() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let id = sim.fish()[0].id;
        sim.highlight_entity(id);
        let strength = sim.config().highlight.strength;

        sim.apply(SimCommand::SetTimescale(1.0));
        assert_eq!(sim.hovered(), Some(id));
        let dead_opacity = sim.config().fish.dead_opacity;
        for material in sim.materials(id).unwrap().as_slice() {
            assert_eq!(material.opacity, dead_opacity);
            assert_eq!(material.emissive_intensity, strength);
        }

        // Clearing restores the dead look, not the living one
        sim.pointer_left();
        for material in sim.materials(id).unwrap().as_slice() {
            assert_eq!(material.emissive, Vec3::ZERO);
            assert_eq!(material.emissive_intensity, 0.0);
            assert_eq!(material.opacity, dead_opacity);
        }
    }

    #[test]
    fn test_click_opens_and_hides_panel() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let vp = viewport();
        let panel = sim.clicked(&TopDown, Vec2::new(5.0, 0.0), &vp).unwrap();
        assert_eq!(panel.label, "Topsoil");
        assert!(sim.pointer_ui().info_panel.is_some());

        assert!(sim.clicked(&TopDown, Vec2::new(50.0, 0.0), &vp).is_none());
        assert!(sim.pointer_ui().info_panel.is_none());
    }

    #[test]
    fn test_empty_viewport_never_hits() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let empty = Viewport::new(0.0, 0.0);
        assert!(sim.pointer_moved(&TopDown, Vec2::ZERO, &empty).is_none());
        assert!(sim.clicked(&TopDown, Vec2::ZERO, &empty).is_none());
    }

    #[test]
    fn test_reset_discards_highlight() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.pointer_moved(&TopDown, Vec2::ZERO, &viewport());
        let old = sim.hovered().unwrap();
        sim.apply(SimCommand::Reset);
        assert!(sim.hovered().is_none());
        assert!(sim.materials(old).is_none());
        assert!(sim.pointer_ui().tooltip.is_none());
    }

    #[test]
    fn test_snapshot_counts() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.apply(SimCommand::ToggleBacteria);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.count(RenderKind::Fish), 14);
        assert_eq!(snapshot.count(RenderKind::Bubble), 60);
        assert_eq!(snapshot.count(RenderKind::Root), 25);
        assert_eq!(snapshot.count(RenderKind::Bacterium), 10);
        assert_eq!(snapshot.count(RenderKind::Water), 1);
        assert!(snapshot.bacteria_enabled);
        assert!(snapshot.highlighted().is_none());
        assert!(snapshot
            .of_kind(RenderKind::Bubble)
            .all(|b| b.category.is_none()));
    }

    #[test]
    fn test_command_log_records_frames() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.step(0.016);
        sim.queue(SimCommand::SetTimescale(0.5));
        assert!(sim.command_log().is_empty());
        let report = sim.step(0.016);
        assert_eq!(report.commands_applied, 1);
        assert_eq!(
            sim.command_log().entries(),
            &[LoggedCommand {
                frame: 1,
                command: SimCommand::SetTimescale(0.5)
            }]
        );
    }
}
