//! Simulator
//!
//! Owns the scene, the current panel and the fragment set, and drives them
//! through `Intact → Animating → Settled`. Reset returns to `Intact` from
//! any state.
//!
//! Every mutation happens inside [`Simulator::tick`], in this order:
//! 1. drain queued intents
//! 2. update the camera
//! 3. integrate fragments (scaled by slow motion)
//! 4. write transforms back into the scene
//! 5. capture reflections if one was requested
//! 6. render

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use glam::{Vec2, Vec3};
use glassbreak_core::time::MAX_FRAME_STEP;
use glassbreak_core::{CameraRig, FrameClock, NodeId, QualityProfile, Transform};
use glassbreak_physics::{PhysicsStepper, StepReport};
use glassbreak_platform::audio::play_cue;
use glassbreak_platform::{AudioSink, BreakCue, FpsCounter, NullSink, ScopedTimer};
use glassbreak_renderer::material::color_from_hex;
use glassbreak_renderer::{
    CaptureSettings, EnvironmentCapture, FrameContext, Geometry, LightRig, Material, RenderMode, RenderScene,
    Renderer, RendererStats, ResourceCounts, StandardMaterial,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::adapter::FragmentSet;
use crate::config::SimulationConfig;
use crate::fracture::generate_break;
use crate::glass::{GlassType, GlassTypeSpec};
use crate::hud::HudSnapshot;
use crate::intent::{clamp_intensity, BreakTarget, ImpactPoint, Intent};
use crate::panel::{build_panel, GlassPanel};
use crate::shake::PanelShake;

/// Animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimState {
    /// Pane whole, nothing simulated
    Intact,
    /// Fragments in flight or the panel still shaking
    Animating,
    /// Everything at rest; stepping has stopped
    Settled,
}

/// What one tick did
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub state: SimState,
    /// Simulated seconds this frame, after slow motion
    pub sim_dt: f32,
    pub step: StepReport,
    pub stats: RendererStats,
    /// A reflection capture ran this frame
    pub captured: bool,
}

/// The whole simulation
pub struct Simulator {
    config: SimulationConfig,
    profile: QualityProfile,
    scene: RenderScene,
    renderer: Renderer,
    lights: LightRig,
    camera: CameraRig,
    stepper: PhysicsStepper,
    clock: FrameClock,
    fps: FpsCounter,
    rng: StdRng,
    audio: Box<dyn AudioSink>,
    capture: Option<EnvironmentCapture>,
    capture_requested: bool,
    intents: VecDeque<Intent>,
    glass_type: GlassType,
    room: NodeId,
    panel: GlassPanel,
    fragments: FragmentSet,
    shake: Option<PanelShake>,
    state: SimState,
    intensity: f32,
    slow_motion: bool,
    viewport: Vec2,
    broke_at: f64,
}

impl Simulator {
    /// Build the scene for `profile` and an intact tempered pane
    pub fn new(config: SimulationConfig, profile: QualityProfile, renderer: Renderer) -> Self {
        let variant = config.variant;
        let mut scene = RenderScene::new();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (_, _, room_height) = variant.room_size();
        let lights = LightRig::for_profile(&profile, room_height);
        let room = build_room(&mut scene, &config, &profile);

        let capture = if profile.reflections_enabled() {
            Some(EnvironmentCapture::new(
                CaptureSettings::with_resolution(profile.reflection_map_resolution),
                &mut scene,
            ))
        } else {
            log::debug!("Reflection capture disabled at {} tier", profile.tier);
            None
        };

        let glass_type = GlassType::default();
        let panel = build_panel(glass_type.spec(), &profile, variant, &mut scene, None, &mut rng);
        let camera = CameraRig::new(variant.camera(), variant.camera_bounds());
        let stepper = PhysicsStepper::new(config.physics.clone(), variant.room_bounds());

        let mut renderer = renderer;
        renderer.accumulator_mut().set_target(config.target_samples);

        log::info!(
            "Simulator ready: {:?} scene, {} tier, {} lights",
            variant,
            profile.tier,
            lights.lights.len()
        );

        Self {
            intensity: clamp_intensity(config.default_intensity),
            capture_requested: capture.is_some(),
            config,
            profile,
            scene,
            renderer,
            lights,
            camera,
            stepper,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            rng,
            audio: Box::new(NullSink),
            capture,
            intents: VecDeque::new(),
            glass_type,
            room,
            panel,
            fragments: FragmentSet::new(),
            shake: None,
            state: SimState::Intact,
            slow_motion: false,
            viewport: Vec2::new(1280.0, 720.0),
            broke_at: 0.0,
        }
    }

    /// Route break cues to `audio`
    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    /// Swap the audio sink without touching the scene
    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = audio;
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn glass_type(&self) -> GlassType {
        self.glass_type
    }

    pub fn spec(&self) -> &'static GlassTypeSpec {
        self.glass_type.spec()
    }

    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn slow_motion(&self) -> bool {
        self.slow_motion
    }

    pub fn panel(&self) -> &GlassPanel {
        &self.panel
    }

    pub fn fragments(&self) -> &FragmentSet {
        &self.fragments
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Queue an intent for the next tick
    pub fn push(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    /// Advance one displayed frame of `frame_secs` wall time
    pub fn tick(&mut self, frame_secs: f64) -> FrameReport {
        let _timer = ScopedTimer::traced("sim_tick");

        while let Some(intent) = self.intents.pop_front() {
            self.apply(intent);
        }

        let camera_moving = self.camera.update();

        let sim_dt = self.clock.advance(frame_secs).as_secs_f32();
        let step = self.step(sim_dt);

        // Only integrated bodies can have moved
        if step.integrated > 0 {
            self.fragments.write_back(&mut self.scene);
        }

        let captured = self.capture_requested && self.capture_reflections();
        self.capture_requested = false;

        let context = FrameContext {
            camera_moving,
            animating: self.state == SimState::Animating,
        };
        let stats = self.renderer.render(&mut self.scene, context).clone();

        let wall = if frame_secs.is_finite() {
            frame_secs.clamp(0.0, MAX_FRAME_STEP)
        } else {
            0.0
        };
        if let Some(fps) = self.fps.record_frame(Duration::from_secs_f64(wall)) {
            log::trace!("{}", HudSnapshot::fps_label(fps, self.profile.tier));
        }

        FrameReport {
            state: self.state,
            sim_dt,
            step,
            stats,
            captured,
        }
    }

    /// Snapshot for the host UI
    pub fn hud(&self) -> HudSnapshot {
        let spec = self.spec();
        let fps = self.fps.fps();
        HudSnapshot {
            fps,
            fps_label: HudSnapshot::fps_label(fps, self.profile.tier),
            tier: self.profile.tier,
            state: self.state,
            glass_type: self.glass_type,
            display_name: spec.display_name,
            safety_score: spec.safety_score,
            risk: spec.risk,
            fragment_count: self.fragments.len(),
            intensity: self.intensity,
            slow_motion: self.slow_motion,
            samples: self.renderer.accumulator().accumulated(),
        }
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Break(target) => self.break_panel(target),
            Intent::Reset => self.reset(),
            Intent::SetGlassType(glass_type) => {
                log::info!("Glass type {} -> {}", self.glass_type, glass_type);
                self.glass_type = glass_type;
                self.reset();
            }
            Intent::SetIntensity(intensity) => self.intensity = clamp_intensity(intensity),
            Intent::SetSlowMotion(on) => self.set_slow_motion(on),
            Intent::ToggleSlowMotion => self.set_slow_motion(!self.slow_motion),
            Intent::SetRenderMode(mode) => {
                if mode == RenderMode::Ultra && !self.profile.reflections_enabled() {
                    log::warn!("Sample accumulation has no effect at {} tier", self.profile.tier);
                }
                self.renderer.accumulator_mut().set_mode(mode);
            }
            Intent::OrbitCamera { yaw, pitch } => self.camera.orbit(yaw, pitch),
            Intent::MoveCamera(position) => self.camera.move_to(position),
            Intent::Resize { width, height } => {
                self.camera.camera.set_viewport(width, height);
                self.viewport = Vec2::new(width as f32, height as f32);
            }
            Intent::RefreshReflections => self.capture_requested = true,
        }
    }

    /// Viewport the screen coordinates of break targets refer to
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn set_slow_motion(&mut self, on: bool) {
        self.slow_motion = on;
        let scale = if on { self.config.slow_motion_factor as f64 } else { 1.0 };
        self.clock.set_time_scale(scale);
        log::debug!("Time scale {:.2}", scale);
    }

    fn break_panel(&mut self, target: BreakTarget) {
        if self.state != SimState::Intact {
            log::debug!("Break ignored while {:?}", self.state);
            return;
        }

        let spec = self.glass_type.spec();
        let rect = *self.panel.rect();
        let impact = ImpactPoint::resolve(target, &self.camera.camera, &rect, self.intensity, &mut self.rng);
        let outcome = generate_break(spec, &self.profile, &impact, &rect, &mut self.rng);

        if !outcome.keeps_pane() {
            self.panel.set_pane_visible(&mut self.scene, false);
        }
        self.fragments = FragmentSet::spawn(outcome, &rect, &self.profile, &mut self.scene);
        self.shake = self.fragments.shake().map(PanelShake::new);

        let cue = BreakCue::new(spec.break_sound.playback_rate).with_volume(self.config.audio_volume);
        play_cue(self.audio.as_ref(), &cue);

        self.state = SimState::Animating;
        self.broke_at = self.clock.total_time();
        self.renderer.accumulator_mut().reset();
        log::info!(
            "Broke {} panel at ({:.2}, {:.2}) intensity {:.1}: {} fragments",
            self.glass_type,
            impact.point.x,
            impact.point.y,
            impact.intensity,
            self.fragments.len()
        );
    }

    fn step(&mut self, dt: f32) -> StepReport {
        if self.state != SimState::Animating {
            return StepReport::default();
        }

        if let Some(shake) = &mut self.shake {
            let offset = shake.advance(dt, &mut self.rng);
            self.panel.set_pane_offset(&mut self.scene, offset);
            self.fragments.set_overlay_offset(&mut self.scene, offset);
            if shake.is_finished() {
                self.shake = None;
            }
        }

        let report = self.stepper.step(self.fragments.bodies_mut(), dt);
        if report.settled && self.shake.is_none() {
            self.state = SimState::Settled;
            log::info!(
                "Settled after {:.2}s simulated, {} fragments",
                self.clock.total_time() - self.broke_at,
                self.fragments.len()
            );
        }
        report
    }

    /// Drop the fragments and rebuild an intact panel of the current type
    pub fn reset(&mut self) {
        let dropped = std::mem::take(&mut self.fragments).release(&mut self.scene);
        self.shake = None;

        let previous = self.panel.clone();
        self.panel = build_panel(
            self.glass_type.spec(),
            &self.profile,
            self.config.variant,
            &mut self.scene,
            Some(previous),
            &mut self.rng,
        );

        self.state = SimState::Intact;
        self.capture_requested = self.capture.is_some();
        self.renderer.accumulator_mut().reset();
        log::info!("Reset to intact {} panel ({} fragments dropped)", self.glass_type, dropped);
    }

    /// Refresh the reflection map with the glass hidden. Returns whether a
    /// capture ran.
    fn capture_reflections(&mut self) -> bool {
        let Some(capture) = &mut self.capture else {
            log::debug!("Reflection refresh ignored at {} tier", self.profile.tier);
            return false;
        };

        let mut nodes = vec![self.panel.root()];
        nodes.extend_from_slice(self.fragments.roots());
        let report = capture.capture(&mut self.scene, &nodes, self.fragments.batches());
        let env_map = self.scene.env_map;
        self.panel.bind_env_map(&mut self.scene, env_map);
        log::debug!(
            "Captured reflections ({} draw calls, {} hidden)",
            report.draw_calls,
            report.hidden
        );
        true
    }

    /// Free every scene resource. Returns what was left behind.
    pub fn shutdown(mut self) -> ResourceCounts {
        std::mem::take(&mut self.fragments).release(&mut self.scene);
        self.panel.clone().release(&mut self.scene);
        self.scene.despawn(self.room);
        if let Some(capture) = self.capture.take() {
            capture.release(&mut self.scene);
        }
        let left = self.scene.resource_counts();
        log::debug!("Simulator shut down, {} resources left", left.total());
        left
    }
}

/// Floor and back wall the pane stands in front of
fn build_room(scene: &mut RenderScene, config: &SimulationConfig, profile: &QualityProfile) -> NodeId {
    let (width, depth, height) = config.variant.room_size();
    let room = scene.spawn_group(None, "Room", Transform::IDENTITY);
    let floor = scene.spawn_mesh(
        Some(room),
        "Floor",
        Geometry::plane(width, depth),
        Material::Standard(StandardMaterial {
            color: color_from_hex(0x9a9590),
            roughness: 0.8,
            ..Default::default()
        }),
        Transform::from_position_euler(Vec3::ZERO, Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
    );
    scene.set_shadows(floor, false, profile.shadows_enabled);
    let wall = scene.spawn_mesh(
        Some(room),
        "BackWall",
        Geometry::plane(width, height),
        Material::Standard(StandardMaterial {
            color: color_from_hex(0xe8e4de),
            roughness: 0.9,
            ..Default::default()
        }),
        Transform::from_position(Vec3::new(0.0, height / 2.0, -depth / 2.0)),
    );
    scene.set_shadows(wall, false, profile.shadows_enabled);
    room
}
