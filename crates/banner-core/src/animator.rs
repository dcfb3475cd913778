use crate::clock::TweenClock;
use crate::config::{BannerConfig, RotationMode};
use crate::constants::rgb_from_hex;
use crate::error::{BannerError, BannerResult};
use crate::layout::SpawnRing;
use crate::scene::{Camera, Plane, PlaneId, Scene, TextureId};
use crate::schedule::SpawnSchedule;
use crate::timeline::{PlanePhase, PlaneTimeline};
use fnv::FnvHashMap;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// GPU side of the animator. Implemented by the wgpu renderer and by test
/// doubles.
pub trait Renderer {
    /// Current output size in pixels.
    fn size(&self) -> (u32, u32);
    fn set_size(&mut self, width: u32, height: u32);
    fn render(&mut self, scene: &Scene, camera: &Camera) -> BannerResult<()>;
    /// Free the geometry and texture of a plane that left the scene.
    fn release(&mut self, plane: PlaneId, texture: Option<TextureId>);
    /// Free a texture that never got attached to a plane.
    fn release_texture(&mut self, texture: TextureId);
    /// Free the underlying surface and device resources.
    fn dispose(&mut self);
}

/// Cancellation token tied to one mount. Async texture loads hold a clone
/// and must check `is_live()` before touching the animator.
#[derive(Clone, Debug)]
pub struct MountToken(Rc<Cell<bool>>);

impl MountToken {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    pub fn cancel(&self) {
        self.0.set(false);
    }
}

impl Default for MountToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpawnTicket(pub u64);

/// A spawn that is waiting for its texture.
#[derive(Clone, Debug)]
pub struct SpawnRequest {
    pub ticket: SpawnTicket,
    pub url: String,
    pub token: MountToken,
}

#[derive(Clone, Debug)]
pub enum SpawnOutcome {
    /// Solid-color plane, added to the scene right away.
    Added(PlaneId),
    /// Caller must load `url` and hand the result to `complete_spawn`.
    NeedsTexture(SpawnRequest),
    /// The animator is torn down or the surface is hidden.
    Skipped,
}

#[derive(Clone, Debug)]
struct PendingSpawn {
    timeline: PlaneTimeline,
    tint: [f32; 3],
}

#[inline]
fn symmetric(rng: &mut impl Rng, max: f32) -> f32 {
    if max > 0.0 {
        rng.gen_range(-max..max)
    } else {
        0.0
    }
}

/// Owning context for one banner mount: scene, camera, renderer, tween clock
/// and every in-flight spawn. Dropping it tears everything down.
pub struct SceneAnimator<R: Renderer> {
    config: BannerConfig,
    scene: Scene,
    camera: Camera,
    renderer: R,
    clock: TweenClock,
    ring: SpawnRing,
    schedule: SpawnSchedule,
    rng: StdRng,
    pending: FnvHashMap<SpawnTicket, PendingSpawn>,
    next_ticket: u64,
    next_plane: u64,
    spawn_count: u64,
    released_count: u64,
    token: MountToken,
    torn_down: bool,
}

impl<R: Renderer> SceneAnimator<R> {
    pub fn new(config: BannerConfig, renderer: R) -> BannerResult<Self> {
        config.validate()?;
        let (width, height) = renderer.size();
        if width == 0 || height == 0 {
            return Err(BannerError::surface(format!(
                "render surface has no area ({width}x{height})"
            )));
        }
        let camera = Camera::new(&config.camera, width as f32 / height as f32);
        let ring = SpawnRing::new(config.circle_radius, config.group_count, config.jitter);
        let schedule = SpawnSchedule::new(&config);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::info!(
            "[animator] mounted {}x{} groups={} radius={:.1} drop={:.2}s",
            width,
            height,
            config.group_count,
            config.circle_radius,
            config.drop_duration
        );
        Ok(Self {
            scene: Scene::new(rgb_from_hex(config.background)),
            camera,
            renderer,
            clock: TweenClock::new(),
            ring,
            schedule,
            rng,
            pending: FnvHashMap::default(),
            next_ticket: 0,
            next_plane: 0,
            spawn_count: 0,
            released_count: 0,
            token: MountToken::new(),
            torn_down: false,
            config,
        })
    }

    pub fn config(&self) -> &BannerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn clock(&self) -> &TweenClock {
        &self.clock
    }

    pub fn spawn_positions(&self) -> &[Vec3] {
        self.ring.positions()
    }

    /// Number of spawn ticks handled so far.
    pub fn spawn_count(&self) -> u64 {
        self.spawn_count
    }

    /// Planes whose resources have been released.
    pub fn released_count(&self) -> u64 {
        self.released_count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn token(&self) -> MountToken {
        self.token.clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Delay before the next spawn tick, stepping the acceleration schedule.
    pub fn next_spawn_delay_ms(&mut self) -> f64 {
        self.schedule.next_interval_ms()
    }

    fn build_timeline(&mut self) -> PlaneTimeline {
        let start = self.ring.next_position(&mut self.rng);
        let (start_rotation, end_rotation) = match self.config.rotation {
            RotationMode::Perturb { max_angle } => {
                let start = Vec3::new(
                    symmetric(&mut self.rng, max_angle),
                    symmetric(&mut self.rng, max_angle),
                    0.0,
                );
                let drift = Vec3::new(
                    symmetric(&mut self.rng, max_angle),
                    symmetric(&mut self.rng, max_angle),
                    0.0,
                );
                (start, start + drift)
            }
            RotationMode::FaceCamera { initial_y } => (Vec3::new(0.0, initial_y, 0.0), Vec3::ZERO),
        };
        let drop = self.schedule.drop_duration_for(self.spawn_count);
        PlaneTimeline::new(&self.config, start, start_rotation, end_rotation, drop)
    }

    /// Handle one firing of the spawn timer. Ticks that fire while the
    /// surface is hidden are dropped, so a paused scene never grows.
    pub fn spawn_tick(&mut self) -> SpawnOutcome {
        if self.torn_down || self.clock.is_paused() {
            return SpawnOutcome::Skipped;
        }
        let timeline = self.build_timeline();
        let tint = self
            .config
            .palette
            .choose(&mut self.rng)
            .map(|&hex| rgb_from_hex(hex))
            .unwrap_or([1.0, 1.0, 1.0]);
        let url = self.config.texture_catalog.choose(&mut self.rng).cloned();
        self.spawn_count += 1;
        match url {
            None => SpawnOutcome::Added(self.insert_plane(timeline, tint, None)),
            Some(url) => {
                let ticket = SpawnTicket(self.next_ticket);
                self.next_ticket += 1;
                self.pending.insert(ticket, PendingSpawn { timeline, tint });
                SpawnOutcome::NeedsTexture(SpawnRequest {
                    ticket,
                    url,
                    token: self.token.clone(),
                })
            }
        }
    }

    fn insert_plane(
        &mut self,
        timeline: PlaneTimeline,
        tint: [f32; 3],
        texture: Option<TextureId>,
    ) -> PlaneId {
        let id = PlaneId(self.next_plane);
        self.next_plane += 1;
        self.scene
            .add(Plane::new(id, texture, tint, self.clock.now(), timeline));
        log::debug!("[animator] plane {} added, live={}", id.0, self.scene.len());
        id
    }

    /// Finish a spawn once its texture load resolved. A failed load skips the
    /// plane; a stale ticket releases the texture it brought.
    pub fn complete_spawn(
        &mut self,
        ticket: SpawnTicket,
        texture: Result<TextureId, BannerError>,
    ) -> Option<PlaneId> {
        if self.torn_down {
            return None;
        }
        let Some(pending) = self.pending.remove(&ticket) else {
            log::warn!("[animator] unknown spawn ticket {}", ticket.0);
            if let Ok(tex) = texture {
                self.renderer.release_texture(tex);
            }
            return None;
        };
        match texture {
            Ok(tex) => Some(self.insert_plane(pending.timeline, pending.tint, Some(tex))),
            Err(e) => {
                log::warn!("[texture] load failed, skipping spawn: {e}");
                None
            }
        }
    }

    /// Advance the tween clock, update every plane, dispose finished ones and
    /// render.
    pub fn frame(&mut self, dt: Duration) -> BannerResult<()> {
        if self.torn_down {
            return Ok(());
        }
        self.clock.advance(dt);
        self.update_planes();
        self.renderer.render(&self.scene, &self.camera)
    }

    fn update_planes(&mut self) {
        let now = self.clock.now();
        let mut finished: SmallVec<[PlaneId; 4]> = SmallVec::new();
        for plane in self.scene.planes_mut() {
            let sample = plane.timeline.sample(plane.age(now));
            plane.apply(&sample);
            if sample.phase == PlanePhase::Disposed {
                finished.push(plane.id);
            }
        }
        for id in finished {
            if let Some(mut plane) = self.scene.remove(id) {
                self.dispose_plane(&mut plane);
            }
        }
    }

    fn dispose_plane(&mut self, plane: &mut Plane) {
        if let Some(texture) = plane.take_resources() {
            self.renderer.release(plane.id, texture);
            self.released_count += 1;
            log::debug!("[animator] plane {} disposed", plane.id.0);
        }
    }

    /// Track a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.torn_down || width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        self.renderer.set_size(width, height);
        log::info!("[animator] resized to {}x{}", width, height);
    }

    /// Hidden surfaces freeze every timeline; visible ones resume them.
    pub fn set_visible(&mut self, visible: bool) {
        if self.torn_down {
            return;
        }
        if visible {
            self.clock.resume();
        } else {
            self.clock.pause();
        }
        log::info!(
            "[animator] visibility={} t={:.2}s",
            if visible { "visible" } else { "hidden" },
            self.clock.now()
        );
    }

    /// Cancel pending loads, dispose every live plane and the renderer.
    /// Runs at most once; later calls are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.token.cancel();
        let cancelled = self.pending.len();
        self.pending.clear();
        let mut live = self.scene.drain();
        for plane in live.iter_mut() {
            self.dispose_plane(plane);
        }
        self.renderer.dispose();
        log::info!(
            "[animator] torn down: {} live planes disposed, {} pending loads cancelled",
            live.len(),
            cancelled
        );
    }
}

impl<R: Renderer> Drop for SceneAnimator<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
