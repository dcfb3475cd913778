// Shared host-side fixtures: a renderer that records every call and a
// simulated host that drives the spawn timer and frames on a fake clock.

#![allow(dead_code)]

use banner_core::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default, Debug)]
pub struct RenderLog {
    pub size: (u32, u32),
    pub renders: usize,
    pub last_plane_count: usize,
    pub releases: HashMap<PlaneId, usize>,
    pub released_textures: Vec<TextureId>,
    pub orphan_textures: Vec<TextureId>,
    pub disposes: usize,
}

pub struct RecordingRenderer {
    pub log: Rc<RefCell<RenderLog>>,
}

impl RecordingRenderer {
    pub fn new(width: u32, height: u32) -> (Self, Rc<RefCell<RenderLog>>) {
        let log = Rc::new(RefCell::new(RenderLog {
            size: (width, height),
            ..Default::default()
        }));
        (Self { log: log.clone() }, log)
    }
}

impl Renderer for RecordingRenderer {
    fn size(&self) -> (u32, u32) {
        self.log.borrow().size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().size = (width, height);
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> BannerResult<()> {
        let mut log = self.log.borrow_mut();
        log.renders += 1;
        log.last_plane_count = scene.len();
        Ok(())
    }

    fn release(&mut self, plane: PlaneId, texture: Option<TextureId>) {
        let mut log = self.log.borrow_mut();
        *log.releases.entry(plane).or_insert(0) += 1;
        if let Some(t) = texture {
            log.released_textures.push(t);
        }
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.log.borrow_mut().orphan_textures.push(texture);
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposes += 1;
    }
}

pub fn seeded_config() -> BannerConfig {
    BannerConfig {
        seed: Some(42),
        ..BannerConfig::default()
    }
}

pub fn make_animator(
    config: BannerConfig,
) -> (SceneAnimator<RecordingRenderer>, Rc<RefCell<RenderLog>>) {
    let (renderer, log) = RecordingRenderer::new(1920, 1080);
    let animator = SceneAnimator::new(config, renderer).expect("valid config");
    (animator, log)
}

/// Drives an animator the way a browser would: a repeating spawn timer plus a
/// frame callback, with texture loads that resolve immediately.
pub struct SimulatedHost {
    pub animator: SceneAnimator<RecordingRenderer>,
    pub timer: SpawnTimer,
    pub fail_loads: bool,
    next_texture: u64,
}

impl SimulatedHost {
    pub fn new(config: BannerConfig) -> (Self, Rc<RefCell<RenderLog>>) {
        let timer = SpawnTimer::new(SpawnSchedule::new(&config));
        let (animator, log) = make_animator(config);
        (
            Self {
                animator,
                timer,
                fail_loads: false,
                next_texture: 0,
            },
            log,
        )
    }

    /// Fire due spawn ticks, then run one frame of `dt_ms`. Returns the planes
    /// added during this step.
    pub fn step(&mut self, dt_ms: u64) -> Vec<PlaneId> {
        let mut added = Vec::new();
        for _ in 0..self.timer.advance(dt_ms as f64) {
            match self.animator.spawn_tick() {
                SpawnOutcome::Added(id) => added.push(id),
                SpawnOutcome::NeedsTexture(req) => {
                    let result = if self.fail_loads {
                        Err(BannerError::texture(format!("404 {}", req.url)))
                    } else {
                        let t = TextureId(self.next_texture);
                        self.next_texture += 1;
                        Ok(t)
                    };
                    if let Some(id) = self.animator.complete_spawn(req.ticket, result) {
                        added.push(id);
                    }
                }
                SpawnOutcome::Skipped => {}
            }
        }
        self.animator
            .frame(Duration::from_millis(dt_ms))
            .expect("render");
        added
    }
}
