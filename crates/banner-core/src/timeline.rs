//! Plane animation as a pure function of elapsed time.
//!
//! Position, scale, rotation and opacity each have their own tween, but all of
//! them are sampled from the same per-plane elapsed time, so a plane's state at
//! `t` is fully determined and disposal always happens at `lifetime()`.

use crate::config::BannerConfig;
use crate::ease::Ease;
use glam::Vec3;

pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// Interpolation of one value from `from` to `to`, starting after `delay`
/// seconds and lasting `duration` seconds.
#[derive(Clone, Copy, Debug)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    pub delay: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay: 0.0,
            duration,
            ease,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    #[inline]
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Linear progress in [0, 1] at time `t`.
    #[inline]
    pub fn progress(&self, t: f32) -> f32 {
        if t <= self.delay {
            0.0
        } else if self.duration <= 0.0 {
            1.0
        } else {
            ((t - self.delay) / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn sample(&self, t: f32) -> T {
        T::lerp(self.from, self.to, self.ease.apply(self.progress(t)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanePhase {
    /// Waiting for its texture; not in the scene yet.
    Spawning,
    FadingIn,
    Holding,
    FadingOut,
    Disposed,
}

/// Snapshot of every animated plane property at one instant.
#[derive(Clone, Copy, Debug)]
pub struct PlaneSample {
    pub phase: PlanePhase,
    /// Position/scale/rotation tweens are still running.
    pub dropping: bool,
    pub position: Vec3,
    pub scale: f32,
    pub rotation: Vec3,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct PlaneTimeline {
    position: Tween<Vec3>,
    position_modifier: f32,
    scale: Tween<f32>,
    rotation: Tween<Vec3>,
    spin_per_sec: f32,
    fade_in: Tween<f32>,
    fade_out: Tween<f32>,
    drop_duration: f32,
}

impl PlaneTimeline {
    pub fn new(
        config: &BannerConfig,
        start: Vec3,
        start_rotation: Vec3,
        end_rotation: Vec3,
        drop_duration: f32,
    ) -> Self {
        let ease = config.ease;
        let target = Vec3::new(config.center_offset, config.center_offset, 0.0);
        let fade = config.fade_duration.min(drop_duration);
        let hold_end = (fade + config.hold_duration).min(drop_duration);
        Self {
            position: Tween::new(start, target, drop_duration, ease),
            position_modifier: config.position_modifier,
            scale: Tween::new(config.initial_scale, config.final_scale, drop_duration, ease),
            rotation: Tween::new(start_rotation, end_rotation, drop_duration, ease),
            spin_per_sec: config.spin_per_sec,
            fade_in: Tween::new(0.0, 1.0, fade, ease),
            fade_out: Tween::new(1.0, 0.0, drop_duration - hold_end, ease).with_delay(hold_end),
            drop_duration,
        }
    }

    /// Seconds from entering the scene until disposal.
    #[inline]
    pub fn lifetime(&self) -> f32 {
        self.drop_duration.max(self.fade_out.end_time())
    }

    pub fn phase_at(&self, t: f32) -> PlanePhase {
        if t < 0.0 {
            PlanePhase::Spawning
        } else if t >= self.lifetime() {
            PlanePhase::Disposed
        } else if t < self.fade_in.end_time() {
            PlanePhase::FadingIn
        } else if t < self.fade_out.delay {
            PlanePhase::Holding
        } else {
            PlanePhase::FadingOut
        }
    }

    fn opacity_at(&self, phase: PlanePhase, t: f32) -> f32 {
        let o = match phase {
            PlanePhase::Spawning | PlanePhase::Disposed => 0.0,
            PlanePhase::FadingIn => self.fade_in.sample(t),
            PlanePhase::Holding => 1.0,
            PlanePhase::FadingOut => self.fade_out.sample(t),
        };
        o.clamp(0.0, 1.0)
    }

    pub fn sample(&self, t: f32) -> PlaneSample {
        let phase = self.phase_at(t);
        let mut position = self.position.sample(t);
        position.x *= self.position_modifier;
        position.y *= self.position_modifier;
        let mut rotation = self.rotation.sample(t);
        rotation.z += self.spin_per_sec * t.clamp(0.0, self.drop_duration);
        PlaneSample {
            phase,
            dropping: (0.0..self.drop_duration).contains(&t),
            position,
            scale: self.scale.sample(t),
            rotation,
            opacity: self.opacity_at(phase, t),
        }
    }
}
