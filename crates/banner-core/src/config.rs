//! Mount-time configuration of the banner.
//!
//! Every field has a default, so the simplest mount passes nothing. Field names
//! are camelCase on the wire to match the host page's mount attributes.

use crate::constants::*;
use crate::ease::Ease;
use crate::error::{BannerError, BannerResult};
use serde::Deserialize;
use std::f32::consts::{PI, TAU};

/// Spawn-rate acceleration: every tick shortens the interval by `step_ms`
/// until it reaches `min_interval_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acceleration {
    pub step_ms: f64,
    pub min_interval_ms: f64,
}

/// How a plane's start/end rotation is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum RotationMode {
    /// Random x/y start rotation within ±`max_angle`, drifting by another
    /// random ±`max_angle` over the drop.
    #[serde(rename_all = "camelCase")]
    Perturb { max_angle: f32 },
    /// Fixed y rotation that settles to zero ("turning to face the camera").
    #[serde(rename_all = "camelCase")]
    FaceCamera { initial_y: f32 },
}

impl Default for RotationMode {
    fn default() -> Self {
        Self::Perturb {
            max_angle: ROTATION_JITTER,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub z: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            z: CAMERA_Z,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BannerConfig {
    pub circle_radius: f32,
    pub group_count: usize,
    /// Drop duration of the first plane (seconds).
    pub drop_duration: f32,
    /// When set, drop duration shrinks linearly towards this value over
    /// `ramp_spawns` spawns.
    pub final_drop_duration: Option<f32>,
    pub ramp_spawns: u32,
    pub initial_scale: f32,
    pub final_scale: f32,
    pub fade_duration: f32,
    pub hold_duration: f32,
    pub spawn_interval_ms: f64,
    pub acceleration: Option<Acceleration>,
    pub center_offset: f32,
    pub position_modifier: f32,
    pub jitter: f32,
    pub rotation: RotationMode,
    /// Continuous z rotation (radians/s) while the plane is dropping.
    pub spin_per_sec: f32,
    pub ease: Ease,
    /// Image URLs or asset paths; empty means solid-color planes.
    pub texture_catalog: Vec<String>,
    pub palette: Vec<u32>,
    pub background: u32,
    pub camera: CameraConfig,
    pub seed: Option<u64>,
    pub headline: String,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            circle_radius: BIG_CIRCLE_RADIUS,
            group_count: NUM_GROUPS,
            drop_duration: DROP_DURATION,
            final_drop_duration: None,
            ramp_spawns: 0,
            initial_scale: INITIAL_SCALE,
            final_scale: FINAL_SCALE,
            fade_duration: FADE_DURATION,
            hold_duration: HOLD_DURATION,
            spawn_interval_ms: ADD_DROP_INTERVAL_MS,
            acceleration: None,
            center_offset: CENTER_OFFSET,
            position_modifier: POSITION_MODIFIER,
            jitter: 0.0,
            rotation: RotationMode::default(),
            spin_per_sec: 0.0,
            ease: Ease::default(),
            texture_catalog: vec![DEFAULT_TEXTURE.to_string()],
            palette: DEFAULT_PALETTE.to_vec(),
            background: BACKGROUND_RGB,
            camera: CameraConfig::default(),
            seed: None,
            headline: "GK PHOTOGRAPHY\n& FILMS".to_string(),
            cta_label: None,
            cta_href: None,
        }
    }
}

fn finite(name: &str, v: f32) -> BannerResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(BannerError::config(format!("{name} must be finite, got {v}")))
    }
}

fn positive(name: &str, v: f32) -> BannerResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(BannerError::config(format!("{name} must be positive, got {v}")))
    }
}

impl BannerConfig {
    /// Parse a JSON object (camelCase keys, all optional) and validate it.
    pub fn from_json(json: &str) -> BannerResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| BannerError::config(format!("invalid banner config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Shortest drop duration any plane can get.
    pub fn min_drop_duration(&self) -> f32 {
        match self.final_drop_duration {
            Some(d) => d.min(self.drop_duration),
            None => self.drop_duration,
        }
    }

    pub fn validate(&self) -> BannerResult<()> {
        if !(1..=MAX_GROUPS).contains(&self.group_count) {
            return Err(BannerError::config(format!(
                "groupCount must be in 1..={MAX_GROUPS}, got {}",
                self.group_count
            )));
        }
        positive("circleRadius", self.circle_radius)?;
        if self.circle_radius > MAX_CIRCLE_RADIUS {
            return Err(BannerError::config(format!(
                "circleRadius must be at most {MAX_CIRCLE_RADIUS}"
            )));
        }
        positive("dropDuration", self.drop_duration)?;
        if let Some(d) = self.final_drop_duration {
            positive("finalDropDuration", d)?;
        }
        positive("fadeDuration", self.fade_duration)?;
        if !(self.hold_duration.is_finite() && self.hold_duration >= 0.0) {
            return Err(BannerError::config("holdDuration must be >= 0"));
        }
        if self.fade_duration + self.hold_duration >= self.min_drop_duration() {
            return Err(BannerError::config(format!(
                "fadeDuration + holdDuration ({}) must be shorter than the drop ({})",
                self.fade_duration + self.hold_duration,
                self.min_drop_duration()
            )));
        }
        if !(self.spawn_interval_ms.is_finite() && self.spawn_interval_ms > 0.0) {
            return Err(BannerError::config("spawnIntervalMs must be positive"));
        }
        if let Some(acc) = self.acceleration {
            if !(acc.step_ms.is_finite() && acc.step_ms >= 0.0) {
                return Err(BannerError::config("acceleration.stepMs must be >= 0"));
            }
            if !(acc.min_interval_ms > 0.0 && acc.min_interval_ms <= self.spawn_interval_ms) {
                return Err(BannerError::config(
                    "acceleration.minIntervalMs must be in (0, spawnIntervalMs]",
                ));
            }
        }
        if !(self.jitter.is_finite() && (0.0..=self.circle_radius).contains(&self.jitter)) {
            return Err(BannerError::config("jitter must be in [0, circleRadius]"));
        }
        match self.rotation {
            RotationMode::Perturb { max_angle } => {
                if !(max_angle.is_finite() && (0.0..=PI).contains(&max_angle)) {
                    return Err(BannerError::config("rotation.maxAngle must be in [0, π]"));
                }
            }
            RotationMode::FaceCamera { initial_y } => {
                if !(initial_y.is_finite() && initial_y.abs() <= TAU) {
                    return Err(BannerError::config("rotation.initialY must be within ±2π"));
                }
            }
        }
        finite("initialScale", self.initial_scale)?;
        finite("finalScale", self.final_scale)?;
        finite("centerOffset", self.center_offset)?;
        finite("positionModifier", self.position_modifier)?;
        finite("spinPerSec", self.spin_per_sec)?;
        if self.palette.is_empty() {
            return Err(BannerError::config("palette must not be empty"));
        }
        positive("camera.fovDeg", self.camera.fov_deg)?;
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(BannerError::config("camera clip planes must satisfy 0 < near < far"));
        }
        Ok(())
    }
}
