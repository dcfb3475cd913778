//! Platform-free core of the hero banner.
//!
//! The [`SceneAnimator`] owns the scene, camera and renderer for one mount and
//! drives every spawned plane through its timeline. Front-ends (web, native)
//! feed it spawn ticks, frame deltas, resize and visibility signals; all of the
//! animation math lives here so it can be tested on the host.

pub mod animator;
pub mod clock;
pub mod config;
pub mod constants;
pub mod ease;
pub mod error;
pub mod layout;
pub mod scene;
pub mod schedule;
pub mod timeline;

#[cfg(feature = "gpu")]
pub mod render;

pub use animator::*;
pub use clock::*;
pub use config::*;
pub use constants::*;
pub use ease::*;
pub use error::*;
pub use layout::*;
pub use scene::*;
pub use schedule::*;
pub use timeline::*;

#[cfg(feature = "gpu")]
pub use render::GpuRenderer;

// Shaders bundled as string constants
#[cfg(feature = "gpu")]
pub static PLANE_WGSL: &str = include_str!("../shaders/plane.wgsl");
