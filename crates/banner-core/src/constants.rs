use std::f32::consts::PI;

// Default banner tuning shared by the web and native front-ends.

// Spawn ring
pub const BIG_CIRCLE_RADIUS: f32 = 28.0;
pub const NUM_GROUPS: usize = 6;
pub const MAX_GROUPS: usize = 1024;
pub const MAX_CIRCLE_RADIUS: f32 = 10_000.0;
pub const CENTER_OFFSET: f32 = 0.0; // target point is (offset, offset, 0)

// Plane timeline (seconds)
pub const DROP_DURATION: f32 = 5.0;
pub const FADE_DURATION: f32 = 1.0;
pub const HOLD_DURATION: f32 = 0.0;

// Plane sizing
pub const INITIAL_SCALE: f32 = 5.0;
pub const FINAL_SCALE: f32 = 0.0;
pub const PLANE_WIDTH: f32 = 1.0;
pub const PLANE_HEIGHT: f32 = 1.5;

// Interpolated x/y are multiplied by this on every sample
pub const POSITION_MODIFIER: f32 = 1.5;

// Random start rotation bound per axis (radians)
pub const ROTATION_JITTER: f32 = PI * 0.05;

// Spawn timer
pub const ADD_DROP_INTERVAL_MS: f64 = 500.0;

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 20.0;

// Scene
pub const BACKGROUND_RGB: u32 = 0x000000;
pub const DEFAULT_PALETTE: [u32; 5] = [0x9b5de5, 0xf15bb5, 0xfee440, 0x00bbf9, 0x00f5d4];
pub const DEFAULT_TEXTURE: &str = "/bg.jpg";

/// Unpack a `0xRRGGBB` color into linear-ish `[r, g, b]` floats in 0..1.
#[inline]
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
