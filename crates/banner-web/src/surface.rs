// Pure sizing helpers shared by the DOM glue and host-side tests.
use std::time::Duration;

/// Longest frame step fed to the animator. Browsers stop rAF for hidden
/// tabs, so the first frame after a long gap is clamped to this.
pub const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Backing-store size for a canvas laid out at `css_width` x `css_height`
/// CSS pixels on a display with the given device pixel ratio.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let w = (css_width.max(0.0) * dpr) as u32;
    let h = (css_height.max(0.0) * dpr) as u32;
    (w.max(1), h.max(1))
}

#[inline]
pub fn clamp_frame_step(dt: Duration) -> Duration {
    dt.min(MAX_FRAME_STEP)
}

/// Timer delays handed to `setTimeout` are whole milliseconds, at least 1.
#[inline]
pub fn timeout_millis(delay_ms: f64) -> i32 {
    if !delay_ms.is_finite() {
        return 1;
    }
    delay_ms.round().clamp(1.0, i32::MAX as f64) as i32
}
