// Host-side tests for the per-plane timeline state machine.

use banner_core::*;
use glam::Vec3;

fn timeline(cfg: &BannerConfig) -> PlaneTimeline {
    PlaneTimeline::new(
        cfg,
        Vec3::new(28.0, 0.0, 0.0),
        Vec3::new(0.1, -0.1, 0.0),
        Vec3::new(0.05, 0.05, 0.0),
        cfg.drop_duration,
    )
}

#[test]
fn tween_respects_delay_and_duration() {
    let t = Tween::new(0.0_f32, 10.0, 2.0, Ease::Linear).with_delay(1.0);
    assert_eq!(t.sample(0.0), 0.0);
    assert_eq!(t.sample(1.0), 0.0);
    assert!((t.sample(2.0) - 5.0).abs() < 1e-6);
    assert_eq!(t.sample(3.0), 10.0);
    assert_eq!(t.sample(99.0), 10.0);
    assert_eq!(t.end_time(), 3.0);
}

#[test]
fn phases_follow_fade_in_hold_fade_out() {
    let cfg = BannerConfig {
        hold_duration: 1.0,
        ..BannerConfig::default()
    };
    let tl = timeline(&cfg);
    assert_eq!(tl.phase_at(-0.1), PlanePhase::Spawning);
    assert_eq!(tl.phase_at(0.0), PlanePhase::FadingIn);
    assert_eq!(tl.phase_at(0.5), PlanePhase::FadingIn);
    assert_eq!(tl.phase_at(1.5), PlanePhase::Holding);
    assert_eq!(tl.phase_at(2.5), PlanePhase::FadingOut);
    assert_eq!(tl.phase_at(5.0), PlanePhase::Disposed);
    assert_eq!(tl.lifetime(), 5.0);
}

#[test]
fn default_timeline_has_no_hold() {
    let tl = timeline(&BannerConfig::default());
    assert_eq!(tl.phase_at(0.99), PlanePhase::FadingIn);
    assert_eq!(tl.phase_at(1.0), PlanePhase::FadingOut);
}

#[test]
fn opacity_is_bounded_at_every_sample() {
    for hold in [0.0, 0.5, 2.0] {
        let cfg = BannerConfig {
            hold_duration: hold,
            ..BannerConfig::default()
        };
        let tl = timeline(&cfg);
        let mut t = -1.0;
        while t < 7.0 {
            let o = tl.sample(t).opacity;
            assert!((0.0..=1.0).contains(&o), "t={t} opacity={o}");
            t += 0.01;
        }
    }
}

#[test]
fn opacity_peaks_after_fade_in_and_ends_at_zero() {
    let tl = timeline(&BannerConfig::default());
    assert_eq!(tl.sample(0.0).opacity, 0.0);
    assert!((tl.sample(1.0).opacity - 1.0).abs() < 1e-6);
    assert!(tl.sample(4.999).opacity < 0.01);
    assert_eq!(tl.sample(5.0).opacity, 0.0);
}

#[test]
fn position_runs_from_modified_start_to_target() {
    let cfg = BannerConfig::default();
    let tl = timeline(&cfg);
    let start = tl.sample(0.0);
    // x/y are scaled by the position modifier on every sample
    assert!((start.position.x - 28.0 * 1.5).abs() < 1e-4);
    assert_eq!(start.position.y, 0.0);
    let end = tl.sample(cfg.drop_duration);
    assert!(end.position.length() < 1e-5);
    let mid = tl.sample(2.5);
    assert!(mid.position.x > 0.0 && mid.position.x < 28.0 * 1.5);
}

#[test]
fn scale_shrinks_from_initial_to_final() {
    let cfg = BannerConfig::default();
    let tl = timeline(&cfg);
    assert_eq!(tl.sample(0.0).scale, cfg.initial_scale);
    assert_eq!(tl.sample(cfg.drop_duration).scale, cfg.final_scale);
    let mut prev = f32::MAX;
    for i in 0..=50 {
        let s = tl.sample(i as f32 * 0.1).scale;
        assert!(s <= prev);
        prev = s;
    }
}

#[test]
fn face_camera_rotation_settles_to_zero() {
    let cfg = BannerConfig {
        rotation: RotationMode::FaceCamera { initial_y: 1.2 },
        ..BannerConfig::default()
    };
    let tl = PlaneTimeline::new(
        &cfg,
        Vec3::new(0.0, 28.0, 0.0),
        Vec3::new(0.0, 1.2, 0.0),
        Vec3::ZERO,
        cfg.drop_duration,
    );
    assert!((tl.sample(0.0).rotation.y - 1.2).abs() < 1e-6);
    assert!(tl.sample(cfg.drop_duration).rotation.length() < 1e-6);
}

#[test]
fn spin_accumulates_only_while_dropping() {
    let cfg = BannerConfig {
        spin_per_sec: 0.2,
        ..BannerConfig::default()
    };
    let tl = PlaneTimeline::new(&cfg, Vec3::X, Vec3::ZERO, Vec3::ZERO, 5.0);
    assert!((tl.sample(2.0).rotation.z - 0.4).abs() < 1e-5);
    assert!((tl.sample(5.0).rotation.z - 1.0).abs() < 1e-5);
    assert!((tl.sample(6.0).rotation.z - 1.0).abs() < 1e-5);
    assert!(tl.sample(2.0).dropping);
    assert!(!tl.sample(5.0).dropping);
}
