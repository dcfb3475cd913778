// Host-side integration tests for the scene animator: spawn, disposal,
// resize, visibility and teardown, driven on a simulated clock.

mod common;

use banner_core::*;
use common::*;
use std::time::Duration;

#[test]
fn mount_builds_camera_from_surface() {
    let (animator, log) = make_animator(seeded_config());
    let cam = animator.camera();
    assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    assert!((cam.fovy_radians - 75f32.to_radians()).abs() < 1e-6);
    assert_eq!(cam.eye.z, 20.0);
    assert_eq!(animator.spawn_positions().len(), 6);
    assert!(animator.scene().is_empty());
    assert_eq!(log.borrow().disposes, 0);
}

#[test]
fn zero_area_surface_is_rejected() {
    let (renderer, _log) = RecordingRenderer::new(0, 0);
    let err = SceneAnimator::new(seeded_config(), renderer).err().unwrap();
    assert!(matches!(err, BannerError::Surface(_)));
}

#[test]
fn one_plane_per_interval_and_removed_after_drop() {
    let cfg = BannerConfig {
        group_count: 6,
        circle_radius: 28.0,
        drop_duration: 5.0,
        ..seeded_config()
    };
    let (mut host, log) = SimulatedHost::new(cfg);

    let mut added = Vec::new();
    for _ in 0..5 {
        added.extend(host.step(100));
    }
    assert_eq!(added.len(), 1, "exactly one plane within one interval");
    let first = added[0];
    assert!(host.animator.scene().contains(first));
    assert_eq!(host.animator.scene().len(), 1);

    // Plane is 0.1s old now; still alive at 4.9s, gone by 5.1s
    for _ in 0..48 {
        host.step(100);
    }
    assert!(host.animator.scene().contains(first));
    for _ in 0..2 {
        host.step(100);
    }
    assert!(!host.animator.scene().contains(first));
    assert_eq!(log.borrow().releases.get(&first), Some(&1));
}

#[test]
fn every_finished_plane_is_released_exactly_once() {
    let (mut host, log) = SimulatedHost::new(seeded_config());
    for _ in 0..(20 * 60) {
        host.step(16);
        for p in host.animator.scene().planes() {
            assert!((0.0..=1.0).contains(&p.opacity), "opacity {}", p.opacity);
            assert!(!p.is_released());
        }
    }
    let log = log.borrow();
    assert!(!log.releases.is_empty());
    assert!(log.releases.values().all(|&n| n == 1));
    for id in log.releases.keys() {
        assert!(!host.animator.scene().contains(*id));
    }
    // Each released plane gave back its own texture
    assert_eq!(log.released_textures.len(), log.releases.len());
    assert_eq!(host.animator.released_count() as usize, log.releases.len());
}

#[test]
fn steady_state_population_matches_drop_over_interval() {
    let (mut host, _log) = SimulatedHost::new(seeded_config());
    for _ in 0..200 {
        host.step(50);
    }
    // 5s lifetime / 0.5s interval = 10 live planes
    let live = host.animator.scene().len();
    assert!((9..=11).contains(&live), "live={live}");
}

#[test]
fn spawn_uses_ring_positions_cyclically() {
    let (mut animator, _log) = make_animator(seeded_config());
    let ring = animator.spawn_positions().to_vec();
    let mut ids = Vec::new();
    for _ in 0..12 {
        if let SpawnOutcome::NeedsTexture(req) = animator.spawn_tick() {
            ids.push(animator.complete_spawn(req.ticket, Ok(TextureId(ids.len() as u64))));
        }
    }
    assert_eq!(ids.len(), 12);
    for (i, id) in ids.iter().enumerate() {
        let plane = animator.scene().get(id.unwrap()).unwrap();
        let expected = ring[i % 6] * 1.5;
        assert!((plane.position.x - expected.x).abs() < 1e-3);
        assert!((plane.position.y - expected.y).abs() < 1e-3);
        assert_eq!(plane.opacity, 0.0);
        assert_eq!(plane.scale.x, 5.0);
    }
}

#[test]
fn perturbed_start_rotation_is_bounded() {
    let (mut animator, _log) = make_animator(seeded_config());
    let bound = std::f32::consts::PI * 0.05;
    for i in 0..50 {
        if let SpawnOutcome::NeedsTexture(req) = animator.spawn_tick() {
            let id = animator.complete_spawn(req.ticket, Ok(TextureId(i))).unwrap();
            let r = animator.scene().get(id).unwrap().rotation;
            assert!(r.x.abs() <= bound && r.y.abs() <= bound);
            assert_eq!(r.z, 0.0);
        }
    }
}

#[test]
fn solid_catalog_adds_planes_immediately() {
    let cfg = BannerConfig {
        texture_catalog: Vec::new(),
        ..seeded_config()
    };
    let (mut animator, _log) = make_animator(cfg);
    match animator.spawn_tick() {
        SpawnOutcome::Added(id) => {
            let plane = animator.scene().get(id).unwrap();
            assert!(plane.texture.is_none());
            assert!(DEFAULT_PALETTE
                .iter()
                .any(|&hex| rgb_from_hex(hex) == plane.tint));
        }
        other => panic!("expected Added, got {other:?}"),
    }
}

#[test]
fn catalog_choice_is_uniform_over_entries() {
    let cfg = BannerConfig {
        texture_catalog: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
        ..seeded_config()
    };
    let (mut animator, _log) = make_animator(cfg);
    let mut counts = std::collections::HashMap::new();
    for _ in 0..3000 {
        if let SpawnOutcome::NeedsTexture(req) = animator.spawn_tick() {
            *counts.entry(req.url.clone()).or_insert(0) += 1;
            animator.complete_spawn(req.ticket, Err(BannerError::texture("skip")));
        }
    }
    assert_eq!(counts.len(), 3);
    for n in counts.values() {
        assert!((800..=1200).contains(n), "{counts:?}");
    }
}

#[test]
fn texture_failure_skips_the_slot_and_keeps_spawning() {
    let (mut host, log) = SimulatedHost::new(seeded_config());
    host.fail_loads = true;
    for _ in 0..20 {
        assert!(host.step(100).is_empty());
    }
    assert!(host.animator.scene().is_empty());
    assert_eq!(host.animator.pending_count(), 0);
    assert_eq!(host.animator.spawn_count(), 4);

    host.fail_loads = false;
    let mut added = Vec::new();
    for _ in 0..5 {
        added.extend(host.step(100));
    }
    assert_eq!(added.len(), 1);
    assert!(log.borrow().renders > 0);
}

#[test]
fn stale_ticket_releases_its_texture() {
    let (mut animator, log) = make_animator(seeded_config());
    let SpawnOutcome::NeedsTexture(req) = animator.spawn_tick() else {
        panic!("expected texture request");
    };
    assert!(animator.complete_spawn(req.ticket, Ok(TextureId(7))).is_some());
    assert!(animator.complete_spawn(req.ticket, Ok(TextureId(8))).is_none());
    assert_eq!(log.borrow().orphan_textures, vec![TextureId(8)]);
    assert_eq!(animator.scene().len(), 1);
}

#[test]
fn resize_updates_camera_aspect_and_renderer_size() {
    let (mut animator, log) = make_animator(seeded_config());
    animator.resize(800, 600);
    assert!((animator.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    assert_eq!(log.borrow().size, (800, 600));

    // Degenerate sizes are ignored
    animator.resize(0, 600);
    assert!((animator.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    assert_eq!(log.borrow().size, (800, 600));
}

#[test]
fn hidden_surface_freezes_and_resumes_timelines() {
    let (mut animator, _log) = make_animator(seeded_config());
    let SpawnOutcome::NeedsTexture(req) = animator.spawn_tick() else {
        panic!("expected texture request");
    };
    let id = animator.complete_spawn(req.ticket, Ok(TextureId(0))).unwrap();
    for _ in 0..10 {
        animator.frame(Duration::from_millis(100)).unwrap();
    }
    let before = animator.scene().get(id).unwrap().clone();
    let t_before = animator.clock().now();

    animator.set_visible(false);
    for _ in 0..100 {
        animator.frame(Duration::from_millis(100)).unwrap();
    }
    let frozen = animator.scene().get(id).unwrap();
    assert_eq!(frozen.position, before.position);
    assert_eq!(frozen.opacity, before.opacity);
    assert_eq!(frozen.scale, before.scale);
    assert_eq!(animator.clock().now(), t_before);

    // Resumes from the paused position, not from the start
    animator.set_visible(true);
    animator.frame(Duration::from_millis(100)).unwrap();
    let resumed = animator.scene().get(id).unwrap();
    assert!((resumed.age(animator.clock().now()) - 1.1).abs() < 1e-4);
    assert!(resumed.position.x.abs() < before.position.x.abs());
    assert!(resumed.opacity < before.opacity);
}

#[test]
fn teardown_stops_rendering_and_disposes_once() {
    let (mut host, log) = SimulatedHost::new(seeded_config());
    for _ in 0..30 {
        host.step(100);
    }
    let live: Vec<PlaneId> = host.animator.scene().planes().iter().map(|p| p.id).collect();
    assert!(!live.is_empty());
    let renders = log.borrow().renders;

    host.animator.teardown();
    for _ in 0..10 {
        host.step(100);
    }
    host.animator.teardown();

    let log_ref = log.borrow();
    assert_eq!(log_ref.renders, renders, "no frames after unmount");
    assert_eq!(log_ref.disposes, 1);
    for id in &live {
        assert_eq!(log_ref.releases.get(id), Some(&1));
    }
    assert!(host.animator.scene().is_empty());
    assert!(host.animator.is_torn_down());
}

#[test]
fn teardown_cancels_pending_loads() {
    let (mut animator, log) = make_animator(seeded_config());
    let SpawnOutcome::NeedsTexture(req) = animator.spawn_tick() else {
        panic!("expected texture request");
    };
    assert!(req.token.is_live());
    animator.teardown();
    assert!(!req.token.is_live());
    assert_eq!(animator.pending_count(), 0);
    assert!(animator.complete_spawn(req.ticket, Ok(TextureId(3))).is_none());
    assert!(matches!(animator.spawn_tick(), SpawnOutcome::Skipped));
    assert!(animator.scene().is_empty());
    assert_eq!(log.borrow().disposes, 1);
}

#[test]
fn dropping_the_animator_tears_down() {
    let (mut host, log) = SimulatedHost::new(seeded_config());
    for _ in 0..20 {
        host.step(100);
    }
    let live = host.animator.scene().len();
    assert!(live > 0);
    drop(host);
    let log = log.borrow();
    assert_eq!(log.disposes, 1);
    assert_eq!(log.releases.len(), live);
    assert!(log.releases.values().all(|&n| n == 1));
}

#[test]
fn accelerating_delays_shrink_to_floor() {
    let cfg = BannerConfig {
        acceleration: Some(Acceleration {
            step_ms: 50.0,
            min_interval_ms: 200.0,
        }),
        ..seeded_config()
    };
    let (mut animator, _log) = make_animator(cfg);
    let delays: Vec<f64> = (0..10).map(|_| animator.next_spawn_delay_ms()).collect();
    assert_eq!(
        delays,
        vec![500.0, 450.0, 400.0, 350.0, 300.0, 250.0, 200.0, 200.0, 200.0, 200.0]
    );
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let (mut host, _log) = SimulatedHost::new(seeded_config());
        for _ in 0..40 {
            host.step(100);
        }
        host.animator
            .scene()
            .planes()
            .iter()
            .map(|p| (p.rotation, p.tint))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn hidden_surface_does_not_accumulate_planes() {
    let (mut host, _log) = SimulatedHost::new(seeded_config());
    for _ in 0..20 {
        host.step(100);
    }
    let live_before = host.animator.scene().len();
    let spawned_before = host.animator.spawn_count();

    host.animator.set_visible(false);
    for _ in 0..300 {
        assert!(host.step(1000).is_empty());
    }
    assert_eq!(host.animator.scene().len(), live_before);
    assert_eq!(host.animator.spawn_count(), spawned_before);
    assert_eq!(host.animator.pending_count(), 0);

    host.animator.set_visible(true);
    let mut added = Vec::new();
    for _ in 0..5 {
        added.extend(host.step(100));
    }
    assert_eq!(added.len(), 1);
}

#[test]
fn widest_rotation_and_jitter_spawn_without_panicking() {
    let cfg = BannerConfig {
        jitter: 28.0,
        rotation: RotationMode::Perturb {
            max_angle: std::f32::consts::PI,
        },
        ..seeded_config()
    };
    let (mut host, _log) = SimulatedHost::new(cfg);
    for _ in 0..50 {
        host.step(100);
    }
    assert!(host.animator.spawn_count() >= 9);
}
