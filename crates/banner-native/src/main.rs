use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use winit::{dpi::PhysicalSize, event::*, event_loop::EventLoop, window::WindowBuilder};

use banner_core::{
    BannerConfig, BannerError, GpuRenderer, SceneAnimator, SpawnOutcome, SpawnSchedule, SpawnTimer,
};

mod assets;

use assets::AssetStore;

const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Desktop preview of the falling-planes hero banner.
#[derive(Parser, Debug)]
#[command(name = "banner-native", version)]
struct Args {
    /// JSON config file using the same camelCase keys as the web mount
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that catalog URLs such as `/bg.jpg` resolve against
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<BannerConfig> {
    let Some(path) = path else {
        return Ok(BannerConfig::default());
    };
    let json =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(BannerConfig::from_json(&json)?)
}

/// Run one spawn tick, loading the texture synchronously from disk.
fn spawn_one(animator: &mut SceneAnimator<GpuRenderer>, assets: &mut AssetStore) {
    let SpawnOutcome::NeedsTexture(request) = animator.spawn_tick() else {
        return;
    };
    let texture = match assets.load(&request.url) {
        Ok(img) => animator
            .renderer_mut()
            .upload_texture(img.width(), img.height(), img.as_raw()),
        Err(e) => Err(BannerError::texture(format!("{}: {:#}", request.url, e))),
    };
    animator.complete_spawn(request.ticket, texture);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let mut assets = AssetStore::new(&args.assets);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Hero banner (native preview)")
            .with_inner_size(PhysicalSize::new(args.width, args.height))
            .build(&event_loop)?,
    );
    let size = window.inner_size();

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(Arc::clone(&window))?;
    let renderer = pollster::block_on(GpuRenderer::new(
        &instance,
        surface,
        size.width.max(1),
        size.height.max(1),
    ))?;
    let mut animator = SceneAnimator::new(config, renderer)?;
    let mut timer = SpawnTimer::new(SpawnSchedule::new(animator.config()));
    let mut last = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => animator.resize(size.width, size.height),
        Event::WindowEvent {
            event: WindowEvent::Occluded(occluded),
            ..
        } => animator.set_visible(!occluded),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = (now - last).min(MAX_FRAME_STEP);
            last = now;
            for _ in 0..timer.advance(dt.as_secs_f64() * 1000.0) {
                spawn_one(&mut animator, &mut assets);
            }
            if let Err(e) = animator.frame(dt) {
                log::warn!("{}", e);
            }
            window.request_redraw();
        }
        Event::LoopExiting => animator.teardown(),
        _ => {}
    })?;
    Ok(())
}
