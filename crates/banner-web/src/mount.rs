use crate::dom;
use crate::events;
use crate::frame::{self, FrameContext, RafLoop};
use crate::overlay;
use crate::spawn::{self, SpawnLoop};
use crate::SharedAnimator;
use banner_core::{BannerConfig, GpuRenderer, SceneAnimator};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Everything one mounted banner owns. Dropping it unmounts.
pub struct Mount {
    animator: SharedAnimator,
    canvas: web::HtmlCanvasElement,
    overlay: Option<web::Element>,
    listeners: Vec<dom::Listener>,
    raf: RafLoop,
    spawner: SpawnLoop,
}

fn load_config(container: &web::Element, override_json: Option<&str>) -> anyhow::Result<BannerConfig> {
    let attr = container.get_attribute(dom::CONFIG_ATTRIBUTE);
    let json = override_json.or(attr.as_deref());
    let config = match json {
        Some(json) => BannerConfig::from_json(json)?,
        None => BannerConfig::default(),
    };
    Ok(config)
}

struct Staged {
    canvas: web::HtmlCanvasElement,
    overlay: Option<web::Element>,
}

impl Staged {
    fn discard(self) {
        self.canvas.remove();
        if let Some(o) = self.overlay {
            o.remove();
        }
    }
}

impl Mount {
    /// Mount into the element with id `container_id`. A missing container is
    /// not an error: nothing is mounted and `Ok(None)` is returned.
    pub async fn create(container_id: &str, config_json: Option<&str>) -> anyhow::Result<Option<Self>> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let Some(container) = document.get_element_by_id(container_id) else {
            log::info!("[mount] #{} not found; nothing mounted", container_id);
            return Ok(None);
        };
        let config = load_config(&container, config_json)?;

        let canvas = dom::attach_canvas(&document, &container)?;
        let overlay = match overlay::attach(&document, &container, &config) {
            Ok(o) => o,
            Err(e) => {
                canvas.remove();
                return Err(e);
            }
        };
        let staged = Staged { canvas, overlay };
        match Self::start(config, &staged.canvas).await {
            Ok((animator, listeners, raf, spawner)) => {
                log::info!("[mount] banner mounted into #{}", container_id);
                Ok(Some(Self {
                    animator,
                    canvas: staged.canvas,
                    overlay: staged.overlay,
                    listeners,
                    raf,
                    spawner,
                }))
            }
            Err(e) => {
                staged.discard();
                Err(e)
            }
        }
    }

    async fn start(
        config: BannerConfig,
        canvas: &web::HtmlCanvasElement,
    ) -> anyhow::Result<(SharedAnimator, Vec<dom::Listener>, RafLoop, SpawnLoop)> {
        let (width, height) = dom::sync_canvas_backing_size(canvas);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let renderer = GpuRenderer::new(&instance, surface, width, height).await?;
        let animator: SharedAnimator = Rc::new(RefCell::new(SceneAnimator::new(config, renderer)?));

        let listeners = events::wire(canvas, &animator)?;
        let raf = frame::start_loop(FrameContext::new(animator.clone()))?;
        let spawner = spawn::start_spawning(animator.clone())?;
        Ok((animator, listeners, raf, spawner))
    }

    pub fn is_running(&self) -> bool {
        self.raf.is_running()
    }

    pub fn live_planes(&self) -> usize {
        self.animator.try_borrow().map(|a| a.scene().len()).unwrap_or(0)
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.spawner.cancel();
        self.raf.cancel();
        self.listeners.clear();
        match self.animator.try_borrow_mut() {
            Ok(mut a) => a.teardown(),
            // The animator tears itself down when the last handle drops
            Err(_) => log::warn!("[mount] animator busy during unmount"),
        }
        self.canvas.remove();
        if let Some(o) = self.overlay.take() {
            o.remove();
        }
        log::info!("[mount] unmounted");
    }
}
