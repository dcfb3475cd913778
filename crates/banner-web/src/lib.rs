#![cfg(target_arch = "wasm32")]
use banner_core::{GpuRenderer, SceneAnimator};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod cache;
mod dom;
mod events;
mod frame;
mod mount;
mod overlay;
mod spawn;
mod surface;
mod texture;

use mount::Mount;

pub(crate) type AnimatorCell = RefCell<SceneAnimator<GpuRenderer>>;
pub(crate) type SharedAnimator = Rc<AnimatorCell>;

/// Container auto-mounted at startup when present.
const AUTO_MOUNT_ID: &str = "banner";

thread_local! {
    static AUTO_MOUNT: RefCell<Option<Mount>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("banner-web starting");

    spawn_local(async move {
        match Mount::create(AUTO_MOUNT_ID, None).await {
            Ok(Some(m)) => AUTO_MOUNT.with(|slot| *slot.borrow_mut() = Some(m)),
            Ok(None) => {}
            Err(e) => log::error!("mount error: {:?}", e),
        }
    });
    Ok(())
}

/// A banner mounted from script:
///
/// ```js
/// const banner = await Banner.mount("hero", JSON.stringify({ groupCount: 8 }));
/// // later
/// banner.unmount();
/// ```
#[wasm_bindgen]
pub struct Banner {
    mount: Option<Mount>,
}

#[wasm_bindgen]
impl Banner {
    /// Mount into the element with id `container_id`. When the element is
    /// missing the returned handle is simply not mounted.
    pub async fn mount(container_id: String, config_json: Option<String>) -> Result<Banner, JsValue> {
        let mount = Mount::create(&container_id, config_json.as_deref())
            .await
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
        Ok(Banner { mount })
    }

    /// Stop every loop, release all GPU resources and remove the canvas.
    pub fn unmount(&mut self) {
        self.mount.take();
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.mount.as_ref().is_some_and(Mount::is_running)
    }

    #[wasm_bindgen(getter, js_name = livePlanes)]
    pub fn live_planes(&self) -> usize {
        self.mount.as_ref().map_or(0, Mount::live_planes)
    }
}

/// Unmount the banner auto-mounted into `#banner`, if any.
#[wasm_bindgen(js_name = unmountAuto)]
pub fn unmount_auto() {
    AUTO_MOUNT.with(|slot| slot.borrow_mut().take());
}
