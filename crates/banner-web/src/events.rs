use crate::dom::{self, Listener};
use crate::SharedAnimator;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Window resize and document visibility listeners for one mount. Dropping
/// the returned listeners unregisters them.
pub fn wire(
    canvas: &web::HtmlCanvasElement,
    animator: &SharedAnimator,
) -> anyhow::Result<Vec<Listener>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let resize = {
        let canvas = canvas.clone();
        let animator = animator.clone();
        Listener::new(window.unchecked_ref(), "resize", move || {
            let (w, h) = dom::sync_canvas_backing_size(&canvas);
            if let Ok(mut a) = animator.try_borrow_mut() {
                a.resize(w, h);
            }
        })?
    };

    let visibility = {
        let doc = document.clone();
        let animator = animator.clone();
        Listener::new(document.unchecked_ref(), "visibilitychange", move || {
            let visible = !doc.hidden();
            if let Ok(mut a) = animator.try_borrow_mut() {
                a.set_visible(visible);
            }
        })?
    };

    Ok(vec![resize, visibility])
}
