use crate::surface;
use crate::SharedAnimator;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub animator: SharedAnimator,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(animator: SharedAnimator) -> Self {
        Self {
            animator,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = surface::clamp_frame_step(now - self.last_instant);
        self.last_instant = now;

        let Ok(mut animator) = self.animator.try_borrow_mut() else {
            log::warn!("[frame] animator busy; skipping frame");
            return;
        };
        if animator.is_torn_down() {
            return;
        }
        if let Err(e) = animator.frame(dt) {
            log::error!("[frame] {}", e);
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handle to a running requestAnimationFrame loop.
pub struct RafLoop {
    alive: Rc<Cell<bool>>,
    handle: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

impl RafLoop {
    /// Stop scheduling frames. Safe to call more than once.
    pub fn cancel(&self) {
        self.alive.set(false);
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself
        self.tick.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        self.alive.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub fn start_loop(frame_ctx: FrameContext) -> anyhow::Result<RafLoop> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let frame_ctx = Rc::new(RefCell::new(frame_ctx));
    let alive = Rc::new(Cell::new(true));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: Tick = Rc::new(RefCell::new(None));

    let tick_clone = tick.clone();
    let alive_tick = alive.clone();
    let handle_tick = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        handle_tick.set(None);
        if !alive_tick.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        if !alive_tick.get() {
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            handle_tick.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
    }) as Box<dyn FnMut()>));

    let id = {
        let cb = tick.borrow();
        let cb = cb
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("frame callback missing"))?;
        window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("requestAnimationFrame: {:?}", e))?
    };
    handle.set(Some(id));
    Ok(RafLoop {
        alive,
        handle,
        tick,
    })
}
