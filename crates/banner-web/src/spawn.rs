use crate::surface;
use crate::texture::{self, ImageCache};
use crate::SharedAnimator;
use banner_core::SpawnOutcome;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// setTimeout chain firing the animator's spawn ticks. Each firing asks
/// the animator for the next delay, so accelerating schedules shrink.
pub struct SpawnLoop {
    alive: Rc<Cell<bool>>,
    handle: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

impl SpawnLoop {
    pub fn cancel(&self) {
        self.alive.set(false);
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            w.clear_timeout_with_handle(id);
        }
        self.tick.borrow_mut().take();
    }
}

impl Drop for SpawnLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule(tick: &Tick, handle: &Cell<Option<i32>>, delay_ms: f64) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let cb = tick.borrow();
    let cb = cb
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("spawn callback missing"))?;
    let id = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            surface::timeout_millis(delay_ms),
        )
        .map_err(|e| anyhow::anyhow!("setTimeout: {:?}", e))?;
    handle.set(Some(id));
    Ok(())
}

fn fire(animator: &SharedAnimator, cache: &Rc<ImageCache>) -> Option<f64> {
    let mut guard = animator.try_borrow_mut().ok()?;
    if guard.is_torn_down() {
        return None;
    }
    match guard.spawn_tick() {
        SpawnOutcome::NeedsTexture(request) => {
            spawn_local(texture::resolve_spawn(
                Rc::downgrade(animator),
                Rc::clone(cache),
                request,
            ));
        }
        SpawnOutcome::Added(id) => log::debug!("[spawn] solid plane {:?}", id),
        SpawnOutcome::Skipped => {}
    }
    Some(guard.next_spawn_delay_ms())
}

pub fn start_spawning(animator: SharedAnimator) -> anyhow::Result<SpawnLoop> {
    let alive = Rc::new(Cell::new(true));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: Tick = Rc::new(RefCell::new(None));
    let first_delay = animator.borrow_mut().next_spawn_delay_ms();
    let fallback_delay = animator.borrow().config().spawn_interval_ms;
    let cache = Rc::new(ImageCache::new());

    let tick_clone = tick.clone();
    let alive_tick = alive.clone();
    let handle_tick = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        handle_tick.set(None);
        if !alive_tick.get() {
            return;
        }
        let delay = match fire(&animator, &cache) {
            Some(delay) => delay,
            None if animator.try_borrow().is_ok_and(|a| a.is_torn_down()) => {
                alive_tick.set(false);
                return;
            }
            // Busy this turn; try again after one base interval
            None => fallback_delay,
        };
        if let Err(e) = schedule(&tick_clone, &handle_tick, delay) {
            log::error!("[spawn] {:?}", e);
            alive_tick.set(false);
        }
    }) as Box<dyn FnMut()>));

    schedule(&tick, &handle, first_delay)?;
    Ok(SpawnLoop {
        alive,
        handle,
        tick,
    })
}
