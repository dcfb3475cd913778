use crate::cache::DecodeCache;
use crate::AnimatorCell;
use banner_core::{BannerError, SpawnRequest};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Fetch and decode an image into tightly packed RGBA8.
pub async fn fetch_rgba(url: &str) -> anyhow::Result<image::RgbaImage> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch failed: {:?}", e))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    if !response.ok() {
        anyhow::bail!("HTTP {}", response.status());
    }
    let buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("read body: {:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let decoded = image::load_from_memory(&bytes)?;
    Ok(decoded.to_rgba8())
}

pub type ImageCache = DecodeCache<image::RgbaImage>;

/// Decoded pixels for `url`, fetching and decoding only on a cache miss.
async fn cached_rgba(cache: &ImageCache, url: &str) -> anyhow::Result<Rc<image::RgbaImage>> {
    if let Some(img) = cache.get(url) {
        return Ok(img);
    }
    let img = fetch_rgba(url).await?;
    let (w, h) = img.dimensions();
    let img = cache.insert(url, img);
    log::info!("[texture] decoded {} ({}x{}), {} cached", url, w, h, cache.len());
    Ok(img)
}

/// Resolve one pending spawn: load its texture, upload it and hand the
/// result back to the animator. Does nothing once the mount is gone.
pub async fn resolve_spawn(
    animator: Weak<AnimatorCell>,
    cache: Rc<ImageCache>,
    request: SpawnRequest,
) {
    let fetched = cached_rgba(&cache, &request.url).await;
    if !request.token.is_live() {
        log::debug!("[texture] {} arrived after unmount; dropped", request.url);
        return;
    }
    let Some(animator) = animator.upgrade() else {
        return;
    };
    let Ok(mut animator) = animator.try_borrow_mut() else {
        log::warn!("[texture] animator busy; dropping {}", request.url);
        return;
    };
    let texture = match fetched {
        Ok(img) => {
            let (w, h) = img.dimensions();
            animator.renderer_mut().upload_texture(w, h, img.as_raw())
        }
        Err(e) => Err(BannerError::texture(format!("{}: {:#}", request.url, e))),
    };
    animator.complete_spawn(request.ticket, texture);
}
