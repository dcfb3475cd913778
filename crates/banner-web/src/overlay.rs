use banner_core::BannerConfig;
use web_sys as web;

const OVERLAY_STYLE: &str = "position:absolute;inset:0;display:flex;flex-direction:column;\
align-items:center;justify-content:center;gap:2rem;pointer-events:none;z-index:1";
const HEADLINE_STYLE: &str = "margin:0;color:#fff;text-align:center;white-space:pre-line;\
font:700 clamp(2rem,6vw,5rem)/1.1 system-ui,sans-serif;letter-spacing:0.04em";
const CTA_STYLE: &str = "pointer-events:auto;padding:0.9rem 2.2rem;border-radius:1.75rem;\
border:1px solid rgba(255,255,255,0.6);color:#fff;text-decoration:none;\
font:600 1rem system-ui,sans-serif;background:rgba(0,0,0,0.35)";

/// Headline and call-to-action drawn over the canvas. Returns `None` when
/// the config leaves both empty.
pub fn attach(
    document: &web::Document,
    container: &web::Element,
    config: &BannerConfig,
) -> anyhow::Result<Option<web::Element>> {
    let cta = match (&config.cta_label, &config.cta_href) {
        (Some(label), Some(href)) if !label.is_empty() => Some((label, href)),
        _ => None,
    };
    if config.headline.is_empty() && cta.is_none() {
        return Ok(None);
    }
    let err = |e: wasm_bindgen::JsValue| anyhow::anyhow!("{:?}", e);

    let root = document.create_element("div").map_err(err)?;
    let _ = root.set_attribute("class", "banner-overlay");
    let _ = root.set_attribute("style", OVERLAY_STYLE);

    if !config.headline.is_empty() {
        let h1 = document.create_element("h1").map_err(err)?;
        let _ = h1.set_attribute("style", HEADLINE_STYLE);
        // white-space:pre-line keeps the configured line breaks
        h1.set_text_content(Some(&config.headline));
        root.append_child(&h1).map_err(err)?;
    }
    if let Some((label, href)) = cta {
        let a = document.create_element("a").map_err(err)?;
        let _ = a.set_attribute("href", href);
        let _ = a.set_attribute("style", CTA_STYLE);
        a.set_text_content(Some(label));
        root.append_child(&a).map_err(err)?;
    }
    container.append_child(&root).map_err(err)?;
    Ok(Some(root))
}
