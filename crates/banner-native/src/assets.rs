use anyhow::Context;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Decoded textures loaded from a local directory. Catalog URLs such as
/// `/bg.jpg` resolve against `root`; each file is decoded once.
pub struct AssetStore {
    root: PathBuf,
    cache: HashMap<String, image::RgbaImage>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&self, url: &str) -> anyhow::Result<PathBuf> {
        if url.contains("://") {
            anyhow::bail!("remote textures are not available in the native preview");
        }
        let relative = Path::new(url.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            anyhow::bail!("texture path escapes the asset directory");
        }
        Ok(self.root.join(relative))
    }

    pub fn load(&mut self, url: &str) -> anyhow::Result<&image::RgbaImage> {
        if !self.cache.contains_key(url) {
            let path = self.resolve(url)?;
            let img = image::open(&path)
                .with_context(|| format!("decode {}", path.display()))?
                .to_rgba8();
            log::info!(
                "[assets] loaded {} ({}x{})",
                path.display(),
                img.width(),
                img.height()
            );
            self.cache.insert(url.to_string(), img);
        }
        self.cache
            .get(url)
            .ok_or_else(|| anyhow::anyhow!("texture cache miss for {}", url))
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
