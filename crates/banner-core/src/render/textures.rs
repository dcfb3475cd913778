use super::helpers;
use crate::scene::TextureId;
use fnv::FnvHashMap;

pub(crate) struct TextureEntry {
    pub(crate) texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
}

/// Plane textures keyed by [`TextureId`]. Each texture belongs to exactly one
/// plane and is destroyed when that plane is released.
#[derive(Default)]
pub(crate) struct TextureRegistry {
    entries: FnvHashMap<TextureId, TextureEntry>,
    next_id: u64,
}

impl TextureRegistry {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        let (texture, view) =
            helpers::create_rgba_texture(device, queue, "plane_image", width, height, rgba);
        let bind_group = helpers::create_image_bind_group(device, layout, &view, sampler);
        self.entries.insert(
            id,
            TextureEntry {
                texture,
                bind_group,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: TextureId) -> Option<&TextureEntry> {
        self.entries.get(&id)
    }

    /// Destroy one texture. Returns false if it was unknown.
    pub(crate) fn remove(&mut self, id: TextureId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                entry.texture.destroy();
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        for (_, entry) in self.entries.drain() {
            entry.texture.destroy();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
