use std::sync::{Arc, RwLock};

use eframe::egui;

/// Camera preview texture. The handle is registered on the egui context by
/// the gui thread and filled in from the proctor tick loop.
pub struct Cam {
    texture: Arc<RwLock<Option<egui::TextureHandle>>>,
}

impl Default for Cam {
    fn default() -> Self {
        Self {
            texture: Arc::new(RwLock::new(None)),
        }
    }
}

impl Cam {
    pub fn register(&mut self, ctx: &egui::Context) {
        let handle = ctx.load_texture(
            "camera_feed",
            egui::ColorImage::new([1, 1], egui::Color32::BLACK),
            Default::default(),
        );
        if let Ok(mut guard) = self.texture.write() {
            *guard = Some(handle);
        }
    }

    pub fn share(&self) -> Arc<RwLock<Option<egui::TextureHandle>>> {
        Arc::clone(&self.texture)
    }

    pub fn image(&self) -> Option<egui::Image> {
        let guard = self.texture.read().ok()?;
        let handle = guard.as_ref()?;
        Some(egui::Image::from_texture(
            egui::load::SizedTexture::from_handle(handle),
        ))
    }
}
