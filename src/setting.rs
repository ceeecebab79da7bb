use std::time::Duration;

pub use self::config::{
    CameraConfig, Config, GuiConfig, ModelConfig, MonitorConfig, UploadConfig,
};

use crate::{gui::GuiSetting, result::Result, sync::Debounce};

pub mod config;

pub struct Setting {
    pub config: Config,
    debounce: Debounce,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            config: Config::default(),
            debounce: Debounce::default(),
        }
    }
}

impl Setting {
    pub fn get() -> Result<Self> {
        let config = Config::get()?;
        Ok(Self {
            config,
            debounce: Debounce::new(Duration::from_millis(500)),
        })
    }

    pub fn update_config_file(&mut self) {
        let mut updated_config = self.config.clone();
        self.debounce.bounce(move || {
            let _ = updated_config.update_config_file();
        });
    }
}

impl GuiSetting for Setting {
    fn update_dim(&mut self, ctx: &eframe::egui::Context) {
        ctx.input(|i| {
            let Some(rect) = i.viewport().inner_rect else {
                return;
            };
            let (w, h) = (rect.max.x - rect.min.x, rect.max.y - rect.min.y);
            let GuiConfig { width, height } = self.config.gui;
            if width != w || height != h {
                self.config.gui.width = w;
                self.config.gui.height = h;
                self.update_config_file();
            }
        })
    }
}
