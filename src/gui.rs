use eframe::egui;

use crate::{
    monitor::AlertState,
    proctor::{Proctor, ProctorStatus},
    setting::Setting,
    Error, Result,
};

pub use cam::Cam;

pub mod cam;

pub trait GuiSetting {
    fn update_dim(&mut self, ctx: &eframe::egui::Context);
}

const PRESENT_COLOR: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);
const ALERT_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 38, 38);
const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(202, 138, 4);

pub struct Gui {
    setting: Setting,
    cam: Cam,
    proctor: Option<Proctor>,
}

impl Gui {
    pub fn new(setting: Setting) -> Self {
        Self {
            setting,
            cam: Cam::default(),
            proctor: None,
        }
    }

    pub fn run(self) -> Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([
                    self.setting.config.gui.width,
                    self.setting.config.gui.height,
                ])
                .with_min_inner_size([320., 300.]),
            ..Default::default()
        };
        eframe::run_native(
            "invigil",
            options,
            Box::new(move |cc| {
                let mut gui = self;
                gui.cam.register(&cc.egui_ctx);
                gui.proctor = Some(Proctor::start(&gui.setting.config, gui.cam.share()));
                Ok(Box::new(gui))
            }),
        )
        .map_err(Error::GuiError)
    }

    fn indicator(status: &ProctorStatus, alert: &AlertState) -> (egui::Color32, String) {
        match status {
            ProctorStatus::Initializing => (WARNING_COLOR, "Starting camera...".into()),
            ProctorStatus::FeedUnavailable => (WARNING_COLOR, "Camera unavailable".into()),
            ProctorStatus::Error(msg) => (ALERT_COLOR, format!("Monitor error: {}", msg)),
            ProctorStatus::Running if alert.is_alert() => (ALERT_COLOR, "Alert!".into()),
            ProctorStatus::Running => (PRESENT_COLOR, "User Present".into()),
        }
    }
}

impl eframe::App for Gui {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        // the tick loop writes the feed texture behind egui's back
        ctx.request_repaint_after(std::time::Duration::from_millis(200));

        let status = self
            .proctor
            .as_ref()
            .map(Proctor::status)
            .unwrap_or(ProctorStatus::Initializing);
        let alert = self
            .proctor
            .as_ref()
            .map(Proctor::alert_state)
            .unwrap_or_default();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (color, label) = Self::indicator(&status, &alert);
                let (rect, _) =
                    ui.allocate_exact_size(egui::Vec2::splat(12.), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 5., color);
                ui.label(egui::RichText::new(label).color(color));
            });

            match self.cam.image() {
                Some(image) if status != ProctorStatus::Initializing => {
                    ui.add(image.max_size(ui.available_size()));
                }
                _ => {
                    ui.centered_and_justified(|ui| ui.spinner());
                }
            }
        });

        self.setting.update_dim(ctx);
    }
}
