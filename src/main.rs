use anyhow::Result;
use eframe::egui;
use keytheorem::app::SynthApp;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("starting KeyTheorem");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("KeyTheorem"),
        ..Default::default()
    };

    eframe::run_native(
        "KeyTheorem",
        options,
        Box::new(|_cc| Ok(Box::new(SynthApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
