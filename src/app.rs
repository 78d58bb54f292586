use eframe::egui;
use std::sync::{Arc, RwLock};
use crate::audio::{output_device_names, AudioOutput, OutputDevice, FALLBACK_SAMPLE_RATE};
use crate::core::midi::MidiInputHandler;
use crate::core::synth::{KeyInfo, Synth};
use crate::messaging::MessageBus;
use crate::settings::AppSettings;
use crate::ui::components::KeyboardView;
use crate::ui::panels::{MasterPanel, MasterView, MidiConfigPanel};

/// Upper bound of messages applied per frame
const MESSAGES_PER_FRAME: usize = 512;

#[derive(PartialEq)]
enum Tab {
    Keyboard,
    Audio,
    Midi,
}

// Main app state
pub struct SynthApp {
    synth: Arc<RwLock<Synth>>,
    message_bus: MessageBus,
    audio: Option<AudioOutput>,
    audio_status: Option<String>,
    output_devices: Vec<String>,
    midi: MidiInputHandler,
    keyboard: KeyboardView,
    master_panel: MasterPanel,
    midi_panel: MidiConfigPanel,
    current_tab: Tab,
    app_settings: AppSettings,
    should_exit: bool,
}

impl eframe::App for SynthApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.message_bus.process_messages(MESSAGES_PER_FRAME);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("KeyTheorem");
                ui.label("🎹");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("❌ Exit").clicked() {
                        self.should_exit = true;
                    }
                });
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_tab, Tab::Keyboard, "Keyboard");
                ui.selectable_value(&mut self.current_tab, Tab::Audio, "Audio Settings");
                ui.selectable_value(&mut self.current_tab, Tab::Midi, "MIDI Settings");
            });

            ui.separator();

            match self.current_tab {
                Tab::Keyboard => self.render_keyboard(ui),
                Tab::Audio => self.render_audio_settings(ui),
                Tab::Midi => self.render_midi_settings(ui),
            }
        });

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // keeps the scope moving and drains controller input
        ctx.request_repaint();
    }
}

impl SynthApp {
    pub fn new() -> Self {
        let app_settings = AppSettings::load_or_default();

        let (device, audio_status) =
            match OutputDevice::open(app_settings.selected_output_device.as_deref()) {
                Ok(device) => (Some(device), None),
                Err(err) => {
                    log::warn!("no audio output, running silent: {:#}", err);
                    (None, Some(format!("No audio output: {:#}", err)))
                }
            };
        let sample_rate = device
            .as_ref()
            .map(OutputDevice::sample_rate)
            .unwrap_or(FALLBACK_SAMPLE_RATE);

        let synth = Arc::new(RwLock::new(Synth::new(&app_settings.synth, sample_rate)));
        let message_bus = MessageBus::new(Arc::clone(&synth));

        let mut app = SynthApp {
            midi: MidiInputHandler::new(message_bus.sender()),
            keyboard: KeyboardView::new(message_bus.sender()),
            master_panel: MasterPanel::new(message_bus.sender()),
            midi_panel: MidiConfigPanel::new(app_settings.selected_midi_port.clone()),
            synth,
            message_bus,
            audio: None,
            audio_status,
            output_devices: output_device_names(),
            current_tab: Tab::Keyboard,
            app_settings,
            should_exit: false,
        };

        if let Some(device) = device {
            app.start_audio(&device);
        }

        app.midi_panel.refresh_ports(&app.midi);
        if let Some(port) = app.app_settings.selected_midi_port.clone() {
            if let Err(err) = app.midi.connect_to_port(&port) {
                log::warn!("could not reconnect MIDI: {:#}", err);
                app.midi_panel.set_status(format!("Could not reconnect to {}", port));
            }
        }

        log::info!("SynthApp created");
        app
    }

    fn start_audio(&mut self, device: &OutputDevice) {
        // release the old stream before opening a new one
        self.audio = None;

        if let Ok(mut synth) = self.synth.write() {
            synth.sample_rate = device.sample_rate();
        }
        match AudioOutput::start(device, Arc::clone(&self.synth)) {
            Ok(output) => {
                self.audio = Some(output);
                self.audio_status = None;
            }
            Err(err) => {
                log::error!("failed to start audio: {:#}", err);
                self.audio_status = Some(format!("Failed to start audio: {:#}", err));
            }
        }
    }

    fn select_output_device(&mut self, name: &str) {
        match OutputDevice::open(Some(name)) {
            Ok(device) => {
                self.start_audio(&device);
                self.app_settings.selected_output_device = Some(device.name.clone());
                self.save_app_settings();
            }
            Err(err) => {
                log::error!("{:#}", err);
                self.audio_status = Some(format!("Error: {:#}", err));
            }
        }
    }

    fn render_keyboard(&mut self, ui: &mut egui::Ui) {
        let (keys, view): (Vec<KeyInfo>, Option<MasterView>) = match self.synth.read() {
            Ok(synth) => (synth.keys(), Some(MasterView::capture(&synth))),
            Err(_) => (Vec::new(), None),
        };

        self.keyboard.show(ui, &keys);
        ui.add_space(10.0);

        if let Some(view) = view {
            self.master_panel.show(ui, &view);
        }
    }

    fn render_audio_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Audio Settings");

        if let Some(status) = &self.audio_status {
            ui.label(status);
            ui.separator();
        }

        let current = self.audio.as_ref().map(|a| a.device_name().to_string());
        let mut selected = None;

        ui.group(|ui| {
            ui.label("Output Device:");
            for name in &self.output_devices {
                if ui.radio(current.as_deref() == Some(name.as_str()), name.as_str()).clicked() {
                    selected = Some(name.clone());
                }
            }

            if ui.button("Refresh Devices").clicked() {
                self.output_devices = output_device_names();
            }
        });

        if let Some(name) = selected {
            if current.as_deref() != Some(name.as_str()) {
                self.select_output_device(&name);
            }
        }

        match &self.audio {
            Some(audio) => ui.label(format!(
                "Playing on {} at {} Hz",
                audio.device_name(),
                audio.sample_rate()
            )),
            None => ui.label("Audio stopped"),
        };
    }

    fn render_midi_settings(&mut self, ui: &mut egui::Ui) {
        let last_message = self
            .synth
            .read()
            .ok()
            .and_then(|synth| synth.last_controller_message());

        if self.midi_panel.show(ui, &mut self.midi, last_message) {
            self.app_settings.selected_midi_port = self.midi.connected_port().map(str::to_string);
            self.save_app_settings();
        }
    }

    /// Copy the live synth state into the settings, then write them
    fn save_app_settings(&mut self) {
        if let Ok(synth) = self.synth.read() {
            let config = &mut self.app_settings.synth;
            config.volume = synth.master().volume();
            config.ring_depth = synth.master().ring_depth();
            config.waveform = synth.waveform();
        }
        if let Err(err) = self.app_settings.save() {
            log::error!("failed to save settings: {:#}", err);
        }
    }
}

impl Default for SynthApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SynthApp {
    fn drop(&mut self) {
        self.midi.disconnect();
        self.save_app_settings();
        log::info!("settings saved on exit");
    }
}
