use crossbeam_channel::Sender;
use egui::{Color32, Ui};
use crate::core::frequency::Transpose;
use crate::core::master::MasterBus;
use crate::core::oscillator::WaveformKind;
use crate::core::synth::{Synth, VoiceStats};
use crate::messaging::SynthMessage;
use crate::ui::components::WaveformPlot;
use crate::utils::helpers::amplitude_to_db;

const PREVIEW_POINTS: usize = 256;

/// Synth state read once per frame for the master panel
#[derive(Debug, Clone, PartialEq)]
pub struct MasterView {
    pub volume: f32,
    pub ring_depth: f32,
    pub waveform: WaveformKind,
    pub preview: Vec<[f32; 2]>,
    pub scope: Vec<[f32; 2]>,
    pub octave_shift: i8,
    pub max_octave_shift: i8,
    pub stats: VoiceStats,
    pub active_voices: usize,
}

impl MasterView {
    pub fn capture(synth: &Synth) -> Self {
        Self {
            volume: synth.master().volume(),
            ring_depth: synth.master().ring_depth(),
            waveform: synth.waveform(),
            preview: synth.resolved_waveform().preview(PREVIEW_POINTS),
            scope: synth.scope(),
            octave_shift: synth.octave_shift(),
            max_octave_shift: synth.max_octave_shift(),
            stats: synth.stats(),
            active_voices: synth.active_voices(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Volume,
    RingDepth,
}

impl Level {
    fn message(self, value: f32) -> SynthMessage {
        match self {
            Level::Volume => SynthMessage::SetVolume(value),
            Level::RingDepth => SynthMessage::SetRingDepth(value),
        }
    }
}

/// Volume, ring modulation, waveform and octave controls
pub struct MasterPanel {
    sender: Sender<SynthMessage>,
    volume_text: String,
    ring_text: String,
    entry_error: Option<String>,
}

impl MasterPanel {
    pub fn new(sender: Sender<SynthMessage>) -> Self {
        Self {
            sender,
            volume_text: String::new(),
            ring_text: String::new(),
            entry_error: None,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, view: &MasterView) {
        ui.heading("Master");

        let mut volume = view.volume;
        ui.horizontal(|ui| {
            ui.label("Volume:");
            if ui.add(egui::Slider::new(&mut volume, 0.0..=1.0)).changed() {
                self.sender.send(SynthMessage::SetVolume(volume)).ok();
            }
            ui.label(format!("{:.1} dB", amplitude_to_db(volume)));
        });
        self.level_entry(ui, Level::Volume, view.volume);

        let mut ring_depth = view.ring_depth;
        ui.horizontal(|ui| {
            ui.label("Ring mod:");
            if ui.add(egui::Slider::new(&mut ring_depth, 0.0..=1.0)).changed() {
                self.sender.send(SynthMessage::SetRingDepth(ring_depth)).ok();
            }
        });
        self.level_entry(ui, Level::RingDepth, view.ring_depth);

        if let Some(error) = &self.entry_error {
            ui.colored_label(Color32::from_rgb(220, 80, 80), error);
        }

        ui.separator();

        let mut waveform = view.waveform;
        ui.horizontal(|ui| {
            ui.label("Waveform:");
            egui::ComboBox::new("waveform_selector", "")
                .selected_text(waveform.label())
                .show_ui(ui, |ui| {
                    for kind in WaveformKind::ALL {
                        if ui.selectable_value(&mut waveform, kind, kind.label()).changed() {
                            self.sender.send(SynthMessage::SetWaveform(kind)).ok();
                        }
                    }
                });
        });
        WaveformPlot::new(view.preview.clone())
            .height(80.0)
            .show(ui, "waveform_preview");

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Octave:");
            let down = ui.add_enabled(
                view.octave_shift > -view.max_octave_shift,
                egui::Button::new("-"),
            );
            if down.clicked() {
                self.sender.send(SynthMessage::Transpose(Transpose::Down)).ok();
            }
            ui.label(format!("{:+}", view.octave_shift));
            let up = ui.add_enabled(
                view.octave_shift < view.max_octave_shift,
                egui::Button::new("+"),
            );
            if up.clicked() {
                self.sender.send(SynthMessage::Transpose(Transpose::Up)).ok();
            }

            ui.add_space(16.0);
            if ui.button("All notes off").clicked() {
                self.sender.send(SynthMessage::AllNotesOff).ok();
            }
        });

        ui.label(format!(
            "Voices: {} sounding, {} started, {} stopped",
            view.active_voices, view.stats.started, view.stats.stopped
        ));

        ui.separator();
        ui.label("Output:");
        WaveformPlot::new(view.scope.clone())
            .height(120.0)
            .color(Color32::from_rgb(120, 220, 120))
            .show(ui, "output_scope");
    }

    fn level_entry(&mut self, ui: &mut Ui, level: Level, current: f32) {
        ui.horizontal(|ui| {
            let text = match level {
                Level::Volume => &mut self.volume_text,
                Level::RingDepth => &mut self.ring_text,
            };
            let response = ui.add(
                egui::TextEdit::singleline(text)
                    .desired_width(60.0)
                    .hint_text(format!("{:.2}", current)),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted || ui.button("Set").clicked() {
                self.submit(level);
            }
        });
    }

    /// Send the typed value. Text that is not a number is rejected and
    /// the current value stays.
    fn submit(&mut self, level: Level) {
        let text = match level {
            Level::Volume => &mut self.volume_text,
            Level::RingDepth => &mut self.ring_text,
        };
        match MasterBus::parse_level(text) {
            Some(value) => {
                self.sender.send(level.message(value)).ok();
                text.clear();
                self.entry_error = None;
            }
            None => {
                log::debug!("rejected level entry '{}'", text);
                self.entry_error = Some(format!("'{}' is not a number", text.trim()));
            }
        }
    }
}
