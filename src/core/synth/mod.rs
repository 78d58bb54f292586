pub mod audio;
pub mod config;

pub use config::SynthConfig;

use crate::core::frequency::{FrequencyTable, Transpose};
use crate::core::input::{ControllerAction, ControllerMapping, ControllerMessage, InputEvent};
use crate::core::master::MasterBus;
use crate::core::note::Note;
use crate::core::oscillator::{PeriodicWave, Waveform, WaveformKind};
use crate::core::registry::{Activation, VoiceRegistry};
use crate::core::tone::ToneEngine;
use std::collections::VecDeque;

/// Largest octave shift a config may ask for
pub const MAX_OCTAVE_SHIFT: i8 = 10;

/// Key data handed to the keyboard renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyInfo {
    pub note: Note,
    pub octave: u8,
    pub frequency: f64,
    pub is_sharp: bool,
    pub pressed: bool,
}

/// Voice lifecycle counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoiceStats {
    pub started: u64,
    pub stopped: u64,
}

impl VoiceStats {
    pub fn sounding(&self) -> u64 {
        self.started - self.stopped
    }
}

/// Main synthesizer engine. Owns every piece of keyboard state.
pub struct Synth {
    pub sample_rate: f32,
    table: FrequencyTable,
    registry: VoiceRegistry,
    master: MasterBus,
    tone: ToneEngine,
    mapping: ControllerMapping,
    waveform: WaveformKind,
    octave_shift: i8,
    max_octave_shift: i8,
    stats: VoiceStats,
    last_controller_message: Option<ControllerMessage>,
    scope: VecDeque<f32>,
}

impl Synth {
    /// Create a new synthesizer instance
    pub fn new(config: &SynthConfig, sample_rate: f32) -> Self {
        let custom_wave = PeriodicWave::new(&config.custom_real, &config.custom_imag);
        Synth {
            sample_rate,
            table: FrequencyTable::build(config.octave_count),
            registry: VoiceRegistry::new(config.octave_count),
            master: MasterBus::new(config.volume, config.ring_depth),
            tone: ToneEngine::new(custom_wave, config.ring_modulation),
            mapping: ControllerMapping::new(config.base_octave, config.octave_count),
            waveform: config.waveform,
            octave_shift: 0,
            max_octave_shift: config.max_octave_shift.clamp(0, MAX_OCTAVE_SHIFT),
            stats: VoiceStats::default(),
            last_controller_message: None,
            scope: VecDeque::with_capacity(audio::SCOPE_SIZE),
        }
    }

    /// Apply a key event. Returns true when a voice was started or stopped.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Press(note) => self.press(note),
            InputEvent::Release(note) => self.release(note),
        }
    }

    fn press(&mut self, note: Note) -> bool {
        let Some(frequency) = self.key_frequency(note) else {
            log::debug!("ignoring press outside the keyboard: {}", note);
            return false;
        };
        let tone = &self.tone;
        let waveform = self.waveform;
        match self
            .registry
            .activate(note, || tone.start_voice(note, frequency, waveform))
        {
            Activation::Started => {
                self.stats.started += 1;
                true
            }
            Activation::AlreadyActive | Activation::OutOfRange => false,
        }
    }

    fn release(&mut self, note: Note) -> bool {
        match self.registry.deactivate(note) {
            Some(mut voice) => {
                self.tone.stop_voice(&mut voice);
                self.stats.stopped += 1;
                true
            }
            None => false,
        }
    }

    pub fn handle_controller(&mut self, message: &ControllerMessage) {
        self.last_controller_message = Some(*message);
        match self.mapping.map(message) {
            Some(ControllerAction::Input(event)) => {
                self.dispatch(event);
            }
            Some(ControllerAction::SetVolume(volume)) => {
                self.set_volume(volume);
            }
            Some(ControllerAction::SetRingDepth(depth)) => {
                self.set_ring_depth(depth);
            }
            Some(ControllerAction::AllNotesOff) => self.all_notes_off(),
            None => {}
        }
    }

    pub fn all_notes_off(&mut self) {
        for mut voice in self.registry.release_all() {
            self.tone.stop_voice(&mut voice);
            self.stats.stopped += 1;
        }
    }

    /// Move the keyboard one octave. Returns false at the shift limit.
    /// Sounding voices keep their pitch.
    pub fn transpose(&mut self, direction: Transpose) -> bool {
        let limit = self.max_octave_shift;
        let shift = match self.octave_shift.checked_add(direction.step()) {
            Some(shift) if (-limit..=limit).contains(&shift) => shift,
            _ => {
                log::debug!("octave shift already at {}", self.octave_shift);
                return false;
            }
        };
        self.octave_shift = shift;
        log::info!("octave shift now {}", shift);
        true
    }

    pub fn octave_shift(&self) -> i8 {
        self.octave_shift
    }

    pub fn max_octave_shift(&self) -> i8 {
        self.max_octave_shift
    }

    /// Frequency a press on `note` would sound at
    pub fn key_frequency(&self, note: Note) -> Option<f64> {
        self.table
            .frequency(note)
            .map(|freq| freq * 2f64.powi(self.octave_shift as i32))
    }

    pub fn keys(&self) -> Vec<KeyInfo> {
        self.table
            .iter()
            .map(|(note, _)| KeyInfo {
                note,
                octave: note.octave,
                frequency: self.key_frequency(note).unwrap_or_default(),
                is_sharp: note.chroma.is_sharp(),
                pressed: self.registry.is_active(note),
            })
            .collect()
    }

    pub fn is_pressed(&self, note: Note) -> bool {
        self.registry.is_active(note)
    }

    pub fn active_voices(&self) -> usize {
        self.registry.len()
    }

    pub fn set_volume(&mut self, volume: f32) -> bool {
        self.master.set_volume(volume)
    }

    pub fn set_ring_depth(&mut self, depth: f32) -> bool {
        self.master.set_ring_depth(depth)
    }

    pub fn master(&self) -> &MasterBus {
        &self.master
    }

    /// Applies to voices started from now on
    pub fn set_waveform(&mut self, waveform: WaveformKind) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> WaveformKind {
        self.waveform
    }

    pub fn resolved_waveform(&self) -> Waveform {
        self.tone.waveform(self.waveform)
    }

    pub fn mapping(&self) -> &ControllerMapping {
        &self.mapping
    }

    pub fn stats(&self) -> VoiceStats {
        self.stats
    }

    pub fn last_controller_message(&self) -> Option<ControllerMessage> {
        self.last_controller_message
    }
}
