use serde::{Deserialize, Serialize};
use crate::core::input::DEFAULT_BASE_OCTAVE;
use crate::core::master::{DEFAULT_RING_DEPTH, DEFAULT_VOLUME};
use crate::core::oscillator::WaveformKind;

/// Keyboard and sound settings the synth is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Full octaves on the keyboard, a boundary C is added on top
    pub octave_count: u8,
    /// MIDI octave of the lowest key (3 puts note 48 on the first key)
    pub base_octave: i32,
    /// Transposition limit in octaves, both directions
    pub max_octave_shift: i8,
    pub ring_modulation: bool,
    pub volume: f32,
    pub ring_depth: f32,
    pub waveform: WaveformKind,
    /// Cosine terms of the custom waveform
    pub custom_real: Vec<f32>,
    /// Sine terms of the custom waveform
    pub custom_imag: Vec<f32>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            octave_count: 3,
            base_octave: DEFAULT_BASE_OCTAVE,
            max_octave_shift: 2,
            ring_modulation: true,
            volume: DEFAULT_VOLUME,
            ring_depth: DEFAULT_RING_DEPTH,
            waveform: WaveformKind::Sine,
            custom_real: vec![0.0; 5],
            custom_imag: vec![0.0, 0.0, 1.0, 0.0, 1.0],
        }
    }
}
