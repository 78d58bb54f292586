use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;

/// Resolution of a rendered periodic wave
pub const PERIODIC_WAVE_SIZE: usize = 2048;

/// Waveform selection as seen by control surfaces and settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveformKind {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 5] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Sawtooth,
        WaveformKind::Triangle,
        WaveformKind::Custom,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            WaveformKind::Sine => "sine",
            WaveformKind::Square => "square",
            WaveformKind::Sawtooth => "sawtooth",
            WaveformKind::Triangle => "triangle",
            WaveformKind::Custom => "custom",
        }
    }

    /// Unknown tags fall back to the default waveform.
    pub fn from_tag(tag: &str) -> WaveformKind {
        let tag = tag.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
            .unwrap_or_else(|| {
                log::debug!("unknown waveform '{}', using {:?}", tag, WaveformKind::default());
                WaveformKind::default()
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            WaveformKind::Sine => "Sine",
            WaveformKind::Square => "Square",
            WaveformKind::Sawtooth => "Sawtooth",
            WaveformKind::Triangle => "Triangle",
            WaveformKind::Custom => "Custom",
        }
    }
}

/// A waveform defined by cosine (`real`) and sine (`imag`) harmonic
/// amplitudes. Index 0 is the DC term and is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicWave {
    real: Vec<f32>,
    imag: Vec<f32>,
    table: Arc<[f32]>,
}

impl PeriodicWave {
    pub fn new(real: &[f32], imag: &[f32]) -> Self {
        let harmonics = real.len().max(imag.len());
        let coefficient = |terms: &[f32], n: usize| terms.get(n).copied().unwrap_or(0.0);

        let mut table: Vec<f32> = (0..PERIODIC_WAVE_SIZE)
            .map(|i| {
                let phase = i as f32 / PERIODIC_WAVE_SIZE as f32;
                (1..harmonics)
                    .map(|n| {
                        let angle = 2.0 * PI * n as f32 * phase;
                        coefficient(real, n) * angle.cos() + coefficient(imag, n) * angle.sin()
                    })
                    .sum()
            })
            .collect();

        // normalized to unit peak
        let peak = table.iter().fold(0.0f32, |max, s| max.max(s.abs()));
        if peak > 0.0 {
            table.iter_mut().for_each(|s| *s /= peak);
        }

        Self {
            real: real.to_vec(),
            imag: imag.to_vec(),
            table: table.into(),
        }
    }

    /// Second and fourth harmonics in sine phase
    pub fn organ() -> Self {
        let imag = [0.0, 0.0, 1.0, 0.0, 1.0];
        let real = [0.0; 5];
        Self::new(&real, &imag)
    }

    pub fn real(&self) -> &[f32] {
        &self.real
    }

    pub fn imag(&self) -> &[f32] {
        &self.imag
    }

    pub fn sample(&self, phase: f32) -> f32 {
        let position = phase.rem_euclid(1.0) * self.table.len() as f32;
        let index = position.floor() as usize % self.table.len();
        let next_index = (index + 1) % self.table.len();
        let fraction = position - position.floor();

        self.table[index] * (1.0 - fraction) + self.table[next_index] * fraction
    }
}

impl Default for PeriodicWave {
    fn default() -> Self {
        Self::organ()
    }
}

/// A concrete oscillator shape
#[derive(Debug, Clone, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom(PeriodicWave),
}

impl Waveform {
    pub fn resolve(kind: WaveformKind, custom: &PeriodicWave) -> Waveform {
        match kind {
            WaveformKind::Sine => Waveform::Sine,
            WaveformKind::Square => Waveform::Square,
            WaveformKind::Sawtooth => Waveform::Sawtooth,
            WaveformKind::Triangle => Waveform::Triangle,
            WaveformKind::Custom => Waveform::Custom(custom.clone()),
        }
    }

    pub fn kind(&self) -> WaveformKind {
        match self {
            Waveform::Sine => WaveformKind::Sine,
            Waveform::Square => WaveformKind::Square,
            Waveform::Sawtooth => WaveformKind::Sawtooth,
            Waveform::Triangle => WaveformKind::Triangle,
            Waveform::Custom(_) => WaveformKind::Custom,
        }
    }

    /// Value at `phase` in cycles, wrapped to [0, 1)
    pub fn sample(&self, phase: f32) -> f32 {
        let phase = phase.rem_euclid(1.0);
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            }
            Waveform::Custom(wave) => wave.sample(phase),
        }
    }

    /// One cycle as plot points
    pub fn preview(&self, points: usize) -> Vec<[f32; 2]> {
        (0..points)
            .map(|i| {
                let phase = i as f32 / points as f32;
                [phase, self.sample(phase)]
            })
            .collect()
    }
}
