use crate::core::note::Note;
use crate::core::oscillator::{PeriodicWave, Waveform, WaveformKind};
use crate::core::voice::Voice;

/// Builds and tears down voice signal chains
#[derive(Debug, Clone)]
pub struct ToneEngine {
    custom_wave: PeriodicWave,
    ring_modulation: bool,
}

impl ToneEngine {
    pub fn new(custom_wave: PeriodicWave, ring_modulation: bool) -> Self {
        Self {
            custom_wave,
            ring_modulation,
        }
    }

    pub fn waveform(&self, kind: WaveformKind) -> Waveform {
        Waveform::resolve(kind, &self.custom_wave)
    }

    /// Builds the oscillator -> ring -> bus chain and starts it now.
    pub fn start_voice(&self, note: Note, frequency: f64, kind: WaveformKind) -> Voice {
        let mut voice = Voice::new(note, frequency, self.waveform(kind), self.ring_modulation);
        voice.start();
        log::debug!("voice started: {} at {:.2} Hz ({})", note, frequency, kind.tag());
        voice
    }

    pub fn stop_voice(&self, voice: &mut Voice) {
        voice.stop();
        log::debug!("voice stopped: {}", voice.note());
    }
}

impl Default for ToneEngine {
    fn default() -> Self {
        Self::new(PeriodicWave::organ(), true)
    }
}
