mod waveform;

pub use self::waveform::{PeriodicWave, Waveform, WaveformKind, PERIODIC_WAVE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorState {
    Idle,
    Running,
    Stopped,
}

/// Phase-accumulator oscillator
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f64,
    phase: f64,
    state: OscillatorState,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
            state: OscillatorState::Idle,
        }
    }

    pub fn start(&mut self) {
        if self.state == OscillatorState::Idle {
            self.state = OscillatorState::Running;
        }
    }

    /// Stopping twice, or before starting, does nothing.
    pub fn stop(&mut self) {
        self.state = OscillatorState::Stopped;
    }

    pub fn state(&self) -> OscillatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == OscillatorState::Running
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        if !self.is_running() {
            return 0.0;
        }
        let value = self.waveform.sample(self.phase as f32);
        self.phase = (self.phase + self.frequency / sample_rate as f64) % 1.0;
        value
    }
}
