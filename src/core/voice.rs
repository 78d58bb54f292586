use crate::core::note::Note;
use crate::core::oscillator::{Oscillator, Waveform};

/// Carrier frequency relative to the voice frequency
pub const RING_CARRIER_RATIO: f64 = 0.5;

/// One rendered sample of a voice, before the master bus
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoiceOutput {
    pub dry: f32,
    pub ring: f32,
}

/// Sine carrier multiplying the primary signal
#[derive(Debug, Clone)]
pub struct RingModulator {
    carrier: Oscillator,
}

impl RingModulator {
    pub fn new(frequency: f64) -> Self {
        Self {
            carrier: Oscillator::new(Waveform::Sine, frequency * RING_CARRIER_RATIO),
        }
    }

    pub fn carrier(&self) -> &Oscillator {
        &self.carrier
    }

    fn start(&mut self) {
        self.carrier.start();
    }

    fn stop(&mut self) {
        self.carrier.stop();
    }

    fn modulate(&mut self, input: f32, sample_rate: f32) -> f32 {
        input * self.carrier.next_sample(sample_rate)
    }
}

/// A sounding tone: primary oscillator plus optional ring stage
#[derive(Debug, Clone)]
pub struct Voice {
    note: Note,
    primary: Oscillator,
    ring: Option<RingModulator>,
}

impl Voice {
    pub fn new(note: Note, frequency: f64, waveform: Waveform, ring_modulation: bool) -> Self {
        Self {
            note,
            primary: Oscillator::new(waveform, frequency),
            ring: ring_modulation.then(|| RingModulator::new(frequency)),
        }
    }

    pub fn note(&self) -> Note {
        self.note
    }

    pub fn frequency(&self) -> f64 {
        self.primary.frequency()
    }

    pub fn waveform(&self) -> &Waveform {
        self.primary.waveform()
    }

    pub fn ring(&self) -> Option<&RingModulator> {
        self.ring.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.primary.is_running()
    }

    pub fn start(&mut self) {
        self.primary.start();
        if let Some(ring) = &mut self.ring {
            ring.start();
        }
    }

    pub fn stop(&mut self) {
        self.primary.stop();
        if let Some(ring) = &mut self.ring {
            ring.stop();
        }
    }

    pub fn render(&mut self, sample_rate: f32) -> VoiceOutput {
        let dry = self.primary.next_sample(sample_rate);
        let ring = match &mut self.ring {
            Some(ring) => ring.modulate(dry, sample_rate),
            None => dry,
        };
        VoiceOutput { dry, ring }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::Chroma;

    fn voice(ring: bool) -> Voice {
        Voice::new(Note::new(0, Chroma::A), 220.0, Waveform::Sine, ring)
    }

    #[test]
    fn carrier_runs_at_half_the_frequency() {
        let voice = voice(true);
        let carrier = voice.ring().unwrap().carrier();
        assert_eq!(carrier.frequency(), 110.0);
        assert_eq!(carrier.waveform(), &Waveform::Sine);
    }

    #[test]
    fn ring_output_is_the_product_of_primary_and_carrier() {
        let sample_rate = 8_000.0;
        let mut voice = voice(true);
        let mut primary = Oscillator::new(Waveform::Sine, 220.0);
        let mut carrier = Oscillator::new(Waveform::Sine, 110.0);
        voice.start();
        primary.start();
        carrier.start();

        for _ in 0..64 {
            let out = voice.render(sample_rate);
            let p = primary.next_sample(sample_rate);
            let c = carrier.next_sample(sample_rate);
            assert_eq!(out.dry, p);
            assert!((out.ring - p * c).abs() < 1e-6);
        }
    }

    #[test]
    fn without_ring_stage_both_paths_match() {
        let mut voice = voice(false);
        voice.start();
        for _ in 0..16 {
            let out = voice.render(44_100.0);
            assert_eq!(out.dry, out.ring);
        }
    }

    #[test]
    fn stopped_voice_is_silent() {
        let mut voice = voice(true);
        voice.start();
        voice.stop();
        voice.stop();
        assert!(!voice.is_running());
        assert_eq!(voice.render(44_100.0), VoiceOutput::default());
    }
}
