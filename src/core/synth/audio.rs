use crate::core::voice::VoiceOutput;

/// Number of output samples kept for the oscilloscope
pub const SCOPE_SIZE: usize = 1024;

impl super::Synth {
    /// Generate one audio sample
    pub fn get_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let mix = self
            .registry
            .voices_mut()
            .map(|voice| voice.render(sample_rate))
            .fold(VoiceOutput::default(), |sum, out| VoiceOutput {
                dry: sum.dry + out.dry,
                ring: sum.ring + out.ring,
            });

        let sample = self.master.mix(mix.dry, mix.ring);

        if self.scope.len() >= SCOPE_SIZE {
            self.scope.pop_front();
        }
        self.scope.push_back(sample);

        sample
    }

    /// Fill a mono buffer
    pub fn render(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.get_sample();
        }
    }

    /// Most recent output as plot points
    pub fn scope(&self) -> Vec<[f32; 2]> {
        self.scope
            .iter()
            .enumerate()
            .map(|(i, s)| [i as f32, *s])
            .collect()
    }
}
