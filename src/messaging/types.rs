use crate::core::frequency::Transpose;
use crate::core::input::{ControllerMessage, InputEvent};
use crate::core::oscillator::WaveformKind;

/// Message types for communication between UI, controller input and the synth
#[derive(Debug, Clone, PartialEq)]
pub enum SynthMessage {
    Input(InputEvent),
    Controller(ControllerMessage),
    SetVolume(f32),
    SetRingDepth(f32),
    SetWaveform(WaveformKind),
    Transpose(Transpose),
    AllNotesOff,
}
