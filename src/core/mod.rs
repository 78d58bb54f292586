pub mod frequency;
pub mod input;
pub mod master;
pub mod midi;
pub mod note;
pub mod oscillator;
pub mod registry;
pub mod synth;
pub mod tone;
pub mod voice;

pub use synth::Synth;
