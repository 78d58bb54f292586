mod master;
mod midi_config;

pub use master::{MasterPanel, MasterView};
pub use midi_config::{describe, MidiConfigPanel};
