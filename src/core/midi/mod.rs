mod input;

pub use input::MidiInputHandler;
